#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::http::Uri;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tenant_router::application::services::{
    ResolverSettings, RoutingEngine, ShortLinkResolver, TenantResolver,
};
use tenant_router::domain::analytics_event::AnalyticsEvent;
use tenant_router::domain::analytics_worker::{EventSink, SideEffect};
use tenant_router::domain::entities::{ShortLinkRecord, TenantRecord};
use tenant_router::domain::host::HostClassifier;
use tenant_router::domain::repositories::{
    AnalyticsRepository, ShortLinkRepository, TenantRepository,
};
use tenant_router::error::AppError;
use tenant_router::routes::app_router;
use tenant_router::state::AppState;
use tokio::sync::mpsc;
use tower_http::normalize_path::NormalizePath;

pub const BASE_DOMAIN: &str = "example.com";
/// Host the axum-test transport addresses requests to.
pub const TEST_SERVER_DOMAIN: &str = "localhost";
pub const RETRY_AFTER_SECS: u64 = 5;

pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;

// ── In-memory repositories ──────────────────────────────────────────────────

/// Tenant store backed by two maps, with a switch to simulate outages.
#[derive(Default)]
pub struct InMemoryTenants {
    by_subdomain: Mutex<HashMap<String, TenantRecord>>,
    by_custom_domain: Mutex<HashMap<String, TenantRecord>>,
    failing: AtomicBool,
    lookups: AtomicUsize,
}

impl InMemoryTenants {
    pub fn with_tenant(
        self,
        subdomain: &str,
        custom_domain: Option<&str>,
        tenant: TenantRecord,
    ) -> Self {
        if let Some(domain) = custom_domain {
            self.by_custom_domain
                .lock()
                .unwrap()
                .insert(domain.to_string(), tenant.clone());
        }
        self.by_subdomain
            .lock()
            .unwrap()
            .insert(subdomain.to_string(), tenant);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of lookups that reached the store.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn find(
        &self,
        map: &Mutex<HashMap<String, TenantRecord>>,
        key: &str,
    ) -> Result<Option<TenantRecord>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::internal("Database error", serde_json::json!({})));
        }
        Ok(map.lock().unwrap().get(key).cloned())
    }
}

#[async_trait]
impl TenantRepository for InMemoryTenants {
    async fn find_by_subdomain(&self, subdomain: &str) -> Result<Option<TenantRecord>, AppError> {
        self.find(&self.by_subdomain, subdomain)
    }

    async fn find_by_custom_domain(
        &self,
        host: &str,
    ) -> Result<Option<TenantRecord>, AppError> {
        self.find(&self.by_custom_domain, host)
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::internal("Database error", serde_json::json!({})));
        }
        Ok(())
    }
}

/// Short link store backed by a list.
#[derive(Default)]
pub struct InMemoryLinks {
    links: Vec<ShortLinkRecord>,
}

impl InMemoryLinks {
    pub fn with_link(mut self, link: ShortLinkRecord) -> Self {
        self.links.push(link);
        self
    }
}

#[async_trait]
impl ShortLinkRepository for InMemoryLinks {
    async fn find_active(
        &self,
        code: &str,
        owner_user_id: Option<i64>,
    ) -> Result<Option<ShortLinkRecord>, AppError> {
        Ok(self
            .links
            .iter()
            .find(|l| l.short_code == code && l.owner_user_id == owner_user_id && l.is_active)
            .cloned())
    }
}

/// Analytics store that keeps everything it is given.
#[derive(Default)]
pub struct RecordingAnalytics {
    pub events: Mutex<Vec<AnalyticsEvent>>,
    pub clicks: Mutex<Vec<i64>>,
}

#[async_trait]
impl AnalyticsRepository for RecordingAnalytics {
    async fn record_event(&self, event: AnalyticsEvent) -> Result<(), AppError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }

    async fn increment_click_count(&self, link_id: i64) -> Result<(), AppError> {
        self.clicks.lock().unwrap().push(link_id);
        Ok(())
    }
}

// ── Fixtures ────────────────────────────────────────────────────────────────

/// alice: bio mode on `alice.example.com` and `alice.com`.
/// bob: redirect mode to `https://bob-store.example` on `bob.example.com` and `bob.com`.
pub fn tenants() -> InMemoryTenants {
    InMemoryTenants::default()
        .with_tenant("alice", Some("alice.com"), TenantRecord::new(ALICE, "alice"))
        .with_tenant(
            "bob",
            Some("bob.com"),
            TenantRecord::new(BOB, "bob").with_redirect("https://bob-store.example"),
        )
}

/// `summer` and `café` owned by alice, `sale` owned by bob, `docs` global.
pub fn links() -> InMemoryLinks {
    InMemoryLinks::default()
        .with_link(ShortLinkRecord::new(
            10,
            "summer",
            "https://alice.example/summer",
            Some(ALICE),
        ))
        .with_link(ShortLinkRecord::new(
            20,
            "sale",
            "https://bob-store.example/sale",
            Some(BOB),
        ))
        .with_link(ShortLinkRecord::new(30, "docs", "https://docs.example", None))
        .with_link(ShortLinkRecord::new(
            40,
            "café",
            "https://alice.example/cafe",
            Some(ALICE),
        ))
}

/// Downstream application that answers every request with its URI.
pub fn echo_downstream() -> Router {
    Router::new().fallback(|uri: Uri| async move { uri.to_string() })
}

pub struct TestApp {
    pub app: NormalizePath<Router>,
    pub events: mpsc::Receiver<SideEffect>,
    pub tenants: Arc<InMemoryTenants>,
}

/// Builds state around the given stores.
pub fn create_test_state(
    tenants: Arc<InMemoryTenants>,
    links: InMemoryLinks,
) -> (AppState, mpsc::Receiver<SideEffect>) {
    let (tx, rx) = mpsc::channel(64);
    let events = EventSink::new(tx);

    let resolver = Arc::new(TenantResolver::new(tenants, ResolverSettings::default()));
    let engine = Arc::new(RoutingEngine::new(
        HostClassifier::new([BASE_DOMAIN, TEST_SERVER_DOMAIN]),
        resolver.clone(),
        events.clone(),
        RETRY_AFTER_SECS,
    ));
    let short_links = Arc::new(ShortLinkResolver::new(
        Arc::new(links),
        resolver,
        events.clone(),
        Duration::from_millis(3000),
    ));

    let state = AppState::new(engine, short_links, events, false, RETRY_AFTER_SECS);
    (state, rx)
}

/// Full application with the echo downstream and the default fixtures.
pub fn spawn_app() -> TestApp {
    let tenants = Arc::new(tenants());
    let (state, events) = create_test_state(tenants.clone(), links());

    TestApp {
        app: app_router(state, echo_downstream()),
        events,
        tenants,
    }
}

/// Drains everything currently queued.
pub fn drain(rx: &mut mpsc::Receiver<SideEffect>) -> Vec<SideEffect> {
    let mut effects = Vec::new();
    while let Ok(effect) = rx.try_recv() {
        effects.push(effect);
    }
    effects
}

// ── Database seeding ────────────────────────────────────────────────────────

pub async fn create_tenant(
    pool: &PgPool,
    username: &str,
    subdomain: &str,
    custom_domain: Option<&str>,
    verified: bool,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO tenants (username, subdomain, custom_domain, custom_domain_verified)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(username)
    .bind(subdomain)
    .bind(custom_domain)
    .bind(verified)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn set_root_redirect(pool: &PgPool, tenant_id: i64, url: &str) {
    sqlx::query(
        "UPDATE tenants SET root_domain_mode = 'redirect', root_domain_redirect_url = $2
         WHERE id = $1",
    )
    .bind(tenant_id)
    .bind(url)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn create_short_link(
    pool: &PgPool,
    code: &str,
    url: &str,
    owner: Option<i64>,
    active: bool,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO short_links (short_code, destination_url, owner_user_id, is_active)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(code)
    .bind(url)
    .bind(owner)
    .bind(active)
    .fetch_one(pool)
    .await
    .unwrap()
}
