mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use common::{ALICE, BOB, RecordingAnalytics, TestApp};
use std::sync::Arc;
use tenant_router::api::response::NO_STORE;
use tenant_router::domain::analytics_event::EventKind;
use tenant_router::domain::analytics_worker::{SideEffect, run_analytics_worker};
use tower::ServiceExt;

async fn get(app: &TestApp, host: Option<&str>, uri: &str) -> Response {
    let mut request = Request::builder().uri(uri);
    if let Some(host) = host {
        request = request.header(header::HOST, host);
    }

    app.app
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn assert_no_store(response: &Response) {
    let headers = response.headers();
    assert_eq!(headers[header::CACHE_CONTROL], NO_STORE);
    assert_eq!(headers[header::PRAGMA], "no-cache");
    assert_eq!(headers[header::EXPIRES], "0");
}

#[tokio::test]
async fn test_subdomain_root_rewrites_to_profile() {
    let app = common::spawn_app();

    let response = get(&app, Some("alice.example.com"), "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "/alice?subdomain=alice");
}

#[tokio::test]
async fn test_subdomain_bio_alias_and_trailing_slash() {
    let app = common::spawn_app();

    let response = get(&app, Some("alice.example.com"), "/bio/").await;

    assert_eq!(body_text(response).await, "/alice?subdomain=alice");
}

#[tokio::test]
async fn test_rewrite_keeps_query_and_replaces_scope() {
    let app = common::spawn_app();

    let response = get(&app, Some("alice.example.com"), "/?ref=ig&subdomain=bob").await;

    assert_eq!(body_text(response).await, "/alice?ref=ig&subdomain=alice");
}

#[tokio::test]
async fn test_subdomain_short_link_redirects() {
    let mut app = common::spawn_app();

    let response = get(&app, Some("alice.example.com"), "/summer").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://alice.example/summer"
    );
    assert_no_store(&response);

    let effects = common::drain(&mut app.events);
    assert_eq!(effects.len(), 2);
    match &effects[0] {
        SideEffect::Record(event) => {
            assert_eq!(event.kind, EventKind::LinkClick);
            assert_eq!(event.user_id, Some(ALICE));
            assert_eq!(event.link_id, Some(10));
        }
        other => panic!("unexpected side effect: {:?}", other),
    }
    assert!(matches!(effects[1], SideEffect::IncrementClicks { link_id: 10 }));
}

#[tokio::test]
async fn test_custom_domain_unknown_code_is_not_found() {
    let mut app = common::spawn_app();

    let response = get(&app, Some("alice.com"), "/promo").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_no_store(&response);
    assert!(common::drain(&mut app.events).is_empty());
}

#[tokio::test]
async fn test_custom_domain_short_link_is_scoped() {
    let app = common::spawn_app();

    let own = get(&app, Some("alice.com"), "/summer").await;
    assert_eq!(own.status(), StatusCode::FOUND);

    // bob's code is invisible on alice's domain, and global codes too.
    let foreign = get(&app, Some("alice.com"), "/sale").await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
    let global = get(&app, Some("alice.com"), "/docs").await;
    assert_eq!(global.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_spoofed_scope_parameter_is_ignored() {
    let app = common::spawn_app();

    // `summer` belongs to alice; asking for it on bob's subdomain must not
    // reach alice's namespace through a forged query parameter.
    let response = get(&app, Some("bob.example.com"), "/summer?subdomain=alice").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_direct_short_link_path_cannot_borrow_another_scope() {
    let mut app = common::spawn_app();

    for (host, uri) in [
        ("bob.example.com", "/r/summer?subdomain=alice"),
        ("bob.com", "/r/summer?domain=alice.com"),
        ("bob.example.com", "/r/summer?domain=alice.com"),
    ] {
        let response = get(&app, Some(host), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", host, uri);
        assert_no_store(&response);
    }
    assert!(common::drain(&mut app.events).is_empty());
}

#[tokio::test]
async fn test_direct_short_link_path_uses_host_scope() {
    let app = common::spawn_app();

    let own = get(&app, Some("bob.example.com"), "/r/sale").await;
    assert_eq!(own.status(), StatusCode::FOUND);
    assert_eq!(
        own.headers()[header::LOCATION],
        "https://bob-store.example/sale"
    );

    let matching = get(&app, Some("alice.com"), "/r/summer?domain=alice.com").await;
    assert_eq!(matching.status(), StatusCode::FOUND);

    // Platform links are not reachable through a tenant host.
    let global = get(&app, Some("bob.example.com"), "/r/docs").await;
    assert_eq!(global.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_main_domain_honours_query_scope() {
    let app = common::spawn_app();

    let response = get(&app, Some("example.com"), "/r/summer?subdomain=alice").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://alice.example/summer"
    );
}

#[tokio::test]
async fn test_non_ascii_short_code_redirects() {
    let app = common::spawn_app();

    let response = get(&app, Some("alice.example.com"), "/caf%C3%A9").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://alice.example/cafe"
    );
}

#[tokio::test]
async fn test_redirect_mode_root_redirects_with_one_event() {
    let mut app = common::spawn_app();

    let response = get(&app, Some("bob.com"), "/").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://bob-store.example"
    );
    assert_no_store(&response);

    let effects = common::drain(&mut app.events);
    assert_eq!(effects.len(), 1);
    match &effects[0] {
        SideEffect::Record(event) => {
            assert_eq!(event.kind, EventKind::RootRedirect);
            assert_eq!(event.user_id, Some(BOB));
            assert_eq!(event.host.as_deref(), Some("bob.com"));
        }
        other => panic!("unexpected side effect: {:?}", other),
    }
}

#[tokio::test]
async fn test_redirect_mode_bio_rewrites_to_profile() {
    let mut app = common::spawn_app();

    let response = get(&app, Some("bob.com"), "/bio").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "/bob?domain=bob.com");
    assert!(common::drain(&mut app.events).is_empty());
}

#[tokio::test]
async fn test_page_route_passes_through() {
    let app = common::spawn_app();

    let response = get(&app, Some("alice.com"), "/page/about").await;

    assert_eq!(body_text(response).await, "/page/about");
}

#[tokio::test]
async fn test_main_domain_passes_through() {
    let app = common::spawn_app();

    for (host, path) in [
        ("example.com", "/"),
        ("example.com", "/alice"),
        ("www.example.com", "/pricing"),
    ] {
        let response = get(&app, Some(host), path).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, path);
    }
    assert_eq!(app.tenants.lookups(), 0);
}

#[tokio::test]
async fn test_global_short_link_on_main_domain() {
    let app = common::spawn_app();

    let response = get(&app, Some("example.com"), "/r/docs").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "https://docs.example");
}

#[tokio::test]
async fn test_static_assets_skip_tenant_lookup() {
    let app = common::spawn_app();

    let response = get(&app, Some("alice.example.com"), "/favicon.ico").await;

    assert_eq!(body_text(response).await, "/favicon.ico");
    assert_eq!(app.tenants.lookups(), 0);
}

#[tokio::test]
async fn test_missing_host_passes_through() {
    let app = common::spawn_app();

    let response = get(&app, None, "/promo").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "/promo");
}

#[tokio::test]
async fn test_unknown_tenant_is_not_found_and_cached() {
    let app = common::spawn_app();

    for _ in 0..3 {
        let response = get(&app, Some("ghost.example.com"), "/").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_no_store(&response);
    }
    assert_eq!(app.tenants.lookups(), 1);
}

#[tokio::test]
async fn test_store_outage_is_503_and_not_cached() {
    let app = common::spawn_app();
    app.tenants.set_failing(true);

    let response = get(&app, Some("alice.com"), "/").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.headers()[header::RETRY_AFTER], "5");
    assert_no_store(&response);

    app.tenants.set_failing(false);

    let response = get(&app, Some("alice.com"), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "/alice?domain=alice.com");
}

#[tokio::test]
async fn test_health_is_reachable_on_tenant_hosts() {
    let app = common::spawn_app();

    let response = get(&app, Some("alice.example.com"), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.tenants.lookups(), 0);
}

#[tokio::test]
async fn test_worker_persists_side_effects() {
    let TestApp { app, events, .. } = common::spawn_app();
    let analytics = Arc::new(RecordingAnalytics::default());
    let worker = tokio::spawn(run_analytics_worker(events, analytics.clone(), 2));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/summer")
                .header(header::HOST, "alice.example.com")
                .header(header::USER_AGENT, "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    // Dropping the app drops every sender; the worker drains and exits.
    drop(app);
    worker.await.unwrap();

    let recorded = analytics.events.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].link_id, Some(10));
    assert_eq!(recorded[0].os, Some("iOS"));
    assert_eq!(*analytics.clicks.lock().unwrap(), vec![10]);
}
