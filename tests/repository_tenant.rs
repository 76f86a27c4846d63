mod common;

use sqlx::PgPool;
use std::sync::Arc;
use tenant_router::domain::entities::RootDomainMode;
use tenant_router::domain::repositories::TenantRepository;
use tenant_router::infrastructure::persistence::PgTenantRepository;

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_by_subdomain(pool: PgPool) {
    let id = common::create_tenant(&pool, "alice", "alice", None, false).await;
    let repo = PgTenantRepository::new(Arc::new(pool));

    let tenant = repo.find_by_subdomain("alice").await.unwrap().unwrap();

    assert_eq!(tenant.user_id, id);
    assert_eq!(tenant.username, "alice");
    assert_eq!(tenant.root_domain_mode, RootDomainMode::Bio);
    assert!(repo.find_by_subdomain("nobody").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_unverified_custom_domain_is_absent(pool: PgPool) {
    common::create_tenant(&pool, "alice", "alice", Some("alice.com"), false).await;
    let repo = PgTenantRepository::new(Arc::new(pool));

    assert!(repo.find_by_custom_domain("alice.com").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_verified_custom_domain_with_redirect(pool: PgPool) {
    let id = common::create_tenant(&pool, "bob", "bob", Some("bob.com"), true).await;
    common::set_root_redirect(&pool, id, "https://bob-store.example").await;
    let repo = PgTenantRepository::new(Arc::new(pool));

    let tenant = repo.find_by_custom_domain("bob.com").await.unwrap().unwrap();

    assert_eq!(tenant.user_id, id);
    assert_eq!(tenant.root_redirect_target(), Some("https://bob-store.example"));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_ping(pool: PgPool) {
    let repo = PgTenantRepository::new(Arc::new(pool));

    assert!(repo.ping().await.is_ok());
}
