//! 전체 라우트 테이블을 대상으로 한 인증 시나리오
//!
//! Redis와 MongoDB 대신 인메모리 캐시/저장소와 수동 시계를 주입합니다.

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Duration;
use identity_service::caching::memory::InMemoryCache;
use identity_service::config::AppConfig;
use identity_service::core::{AppState, ManualClock};
use identity_service::repositories::users::InMemoryUserStore;
use identity_service::routes::configure_all_routes;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;

struct Context {
    state: web::Data<AppState>,
    store: Arc<InMemoryUserStore>,
    cache: Arc<InMemoryCache>,
    clock: Arc<ManualClock>,
}

fn context() -> Context {
    let clock = Arc::new(ManualClock::default());
    let cache = Arc::new(InMemoryCache::new(clock.clone()));
    let store = Arc::new(InMemoryUserStore::new());
    let state = AppState::build(AppConfig::for_tests(), cache.clone(), store.clone(), clock.clone())
        .expect("test state");
    Context {
        state: web::Data::new(state),
        store,
        cache,
        clock,
    }
}

fn registration(email: &str) -> Value {
    json!({
        "name": "Test User",
        "email": email,
        "password": "password123"
    })
}

fn credentials(email: &str, password: &str) -> Value {
    json!({ "email": email, "password": password })
}

fn peer(addr: &str) -> SocketAddr {
    addr.parse().expect("socket address")
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

#[actix_web::test]
async fn test_health() {
    let ctx = context();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure_all_routes)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_register_login_logout_then_token_is_invalidated() {
    let ctx = context();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure_all_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/admin/register")
        .set_json(registration("admin@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["role"], "admin");
    assert!(body["data"].get("password_hash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(credentials("admin@example.com", "password123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let token = body["token"].as_str().expect("token").to_string();
    assert_eq!(body["token_type"], "Bearer");

    let req = test::TestRequest::get()
        .uri("/api/admin/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["email"], "admin@example.com");

    let req = test::TestRequest::post()
        .uri("/api/admin/logout")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/admin/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["reason"], "invalidated");
}

#[actix_web::test]
async fn test_sixth_login_attempt_is_rate_limited() {
    let ctx = context();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure_all_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(registration("customer@example.com"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    for _ in 0..5 {
        let req = test::TestRequest::post()
            .uri("/api/user/login")
            .peer_addr(peer("1.2.3.4:5000"))
            .set_json(credentials("customer@example.com", "wrong-password"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_credentials");
    }

    // 올바른 비밀번호여도 윈도우 안에서는 거부
    let req = test::TestRequest::post()
        .uri("/api/user/login")
        .peer_addr(peer("1.2.3.4:5000"))
        .set_json(credentials("customer@example.com", "password123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(resp.headers().get("Retry-After").unwrap(), "60");

    ctx.clock.advance(Duration::seconds(61));

    let req = test::TestRequest::post()
        .uri("/api/user/login")
        .peer_addr(peer("1.2.3.4:5000"))
        .set_json(credentials("customer@example.com", "password123"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_rotating_forwarded_for_does_not_reset_login_limit() {
    let ctx = context();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure_all_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(registration("customer@example.com"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let mut statuses = Vec::new();
    for i in 0..6 {
        let req = test::TestRequest::post()
            .uri("/api/user/login")
            .peer_addr(peer("7.7.7.7:5000"))
            .insert_header(("X-Forwarded-For", format!("10.0.0.{}", i)))
            .set_json(credentials("customer@example.com", "wrong-password"))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }

    assert!(statuses[..5].iter().all(|s| *s == StatusCode::UNAUTHORIZED));
    assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);
}

#[actix_web::test]
async fn test_unknown_paths_are_not_found_without_auth() {
    let ctx = context();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure_all_routes)).await;

    for (method, uri) in [
        (actix_web::http::Method::GET, "/api/admin/register"),
        (actix_web::http::Method::GET, "/api/user/no-such-page"),
        (actix_web::http::Method::POST, "/api/admin/nothing/here"),
    ] {
        let req = test::TestRequest::default().method(method).uri(uri).to_request();
        let status = test::call_service(&app, req).await.status();
        assert!(
            status == StatusCode::NOT_FOUND || status == StatusCode::METHOD_NOT_ALLOWED,
            "{} returned {}",
            uri,
            status
        );
    }
}

#[actix_web::test]
async fn test_health_shares_the_default_limit() {
    let ctx = context();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure_all_routes)).await;

    for _ in 0..60 {
        let req = test::TestRequest::get()
            .uri("/health")
            .peer_addr(peer("3.3.3.3:7000"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri("/health")
        .peer_addr(peer("3.3.3.3:7000"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[actix_web::test]
async fn test_admin_quota_ceiling() {
    let ctx = context();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure_all_routes)).await;

    for n in 0..3 {
        let req = test::TestRequest::post()
            .uri("/api/admin/register")
            .set_json(registration(&format!("admin{}@example.com", n)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }
    assert_eq!(ctx.store.create_calls(), 3);

    let req = test::TestRequest::post()
        .uri("/api/admin/register")
        .set_json(registration("admin3@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "quota_exceeded");
    assert_eq!(ctx.store.create_calls(), 3);

    // 고객 가입은 할당량과 무관
    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(registration("customer@example.com"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn test_admin_list_is_role_gated() {
    let ctx = context();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure_all_routes)).await;

    for (uri, email) in [
        ("/api/admin/register", "admin@example.com"),
        ("/api/user/register", "customer@example.com"),
    ] {
        let req = test::TestRequest::post().uri(uri).set_json(registration(email)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let mut tokens = Vec::new();
    for email in ["admin@example.com", "customer@example.com"] {
        let req = test::TestRequest::post()
            .uri("/api/user/login")
            .set_json(credentials(email, "password123"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        tokens.push(body["token"].as_str().expect("token").to_string());
    }

    let req = test::TestRequest::get()
        .uri("/api/admin/list?page=1&limit=10")
        .insert_header(bearer(&tokens[1]))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/admin/list?page=1&limit=10")
        .insert_header(bearer(&tokens[0]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["email"], "admin@example.com");

    let req = test::TestRequest::get().uri("/api/admin/list").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_expired_token_reports_expired() {
    let ctx = context();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure_all_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(registration("customer@example.com"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(credentials("customer@example.com", "password123"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().expect("token").to_string();

    ctx.clock.advance(Duration::hours(24));

    let req = test::TestRequest::get()
        .uri("/api/user/me")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["reason"], "expired");
}

#[actix_web::test]
async fn test_cache_outage_fails_closed_on_protected_routes() {
    let ctx = context();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure_all_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(registration("customer@example.com"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(credentials("customer@example.com", "password123"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().expect("token").to_string();

    ctx.cache.set_available(false);

    let req = test::TestRequest::get()
        .uri("/api/user/me")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
}

#[actix_web::test]
async fn test_profile_update_changes_password() {
    let ctx = context();
    let app = test::init_service(App::new().app_data(ctx.state.clone()).configure(configure_all_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/user/register")
        .set_json(registration("customer@example.com"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(credentials("customer@example.com", "password123"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().expect("token").to_string();

    let req = test::TestRequest::post()
        .uri("/api/user/profile/update")
        .insert_header(bearer(&token))
        .set_json(json!({ "name": "Renamed", "password": "new-password-1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["name"], "Renamed");

    let req = test::TestRequest::post()
        .uri("/api/user/login")
        .set_json(credentials("customer@example.com", "new-password-1"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}
