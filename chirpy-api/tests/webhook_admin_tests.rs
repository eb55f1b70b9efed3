/// End-to-end tests for the payment webhook, admin endpoints, and static files
mod common;

use axum::http::{Method, StatusCode};
use chirpy_api::config::Platform;
use common::{bearer, TestContext, POLKA_KEY};
use serde_json::json;
use uuid::Uuid;

fn api_key(key: &str) -> String {
    format!("ApiKey {}", key)
}

fn upgrade_event(user_id: &str) -> serde_json::Value {
    json!({ "event": "user.upgraded", "data": { "user_id": user_id } })
}

#[tokio::test]
async fn test_webhook_upgrades_user() {
    let ctx = TestContext::new();
    let user = ctx.register("walt@breakingbad.com", "04234").await;
    let user_id = user["id"].as_str().unwrap();

    let response = ctx
        .send(
            Method::POST,
            "/api/polka/webhooks",
            Some(&api_key(POLKA_KEY)),
            Some(upgrade_event(user_id)),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let login = ctx.login("walt@breakingbad.com", "04234").await;
    assert_eq!(login["is_chirpy_red"], true);

    // Replays are harmless
    let response = ctx
        .send(
            Method::POST,
            "/api/polka/webhooks",
            Some(&api_key(POLKA_KEY)),
            Some(upgrade_event(user_id)),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_webhook_requires_api_key() {
    let ctx = TestContext::new();
    let user = ctx.register("walt@breakingbad.com", "04234").await;
    let event = upgrade_event(user["id"].as_str().unwrap());

    for authorization in [
        None,
        Some(api_key("wrong-key")),
        Some(format!("Bearer {}", POLKA_KEY)),
    ] {
        let response = ctx
            .send(
                Method::POST,
                "/api/polka/webhooks",
                authorization.as_deref(),
                Some(event.clone()),
            )
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    let login = ctx.login("walt@breakingbad.com", "04234").await;
    assert_eq!(login["is_chirpy_red"], false);
}

#[tokio::test]
async fn test_webhook_ignores_other_events() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            Method::POST,
            "/api/polka/webhooks",
            Some(&api_key(POLKA_KEY)),
            Some(json!({ "event": "user.payment_failed", "data": {} })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_webhook_unknown_or_invalid_user() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            Method::POST,
            "/api/polka/webhooks",
            Some(&api_key(POLKA_KEY)),
            Some(upgrade_event(&Uuid::new_v4().to_string())),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = ctx
        .send(
            Method::POST,
            "/api/polka/webhooks",
            Some(&api_key(POLKA_KEY)),
            Some(upgrade_event("not-a-uuid")),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_fileserver_hits_and_reset() {
    let ctx = TestContext::with_platform(Platform::Dev);

    for _ in 0..3 {
        let response = ctx.send(Method::GET, "/app/", None, None).await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.text().contains("Welcome to Chirpy"));
    }

    let response = ctx.send(Method::GET, "/admin/metrics", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response
        .text()
        .contains("<p>Chirpy has been visited 3 times!</p>"));

    // API traffic is not counted
    ctx.send(Method::GET, "/api/healthz", None, None).await;
    let response = ctx.send(Method::GET, "/admin/metrics", None, None).await;
    assert!(response.text().contains("visited 3 times"));

    let response = ctx.send(Method::POST, "/admin/reset", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "File server hits set to 0");

    let response = ctx.send(Method::GET, "/admin/metrics", None, None).await;
    assert!(response.text().contains("visited 0 times"));
}

#[tokio::test]
async fn test_reset_deletes_users_in_dev() {
    let ctx = TestContext::with_platform(Platform::Dev);
    ctx.register("walt@breakingbad.com", "04234").await;

    let response = ctx.send(Method::POST, "/admin/reset", None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = ctx.login_response("walt@breakingbad.com", "04234").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // The email is free again
    ctx.register("walt@breakingbad.com", "04234").await;
}

#[tokio::test]
async fn test_reset_forbidden_outside_dev() {
    let ctx = TestContext::new();
    ctx.register("walt@breakingbad.com", "04234").await;
    ctx.send(Method::GET, "/app/", None, None).await;

    let response = ctx.send(Method::POST, "/admin/reset", None, None).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Nothing was touched
    ctx.login("walt@breakingbad.com", "04234").await;
    let response = ctx.send(Method::GET, "/admin/metrics", None, None).await;
    assert!(response.text().contains("visited 1 times"));
}

#[tokio::test]
async fn test_session_of_deleted_user_is_unauthorized() {
    let ctx = TestContext::with_platform(Platform::Dev);
    let (_, session, _) = ctx.sign_up("walt@breakingbad.com", "04234").await;

    let response = ctx.send(Method::POST, "/admin/reset", None, None).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = ctx
        .send(
            Method::POST,
            "/api/chirps",
            Some(&bearer(&session)),
            Some(json!({ "body": "still here?" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let text = response.text();
    assert!(!text.contains("fkey"), "{}", text);

    let response = ctx
        .send(
            Method::PUT,
            "/api/users",
            Some(&bearer(&session)),
            Some(json!({ "email": "walt@breakingbad.com", "password": "new" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
