/// End-to-end tests for registration, login, and token lifecycle
mod common;

use axum::http::{Method, StatusCode};
use common::{bearer, TestContext};
use serde_json::json;

#[tokio::test]
async fn test_readiness_and_health() {
    let ctx = TestContext::new();

    let response = ctx.send(Method::GET, "/api/healthz", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text(), "OK");

    let response = ctx.send(Method::GET, "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_register_user() {
    let ctx = TestContext::new();

    let user = ctx.register("walt@breakingbad.com", "04234").await;
    assert_eq!(user["email"], "walt@breakingbad.com");
    assert_eq!(user["is_chirpy_red"], false);
    assert!(user["id"].is_string());
    assert!(user["created_at"].is_string());
    assert!(user.get("hashed_password").is_none());
    assert!(user.get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let ctx = TestContext::new();
    ctx.register("saul@bettercall.com", "123456").await;

    let response = ctx
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "email": "saul@bettercall.com", "password": "other" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.json()["message"], "Email already exists");
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let ctx = TestContext::new();

    let response = ctx
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "email": "not-an-email", "password": "" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_login_returns_both_tokens() {
    let ctx = TestContext::new();
    let user = ctx.register("walt@breakingbad.com", "04234").await;

    let login = ctx.login("walt@breakingbad.com", "04234").await;

    assert_eq!(login["id"], user["id"]);
    assert_eq!(login["email"], "walt@breakingbad.com");
    assert_eq!(login["is_chirpy_red"], false);

    let token = login["token"].as_str().unwrap();
    let refresh = login["refresh_token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);
    assert_eq!(refresh.len(), 64);
    assert!(refresh.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(login.get("hashed_password").is_none());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new();
    ctx.register("walt@breakingbad.com", "04234").await;

    let wrong_password = ctx.login_response("walt@breakingbad.com", "wrong").await;
    let unknown_email = ctx.login_response("jesse@breakingbad.com", "04234").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(
        wrong_password.json()["message"],
        "Incorrect email or password"
    );
}

#[tokio::test]
async fn test_refresh_and_revoke() {
    let ctx = TestContext::new();
    let (_, _, refresh) = ctx.sign_up("walt@breakingbad.com", "04234").await;

    let response = ctx
        .send(Method::POST, "/api/refresh", Some(&bearer(&refresh)), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let session = response.json()["token"].as_str().unwrap().to_string();

    // The new session token is accepted on a protected route
    let response = ctx
        .send(
            Method::POST,
            "/api/chirps",
            Some(&bearer(&session)),
            Some(json!({ "body": "Refreshed" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = ctx
        .send(Method::POST, "/api/revoke", Some(&bearer(&refresh)), None)
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert!(response.body.is_empty());

    let response = ctx
        .send(Method::POST, "/api/refresh", Some(&bearer(&refresh)), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // Revoking again is still 204
    let response = ctx
        .send(Method::POST, "/api/revoke", Some(&bearer(&refresh)), None)
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_refresh_rejects_unknown_and_session_tokens() {
    let ctx = TestContext::new();
    let (_, session, _) = ctx.sign_up("walt@breakingbad.com", "04234").await;

    let response = ctx
        .send(Method::POST, "/api/refresh", Some(&bearer("deadbeef")), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx
        .send(Method::POST, "/api/refresh", Some(&bearer(&session)), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx.send(Method::POST, "/api/refresh", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_revoke_requires_bearer() {
    let ctx = TestContext::new();

    let response = ctx.send(Method::POST, "/api/revoke", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = ctx
        .send(Method::POST, "/api/revoke", Some(&bearer("never-issued")), None)
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_protected_routes_reject_bad_credentials() {
    let ctx = TestContext::new();
    let body = Some(json!({ "body": "hello" }));

    let cases = [
        None,
        Some("Bearer   "),
        Some("Bearer not.a.jwt"),
        Some("ApiKey something"),
        Some("bearer lowercase-scheme"),
    ];

    for authorization in cases {
        let response = ctx
            .send(Method::POST, "/api/chirps", authorization, body.clone())
            .await;
        assert_eq!(
            response.status,
            StatusCode::UNAUTHORIZED,
            "authorization {:?}",
            authorization
        );
    }
}

#[tokio::test]
async fn test_update_user_credentials() {
    let ctx = TestContext::new();
    let (user_id, session, _) = ctx.sign_up("walt@breakingbad.com", "04234").await;

    let response = ctx
        .send(
            Method::PUT,
            "/api/users",
            Some(&bearer(&session)),
            Some(json!({ "email": "heisenberg@breakingbad.com", "password": "losPollos" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let user = response.json();
    assert_eq!(user["id"], user_id.as_str());
    assert_eq!(user["email"], "heisenberg@breakingbad.com");
    assert!(user.get("hashed_password").is_none());

    // Old credentials stop working, new ones work
    let response = ctx.login_response("walt@breakingbad.com", "04234").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    ctx.login("heisenberg@breakingbad.com", "losPollos").await;
}

#[tokio::test]
async fn test_update_user_requires_session() {
    let ctx = TestContext::new();
    let (_, _, refresh) = ctx.sign_up("walt@breakingbad.com", "04234").await;
    let body = Some(json!({ "email": "x@example.com", "password": "pw" }));

    let response = ctx
        .send(Method::PUT, "/api/users", None, body.clone())
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // A refresh token is not a session token
    let response = ctx
        .send(Method::PUT, "/api/users", Some(&bearer(&refresh)), body)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_user_email_taken() {
    let ctx = TestContext::new();
    ctx.register("jesse@breakingbad.com", "pw").await;
    let (_, session, _) = ctx.sign_up("walt@breakingbad.com", "04234").await;

    let response = ctx
        .send(
            Method::PUT,
            "/api/users",
            Some(&bearer(&session)),
            Some(json!({ "email": "jesse@breakingbad.com", "password": "pw" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_incomplete_bodies_are_bad_requests() {
    let ctx = TestContext::new();
    ctx.register("walt@breakingbad.com", "04234").await;

    let response = ctx
        .send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "email": "walt@breakingbad.com" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "bad_request");

    let response = ctx
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "password": "04234" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "bad_request");

    // No content type at all
    let response = ctx.send(Method::POST, "/api/login", None, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "bad_request");
}
