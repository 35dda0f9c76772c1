mod common;

use auth::AccessClaims;
use auth::ErrorKind;
use auth::IdentityClaim;
use chrono::Duration;
use chrono::Utc;
use common::devoratio_account;
use common::InMemoryCredentialLookup;
use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;

const INVALID_CREDENTIALS: &str = "username or email or password is invalid";

#[tokio::test]
async fn test_login_with_username() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "devoratio",
            "password": "veryverysecurepassword"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 200);
    assert_eq!(body["data"]["token_type"], "Bearer");

    let token = body["data"]["access_token"].as_str().unwrap();
    let identity = app.jwt_handler.verify(token).unwrap();
    assert_eq!(identity, IdentityClaim::new(1, "devoratio"));
}

#[tokio::test]
async fn test_login_with_email() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "devoratio@example.com",
            "password": "veryverysecurepassword"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "devoratio",
            "password": "twinkling"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status_code"], 400);
    assert_eq!(body["data"]["message"], INVALID_CREDENTIALS);
    assert!(body["data"]["access_token"].is_null());
}

#[tokio::test]
async fn test_login_unknown_identifier_looks_like_wrong_password() {
    let app = TestApp::spawn().await;

    let unknown: serde_json::Value = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "nobody",
            "password": "veryverysecurepassword"
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    let mismatch: serde_json::Value = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "devoratio",
            "password": "twinkling"
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(unknown, mismatch);
}

#[tokio::test]
async fn test_login_store_failure_propagates() {
    let lookup = InMemoryCredentialLookup::default()
        .with_account(devoratio_account())
        .failing_for("devoratio", ErrorKind::ServiceUnavailable);
    let app = TestApp::spawn_with(lookup).await;

    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "devoratio",
            "password": "veryverysecurepassword"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "credential store failure");
}

#[tokio::test]
async fn test_me_with_issued_token() {
    let app = TestApp::spawn().await;

    let body: serde_json::Value = app
        .post("/api/auth/login")
        .json(&json!({
            "identifier": "devoratio",
            "password": "veryverysecurepassword"
        }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse response");
    let token = body["data"]["access_token"].as_str().unwrap();

    let response = app
        .get("/api/auth/me")
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["user_id"], 1);
    assert_eq!(body["data"]["username"], "devoratio");
}

#[tokio::test]
async fn test_me_without_token() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/auth/me")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "missing Authorization header");
}

#[tokio::test]
async fn test_me_with_expired_token() {
    let app = TestApp::spawn().await;

    let issued_at = Utc::now() - Duration::hours(25);
    let token = app
        .jwt_handler
        .sign(&AccessClaims::for_identity(
            IdentityClaim::new(1, "devoratio"),
            issued_at,
        ))
        .unwrap();

    let response = app
        .get("/api/auth/me")
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["message"], "token has expired");
}

#[tokio::test]
async fn test_me_with_token_signed_by_another_key() {
    let app = TestApp::spawn().await;

    let token = auth::JwtHandler::new(b"another-secret-key-at-least-32-bytes-long")
        .issue(IdentityClaim::new(1, "devoratio"))
        .unwrap();

    let response = app
        .get("/api/auth/me")
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
