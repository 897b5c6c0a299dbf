use axum::http::StatusCode;
use fake::faker::internet::en::Username;
use fake::Fake;
use laundrybook_core::models::booking::LoginResponse;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{json, Value};

use crate::test_utils::{user_header, TestContext};

#[tokio::test]
async fn test_login_trims_username() {
    let (server, _state) = TestContext::new().build_server();

    let response = server
        .post("/api/login")
        .json(&json!({ "username": "  alice " }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<LoginResponse>().username, "alice");
}

#[tokio::test]
async fn test_signed_in_name_owns_its_bookings() {
    let (server, _state) = TestContext::new().build_server();
    let username: String = Username().fake();

    let login = server
        .post("/api/login")
        .json(&json!({ "username": username }))
        .await
        .json::<LoginResponse>();
    let (name, value) = user_header(&login.username);
    server
        .post("/api/bookings")
        .add_header(name, value)
        .json(&json!({ "key": "2024-06-01-16-19" }))
        .await
        .assert_status_ok();

    let holder = server
        .get("/api/bookings/2024-06-01-16-19")
        .await
        .json::<Value>()["held_by"]
        .clone();
    assert_eq!(holder, json!(username));
}

#[tokio::test]
async fn test_non_ascii_name_can_book() {
    let (server, state) = TestContext::new().build_server();

    let login = server
        .post("/api/login")
        .json(&json!({ "username": "Jürgen" }))
        .await;
    login.assert_status_ok();
    let username = login.json::<LoginResponse>().username;

    let (name, value) = user_header(&username);
    server
        .post("/api/bookings")
        .add_header(name, value)
        .json(&json!({ "key": "2024-06-01-7-10" }))
        .await
        .assert_status_ok();

    assert_eq!(
        state.service.snapshot().await.bookings_for("Jürgen").len(),
        1
    );
}

#[rstest]
#[case::empty(String::new())]
#[case::blank("   ".to_string())]
#[case::too_long("x".repeat(65))]
#[tokio::test]
async fn test_login_rejects_bad_username(#[case] username: String) {
    let (server, _state) = TestContext::new().build_server();

    let response = server
        .post("/api/login")
        .json(&json!({ "username": username }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_is_acknowledged() {
    let (server, _state) = TestContext::new().build_server();

    let response = server.post("/api/logout").await;

    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_health_and_version() {
    let (server, _state) = TestContext::new().build_server();

    let health = server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<Value>(), json!({ "status": "ok" }));

    let version = server.get("/version").await.json::<Value>();
    assert_eq!(version["name"], json!("laundrybook-api"));
    assert_eq!(version["version"], json!(env!("CARGO_PKG_VERSION")));
}
