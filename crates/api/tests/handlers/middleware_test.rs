use axum::http::StatusCode;
use axum::response::IntoResponse;
use laundrybook_api::middleware::error_handling::AppError;
use laundrybook_api::middleware::session::validate_username;
use laundrybook_core::errors::{BookingError, TimeError};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::test_utils::{user_header, TestContext};

#[rstest]
#[case(TimeError::Validation("bad key".into()), StatusCode::BAD_REQUEST)]
#[case(TimeError::Authentication("no user".into()), StatusCode::UNAUTHORIZED)]
#[case(TimeError::Conflict("taken".into()), StatusCode::CONFLICT)]
#[case(TimeError::Storage(eyre::eyre!("disk full")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: TimeError, #[case] status: StatusCode) {
    let response = AppError(error).into_response();

    assert_eq!(response.status(), status);
}

#[test]
fn test_booking_errors_map_to_conflict_or_bad_request() {
    let key = "2024-06-01-7-10".parse().unwrap();

    let taken = AppError(
        BookingError::SlotTaken {
            key,
            holder: "alice".into(),
        }
        .into(),
    );
    let past = AppError(BookingError::PastSlot(key).into());

    assert_eq!(taken.status(), StatusCode::CONFLICT);
    assert_eq!(past.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_validate_username() {
    assert_eq!(validate_username(" bob\t").unwrap(), "bob");
    assert_eq!(validate_username(&"é".repeat(64)).unwrap().chars().count(), 64);
    assert!(validate_username("").is_err());
    assert!(validate_username(&"é".repeat(65)).is_err());
}

#[tokio::test]
async fn test_session_guard_trims_header() {
    let (server, _state) = TestContext::new().build_server();
    let (name, value) = user_header("  alice  ");

    let response = server.get("/api/me/bookings").add_header(name, value).await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["username"],
        serde_json::json!("alice")
    );
}

#[tokio::test]
async fn test_session_guard_rejects_blank_header() {
    let (server, _state) = TestContext::new().build_server();
    let (name, value) = user_header("   ");

    let response = server.get("/api/me/bookings").add_header(name, value).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<serde_json::Value>(),
        serde_json::json!({ "error": "Authentication error: sign in to continue" })
    );
}
