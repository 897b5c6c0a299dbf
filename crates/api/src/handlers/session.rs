use axum::{http::StatusCode, Json};
use laundrybook_core::models::booking::{LoginRequest, LoginResponse};
use tracing::info;

use crate::middleware::{error_handling::AppError, session::validate_username};

#[axum::debug_handler]
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<Json<LoginResponse>, AppError> {
    let username = validate_username(&payload.username)?;
    info!("{} signed in", username);

    Ok(Json(LoginResponse { username }))
}

/// Nothing to forget server-side; the client drops its stored name.
#[axum::debug_handler]
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}
