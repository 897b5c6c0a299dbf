//! # Error Handling Module
//!
//! Converts domain errors into HTTP responses with a status code and a JSON
//! body of the form `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use laundrybook_core::errors::TimeError;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use laundrybook_api::middleware::error_handling::AppError;
/// use laundrybook_core::errors::TimeError;
/// use laundrybook_core::models::slot::SlotKey;
///
/// async fn handler(raw: String) -> Result<Json<String>, AppError> {
///     let key: SlotKey = raw.parse().map_err(TimeError::from)?;
///     Ok(Json(key.to_string()))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub TimeError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TimeError::Validation(_) => StatusCode::BAD_REQUEST,
            TimeError::Authentication(_) => StatusCode::UNAUTHORIZED,
            TimeError::Conflict(_) => StatusCode::CONFLICT,
            TimeError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Allows `?` on `TimeResult` inside handlers returning `Result<T, AppError>`.
impl From<TimeError> for AppError {
    fn from(err: TimeError) -> Self {
        AppError(err)
    }
}
