//! # Session Guard
//!
//! The client remembers who is signed in and sends the name with every
//! request in the `X-Laundry-User` header. Handlers that need a user take a
//! [`CurrentUser`]; requests without one are turned away with 401.
//!
//! This identifies users, it does not authenticate them.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use laundrybook_core::errors::{TimeError, TimeResult};

use super::error_handling::AppError;

pub const USER_HEADER: &str = "x-laundry-user";

pub const MAX_USERNAME_LEN: usize = 64;

/// Trim and check a username typed at the login view.
pub fn validate_username(raw: &str) -> TimeResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(TimeError::Validation("username must not be empty".to_string()));
    }
    if name.chars().count() > MAX_USERNAME_LEN {
        return Err(TimeError::Validation(format!(
            "username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// The user named by the request's session header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub String);

impl CurrentUser {
    pub fn name(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_HEADER)
            // names are opaque UTF-8, not limited to visible ASCII
            .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
            .unwrap_or_default();

        let name = validate_username(raw)
            .map_err(|_| TimeError::Authentication("sign in to continue".to_string()))?;

        Ok(CurrentUser(name))
    }
}
