use axum::{routing::post, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/login", post(handlers::session::login))
        .route("/api/logout", post(handlers::session::logout))
}
