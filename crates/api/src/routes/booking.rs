use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/bookings", post(handlers::booking::book_slot))
        .route(
            "/api/bookings/:key",
            get(handlers::booking::get_booking).delete(handlers::booking::cancel_booking),
        )
        .route("/api/me/bookings", get(handlers::booking::my_bookings))
}
