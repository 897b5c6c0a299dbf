use axum::{
    extract::{Path, State},
    Json,
};
use laundrybook_core::models::booking::{
    BookRequest, BookResponse, BookingLookupResponse, CancelResponse, MyBookingsResponse,
};
use std::sync::Arc;

use crate::{
    middleware::{error_handling::AppError, session::CurrentUser},
    ApiState,
};

#[axum::debug_handler]
pub async fn book_slot(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
    Json(payload): Json<BookRequest>,
) -> Result<Json<BookResponse>, AppError> {
    let response = state.service.book(user.name(), &payload.key).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
    Path(key): Path<String>,
) -> Result<Json<CancelResponse>, AppError> {
    let response = state.service.cancel(user.name(), &key).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    Path(key): Path<String>,
) -> Result<Json<BookingLookupResponse>, AppError> {
    let response = state.service.lookup(&key).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn my_bookings(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
) -> Json<MyBookingsResponse> {
    Json(state.service.my_bookings(user.name()).await)
}
