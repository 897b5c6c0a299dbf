use axum::{
    extract::{Path, State},
    Json,
};
use laundrybook_core::models::booking::{CatalogResponse, DayViewResponse};
use std::sync::Arc;

use crate::{
    middleware::{error_handling::AppError, session::CurrentUser},
    ApiState,
};

#[axum::debug_handler]
pub async fn get_catalog(State(state): State<Arc<ApiState>>) -> Json<CatalogResponse> {
    Json(state.service.catalog())
}

#[axum::debug_handler]
pub async fn get_day(
    State(state): State<Arc<ApiState>>,
    user: CurrentUser,
    Path(date): Path<String>,
) -> Result<Json<DayViewResponse>, AppError> {
    let view = state.service.day_view(user.name(), &date).await?;
    Ok(Json(view))
}
