use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use goodeats_shared::errors::AppResult;
use goodeats_shared::types::ApiResponse;

use crate::services::rsvp_service;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RecountResponse {
    pub event_id: Uuid,
    pub current_attendees: i32,
}

/// POST /internal/events/:id/recount (service-to-service, no auth)
pub async fn recount_attendees(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RecountResponse>>> {
    let current_attendees = rsvp_service::recount(&state.db, event_id)?;
    Ok(Json(ApiResponse::ok(RecountResponse { event_id, current_attendees })))
}
