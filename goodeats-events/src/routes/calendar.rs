use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use goodeats_shared::errors::AppResult;
use goodeats_shared::types::auth::AuthUser;
use goodeats_shared::types::ApiResponse;

use crate::services::event_service::{self, CalendarEntry};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: i32,
    pub month: u32,
}

// --- GET /calendar?year=&month= ---

pub async fn get_calendar(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<ApiResponse<Vec<CalendarEntry>>>> {
    let entries = event_service::calendar(&state.db, user.id, query.year, query.month)?;
    Ok(Json(ApiResponse::ok(entries)))
}
