use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use goodeats_shared::errors::{AppError, AppResult, ErrorCode};
use goodeats_shared::middleware::ValidJson;
use goodeats_shared::types::auth::AuthUser;
use goodeats_shared::types::ApiResponse;

use crate::events::publisher;
use crate::ledger::{MealPlan, Roster, RsvpSubmission, SubmitOutcome};
use crate::models::Rsvp;
use crate::services::rsvp_service;
use crate::AppState;

// --- POST /events/:id/rsvp ---

pub async fn submit_rsvp(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<Uuid>,
    ValidJson(submission): ValidJson<RsvpSubmission>,
) -> AppResult<Json<ApiResponse<SubmitOutcome>>> {
    let outcome = rsvp_service::submit(&state.db, event_id, user.id, &submission)?;

    publisher::publish_rsvp_submitted(&state.rabbitmq, &outcome).await;

    let message = if outcome.created { "RSVP submitted!" } else { "RSVP updated!" };
    Ok(Json(ApiResponse::ok_with_message(outcome, message)))
}

// --- GET /events/:id/rsvp ---

pub async fn get_my_rsvp(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Rsvp>>> {
    let rsvp = rsvp_service::find_for_user(&state.db, event_id, user.id)?
        .ok_or_else(|| AppError::new(ErrorCode::RsvpNotFound, "you have not responded to this event"))?;

    Ok(Json(ApiResponse::ok(rsvp)))
}

// --- GET /events/:id/roster ---

pub async fn get_roster(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Roster>>> {
    let roster = rsvp_service::roster(&state.db, event_id)?;
    Ok(Json(ApiResponse::ok(roster)))
}

// --- GET /events/:id/meal-plan ---

pub async fn get_meal_plan(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MealPlan>>> {
    let roster = rsvp_service::roster(&state.db, event_id)?;
    Ok(Json(ApiResponse::ok(roster.meal_plan())))
}
