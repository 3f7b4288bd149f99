use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use goodeats_shared::errors::AppResult;
use goodeats_shared::types::auth::AuthUser;
use goodeats_shared::types::ApiResponse;

use crate::models::Author;
use crate::services::friend_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FriendSearch {
    pub q: Option<String>,
}

/// GET /friends?q=<name>
pub async fn list_friends(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(search): Query<FriendSearch>,
) -> AppResult<Json<ApiResponse<Vec<Author>>>> {
    let friends = friend_service::list_friends(&state.db, user.id, search.q.as_deref())?;
    Ok(Json(ApiResponse::ok(friends)))
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: bool,
}

/// DELETE /friends/:id
pub async fn remove_friend(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(friend_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RemovedResponse>>> {
    friend_service::remove_friend(&state.db, user.id, friend_id)?;
    Ok(Json(ApiResponse::ok(RemovedResponse { removed: true })))
}
