use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use goodeats_shared::errors::{AppError, AppResult, ErrorCode};
use goodeats_shared::middleware::{OptionalAuthUser, ValidJson};
use goodeats_shared::types::auth::AuthUser;
use goodeats_shared::types::{ApiResponse, Paginated, PaginationParams};

use crate::events::publisher;
use crate::models::{Comment, NewComment, NewPost, Post};
use crate::services::feed_service::{self, CommentView, FeedPost};
use crate::services::like_service::{self, LikeState};
use crate::AppState;

fn non_blank(content: &str, what: &str) -> AppResult<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::new(ErrorCode::ValidationError, format!("{what} cannot be empty")));
    }
    Ok(trimmed.to_string())
}

// --- GET /feed ---

pub async fn get_feed(
    OptionalAuthUser(viewer): OptionalAuthUser,
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<FeedPost>>>> {
    let (items, total) = feed_service::list_feed(
        &state.db,
        viewer.map(|v| v.id),
        pagination.limit() as i64,
        pagination.offset() as i64,
    )?;
    Ok(Json(ApiResponse::ok(Paginated::new(items, total as u64, &pagination))))
}

// --- POST /posts ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 2000, message = "post must be 1-2000 characters"))]
    pub content: String,
    pub event_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(max = 4))]
    pub images: Vec<String>,
}

impl CreatePostRequest {
    pub fn into_new_post(self, user_id: Uuid) -> AppResult<NewPost> {
        self.validate()?;
        Ok(NewPost {
            user_id,
            event_id: self.event_id,
            content: non_blank(&self.content, "post")?,
            images: serde_json::Value::from(self.images),
        })
    }
}

pub async fn create_post(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreatePostRequest>,
) -> AppResult<Json<ApiResponse<Post>>> {
    let new_post = req.into_new_post(user.id)?;
    let post = feed_service::create_post(&state.db, &new_post)?;

    publisher::publish_post_created(&state.rabbitmq, &post).await;

    Ok(Json(ApiResponse::ok_with_message(post, "Post created!")))
}

// --- POST /posts/:id/like ---

pub async fn like_post(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<LikeState>>> {
    let like = like_service::like(&state.db, post_id, user.id)?;

    if like.changed && like.author_id != user.id {
        publisher::publish_post_liked(&state.rabbitmq, post_id, user.id, like.author_id).await;
    }

    Ok(Json(ApiResponse::ok(like)))
}

// --- DELETE /posts/:id/like ---

pub async fn unlike_post(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<LikeState>>> {
    let like = like_service::unlike(&state.db, post_id, user.id)?;
    Ok(Json(ApiResponse::ok(like)))
}

// --- GET /posts/:id/comments ---

pub async fn list_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<CommentView>>>> {
    let comments = feed_service::list_comments(&state.db, post_id)?;
    Ok(Json(ApiResponse::ok(comments)))
}

// --- POST /posts/:id/comments ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 1000, message = "comment must be 1-1000 characters"))]
    pub content: String,
}

pub async fn add_comment(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<Uuid>,
    ValidJson(req): ValidJson<CreateCommentRequest>,
) -> AppResult<Json<ApiResponse<Comment>>> {
    req.validate()?;
    let new_comment = NewComment {
        post_id,
        user_id: user.id,
        content: non_blank(&req.content, "comment")?,
    };

    let (comment, author_id) = feed_service::add_comment(&state.db, &new_comment)?;
    publisher::publish_comment_created(&state.rabbitmq, &comment, author_id).await;

    Ok(Json(ApiResponse::ok(comment)))
}
