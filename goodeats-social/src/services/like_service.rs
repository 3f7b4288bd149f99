use diesel::pg::PgConnection;
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use goodeats_shared::clients::db::{connection, DbPool};
use goodeats_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{NewLike, Post};
use crate::schema::{likes, posts};
use crate::services::profile_service::require_profile;

#[derive(Debug, Serialize)]
pub struct LikeState {
    pub post_id: Uuid,
    pub likes_count: i32,
    pub has_liked: bool,
    /// False when the request repeated the current state.
    #[serde(skip)]
    pub changed: bool,
    #[serde(skip)]
    pub author_id: Uuid,
}

pub fn like(pool: &DbPool, post_id: Uuid, user_id: Uuid) -> AppResult<LikeState> {
    set_like(pool, post_id, user_id, true)
}

pub fn unlike(pool: &DbPool, post_id: Uuid, user_id: Uuid) -> AppResult<LikeState> {
    set_like(pool, post_id, user_id, false)
}

/// Writes or removes the caller's like and re-derives `likes_count` from the
/// `likes` rows in the same transaction.
fn set_like(pool: &DbPool, post_id: Uuid, user_id: Uuid, liked: bool) -> AppResult<LikeState> {
    let mut conn = connection(pool)?;
    let conn: &mut PgConnection = &mut conn;

    let state = conn.transaction::<_, AppError, _>(|conn| {
        let post = posts::table
            .find(post_id)
            .for_update()
            .first::<Post>(conn)
            .optional()?
            .ok_or_else(|| AppError::new(ErrorCode::PostNotFound, "post not found"))?;
        require_profile(conn, user_id)?;

        let affected = if liked {
            diesel::insert_into(likes::table)
                .values(&NewLike { user_id, post_id })
                .on_conflict((likes::user_id, likes::post_id))
                .do_nothing()
                .execute(conn)?
        } else {
            diesel::delete(
                likes::table
                    .filter(likes::user_id.eq(user_id))
                    .filter(likes::post_id.eq(post_id)),
            )
            .execute(conn)?
        };

        let total = likes::table
            .filter(likes::post_id.eq(post_id))
            .count()
            .get_result::<i64>(conn)?;
        let likes_count = i32::try_from(total)
            .map_err(|_| AppError::internal(format!("like total {total} overflows counter")))?;

        diesel::update(posts::table.find(post_id))
            .set(posts::likes_count.eq(likes_count))
            .execute(conn)?;

        Ok(LikeState {
            post_id,
            likes_count,
            has_liked: liked,
            changed: affected > 0,
            author_id: post.user_id,
        })
    })?;

    let action = if liked { "like" } else { "unlike" };
    metrics::counter!("post_likes_total", "action" => action).increment(u64::from(state.changed));
    tracing::debug!(post_id = %post_id, user_id = %user_id, action, likes_count = state.likes_count, "like toggled");

    Ok(state)
}
