use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use goodeats_shared::clients::db::{connection, DbConn, DbPool};
use goodeats_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Author, Comment, EventRef, NewComment, NewPost, Post, AUTHOR_COLUMNS};
use crate::schema::{comments, events, likes, posts, users};
use crate::services::profile_service::require_profile;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CommentView {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub author: Author,
}

impl From<(Comment, Author)> for CommentView {
    fn from((comment, author): (Comment, Author)) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            created_at: comment.created_at,
            author,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedPost {
    #[serde(flatten)]
    pub post: Post,
    pub author: Author,
    pub event: Option<EventRef>,
    pub comments: Vec<CommentView>,
    pub has_liked: bool,
}

/// Stitches a page of posts together with the rows loaded for it. Post order
/// is kept as given; comments keep their load order within each post.
pub fn assemble_feed(
    page: Vec<(Post, Author)>,
    events: Vec<EventRef>,
    comments: Vec<(Comment, Author)>,
    liked: &HashSet<Uuid>,
) -> Vec<FeedPost> {
    let events: HashMap<Uuid, EventRef> = events.into_iter().map(|e| (e.id, e)).collect();

    let mut by_post: HashMap<Uuid, Vec<CommentView>> = HashMap::new();
    for (comment, author) in comments {
        by_post
            .entry(comment.post_id)
            .or_default()
            .push(CommentView::from((comment, author)));
    }

    page.into_iter()
        .map(|(post, author)| FeedPost {
            event: post.event_id.and_then(|id| events.get(&id).cloned()),
            comments: by_post.remove(&post.id).unwrap_or_default(),
            has_liked: liked.contains(&post.id),
            post,
            author,
        })
        .collect()
}

/// Newest posts first. `viewer` personalises `has_liked`.
pub fn list_feed(
    pool: &DbPool,
    viewer: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> AppResult<(Vec<FeedPost>, i64)> {
    let mut conn = connection(pool)?;

    let total = posts::table.count().get_result::<i64>(&mut conn)?;
    let page = posts::table
        .inner_join(users::table)
        .order((posts::created_at.desc(), posts::id.desc()))
        .select((posts::all_columns, AUTHOR_COLUMNS))
        .limit(limit)
        .offset(offset)
        .load::<(Post, Author)>(&mut conn)?;

    let post_ids: Vec<Uuid> = page.iter().map(|(p, _)| p.id).collect();
    let event_ids: Vec<Uuid> = page.iter().filter_map(|(p, _)| p.event_id).collect();

    let event_refs = events::table
        .filter(events::id.eq_any(&event_ids))
        .select((events::id, events::title, events::category))
        .load::<EventRef>(&mut conn)?;

    let page_comments = comments::table
        .inner_join(users::table)
        .filter(comments::post_id.eq_any(&post_ids))
        .order((comments::created_at.asc(), comments::id.asc()))
        .select((comments::all_columns, AUTHOR_COLUMNS))
        .load::<(Comment, Author)>(&mut conn)?;

    let liked: HashSet<Uuid> = match viewer {
        Some(viewer) => likes::table
            .filter(likes::user_id.eq(viewer))
            .filter(likes::post_id.eq_any(&post_ids))
            .select(likes::post_id)
            .load::<Uuid>(&mut conn)?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    Ok((assemble_feed(page, event_refs, page_comments, &liked), total))
}

pub(crate) fn find_post(conn: &mut DbConn, post_id: Uuid) -> AppResult<Post> {
    posts::table
        .find(post_id)
        .first::<Post>(conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::PostNotFound, "post not found"))
}

pub fn create_post(pool: &DbPool, new_post: &NewPost) -> AppResult<Post> {
    let mut conn = connection(pool)?;
    require_profile(&mut conn, new_post.user_id)?;

    if let Some(event_id) = new_post.event_id {
        let event_exists: bool = diesel::select(diesel::dsl::exists(events::table.find(event_id)))
            .get_result(&mut conn)?;
        if !event_exists {
            return Err(AppError::new(ErrorCode::EventNotFound, "event not found"));
        }
    }

    let post = diesel::insert_into(posts::table)
        .values(new_post)
        .get_result::<Post>(&mut conn)?;

    tracing::info!(post_id = %post.id, user_id = %post.user_id, "post created");
    Ok(post)
}

/// Comments on one post, oldest first.
pub fn list_comments(pool: &DbPool, post_id: Uuid) -> AppResult<Vec<CommentView>> {
    let mut conn = connection(pool)?;
    find_post(&mut conn, post_id)?;

    let rows = comments::table
        .inner_join(users::table)
        .filter(comments::post_id.eq(post_id))
        .order((comments::created_at.asc(), comments::id.asc()))
        .select((comments::all_columns, AUTHOR_COLUMNS))
        .load::<(Comment, Author)>(&mut conn)?;

    Ok(rows.into_iter().map(CommentView::from).collect())
}

/// Adds a comment and returns it with the post author's id.
pub fn add_comment(pool: &DbPool, new_comment: &NewComment) -> AppResult<(Comment, Uuid)> {
    let mut conn = connection(pool)?;
    let post = find_post(&mut conn, new_comment.post_id)?;
    require_profile(&mut conn, new_comment.user_id)?;

    let comment = diesel::insert_into(comments::table)
        .values(new_comment)
        .get_result::<Comment>(&mut conn)?;

    tracing::debug!(comment_id = %comment.id, post_id = %post.id, "comment added");
    Ok((comment, post.user_id))
}
