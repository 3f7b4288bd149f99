use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::schema::{comments, events, friendships, likes, posts, users};

// --- User ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub dietary_preferences: serde_json::Value,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
}

#[derive(Debug, AsChangeset, Default)]
#[diesel(table_name = users)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub location: Option<String>,
    pub dietary_preferences: Option<serde_json::Value>,
}

/// What other members see; never carries the email address.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PublicProfile {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub dietary_preferences: serde_json::Value,
    pub location: Option<String>,
}

impl From<User> for PublicProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            avatar_url: user.avatar_url,
            bio: user.bio,
            dietary_preferences: user.dietary_preferences,
            location: user.location,
        }
    }
}

#[derive(Debug, Queryable, Serialize, Clone, PartialEq)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

// --- Event (read-only) ---

#[derive(Debug, Queryable, Serialize, Clone)]
#[diesel(table_name = events)]
pub struct EventSummary {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub category: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub location_name: String,
}

#[derive(Debug, Queryable, Serialize, Clone, PartialEq)]
pub struct EventRef {
    pub id: Uuid,
    pub title: String,
    pub category: String,
}

// --- Post ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = posts)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Option<Uuid>,
    pub content: String,
    pub images: serde_json::Value,
    pub likes_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = posts)]
pub struct NewPost {
    pub user_id: Uuid,
    pub event_id: Option<Uuid>,
    pub content: String,
    pub images: serde_json::Value,
}

// --- Comment ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewComment {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
}

// --- Like ---

#[derive(Debug, Insertable)]
#[diesel(table_name = likes)]
pub struct NewLike {
    pub user_id: Uuid,
    pub post_id: Uuid,
}

// --- Friendship ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = friendships)]
pub struct Friendship {
    pub id: Uuid,
    pub user_id: Uuid,
    pub friend_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Friendship {
    /// The member on the other side of the pair from `me`.
    pub fn other_side(&self, me: Uuid) -> Uuid {
        if self.user_id == me {
            self.friend_id
        } else {
            self.user_id
        }
    }
}

/// Columns selected whenever a post or comment is shown with its author.
pub const AUTHOR_COLUMNS: (users::id, users::username, users::full_name, users::avatar_url) =
    (users::id, users::username, users::full_name, users::avatar_url);
