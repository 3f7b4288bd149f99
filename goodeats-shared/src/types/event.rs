use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// RabbitMQ envelope wrapping all integration events.
///
/// Routing key format: `goodeats.{service}.{entity}.{action}`
/// Example: `goodeats.events.rsvp.submitted`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event<T: Serialize> {
    pub id: Uuid,
    pub source: String,
    pub event_type: String,
    pub timestamp: DateTime<Utc>,
    pub correlation_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub data: T,
}

impl<T: Serialize> Event<T> {
    pub fn new(source: impl Into<String>, event_type: impl Into<String>, data: T) -> Self {
        Self {
            id: Uuid::now_v7(),
            source: source.into(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            correlation_id: None,
            user_id: None,
            data,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

/// RabbitMQ routing keys
pub mod routing_keys {
    // Events service
    pub const EVENTS_EVENT_CREATED: &str = "goodeats.events.event.created";
    pub const EVENTS_EVENT_UPDATED: &str = "goodeats.events.event.updated";
    pub const EVENTS_RSVP_SUBMITTED: &str = "goodeats.events.rsvp.submitted";

    // Social service
    pub const SOCIAL_POST_CREATED: &str = "goodeats.social.post.created";
    pub const SOCIAL_POST_LIKED: &str = "goodeats.social.post.liked";
    pub const SOCIAL_COMMENT_CREATED: &str = "goodeats.social.comment.created";
}

/// Event data payloads
pub mod payloads {
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct EventCreated {
        pub event_id: Uuid,
        pub host_id: Uuid,
        pub title: String,
        pub category: String,
        pub date: chrono::NaiveDate,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct EventUpdated {
        pub event_id: Uuid,
        pub host_id: Uuid,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct RsvpSubmitted {
        pub rsvp_id: Uuid,
        pub event_id: Uuid,
        pub user_id: Uuid,
        pub status: String,
        pub guests_count: i32,
        pub created: bool,
        pub current_attendees: i32,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PostCreated {
        pub post_id: Uuid,
        pub user_id: Uuid,
        pub event_id: Option<Uuid>,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct PostLiked {
        pub post_id: Uuid,
        pub liker_id: Uuid,
        pub author_id: Uuid,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CommentCreated {
        pub comment_id: Uuid,
        pub post_id: Uuid,
        pub user_id: Uuid,
        pub author_id: Uuid,
    }
}
