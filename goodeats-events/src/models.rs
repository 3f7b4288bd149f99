use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::RsvpStatus;
use crate::schema::{events, rsvps, users};

// --- User (public profile) ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = users)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

// --- Event ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Potluck,
    Dinner,
    CookingClass,
    Picnic,
    Other,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Potluck => "potluck",
            EventCategory::Dinner => "dinner",
            EventCategory::CookingClass => "cooking_class",
            EventCategory::Picnic => "picnic",
            EventCategory::Other => "other",
        }
    }
}

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = events)]
pub struct Event {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: f64,
    pub location_name: String,
    pub location_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub max_attendees: i32,
    pub current_attendees: i32,
    pub cover_image: Option<String>,
    pub meal_theme: Option<String>,
    pub is_free: bool,
    pub price_cents: i32,
    pub dietary_options: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub host_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: f64,
    pub location_name: String,
    pub location_address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub max_attendees: i32,
    pub cover_image: Option<String>,
    pub meal_theme: Option<String>,
    pub is_free: bool,
    pub price_cents: i32,
    pub dietary_options: serde_json::Value,
}

#[derive(Debug, AsChangeset, Default)]
#[diesel(table_name = events)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_hours: Option<f64>,
    pub location_name: Option<String>,
    pub location_address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub max_attendees: Option<i32>,
    pub cover_image: Option<String>,
    pub meal_theme: Option<String>,
    pub is_free: Option<bool>,
    pub price_cents: Option<i32>,
    pub dietary_options: Option<serde_json::Value>,
}

// --- RSVP ---

#[derive(Debug, Queryable, Identifiable, Serialize, Clone)]
#[diesel(table_name = rsvps)]
pub struct Rsvp {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub bringing_dish: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub guests_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rsvp {
    /// Rows are constrained to the three statuses, so an unknown value can
    /// only come from a hand-edited row; it never counts towards capacity.
    pub fn status(&self) -> Option<RsvpStatus> {
        self.status.parse().ok()
    }

    pub fn is_attending(&self) -> bool {
        self.status() == Some(RsvpStatus::Attending)
    }

    /// Seats this RSVP occupies.
    pub fn attending_guests(&self) -> i64 {
        if self.is_attending() {
            i64::from(self.guests_count)
        } else {
            0
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = rsvps)]
pub struct NewRsvp {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub bringing_dish: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub guests_count: i32,
}

/// An attending RSVP joined with the responder's public profile.
#[derive(Debug, Serialize, Clone)]
pub struct RosterEntry {
    #[serde(flatten)]
    pub rsvp: Rsvp,
    pub user: UserSummary,
}
