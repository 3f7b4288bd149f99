use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use goodeats_shared::errors::{AppError, AppResult, ErrorCode};
use goodeats_shared::middleware::{OptionalAuthUser, ValidJson};
use goodeats_shared::types::auth::AuthUser;
use goodeats_shared::types::{ApiResponse, Paginated, PaginationParams};

use crate::events::publisher;
use crate::ledger::Roster;
use crate::models::{Event, EventCategory, EventChanges, NewEvent, Rsvp, UserSummary};
use crate::services::{event_service, rsvp_service};
use crate::AppState;

const MAX_DURATION_HOURS: f64 = 24.0;

#[derive(Debug, Serialize)]
pub struct EventWithHost {
    #[serde(flatten)]
    pub event: Event,
    pub host: UserSummary,
}

impl From<(Event, UserSummary)> for EventWithHost {
    fn from((event, host): (Event, UserSummary)) -> Self {
        Self { event, host }
    }
}

// --- POST /events ---

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 120, message = "title must be 1-120 characters"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    pub category: EventCategory,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_hours: f64,
    #[validate(length(min = 1, max = 120))]
    pub location_name: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub location_address: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(min = 1, max = 500, message = "max_attendees must be between 1 and 500"))]
    pub max_attendees: i32,
    pub cover_image: Option<String>,
    #[validate(length(max = 120))]
    pub meal_theme: Option<String>,
    #[serde(default)]
    pub is_free: bool,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub price_cents: i32,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub dietary_options: Vec<String>,
}

fn check_duration(hours: f64) -> AppResult<()> {
    if hours > 0.0 && hours <= MAX_DURATION_HOURS {
        Ok(())
    } else {
        Err(AppError::new(
            ErrorCode::ValidationError,
            "duration_hours must be greater than 0 and at most 24",
        ))
    }
}

impl CreateEventRequest {
    pub fn into_new_event(self, host_id: Uuid) -> AppResult<NewEvent> {
        self.validate()?;
        check_duration(self.duration_hours)?;

        Ok(NewEvent {
            host_id,
            title: self.title.trim().to_string(),
            description: self.description,
            category: self.category.as_str().to_string(),
            date: self.date,
            start_time: self.start_time,
            duration_hours: self.duration_hours,
            location_name: self.location_name,
            location_address: self.location_address,
            latitude: self.latitude,
            longitude: self.longitude,
            max_attendees: self.max_attendees,
            cover_image: self.cover_image,
            meal_theme: self.meal_theme,
            is_free: self.is_free,
            price_cents: if self.is_free { 0 } else { self.price_cents },
            dietary_options: serde_json::Value::from(self.dietary_options),
        })
    }
}

pub async fn create_event(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateEventRequest>,
) -> AppResult<Json<ApiResponse<Event>>> {
    let new_event = req.into_new_event(user.id)?;
    let event = event_service::create_event(&state.db, &new_event)?;

    publisher::publish_event_created(&state.rabbitmq, &event).await;

    Ok(Json(ApiResponse::ok_with_message(event, "Event created!")))
}

// --- GET /events ---

#[derive(Debug, Deserialize)]
pub struct EventFilter {
    pub category: Option<EventCategory>,
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<EventFilter>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<EventWithHost>>>> {
    let today = Utc::now().date_naive();
    let (rows, total) = event_service::list_upcoming(
        &state.db,
        today,
        filter.category.map(|c| c.as_str()),
        pagination.limit() as i64,
        pagination.offset() as i64,
    )?;

    let items = rows.into_iter().map(EventWithHost::from).collect();
    Ok(Json(ApiResponse::ok(Paginated::new(items, total as u64, &pagination))))
}

// --- GET /events/:id ---

#[derive(Debug, Serialize)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: EventWithHost,
    pub roster: Roster,
    pub my_rsvp: Option<Rsvp>,
}

pub async fn get_event(
    OptionalAuthUser(user): OptionalAuthUser,
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<EventDetails>>> {
    let event = EventWithHost::from(event_service::find_event(&state.db, event_id)?);
    let roster = rsvp_service::roster(&state.db, event_id)?;
    let my_rsvp = match user {
        Some(user) => rsvp_service::find_for_user(&state.db, event_id, user.id)?,
        None => None,
    };

    Ok(Json(ApiResponse::ok(EventDetails { event, roster, my_rsvp })))
}

// --- PATCH /events/:id ---

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 120))]
    pub title: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub category: Option<EventCategory>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_hours: Option<f64>,
    #[validate(length(min = 1, max = 120))]
    pub location_name: Option<String>,
    #[validate(length(max = 255))]
    pub location_address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(range(min = 1, max = 500, message = "max_attendees must be between 1 and 500"))]
    pub max_attendees: Option<i32>,
    pub cover_image: Option<String>,
    #[validate(length(max = 120))]
    pub meal_theme: Option<String>,
    pub is_free: Option<bool>,
    #[validate(range(min = 0))]
    pub price_cents: Option<i32>,
    #[validate(length(max = 20))]
    pub dietary_options: Option<Vec<String>>,
}

impl UpdateEventRequest {
    pub fn into_changes(self) -> AppResult<EventChanges> {
        self.validate()?;
        if let Some(hours) = self.duration_hours {
            check_duration(hours)?;
        }

        let price_cents = match self.is_free {
            Some(true) => Some(0),
            _ => self.price_cents,
        };

        Ok(EventChanges {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description,
            category: self.category.map(|c| c.as_str().to_string()),
            date: self.date,
            start_time: self.start_time,
            duration_hours: self.duration_hours,
            location_name: self.location_name,
            location_address: self.location_address,
            latitude: self.latitude,
            longitude: self.longitude,
            max_attendees: self.max_attendees,
            cover_image: self.cover_image,
            meal_theme: self.meal_theme,
            is_free: self.is_free,
            price_cents,
            dietary_options: self.dietary_options.map(serde_json::Value::from),
        })
    }
}

pub async fn update_event(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<Uuid>,
    ValidJson(req): ValidJson<UpdateEventRequest>,
) -> AppResult<Json<ApiResponse<Event>>> {
    let changes = req.into_changes()?;
    let event = event_service::update_event(&state.db, event_id, user.id, &changes)?;

    publisher::publish_event_updated(&state.rabbitmq, &event).await;

    Ok(Json(ApiResponse::ok(event)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn potluck_request() -> CreateEventRequest {
        serde_json::from_value(serde_json::json!({
            "title": "  Harvest Potluck ",
            "category": "potluck",
            "date": "2030-09-14",
            "start_time": "18:30:00",
            "duration_hours": 3.0,
            "location_name": "Community Garden",
            "latitude": 40.71,
            "longitude": -74.0,
            "max_attendees": 12,
            "price_cents": 1500,
        }))
        .unwrap()
    }

    #[test]
    fn new_event_defaults_to_empty_dietary_options() {
        let host = Uuid::new_v4();
        let event = potluck_request().into_new_event(host).unwrap();

        assert_eq!(event.host_id, host);
        assert_eq!(event.title, "Harvest Potluck");
        assert_eq!(event.category, "potluck");
        assert_eq!(event.dietary_options, serde_json::json!([]));
        assert_eq!(event.price_cents, 1500);
    }

    #[test]
    fn free_events_never_carry_a_price() {
        let mut req = potluck_request();
        req.is_free = true;
        assert_eq!(req.into_new_event(Uuid::new_v4()).unwrap().price_cents, 0);

        let changes = UpdateEventRequest {
            is_free: Some(true),
            price_cents: Some(900),
            ..serde_json::from_value(serde_json::json!({})).unwrap()
        }
        .into_changes()
        .unwrap();
        assert_eq!(changes.price_cents, Some(0));
    }

    #[test]
    fn capacity_and_duration_are_bounded() {
        let mut req = potluck_request();
        req.max_attendees = 0;
        assert_eq!(req.into_new_event(Uuid::new_v4()).unwrap_err().code(), ErrorCode::ValidationError);

        let mut req = potluck_request();
        req.duration_hours = 0.0;
        assert_eq!(req.into_new_event(Uuid::new_v4()).unwrap_err().code(), ErrorCode::ValidationError);

        let lowered: UpdateEventRequest = serde_json::from_value(serde_json::json!({ "max_attendees": 0 })).unwrap();
        assert!(lowered.into_changes().is_err());
    }

    #[test]
    fn unknown_category_is_rejected_at_deserialization() {
        let parsed: Result<CreateEventRequest, _> = serde_json::from_value(serde_json::json!({
            "title": "x",
            "category": "rave",
            "date": "2030-09-14",
            "start_time": "18:30:00",
            "duration_hours": 1.0,
            "location_name": "x",
            "latitude": 0.0,
            "longitude": 0.0,
            "max_attendees": 1,
        }));
        assert!(parsed.is_err());
    }
}
