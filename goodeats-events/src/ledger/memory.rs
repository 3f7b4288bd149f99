use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use goodeats_shared::errors::AppResult;

use super::store::LedgerStore;
use crate::models::{Event, NewRsvp, RosterEntry, Rsvp, UserSummary};

/// Vec-backed store with a ticking clock, so creation order is observable.
pub(crate) struct MemoryStore {
    events: HashMap<Uuid, Event>,
    users: HashMap<Uuid, UserSummary>,
    rsvps: Vec<Rsvp>,
    ticks: i64,
}

pub(crate) fn sample_event(max_attendees: i32) -> Event {
    let created = epoch();
    Event {
        id: Uuid::new_v4(),
        host_id: Uuid::new_v4(),
        title: "Neighborhood potluck".into(),
        description: "Bring something to share".into(),
        category: "potluck".into(),
        date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
        start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        duration_hours: 3.0,
        location_name: "Dolores Park".into(),
        location_address: "Dolores St & 19th St".into(),
        latitude: 37.7596,
        longitude: -122.4269,
        max_attendees,
        current_attendees: 0,
        cover_image: None,
        meal_theme: None,
        is_free: true,
        price_cents: 0,
        dietary_options: serde_json::json!([]),
        created_at: created,
        updated_at: created,
    }
}

fn epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self {
            events: HashMap::new(),
            users: HashMap::new(),
            rsvps: Vec::new(),
            ticks: 0,
        }
    }

    pub(crate) fn add_event(&mut self, max_attendees: i32) -> Uuid {
        let event = sample_event(max_attendees);
        let id = event.id;
        self.events.insert(id, event);
        id
    }

    pub(crate) fn add_user(&mut self, username: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.users.insert(
            id,
            UserSummary {
                id,
                username: username.to_string(),
                full_name: username.to_uppercase(),
                avatar_url: None,
            },
        );
        id
    }

    pub(crate) fn event(&self, event_id: Uuid) -> Event {
        self.events[&event_id].clone()
    }

    pub(crate) fn current_attendees(&self, event_id: Uuid) -> i32 {
        self.events[&event_id].current_attendees
    }

    pub(crate) fn rows_for(&self, event_id: Uuid, user_id: Uuid) -> usize {
        self.rsvps
            .iter()
            .filter(|r| r.event_id == event_id && r.user_id == user_id)
            .count()
    }

    fn tick(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        epoch() + Duration::seconds(self.ticks)
    }
}

impl LedgerStore for MemoryStore {
    fn find_event(&mut self, event_id: Uuid) -> AppResult<Option<Event>> {
        Ok(self.events.get(&event_id).cloned())
    }

    fn lock_event(&mut self, event_id: Uuid) -> AppResult<Option<Event>> {
        self.find_event(event_id)
    }

    fn user_exists(&mut self, user_id: Uuid) -> AppResult<bool> {
        Ok(self.users.contains_key(&user_id))
    }

    fn find_rsvp(&mut self, event_id: Uuid, user_id: Uuid) -> AppResult<Option<Rsvp>> {
        Ok(self
            .rsvps
            .iter()
            .find(|r| r.event_id == event_id && r.user_id == user_id)
            .cloned())
    }

    fn attending_guests(&mut self, event_id: Uuid) -> AppResult<i64> {
        Ok(self
            .rsvps
            .iter()
            .filter(|r| r.event_id == event_id)
            .map(Rsvp::attending_guests)
            .sum())
    }

    fn upsert_rsvp(&mut self, rsvp: &NewRsvp) -> AppResult<Rsvp> {
        let now = self.tick();
        if let Some(existing) = self
            .rsvps
            .iter_mut()
            .find(|r| r.event_id == rsvp.event_id && r.user_id == rsvp.user_id)
        {
            existing.status = rsvp.status.clone();
            existing.bringing_dish = rsvp.bringing_dish.clone();
            existing.dietary_restrictions = rsvp.dietary_restrictions.clone();
            existing.guests_count = rsvp.guests_count;
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let row = Rsvp {
            id: Uuid::new_v4(),
            event_id: rsvp.event_id,
            user_id: rsvp.user_id,
            status: rsvp.status.clone(),
            bringing_dish: rsvp.bringing_dish.clone(),
            dietary_restrictions: rsvp.dietary_restrictions.clone(),
            guests_count: rsvp.guests_count,
            created_at: now,
            updated_at: now,
        };
        self.rsvps.push(row.clone());
        Ok(row)
    }

    fn set_current_attendees(&mut self, event_id: Uuid, count: i32) -> AppResult<()> {
        if let Some(event) = self.events.get_mut(&event_id) {
            event.current_attendees = count;
        }
        Ok(())
    }

    fn attending_roster(&mut self, event_id: Uuid) -> AppResult<Vec<RosterEntry>> {
        let mut rows: Vec<&Rsvp> = self
            .rsvps
            .iter()
            .filter(|r| r.event_id == event_id && r.is_attending())
            .collect();
        rows.sort_by_key(|r| (r.created_at, r.id));

        Ok(rows
            .into_iter()
            .filter_map(|r| {
                self.users.get(&r.user_id).map(|user| RosterEntry {
                    rsvp: r.clone(),
                    user: user.clone(),
                })
            })
            .collect())
    }
}
