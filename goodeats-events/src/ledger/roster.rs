use serde::Serialize;
use uuid::Uuid;

use goodeats_shared::errors::{AppError, AppResult, ErrorCode};

use super::dishes::{categorize_dishes, MealPlan};
use super::store::LedgerStore;
use crate::models::{Event, RosterEntry};

/// Gate used by clients before offering a *new* RSVP.
pub fn is_event_full(event: &Event) -> bool {
    event.current_attendees >= event.max_attendees
}

/// Who's coming to an event, plus the capacity figures derived from it.
#[derive(Debug, Serialize)]
pub struct Roster {
    pub event_id: Uuid,
    pub max_attendees: i32,
    pub current_attendees: i32,
    pub entries: Vec<RosterEntry>,
    pub total_attending_guests: i64,
    /// Negative when the event has been oversold.
    pub spots_remaining: i64,
    pub is_full: bool,
}

impl Roster {
    pub fn new(event: &Event, entries: Vec<RosterEntry>) -> Self {
        let total_attending_guests: i64 = entries.iter().map(|e| i64::from(e.rsvp.guests_count)).sum();
        Self {
            event_id: event.id,
            max_attendees: event.max_attendees,
            current_attendees: event.current_attendees,
            spots_remaining: i64::from(event.max_attendees) - total_attending_guests,
            is_full: is_event_full(event),
            total_attending_guests,
            entries,
        }
    }

    pub fn dishes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| e.rsvp.bringing_dish.as_deref())
    }

    pub fn meal_plan(&self) -> MealPlan {
        categorize_dishes(self.dishes())
    }
}

pub fn get_roster<S: LedgerStore>(store: &mut S, event_id: Uuid) -> AppResult<Roster> {
    let event = store
        .find_event(event_id)?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound, "event not found"))?;
    let entries = store.attending_roster(event_id)?;
    Ok(Roster::new(&event, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::memory::{sample_event, MemoryStore};
    use crate::ledger::{submit_rsvp, RsvpSubmission};

    fn attend(store: &mut MemoryStore, event: Uuid, user: Uuid, guests: i32, dish: Option<&str>) {
        let submission = RsvpSubmission {
            status: "attending".into(),
            guests_count: guests,
            bringing_dish: dish.map(str::to_string),
            dietary_restrictions: None,
        };
        submit_rsvp(store, event, user, &submission).unwrap();
    }

    #[test]
    fn full_iff_counter_reaches_capacity() {
        let mut event = sample_event(4);
        for (current, full) in [(0, false), (3, false), (4, true), (6, true)] {
            event.current_attendees = current;
            assert_eq!(is_event_full(&event), full, "current_attendees = {current}");
        }
    }

    #[test]
    fn roster_lists_attendees_in_submission_order_with_profiles() {
        let mut store = MemoryStore::new();
        let event = store.add_event(10);
        let users: Vec<Uuid> = ["ana", "ben", "cy"].iter().map(|n| store.add_user(n)).collect();

        attend(&mut store, event, users[2], 1, None);
        attend(&mut store, event, users[0], 2, Some("Lasagna"));
        attend(&mut store, event, users[1], 1, None);

        let roster = get_roster(&mut store, event).unwrap();
        let names: Vec<&str> = roster.entries.iter().map(|e| e.user.username.as_str()).collect();
        assert_eq!(names, ["cy", "ana", "ben"]);
        assert_eq!(roster.total_attending_guests, 4);
        assert_eq!(roster.spots_remaining, 6);
        assert_eq!(roster.current_attendees, 4);
    }

    #[test]
    fn total_is_independent_of_submission_order() {
        let sizes = [3, 1, 2, 5];

        let mut forward = MemoryStore::new();
        let event_f = forward.add_event(50);
        for (i, g) in sizes.iter().enumerate() {
            let user = forward.add_user(&format!("u{i}"));
            attend(&mut forward, event_f, user, *g, None);
        }

        let mut backward = MemoryStore::new();
        let event_b = backward.add_event(50);
        for (i, g) in sizes.iter().enumerate().rev() {
            let user = backward.add_user(&format!("u{i}"));
            attend(&mut backward, event_b, user, *g, None);
        }

        let expected: i64 = sizes.iter().map(|g| i64::from(*g)).sum();
        assert_eq!(get_roster(&mut forward, event_f).unwrap().total_attending_guests, expected);
        assert_eq!(get_roster(&mut backward, event_b).unwrap().total_attending_guests, expected);
    }

    #[test]
    fn meal_plan_covers_every_pledged_dish_once() {
        let mut store = MemoryStore::new();
        let event = store.add_event(10);
        let dishes = [Some("Caesar Salad"), Some("Chocolate Cake"), None, Some("Iced Tea"), Some("Lasagna")];
        for (i, dish) in dishes.iter().enumerate() {
            let user = store.add_user(&format!("u{i}"));
            attend(&mut store, event, user, 1, *dish);
        }

        let roster = get_roster(&mut store, event).unwrap();
        let plan = roster.meal_plan();
        assert_eq!(plan.len(), roster.dishes().count());
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.main, ["Caesar Salad", "Lasagna"]);
    }

    #[test]
    fn roster_of_unknown_event_is_not_found() {
        let mut store = MemoryStore::new();
        let err = get_roster(&mut store, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EventNotFound);
    }
}
