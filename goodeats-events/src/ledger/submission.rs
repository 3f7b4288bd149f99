use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use goodeats_shared::errors::{AppError, AppResult, ErrorCode};

use super::store::LedgerStore;
use super::{RsvpStatus, MAX_GUESTS_PER_RSVP};
use crate::models::{Event, NewRsvp, Rsvp};

/// Raw RSVP payload as submitted by a client.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RsvpSubmission {
    pub status: String,
    #[serde(default = "default_guests")]
    pub guests_count: i32,
    #[validate(length(max = 200, message = "dish description is too long"))]
    pub bringing_dish: Option<String>,
    #[validate(length(max = 200, message = "dietary note is too long"))]
    pub dietary_restrictions: Option<String>,
}

fn default_guests() -> i32 { 1 }

/// A submission that passed validation and has been normalised.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRsvp {
    pub status: RsvpStatus,
    pub guests_count: i32,
    pub bringing_dish: Option<String>,
    pub dietary_restrictions: Option<String>,
}

impl RsvpSubmission {
    pub fn validate_rsvp(&self) -> AppResult<ValidatedRsvp> {
        self.validate()?;

        let status: RsvpStatus = self.status.parse().map_err(|_| {
            AppError::new(
                ErrorCode::InvalidRsvpStatus,
                "status must be one of attending, maybe, declined",
            )
        })?;

        if !(1..=MAX_GUESTS_PER_RSVP).contains(&self.guests_count) {
            return Err(AppError::new(
                ErrorCode::InvalidGuestCount,
                format!("guests_count must be between 1 and {MAX_GUESTS_PER_RSVP}"),
            ));
        }

        // A dish pledge only means something for people who show up.
        let bringing_dish = match status {
            RsvpStatus::Attending => non_blank(self.bringing_dish.as_deref()),
            RsvpStatus::Maybe | RsvpStatus::Declined => None,
        };

        Ok(ValidatedRsvp {
            status,
            guests_count: self.guests_count,
            bringing_dish,
            dietary_restrictions: non_blank(self.dietary_restrictions.as_deref()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

impl ValidatedRsvp {
    /// Seats this submission asks for.
    pub fn requested_guests(&self) -> i64 {
        match self.status {
            RsvpStatus::Attending => i64::from(self.guests_count),
            RsvpStatus::Maybe | RsvpStatus::Declined => 0,
        }
    }

    pub fn into_new_rsvp(self, event_id: Uuid, user_id: Uuid) -> NewRsvp {
        NewRsvp {
            event_id,
            user_id,
            status: self.status.as_str().to_string(),
            bringing_dish: self.bringing_dish,
            dietary_restrictions: self.dietary_restrictions,
            guests_count: self.guests_count,
        }
    }
}

/// Capacity gate.
///
/// The event is measured without the responder's own attending seats; if it
/// is already full, a submission that asks for more seats than the responder
/// currently holds is refused. For a first RSVP this is exactly
/// [`super::is_event_full`]. Submissions that keep or shrink the responder's
/// seats always pass, and a non-full event admits any valid party size.
pub fn admit(
    event: &Event,
    existing: Option<&Rsvp>,
    attending_total: i64,
    rsvp: &ValidatedRsvp,
) -> AppResult<()> {
    let held = existing.map(Rsvp::attending_guests).unwrap_or(0);
    if rsvp.requested_guests() <= held {
        return Ok(());
    }

    let others = attending_total - held;
    if others >= i64::from(event.max_attendees) {
        return Err(AppError::with_details(
            ErrorCode::EventFull,
            "this event is full",
            serde_json::json!({
                "max_attendees": event.max_attendees,
                "attending_guests": attending_total,
            }),
        ));
    }

    Ok(())
}

#[derive(Debug, Serialize)]
pub struct SubmitOutcome {
    pub rsvp: Rsvp,
    pub created: bool,
    pub previous_status: Option<RsvpStatus>,
    pub current_attendees: i32,
}

/// Upserts the caller's RSVP and re-derives the event's attendee counter.
/// Must run inside a transaction owned by the caller.
pub fn submit_rsvp<S: LedgerStore>(
    store: &mut S,
    event_id: Uuid,
    user_id: Uuid,
    submission: &RsvpSubmission,
) -> AppResult<SubmitOutcome> {
    let validated = submission.validate_rsvp()?;

    let event = store
        .lock_event(event_id)?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound, "event not found"))?;

    // Roster rows join on `users`; a responder without a profile would be
    // counted but never listed.
    if !store.user_exists(user_id)? {
        return Err(AppError::new(
            ErrorCode::UserNotFound,
            "complete your profile before responding to events",
        ));
    }

    let existing = store.find_rsvp(event_id, user_id)?;
    let attending_total = store.attending_guests(event_id)?;
    admit(&event, existing.as_ref(), attending_total, &validated)?;

    let rsvp = store.upsert_rsvp(&validated.into_new_rsvp(event_id, user_id))?;
    let current_attendees = recount_locked(store, event_id)?;

    tracing::info!(
        event_id = %event_id,
        user_id = %user_id,
        status = %rsvp.status,
        guests_count = rsvp.guests_count,
        current_attendees,
        created = existing.is_none(),
        "rsvp recorded"
    );

    Ok(SubmitOutcome {
        rsvp,
        created: existing.is_none(),
        previous_status: existing.as_ref().and_then(Rsvp::status),
        current_attendees,
    })
}

/// Recomputes `current_attendees` from the RSVP rows. Repairs counters left
/// behind by clients that wrote the counter themselves.
pub fn recount_attendees<S: LedgerStore>(store: &mut S, event_id: Uuid) -> AppResult<i32> {
    store
        .lock_event(event_id)?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound, "event not found"))?;
    recount_locked(store, event_id)
}

fn recount_locked<S: LedgerStore>(store: &mut S, event_id: Uuid) -> AppResult<i32> {
    let total = store.attending_guests(event_id)?;
    let count = i32::try_from(total)
        .map_err(|_| AppError::internal(format!("attendee total {total} overflows counter")))?;
    store.set_current_attendees(event_id, count)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::memory::MemoryStore;
    use crate::ledger::{get_roster, is_event_full};

    fn submission(status: &str, guests: i32, dish: Option<&str>) -> RsvpSubmission {
        RsvpSubmission {
            status: status.to_string(),
            guests_count: guests,
            bringing_dish: dish.map(str::to_string),
            dietary_restrictions: None,
        }
    }

    #[test]
    fn rejects_out_of_range_guest_counts() {
        for guests in [0, -1, MAX_GUESTS_PER_RSVP + 1] {
            let err = submission("attending", guests, None).validate_rsvp().unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidGuestCount);
        }
        assert!(submission("attending", MAX_GUESTS_PER_RSVP, None).validate_rsvp().is_ok());
    }

    #[test]
    fn rejects_unknown_status() {
        let err = submission("going", 1, None).validate_rsvp().unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidRsvpStatus);
    }

    #[test]
    fn rejects_overlong_dish() {
        let dish = "x".repeat(201);
        let err = submission("attending", 1, Some(&dish)).validate_rsvp().unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn dish_is_dropped_unless_attending() {
        let maybe = submission("maybe", 1, Some("Lasagna")).validate_rsvp().unwrap();
        assert_eq!(maybe.bringing_dish, None);

        let attending = submission("attending", 1, Some("  Lasagna ")).validate_rsvp().unwrap();
        assert_eq!(attending.bringing_dish.as_deref(), Some("Lasagna"));

        let blank = submission("attending", 1, Some("   ")).validate_rsvp().unwrap();
        assert_eq!(blank.bringing_dish, None);
    }

    #[test]
    fn unknown_event_is_not_found() {
        let mut store = MemoryStore::new();
        let user = store.add_user("ana");
        let err = submit_rsvp(&mut store, Uuid::new_v4(), user, &submission("attending", 1, None)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EventNotFound);
    }

    #[test]
    fn responder_without_profile_is_refused_and_not_counted() {
        let mut store = MemoryStore::new();
        let event = store.add_event(10);
        let stranger = Uuid::new_v4();

        let err = submit_rsvp(&mut store, event, stranger, &submission("attending", 3, None)).unwrap_err();

        assert_eq!(err.code(), ErrorCode::UserNotFound);
        assert_eq!(store.rows_for(event, stranger), 0);
        assert_eq!(store.current_attendees(event), 0);
        let roster = get_roster(&mut store, event).unwrap();
        assert!(roster.entries.is_empty());
        assert_eq!(roster.total_attending_guests, 0);
    }

    #[test]
    fn resubmitting_updates_the_same_row() {
        let mut store = MemoryStore::new();
        let event = store.add_event(10);
        let user = store.add_user("ana");

        let first = submit_rsvp(&mut store, event, user, &submission("attending", 2, Some("Salad"))).unwrap();
        let second = submit_rsvp(&mut store, event, user, &submission("attending", 2, Some("Salad"))).unwrap();

        assert!(first.created);
        assert!(!second.created);
        assert_eq!(first.rsvp.id, second.rsvp.id);
        assert_eq!(store.rows_for(event, user), 1);
        assert_eq!(second.current_attendees, 2);
        assert!(second.rsvp.updated_at >= first.rsvp.updated_at);
    }

    #[test]
    fn counter_tracks_sum_of_attending_guests() {
        let mut store = MemoryStore::new();
        let event = store.add_event(20);
        let a = store.add_user("ana");
        let b = store.add_user("ben");
        let c = store.add_user("cy");

        submit_rsvp(&mut store, event, a, &submission("attending", 3, None)).unwrap();
        submit_rsvp(&mut store, event, b, &submission("maybe", 2, None)).unwrap();
        let last = submit_rsvp(&mut store, event, c, &submission("attending", 1, None)).unwrap();

        assert_eq!(last.current_attendees, 4);
        assert_eq!(store.current_attendees(event), 4);
    }

    #[test]
    fn full_event_blocks_a_new_attendee() {
        let mut store = MemoryStore::new();
        let event = store.add_event(2);
        let a = store.add_user("ana");
        let b = store.add_user("ben");

        submit_rsvp(&mut store, event, a, &submission("attending", 2, None)).unwrap();
        let roster = get_roster(&mut store, event).unwrap();
        assert_eq!(roster.total_attending_guests, 2);
        assert!(roster.is_full);
        assert!(is_event_full(&store.event(event)));

        let err = submit_rsvp(&mut store, event, b, &submission("attending", 1, None)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EventFull);
        assert!(!err.code().is_validation());
        assert_eq!(store.rows_for(event, b), 0);
        assert_eq!(store.current_attendees(event), 2);
    }

    #[test]
    fn full_event_still_accepts_maybe_and_declined() {
        let mut store = MemoryStore::new();
        let event = store.add_event(1);
        let a = store.add_user("ana");
        let b = store.add_user("ben");

        submit_rsvp(&mut store, event, a, &submission("attending", 1, None)).unwrap();
        let maybe = submit_rsvp(&mut store, event, b, &submission("maybe", 1, None)).unwrap();
        assert_eq!(maybe.current_attendees, 1);
    }

    #[test]
    fn not_full_event_admits_a_party_that_oversells() {
        let mut store = MemoryStore::new();
        let event = store.add_event(3);
        let a = store.add_user("ana");
        let b = store.add_user("ben");

        submit_rsvp(&mut store, event, a, &submission("attending", 2, None)).unwrap();
        assert!(!is_event_full(&store.event(event)));

        let outcome = submit_rsvp(&mut store, event, b, &submission("attending", 4, None)).unwrap();
        assert_eq!(outcome.current_attendees, 6);
        assert_eq!(get_roster(&mut store, event).unwrap().spots_remaining, -3);
    }

    #[test]
    fn attendee_of_a_full_event_can_update_their_rsvp() {
        let mut store = MemoryStore::new();
        let event = store.add_event(2);
        let a = store.add_user("ana");

        submit_rsvp(&mut store, event, a, &submission("attending", 2, None)).unwrap();
        let updated = submit_rsvp(&mut store, event, a, &submission("attending", 2, Some("Iced Tea"))).unwrap();
        assert_eq!(updated.rsvp.bringing_dish.as_deref(), Some("Iced Tea"));

        let shrunk = submit_rsvp(&mut store, event, a, &submission("attending", 1, None)).unwrap();
        assert_eq!(shrunk.current_attendees, 1);
    }

    #[test]
    fn growing_a_party_is_rechecked_against_capacity() {
        let mut store = MemoryStore::new();
        let event = store.add_event(3);
        let a = store.add_user("ana");
        let b = store.add_user("ben");

        submit_rsvp(&mut store, event, a, &submission("attending", 1, None)).unwrap();
        submit_rsvp(&mut store, event, b, &submission("attending", 2, None)).unwrap();

        let err = submit_rsvp(&mut store, event, a, &submission("attending", 2, None)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EventFull);
        assert_eq!(store.current_attendees(event), 3);
    }

    #[test]
    fn maybe_user_cannot_switch_to_attending_once_full() {
        let mut store = MemoryStore::new();
        let event = store.add_event(1);
        let a = store.add_user("ana");
        let b = store.add_user("ben");

        submit_rsvp(&mut store, event, b, &submission("maybe", 1, None)).unwrap();
        submit_rsvp(&mut store, event, a, &submission("attending", 1, None)).unwrap();

        let err = submit_rsvp(&mut store, event, b, &submission("attending", 1, None)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EventFull);
    }

    #[test]
    fn declining_removes_user_from_roster_and_frees_seats() {
        let mut store = MemoryStore::new();
        let event = store.add_event(10);
        let a = store.add_user("ana");
        let b = store.add_user("ben");

        submit_rsvp(&mut store, event, a, &submission("attending", 3, None)).unwrap();
        submit_rsvp(&mut store, event, b, &submission("attending", 2, None)).unwrap();
        let before = get_roster(&mut store, event).unwrap();
        assert_eq!(before.total_attending_guests, 5);

        submit_rsvp(&mut store, event, a, &submission("declined", 1, None)).unwrap();
        let after = get_roster(&mut store, event).unwrap();

        assert_eq!(after.total_attending_guests, before.total_attending_guests - 3);
        assert!(after.entries.iter().all(|e| e.rsvp.user_id != a));
        assert_eq!(store.current_attendees(event), 2);
    }

    #[test]
    fn maybe_to_declined_keeps_attending_totals() {
        let mut store = MemoryStore::new();
        let event = store.add_event(10);
        let a = store.add_user("ana");

        submit_rsvp(&mut store, event, a, &submission("maybe", 2, None)).unwrap();
        let outcome = submit_rsvp(&mut store, event, a, &submission("declined", 2, None)).unwrap();

        assert_eq!(outcome.previous_status, Some(RsvpStatus::Maybe));
        assert_eq!(outcome.current_attendees, 0);
        assert!(get_roster(&mut store, event).unwrap().entries.is_empty());
    }

    #[test]
    fn recount_repairs_a_drifted_counter() {
        let mut store = MemoryStore::new();
        let event = store.add_event(10);
        let a = store.add_user("ana");

        submit_rsvp(&mut store, event, a, &submission("attending", 4, None)).unwrap();
        store.set_current_attendees(event, 9).unwrap();

        assert_eq!(recount_attendees(&mut store, event).unwrap(), 4);
        assert_eq!(store.current_attendees(event), 4);
    }
}
