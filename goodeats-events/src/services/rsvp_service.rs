use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use goodeats_shared::clients::db::{connection, DbPool};
use goodeats_shared::errors::{AppError, AppResult, ErrorCode};

use crate::ledger::{self, PgLedgerStore, Roster, RsvpSubmission, SubmitOutcome};
use crate::models::Rsvp;
use crate::schema::rsvps;

/// Runs a ledger submission in its own transaction.
pub fn submit(
    pool: &DbPool,
    event_id: Uuid,
    user_id: Uuid,
    submission: &RsvpSubmission,
) -> AppResult<SubmitOutcome> {
    let mut conn = connection(pool)?;
    let conn: &mut PgConnection = &mut conn;

    let result = conn.transaction::<_, AppError, _>(|conn| {
        ledger::submit_rsvp(&mut PgLedgerStore::new(conn), event_id, user_id, submission)
    });

    let outcome = match &result {
        Ok(o) if o.created => "created",
        Ok(_) => "updated",
        Err(e) if e.code() == ErrorCode::EventFull => "full",
        Err(_) => "failed",
    };
    metrics::counter!("rsvp_submissions_total", "outcome" => outcome).increment(1);

    result
}

pub fn roster(pool: &DbPool, event_id: Uuid) -> AppResult<Roster> {
    let mut conn = connection(pool)?;
    ledger::get_roster(&mut PgLedgerStore::new(&mut conn), event_id)
}

pub fn find_for_user(pool: &DbPool, event_id: Uuid, user_id: Uuid) -> AppResult<Option<Rsvp>> {
    let mut conn = connection(pool)?;

    let rsvp = rsvps::table
        .filter(rsvps::event_id.eq(event_id))
        .filter(rsvps::user_id.eq(user_id))
        .first::<Rsvp>(&mut conn)
        .optional()?;
    Ok(rsvp)
}

/// Re-derives `current_attendees` for one event.
pub fn recount(pool: &DbPool, event_id: Uuid) -> AppResult<i32> {
    let mut conn = connection(pool)?;
    let conn: &mut PgConnection = &mut conn;

    let count = conn.transaction::<_, AppError, _>(|conn| {
        ledger::recount_attendees(&mut PgLedgerStore::new(conn), event_id)
    })?;

    tracing::info!(event_id = %event_id, current_attendees = count, "attendee counter recomputed");
    Ok(count)
}
