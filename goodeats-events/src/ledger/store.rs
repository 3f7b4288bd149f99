use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use uuid::Uuid;

use goodeats_shared::errors::AppResult;

use super::RsvpStatus;
use crate::models::{Event, NewRsvp, RosterEntry, Rsvp, UserSummary};
use crate::schema::{events, rsvps, users};

/// Storage operations the ledger needs. Implementations are expected to be
/// scoped to one transaction so a submission sees a consistent snapshot.
pub trait LedgerStore {
    fn find_event(&mut self, event_id: Uuid) -> AppResult<Option<Event>>;

    /// Like `find_event`, but holds the row until the transaction ends so
    /// concurrent submissions for the same event serialize.
    fn lock_event(&mut self, event_id: Uuid) -> AppResult<Option<Event>>;

    fn user_exists(&mut self, user_id: Uuid) -> AppResult<bool>;

    fn find_rsvp(&mut self, event_id: Uuid, user_id: Uuid) -> AppResult<Option<Rsvp>>;

    /// Sum of `guests_count` over attending RSVPs.
    fn attending_guests(&mut self, event_id: Uuid) -> AppResult<i64>;

    /// Insert, or update in place on `(event_id, user_id)` conflict.
    fn upsert_rsvp(&mut self, rsvp: &NewRsvp) -> AppResult<Rsvp>;

    fn set_current_attendees(&mut self, event_id: Uuid, count: i32) -> AppResult<()>;

    /// Attending RSVPs with responder profiles, oldest first.
    fn attending_roster(&mut self, event_id: Uuid) -> AppResult<Vec<RosterEntry>>;
}

pub struct PgLedgerStore<'a> {
    conn: &'a mut PgConnection,
}

impl<'a> PgLedgerStore<'a> {
    pub fn new(conn: &'a mut PgConnection) -> Self {
        Self { conn }
    }
}

impl LedgerStore for PgLedgerStore<'_> {
    fn find_event(&mut self, event_id: Uuid) -> AppResult<Option<Event>> {
        let event = events::table
            .find(event_id)
            .first::<Event>(self.conn)
            .optional()?;
        Ok(event)
    }

    fn lock_event(&mut self, event_id: Uuid) -> AppResult<Option<Event>> {
        let event = events::table
            .find(event_id)
            .for_update()
            .first::<Event>(self.conn)
            .optional()?;
        Ok(event)
    }

    fn user_exists(&mut self, user_id: Uuid) -> AppResult<bool> {
        let exists = diesel::select(diesel::dsl::exists(users::table.find(user_id)))
            .get_result(self.conn)?;
        Ok(exists)
    }

    fn find_rsvp(&mut self, event_id: Uuid, user_id: Uuid) -> AppResult<Option<Rsvp>> {
        let rsvp = rsvps::table
            .filter(rsvps::event_id.eq(event_id))
            .filter(rsvps::user_id.eq(user_id))
            .first::<Rsvp>(self.conn)
            .optional()?;
        Ok(rsvp)
    }

    fn attending_guests(&mut self, event_id: Uuid) -> AppResult<i64> {
        let total: Option<i64> = rsvps::table
            .filter(rsvps::event_id.eq(event_id))
            .filter(rsvps::status.eq(RsvpStatus::Attending.as_str()))
            .select(diesel::dsl::sum(rsvps::guests_count))
            .first(self.conn)?;
        Ok(total.unwrap_or(0))
    }

    fn upsert_rsvp(&mut self, rsvp: &NewRsvp) -> AppResult<Rsvp> {
        let saved = diesel::insert_into(rsvps::table)
            .values(rsvp)
            .on_conflict((rsvps::event_id, rsvps::user_id))
            .do_update()
            .set((
                rsvps::status.eq(&rsvp.status),
                rsvps::bringing_dish.eq(&rsvp.bringing_dish),
                rsvps::dietary_restrictions.eq(&rsvp.dietary_restrictions),
                rsvps::guests_count.eq(rsvp.guests_count),
                rsvps::updated_at.eq(Utc::now()),
            ))
            .get_result::<Rsvp>(self.conn)?;
        Ok(saved)
    }

    fn set_current_attendees(&mut self, event_id: Uuid, count: i32) -> AppResult<()> {
        diesel::update(events::table.find(event_id))
            .set(events::current_attendees.eq(count))
            .execute(self.conn)?;
        Ok(())
    }

    fn attending_roster(&mut self, event_id: Uuid) -> AppResult<Vec<RosterEntry>> {
        let rows = rsvps::table
            .inner_join(users::table)
            .filter(rsvps::event_id.eq(event_id))
            .filter(rsvps::status.eq(RsvpStatus::Attending.as_str()))
            .order((rsvps::created_at.asc(), rsvps::id.asc()))
            .select((rsvps::all_columns, users::all_columns))
            .load::<(Rsvp, UserSummary)>(self.conn)?;

        Ok(rows
            .into_iter()
            .map(|(rsvp, user)| RosterEntry { rsvp, user })
            .collect())
    }
}
