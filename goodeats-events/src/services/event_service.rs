use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use goodeats_shared::clients::db::{connection, DbPool};
use goodeats_shared::errors::{AppError, AppResult, ErrorCode};

use crate::ledger::RsvpStatus;
use crate::models::{Event, EventChanges, NewEvent, UserSummary};
use crate::schema::{events, rsvps, users};

pub fn create_event(pool: &DbPool, new_event: &NewEvent) -> AppResult<Event> {
    let mut conn = connection(pool)?;

    let host_exists: bool = diesel::select(diesel::dsl::exists(users::table.find(new_event.host_id)))
        .get_result(&mut conn)?;
    if !host_exists {
        return Err(AppError::new(
            ErrorCode::UserNotFound,
            "complete your profile before hosting an event",
        ));
    }

    let event = diesel::insert_into(events::table)
        .values(new_event)
        .get_result::<Event>(&mut conn)?;

    tracing::info!(
        event_id = %event.id,
        host_id = %event.host_id,
        category = %event.category,
        max_attendees = event.max_attendees,
        "event created"
    );

    Ok(event)
}

pub fn find_event(pool: &DbPool, event_id: Uuid) -> AppResult<(Event, UserSummary)> {
    let mut conn = connection(pool)?;

    events::table
        .inner_join(users::table)
        .filter(events::id.eq(event_id))
        .select((events::all_columns, users::all_columns))
        .first::<(Event, UserSummary)>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound, "event not found"))
}

/// Events on or after `from`, soonest first.
pub fn list_upcoming(
    pool: &DbPool,
    from: NaiveDate,
    category: Option<&str>,
    limit: i64,
    offset: i64,
) -> AppResult<(Vec<(Event, UserSummary)>, i64)> {
    let mut conn = connection(pool)?;

    let mut count_query = events::table.filter(events::date.ge(from)).into_boxed();
    let mut items_query = events::table
        .inner_join(users::table)
        .filter(events::date.ge(from))
        .into_boxed();
    if let Some(category) = category {
        count_query = count_query.filter(events::category.eq(category));
        items_query = items_query.filter(events::category.eq(category));
    }

    let total: i64 = count_query.count().get_result(&mut conn)?;
    let items = items_query
        .order((events::date.asc(), events::start_time.asc(), events::id.asc()))
        .select((events::all_columns, users::all_columns))
        .limit(limit)
        .offset(offset)
        .load::<(Event, UserSummary)>(&mut conn)?;

    Ok((items, total))
}

/// Applies `changes` if `caller_id` hosts the event.
pub fn update_event(
    pool: &DbPool,
    event_id: Uuid,
    caller_id: Uuid,
    changes: &EventChanges,
) -> AppResult<Event> {
    let mut conn = connection(pool)?;

    let event = events::table
        .find(event_id)
        .first::<Event>(&mut conn)
        .optional()?
        .ok_or_else(|| AppError::new(ErrorCode::EventNotFound, "event not found"))?;

    if event.host_id != caller_id {
        return Err(AppError::new(ErrorCode::NotEventHost, "only the host can edit this event"));
    }

    let updated = diesel::update(events::table.find(event_id))
        .set((changes, events::updated_at.eq(Utc::now())))
        .get_result::<Event>(&mut conn)?;

    tracing::info!(event_id = %event_id, "event updated");
    Ok(updated)
}

#[derive(Debug, Serialize, Clone)]
pub struct CalendarEntry {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub location_name: String,
    pub is_host: bool,
}

impl CalendarEntry {
    fn from_event(event: Event, is_host: bool) -> Self {
        Self {
            id: event.id,
            title: event.title,
            category: event.category,
            date: event.date,
            start_time: event.start_time,
            location_name: event.location_name,
            is_host,
        }
    }
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::new(ErrorCode::ValidationError, "invalid year or month"))?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let last = next_month
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| AppError::new(ErrorCode::ValidationError, "invalid year or month"))?;
    Ok((first, last))
}

/// Hosted events win over attended ones when a host also RSVP'd.
pub fn merge_calendar(hosted: Vec<Event>, attending: Vec<Event>) -> Vec<CalendarEntry> {
    let mut seen = HashSet::new();
    let mut entries: Vec<CalendarEntry> = hosted
        .into_iter()
        .map(|e| (e, true))
        .chain(attending.into_iter().map(|e| (e, false)))
        .filter(|(e, _)| seen.insert(e.id))
        .map(|(e, is_host)| CalendarEntry::from_event(e, is_host))
        .collect();
    entries.sort_by_key(|e| (e.date, e.start_time));
    entries
}

/// Events the user hosts or is attending within one month.
pub fn calendar(pool: &DbPool, user_id: Uuid, year: i32, month: u32) -> AppResult<Vec<CalendarEntry>> {
    let (first, last) = month_bounds(year, month)?;
    let mut conn = connection(pool)?;

    let hosted = events::table
        .filter(events::host_id.eq(user_id))
        .filter(events::date.between(first, last))
        .load::<Event>(&mut conn)?;

    let attending = rsvps::table
        .inner_join(events::table)
        .filter(rsvps::user_id.eq(user_id))
        .filter(rsvps::status.eq(RsvpStatus::Attending.as_str()))
        .filter(events::date.between(first, last))
        .select(events::all_columns)
        .load::<Event>(&mut conn)?;

    Ok(merge_calendar(hosted, attending))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::memory::sample_event;
    use chrono::Datelike;

    #[test]
    fn month_bounds_handle_december_and_leap_years() {
        let (first, last) = month_bounds(2024, 12).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());

        let (_, feb) = month_bounds(2024, 2).unwrap();
        assert_eq!(feb.day(), 29);
    }

    #[test]
    fn month_bounds_reject_bad_months() {
        for month in [0, 13] {
            let err = month_bounds(2024, month).unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationError);
        }
    }

    #[test]
    fn calendar_sorts_by_date_and_prefers_hosting() {
        let mut early = sample_event(5);
        early.date = NaiveDate::from_ymd_opt(2030, 6, 2).unwrap();
        let mut late = sample_event(5);
        late.date = NaiveDate::from_ymd_opt(2030, 6, 20).unwrap();
        let own_potluck = late.clone();

        let entries = merge_calendar(vec![late], vec![early.clone(), own_potluck]);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, early.id);
        assert!(!entries[0].is_host);
        assert!(entries[1].is_host);
    }
}
