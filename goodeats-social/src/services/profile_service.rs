use chrono::NaiveDate;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde::Serialize;
use uuid::Uuid;

use goodeats_shared::clients::db::{connection, DbPool};
use goodeats_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{EventSummary, NewUser, ProfileChanges, User};
use crate::schema::{events, friendships, rsvps, users};

const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 30;

/// Usernames are 3-30 ASCII letters, digits or underscores.
pub fn validate_username(raw: &str) -> AppResult<String> {
    let username = raw.trim();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.len()) {
        return Err(AppError::new(
            ErrorCode::InvalidUsername,
            format!("username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"),
        ));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AppError::new(
            ErrorCode::InvalidUsername,
            "username can only contain letters, numbers, and underscores",
        ));
    }
    Ok(username.to_string())
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::UserNotFound, "profile not found")
}

/// Writes that attribute content to the caller need their `users` row.
pub(crate) fn require_profile(conn: &mut PgConnection, user_id: Uuid) -> AppResult<()> {
    let exists: bool = diesel::select(diesel::dsl::exists(users::table.find(user_id)))
        .get_result(conn)?;
    if !exists {
        return Err(AppError::new(
            ErrorCode::UserNotFound,
            "complete your profile before posting",
        ));
    }
    Ok(())
}

/// Creates the caller's `users` row right after sign-up.
pub fn create_profile(pool: &DbPool, new_user: &NewUser) -> AppResult<User> {
    let mut conn = connection(pool)?;

    let already_exists: bool = diesel::select(diesel::dsl::exists(users::table.find(new_user.id)))
        .get_result(&mut conn)?;
    if already_exists {
        return Err(AppError::bad_request("profile already exists"));
    }

    let name_taken: bool = diesel::select(diesel::dsl::exists(
        users::table.filter(users::username.eq(&new_user.username)),
    ))
    .get_result(&mut conn)?;
    if name_taken {
        return Err(AppError::new(ErrorCode::UsernameTaken, "username is already taken"));
    }

    let user = diesel::insert_into(users::table)
        .values(new_user)
        .get_result::<User>(&mut conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                if info.constraint_name().is_some_and(|c| c.contains("username")) =>
            {
                AppError::new(ErrorCode::UsernameTaken, "username is already taken")
            }
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                AppError::bad_request("email is already registered")
            }
            other => AppError::from(other),
        })?;

    tracing::info!(user_id = %user.id, username = %user.username, "profile created");
    Ok(user)
}

pub fn find_user(pool: &DbPool, user_id: Uuid) -> AppResult<User> {
    let mut conn = connection(pool)?;

    users::table
        .find(user_id)
        .first::<User>(&mut conn)
        .optional()?
        .ok_or_else(not_found)
}

pub fn update_profile(pool: &DbPool, user_id: Uuid, changes: &ProfileChanges) -> AppResult<User> {
    let mut conn = connection(pool)?;

    diesel::update(users::table.find(user_id))
        .set((changes, users::updated_at.eq(chrono::Utc::now())))
        .get_result::<User>(&mut conn)
        .optional()?
        .ok_or_else(not_found)
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ProfileStats {
    pub events_hosted: i64,
    pub events_attending: i64,
    pub friends: i64,
}

pub fn stats(pool: &DbPool, user_id: Uuid) -> AppResult<ProfileStats> {
    let mut conn = connection(pool)?;

    let events_hosted = events::table
        .filter(events::host_id.eq(user_id))
        .count()
        .get_result::<i64>(&mut conn)?;

    let events_attending = rsvps::table
        .filter(rsvps::user_id.eq(user_id))
        .filter(rsvps::status.eq("attending"))
        .count()
        .get_result::<i64>(&mut conn)?;

    let friends = friendships::table
        .filter(friendships::user_id.eq(user_id).or(friendships::friend_id.eq(user_id)))
        .filter(friendships::status.eq("accepted"))
        .count()
        .get_result::<i64>(&mut conn)?;

    Ok(ProfileStats { events_hosted, events_attending, friends })
}

/// Events the user is attending on or after `from`, soonest first.
pub fn upcoming_events(pool: &DbPool, user_id: Uuid, from: NaiveDate) -> AppResult<Vec<EventSummary>> {
    let mut conn = connection(pool)?;

    let upcoming = rsvps::table
        .inner_join(events::table)
        .filter(rsvps::user_id.eq(user_id))
        .filter(rsvps::status.eq("attending"))
        .filter(events::date.ge(from))
        .order((events::date.asc(), events::start_time.asc()))
        .select(events::all_columns)
        .load::<EventSummary>(&mut conn)?;

    Ok(upcoming)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_are_trimmed() {
        assert_eq!(validate_username("  chef_ana42 ").unwrap(), "chef_ana42");
    }

    #[test]
    fn username_length_is_bounded() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"a".repeat(30)).is_ok());
        let too_long = "a".repeat(31);
        for bad in ["ab", "", too_long.as_str()] {
            assert_eq!(validate_username(bad).unwrap_err().code(), ErrorCode::InvalidUsername);
        }
    }

    #[test]
    fn username_rejects_punctuation_and_non_ascii() {
        for bad in ["ana.b", "ana b", "ana-b", "josé_c"] {
            assert_eq!(
                validate_username(bad).unwrap_err().code(),
                ErrorCode::InvalidUsername,
                "{bad}"
            );
        }
    }
}
