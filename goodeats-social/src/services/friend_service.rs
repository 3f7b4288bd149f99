use diesel::prelude::*;
use uuid::Uuid;

use goodeats_shared::clients::db::{connection, DbPool};
use goodeats_shared::errors::{AppError, AppResult, ErrorCode};

use crate::models::{Author, Friendship, AUTHOR_COLUMNS};
use crate::schema::{friendships, users};

/// Case-insensitive match on username or full name. A blank query matches everyone.
pub fn matches_query(friend: &Author, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || friend.username.to_lowercase().contains(&query)
        || friend.full_name.to_lowercase().contains(&query)
}

/// Ids on the far side of each friendship row, first occurrence kept.
pub fn friend_ids(me: Uuid, rows: &[Friendship]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = Vec::with_capacity(rows.len());
    for id in rows.iter().map(|f| f.other_side(me)) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Accepted friends of `me`, sorted by name.
pub fn list_friends(pool: &DbPool, me: Uuid, query: Option<&str>) -> AppResult<Vec<Author>> {
    let mut conn = connection(pool)?;

    let rows = friendships::table
        .filter(friendships::user_id.eq(me).or(friendships::friend_id.eq(me)))
        .filter(friendships::status.eq("accepted"))
        .load::<Friendship>(&mut conn)?;
    let ids = friend_ids(me, &rows);

    let friends = users::table
        .filter(users::id.eq_any(&ids))
        .order((users::full_name.asc(), users::username.asc()))
        .select(AUTHOR_COLUMNS)
        .load::<Author>(&mut conn)?;

    Ok(match query {
        Some(q) => friends.into_iter().filter(|f| matches_query(f, q)).collect(),
        None => friends,
    })
}

/// Deletes the friendship between `me` and `other`, whichever side created it.
pub fn remove_friend(pool: &DbPool, me: Uuid, other: Uuid) -> AppResult<()> {
    let mut conn = connection(pool)?;

    let removed = diesel::delete(
        friendships::table.filter(
            friendships::user_id
                .eq(me)
                .and(friendships::friend_id.eq(other))
                .or(friendships::user_id.eq(other).and(friendships::friend_id.eq(me))),
        ),
    )
    .execute(&mut conn)?;

    if removed == 0 {
        return Err(AppError::new(ErrorCode::FriendshipNotFound, "friendship not found"));
    }

    tracing::info!(user_id = %me, friend_id = %other, "friendship removed");
    Ok(())
}
