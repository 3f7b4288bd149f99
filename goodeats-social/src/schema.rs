// Diesel table definitions, kept in step with migrations/ by hand.
// `events` and `rsvps` are owned by goodeats-events; only the columns read here are mapped.

diesel::table! {
    users (id) {
        id -> Uuid,
        #[max_length = 255]
        email -> Varchar,
        #[max_length = 30]
        username -> Varchar,
        #[max_length = 100]
        full_name -> Varchar,
        avatar_url -> Nullable<Text>,
        bio -> Nullable<Text>,
        dietary_preferences -> Jsonb,
        #[max_length = 120]
        location -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    events (id) {
        id -> Uuid,
        host_id -> Uuid,
        #[max_length = 120]
        title -> Varchar,
        #[max_length = 20]
        category -> Varchar,
        date -> Date,
        start_time -> Time,
        #[max_length = 120]
        location_name -> Varchar,
    }
}

diesel::table! {
    rsvps (id) {
        id -> Uuid,
        event_id -> Uuid,
        user_id -> Uuid,
        #[max_length = 20]
        status -> Varchar,
    }
}

diesel::table! {
    posts (id) {
        id -> Uuid,
        user_id -> Uuid,
        event_id -> Nullable<Uuid>,
        content -> Text,
        images -> Jsonb,
        likes_count -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    comments (id) {
        id -> Uuid,
        post_id -> Uuid,
        user_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    likes (id) {
        id -> Uuid,
        user_id -> Uuid,
        post_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    friendships (id) {
        id -> Uuid,
        user_id -> Uuid,
        friend_id -> Uuid,
        #[max_length = 20]
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(rsvps -> events (event_id));
diesel::joinable!(posts -> users (user_id));
diesel::joinable!(comments -> users (user_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(likes -> posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    events,
    rsvps,
    posts,
    comments,
    likes,
    friendships,
);
