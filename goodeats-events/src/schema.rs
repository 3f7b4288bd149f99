// Diesel table definitions, kept in step with migrations/ by hand.
// `users` is owned by goodeats-social; only the public columns are mapped here.

diesel::table! {
    users (id) {
        id -> Uuid,
        #[max_length = 30]
        username -> Varchar,
        #[max_length = 100]
        full_name -> Varchar,
        avatar_url -> Nullable<Text>,
    }
}

diesel::table! {
    events (id) {
        id -> Uuid,
        host_id -> Uuid,
        #[max_length = 120]
        title -> Varchar,
        description -> Text,
        #[max_length = 20]
        category -> Varchar,
        date -> Date,
        start_time -> Time,
        duration_hours -> Float8,
        #[max_length = 120]
        location_name -> Varchar,
        #[max_length = 255]
        location_address -> Varchar,
        latitude -> Float8,
        longitude -> Float8,
        max_attendees -> Int4,
        current_attendees -> Int4,
        cover_image -> Nullable<Text>,
        #[max_length = 120]
        meal_theme -> Nullable<Varchar>,
        is_free -> Bool,
        price_cents -> Int4,
        dietary_options -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    rsvps (id) {
        id -> Uuid,
        event_id -> Uuid,
        user_id -> Uuid,
        #[max_length = 20]
        status -> Varchar,
        #[max_length = 200]
        bringing_dish -> Nullable<Varchar>,
        #[max_length = 200]
        dietary_restrictions -> Nullable<Varchar>,
        guests_count -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(events -> users (host_id));
diesel::joinable!(rsvps -> events (event_id));
diesel::joinable!(rsvps -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    events,
    rsvps,
);
