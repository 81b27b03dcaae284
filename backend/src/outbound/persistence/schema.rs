//! Diesel table definitions. Must match `backend/migrations`.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique, case-sensitive login name.
        username -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        bio -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue tracks keyed by slug.
    tracks (slug) {
        slug -> Varchar,
        name -> Varchar,
        artist -> Varchar,
        album -> Varchar,
        genre -> Varchar,
        duration_seconds -> Int4,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, tracks);
