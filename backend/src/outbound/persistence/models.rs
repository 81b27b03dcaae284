//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them to
//! domain types at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{tracks, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub bio: String,
    #[expect(dead_code, reason = "selected for completeness; not surfaced to the domain")]
    pub created_at: DateTime<Utc>,
}

/// Insertable account. `created_at` uses the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub bio: &'a str,
}

/// Row read from and written to `tracks`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tracks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TrackRow {
    pub slug: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub duration_seconds: i32,
}
