//! PostgreSQL-backed [`TrackRepository`].

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use diesel::pg::upsert::excluded;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{TrackPersistenceError, TrackRepository};
use crate::domain::{SearchTerm, Track, TrackRecord, TrackSlug};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::TrackRow;
use super::pool::{DbPool, PoolError};
use super::schema::tracks;

/// Diesel implementation of the catalogue store.
#[derive(Clone)]
pub struct DieselTrackRepository {
    pool: DbPool,
}

impl DieselTrackRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> TrackPersistenceError {
    map_basic_pool_error(error, TrackPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> TrackPersistenceError {
    map_basic_diesel_error(
        error,
        TrackPersistenceError::query,
        TrackPersistenceError::connection,
    )
}

/// Build an `ILIKE` pattern matching `term` anywhere, with LIKE wildcards in
/// the term escaped.
fn contains_pattern(term: &SearchTerm) -> String {
    let mut pattern = String::with_capacity(term.as_str().len() + 2);
    pattern.push('%');
    for ch in term.as_str().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn row_to_track(row: TrackRow) -> Result<Track, TrackPersistenceError> {
    let slug = row.slug.clone();
    let duration_seconds = u32::try_from(row.duration_seconds)
        .map_err(|_| TrackPersistenceError::query(format!("track {slug} has negative duration")))?;
    Track::try_from(TrackRecord {
        slug: Some(row.slug),
        name: row.name,
        artist: row.artist,
        album: row.album,
        genre: row.genre,
        duration_seconds,
    })
    .map_err(|error| {
        warn!(%slug, %error, "stored track row failed validation");
        TrackPersistenceError::query(format!("stored track {slug} is invalid"))
    })
}

fn track_to_row(track: &Track) -> Result<TrackRow, TrackPersistenceError> {
    let duration_seconds = i32::try_from(track.duration().seconds()).map_err(|_| {
        TrackPersistenceError::query(format!("track {} duration out of range", track.slug()))
    })?;
    Ok(TrackRow {
        slug: track.slug().to_string(),
        name: track.name().to_owned(),
        artist: track.artist().to_owned(),
        album: track.album().to_owned(),
        genre: track.genre().to_owned(),
        duration_seconds,
    })
}

/// `ON CONFLICT DO UPDATE` rejects a batch that touches one slug twice, so
/// keep only the last row per slug.
fn last_row_per_slug(rows: Vec<TrackRow>) -> Vec<TrackRow> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(rows.len());
    let mut unique: Vec<TrackRow> = Vec::with_capacity(rows.len());
    for row in rows {
        match positions.entry(row.slug.clone()) {
            Entry::Occupied(slot) => unique[*slot.get()] = row,
            Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(row);
            }
        }
    }
    unique
}

fn rows_to_tracks(rows: Vec<TrackRow>) -> Result<Vec<Track>, TrackPersistenceError> {
    rows.into_iter().map(row_to_track).collect()
}

#[async_trait]
impl TrackRepository for DieselTrackRepository {
    async fn list(&self, limit: usize) -> Result<Vec<Track>, TrackPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TrackRow> = tracks::table
            .order((tracks::artist.asc(), tracks::name.asc(), tracks::slug.asc()))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(TrackRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_tracks(rows)
    }

    async fn search(&self, term: &SearchTerm) -> Result<Vec<Track>, TrackPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let pattern = contains_pattern(term);

        let rows: Vec<TrackRow> = tracks::table
            .filter(
                tracks::name
                    .ilike(&pattern)
                    .or(tracks::artist.ilike(&pattern))
                    .or(tracks::album.ilike(&pattern))
                    .or(tracks::genre.ilike(&pattern)),
            )
            .order((tracks::artist.asc(), tracks::name.asc(), tracks::slug.asc()))
            .select(TrackRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_tracks(rows)
    }

    async fn find_by_slug(&self, slug: &TrackSlug) -> Result<Option<Track>, TrackPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TrackRow> = tracks::table
            .filter(tracks::slug.eq(slug.as_ref()))
            .select(TrackRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_track).transpose()
    }

    async fn upsert_many(&self, incoming: &[Track]) -> Result<usize, TrackPersistenceError> {
        if incoming.is_empty() {
            return Ok(0);
        }
        let rows = last_row_per_slug(
            incoming
                .iter()
                .map(track_to_row)
                .collect::<Result<Vec<_>, _>>()?,
        );
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(tracks::table)
            .values(&rows)
            .on_conflict(tracks::slug)
            .do_update()
            .set((
                tracks::name.eq(excluded(tracks::name)),
                tracks::artist.eq(excluded(tracks::artist)),
                tracks::album.eq(excluded(tracks::album)),
                tracks::genre.eq(excluded(tracks::genre)),
                tracks::duration_seconds.eq(excluded(tracks::duration_seconds)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
