//! Port abstraction for catalogue storage.
use async_trait::async_trait;

use crate::domain::{SearchTerm, Track, TrackSlug};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by track repository adapters.
    pub enum TrackPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "track repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "track repository query failed: {message}",
    }
}

/// Read and seed access to the track catalogue.
///
/// Listings are ordered by artist, then track name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackRepository: Send + Sync {
    /// Return at most `limit` tracks in catalogue order.
    async fn list(&self, limit: usize) -> Result<Vec<Track>, TrackPersistenceError>;

    /// Return every track whose name, artist, album or genre contains the
    /// term, case-insensitively, in catalogue order.
    async fn search(&self, term: &SearchTerm) -> Result<Vec<Track>, TrackPersistenceError>;

    /// Fetch one track by slug.
    async fn find_by_slug(&self, slug: &TrackSlug) -> Result<Option<Track>, TrackPersistenceError>;

    /// Insert or replace tracks keyed by slug, returning how many were
    /// written.
    async fn upsert_many(&self, tracks: &[Track]) -> Result<usize, TrackPersistenceError>;
}
