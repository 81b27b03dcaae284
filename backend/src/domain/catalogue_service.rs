//! Catalogue domain service.
//!
//! Backs the music listing, track detail and search ports with a
//! [`TrackRepository`]. Search ranks name matches ahead of artist, album or
//! genre matches and keeps catalogue order within each rank.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{MusicQuery, TrackPersistenceError, TrackRepository, TrackSearch};
use crate::domain::{Error, SearchResult, SearchResults, SearchTerm, Track, TrackSlug};

/// Number of tracks on the music page.
pub const TOP_TRACKS_LIMIT: usize = 50;
/// Maximum number of hits returned by a search.
pub const SEARCH_RESULTS_LIMIT: usize = 50;

/// Catalogue service implementing [`MusicQuery`] and [`TrackSearch`].
#[derive(Clone)]
pub struct CatalogueService<T> {
    tracks: Arc<T>,
}

impl<T> CatalogueService<T> {
    /// Create a new service over the given repository.
    pub fn new(tracks: Arc<T>) -> Self {
        Self { tracks }
    }
}

fn map_persistence_error(error: TrackPersistenceError) -> Error {
    match error {
        TrackPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("track repository unavailable: {message}"))
        }
        TrackPersistenceError::Query { message } => {
            Error::internal(format!("track repository error: {message}"))
        }
    }
}

fn track_not_found() -> Error {
    Error::not_found("track not found")
}

#[async_trait]
impl<T> MusicQuery for CatalogueService<T>
where
    T: TrackRepository,
{
    async fn top_tracks(&self) -> Result<Vec<Track>, Error> {
        self.tracks
            .list(TOP_TRACKS_LIMIT)
            .await
            .map_err(map_persistence_error)
    }

    async fn track(&self, slug: &str) -> Result<Track, Error> {
        let Ok(slug) = TrackSlug::new(slug) else {
            return Err(track_not_found());
        };
        self.tracks
            .find_by_slug(&slug)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(track_not_found)
    }
}

#[async_trait]
impl<T> TrackSearch for CatalogueService<T>
where
    T: TrackRepository,
{
    async fn search(&self, term: SearchTerm) -> Result<SearchResults, Error> {
        let candidates = self
            .tracks
            .search(&term)
            .await
            .map_err(map_persistence_error)?;

        let mut ranked: Vec<_> = candidates
            .iter()
            .filter_map(|track| track.match_rank(&term).map(|rank| (rank, track)))
            .collect();
        ranked.sort_by_key(|(rank, _)| *rank);
        ranked.truncate(SEARCH_RESULTS_LIMIT);

        let results: Vec<SearchResult> = ranked
            .into_iter()
            .map(|(_, track)| SearchResult::from(track))
            .collect();
        debug!(query = term.as_str(), hits = results.len(), "catalogue searched");
        Ok(SearchResults::new(term, results))
    }
}
