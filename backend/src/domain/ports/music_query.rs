//! Driving port for browsing the catalogue.

use async_trait::async_trait;

use crate::domain::{Error, Track};

/// Domain use-case port for the music listing and track detail pages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MusicQuery: Send + Sync {
    /// Top tracks, ordered by artist then name. May be empty.
    async fn top_tracks(&self) -> Result<Vec<Track>, Error>;

    /// One track by slug; `not_found` when unknown or malformed.
    async fn track(&self, slug: &str) -> Result<Track, Error>;
}
