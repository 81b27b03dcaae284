//! Driving port for catalogue search.

use async_trait::async_trait;

use crate::domain::{Error, SearchResults, SearchTerm};

/// Domain use-case port for searching tracks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackSearch: Send + Sync {
    /// Run a search. An empty result set is a success.
    async fn search(&self, term: SearchTerm) -> Result<SearchResults, Error>;
}
