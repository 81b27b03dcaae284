//! Search terms and derived, transient search results.

use std::fmt;

use super::auth::REQUIRED_FIELD_MESSAGE;
use super::track::{Track, TrackSlug};

/// Maximum search term length in characters.
pub const SEARCH_TERM_MAX: usize = 100;

/// Validation errors for [`SearchTerm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTermError {
    /// The query was missing or blank.
    Empty,
    /// The query exceeded [`SEARCH_TERM_MAX`] characters.
    TooLong {
        /// Submitted length.
        actual: usize,
    },
}

impl fmt::Display for SearchTermError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str(REQUIRED_FIELD_MESSAGE),
            Self::TooLong { actual } => write!(
                f,
                "Ensure this value has at most {SEARCH_TERM_MAX} characters (it has {actual})."
            ),
        }
    }
}

impl std::error::Error for SearchTermError {}

/// A trimmed, non-empty search query.
///
/// # Examples
/// ```
/// use tracklist::domain::SearchTerm;
///
/// let term = SearchTerm::new("  Daft Punk ").unwrap();
/// assert_eq!(term.as_str(), "Daft Punk");
/// assert_eq!(term.folded(), "daft punk");
/// assert!(SearchTerm::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Validate and construct a search term.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SearchTermError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SearchTermError::Empty);
        }
        let actual = trimmed.chars().count();
        if actual > SEARCH_TERM_MAX {
            return Err(SearchTermError::TooLong { actual });
        }
        Ok(Self {
            raw: trimmed.to_owned(),
            folded: trimmed.to_lowercase(),
        })
    }

    /// The query as the user typed it, trimmed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercased form used for case-insensitive matching.
    pub fn folded(&self) -> &str {
        &self.folded
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    title: String,
    summary: String,
    genre: String,
    slug: TrackSlug,
}

impl SearchResult {
    /// Result heading (the track name).
    pub fn title(&self) -> &str {
        &self.title
    }

    /// `artist — album` line.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Genre label.
    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Slug of the matched track.
    pub fn slug(&self) -> &TrackSlug {
        &self.slug
    }
}

impl From<&Track> for SearchResult {
    fn from(track: &Track) -> Self {
        Self {
            title: track.name().to_owned(),
            summary: format!("{} \u{2014} {}", track.artist(), track.album()),
            genre: track.genre().to_owned(),
            slug: track.slug().clone(),
        }
    }
}

/// Results for one query, in ranked order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    term: SearchTerm,
    results: Vec<SearchResult>,
}

impl SearchResults {
    /// Bundle a term with its ranked results.
    pub fn new(term: SearchTerm, results: Vec<SearchResult>) -> Self {
        Self { term, results }
    }

    /// The query that produced these results.
    pub fn term(&self) -> &SearchTerm {
        &self.term
    }

    /// Ranked hits.
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    /// Number of hits.
    pub fn count(&self) -> usize {
        self.results.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Human readable count, e.g. `1 result found`.
    pub fn summary(&self) -> String {
        match self.count() {
            0 => "No results found".to_owned(),
            1 => "1 result found".to_owned(),
            n => format!("{n} results found"),
        }
    }
}
