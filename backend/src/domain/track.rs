//! Catalogue tracks.
//!
//! Tracks are read-only over HTTP; they enter the system through catalogue
//! seeding (see [`TrackRecord`]) and are listed, searched and shown by slug.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::search::SearchTerm;

/// Maximum slug length in characters.
pub const SLUG_MAX: usize = 100;
/// Maximum length for track text fields.
pub const TRACK_FIELD_MAX: usize = 200;

/// Validation errors raised while building tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackValidationError {
    /// Slug was empty or contained characters outside `[a-z0-9-]`.
    InvalidSlug {
        /// Offending value.
        value: String,
    },
    /// A required text field was blank.
    EmptyField {
        /// Field name.
        field: &'static str,
    },
    /// A text field exceeded [`TRACK_FIELD_MAX`] characters.
    FieldTooLong {
        /// Field name.
        field: &'static str,
    },
}

impl fmt::Display for TrackValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSlug { value } => write!(
                f,
                "track slug '{value}' must be 1-{SLUG_MAX} lowercase letters, digits or hyphens"
            ),
            Self::EmptyField { field } => write!(f, "track {field} must not be empty"),
            Self::FieldTooLong { field } => {
                write!(f, "track {field} must be at most {TRACK_FIELD_MAX} characters")
            }
        }
    }
}

impl std::error::Error for TrackValidationError {}

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_regex() -> &'static Regex {
    SLUG_RE.get_or_init(|| {
        Regex::new("^[a-z0-9]+(?:-[a-z0-9]+)*$")
            .unwrap_or_else(|error| panic!("slug regex failed to compile: {error}"))
    })
}

/// URL-safe track identifier used by `/result/{slug}`.
///
/// # Examples
/// ```
/// use tracklist::domain::TrackSlug;
///
/// let slug = TrackSlug::derive(&["Blue Monday", "New Order"]);
/// assert_eq!(slug.as_ref(), "blue-monday-new-order");
/// assert!(TrackSlug::new("Not A Slug").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackSlug(String);

impl TrackSlug {
    /// Validate and construct a slug.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TrackValidationError> {
        let raw = raw.as_ref();
        if raw.chars().count() > SLUG_MAX || !slug_regex().is_match(raw) {
            return Err(TrackValidationError::InvalidSlug {
                value: raw.to_owned(),
            });
        }
        Ok(Self(raw.to_owned()))
    }

    /// Derive a slug from free text: ASCII alphanumerics are lowercased and
    /// every other run of characters becomes a single hyphen.
    pub fn derive(parts: &[&str]) -> Self {
        let mut slug = String::new();
        let mut pending_hyphen = false;
        for ch in parts.iter().flat_map(|part| part.chars().chain(std::iter::once(' '))) {
            if !ch.is_ascii_alphanumeric() {
                pending_hyphen = true;
                continue;
            }
            let hyphen = pending_hyphen && !slug.is_empty();
            if slug.len() + usize::from(hyphen) + 1 > SLUG_MAX {
                break;
            }
            if hyphen {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        }
        if slug.is_empty() {
            slug.push_str("track");
        }
        Self(slug)
    }
}

impl AsRef<str> for TrackSlug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TrackSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Track length in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TrackDuration(u32);

impl TrackDuration {
    /// Wrap a number of seconds.
    pub const fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Total seconds.
    pub const fn seconds(self) -> u32 {
        self.0
    }

    /// `m:ss` label, e.g. `3:07`.
    pub fn label(self) -> String {
        format!("{}:{:02}", self.0.div_euclid(60), self.0.rem_euclid(60))
    }
}

/// How strongly a track matched a search term. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchRank {
    /// The track name contains the term.
    Name,
    /// Only the artist, album or genre contains the term.
    Metadata,
}

/// A catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    slug: TrackSlug,
    name: String,
    artist: String,
    album: String,
    genre: String,
    duration: TrackDuration,
}

impl Track {
    /// Slug used in result links.
    pub fn slug(&self) -> &TrackSlug {
        &self.slug
    }

    /// Track title.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Performing artist.
    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// Album title.
    pub fn album(&self) -> &str {
        &self.album
    }

    /// Genre label.
    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Playing time.
    pub fn duration(&self) -> TrackDuration {
        self.duration
    }

    /// Case-insensitive substring match over name, artist, album and genre.
    pub fn match_rank(&self, term: &SearchTerm) -> Option<MatchRank> {
        let needle = term.folded();
        let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
        if contains(&self.name) {
            Some(MatchRank::Name)
        } else if contains(&self.artist) || contains(&self.album) || contains(&self.genre) {
            Some(MatchRank::Metadata)
        } else {
            None
        }
    }

    /// Whether the track matches the term at all.
    pub fn matches(&self, term: &SearchTerm) -> bool {
        self.match_rank(term).is_some()
    }
}

/// Serialised track shape used by seed files and storage adapters.
///
/// ```json
/// {"slug":"blue-monday","name":"Blue Monday","artist":"New Order",
///  "album":"Power, Corruption & Lies","genre":"Synth-pop","durationSeconds":448}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    /// Optional explicit slug; derived from name and artist when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Track title.
    pub name: String,
    /// Performing artist.
    pub artist: String,
    /// Album title.
    pub album: String,
    /// Genre label.
    pub genre: String,
    /// Playing time in seconds.
    pub duration_seconds: u32,
}

fn required_text(value: String, field: &'static str) -> Result<String, TrackValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TrackValidationError::EmptyField { field });
    }
    if trimmed.chars().count() > TRACK_FIELD_MAX {
        return Err(TrackValidationError::FieldTooLong { field });
    }
    Ok(trimmed.to_owned())
}

impl TryFrom<TrackRecord> for Track {
    type Error = TrackValidationError;

    fn try_from(value: TrackRecord) -> Result<Self, Self::Error> {
        let TrackRecord {
            slug,
            name,
            artist,
            album,
            genre,
            duration_seconds,
        } = value;
        let name = required_text(name, "name")?;
        let artist = required_text(artist, "artist")?;
        let slug = match slug {
            Some(raw) => TrackSlug::new(raw)?,
            None => TrackSlug::derive(&[&name, &artist]),
        };
        Ok(Self {
            slug,
            name,
            artist,
            album: required_text(album, "album")?,
            genre: required_text(genre, "genre")?,
            duration: TrackDuration::from_seconds(duration_seconds),
        })
    }
}

impl From<&Track> for TrackRecord {
    fn from(value: &Track) -> Self {
        Self {
            slug: Some(value.slug.to_string()),
            name: value.name.clone(),
            artist: value.artist.clone(),
            album: value.album.clone(),
            genre: value.genre.clone(),
            duration_seconds: value.duration.seconds(),
        }
    }
}
