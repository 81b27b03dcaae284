//! Startup seeding orchestration.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use tracing::{info, warn};

use crate::catalogue_seed::config::CatalogueSeedSettings;
use crate::domain::ports::{TrackPersistenceError, TrackRepository};
use crate::domain::{Track, TrackRecord, TrackValidationError};

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum CatalogueSeedError {
    /// Seed file could not be read.
    #[error("failed to read catalogue seed at {path}: {source}")]
    SeedRead {
        /// Path to the seed file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Seed file is not a JSON array of track records.
    #[error("catalogue seed parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A record failed track validation.
    #[error("catalogue seed entry {index} is invalid: {source}")]
    InvalidTrack {
        /// Zero-based position in the seed file.
        index: usize,
        /// Validation failure.
        #[source]
        source: TrackValidationError,
    },
    /// Writing to the repository failed.
    #[error("catalogue seeding error: {0}")]
    Persistence(#[from] TrackPersistenceError),
}

/// Load the seed file into `tracks` when seeding is enabled.
///
/// Returns the number of tracks written, or `None` when seeding is disabled.
/// Entries replace existing tracks with the same slug, so re-running against
/// the same store is harmless.
///
/// # Examples
///
/// ```rust,no_run
/// use tracklist::catalogue_seed::{CatalogueSeedSettings, seed_catalogue_on_startup};
/// use tracklist::outbound::memory::InMemoryTrackRepository;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = CatalogueSeedSettings {
///     enabled: true,
///     path: None,
/// };
/// let tracks = InMemoryTrackRepository::new();
/// let written = seed_catalogue_on_startup(&settings, &tracks).await?;
/// assert!(written.is_some());
/// # Ok(())
/// # }
/// ```
pub async fn seed_catalogue_on_startup(
    settings: &CatalogueSeedSettings,
    tracks: &dyn TrackRepository,
) -> Result<Option<usize>, CatalogueSeedError> {
    if !settings.enabled {
        info!(reason = "disabled", "catalogue seeding skipped");
        return Ok(None);
    }

    let path = settings.seed_path();
    let seed = parse_seed(&load_seed(&path)?)?;
    let written = tracks.upsert_many(&seed).await?;
    info!(path = %path.display(), track_count = written, "catalogue seeding applied");
    Ok(Some(written))
}

fn parse_seed(contents: &str) -> Result<Vec<Track>, CatalogueSeedError> {
    let records: Vec<TrackRecord> = serde_json::from_str(contents)?;
    let tracks = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            Track::try_from(record).map_err(|source| CatalogueSeedError::InvalidTrack { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(last_entry_per_slug(tracks))
}

/// Collapse entries sharing a slug; the later entry wins and keeps the
/// earlier one's position.
fn last_entry_per_slug(tracks: Vec<Track>) -> Vec<Track> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(tracks.len());
    let mut unique: Vec<Track> = Vec::with_capacity(tracks.len());
    for track in tracks {
        match positions.entry(track.slug().as_ref().to_owned()) {
            Entry::Occupied(slot) => {
                warn!(slug = %track.slug(), "duplicate catalogue seed entry replaces an earlier one");
                unique[*slot.get()] = track;
            }
            Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(track);
            }
        }
    }
    unique
}

fn load_seed(path: &Path) -> Result<String, CatalogueSeedError> {
    let read_error = |source| CatalogueSeedError::SeedRead {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "seed path must be a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let payload = dir.read(Path::new(file_name)).map_err(read_error)?;
    String::from_utf8(payload)
        .map_err(|source| read_error(std::io::Error::new(std::io::ErrorKind::InvalidData, source)))
}
