//! Memory-backed [`TrackRepository`].

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{TrackPersistenceError, TrackRepository};
use crate::domain::{SearchTerm, Track, TrackSlug};

/// Catalogue order key: artist, then name, then slug as a tiebreak.
type OrderKey = (String, String, TrackSlug);

fn order_key(track: &Track) -> OrderKey {
    (
        track.artist().to_owned(),
        track.name().to_owned(),
        track.slug().clone(),
    )
}

/// Tracks held in catalogue order.
#[derive(Debug, Default)]
pub struct InMemoryTrackRepository {
    tracks: RwLock<BTreeMap<OrderKey, Track>>,
}

impl InMemoryTrackRepository {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalogue pre-populated with `tracks`. Later entries replace
    /// earlier ones with the same slug.
    pub fn with_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        let mut map: BTreeMap<OrderKey, Track> = BTreeMap::new();
        for track in tracks {
            map.retain(|key, _| key.2 != *track.slug());
            map.insert(order_key(&track), track);
        }
        Self {
            tracks: RwLock::new(map),
        }
    }
}

fn poisoned() -> TrackPersistenceError {
    TrackPersistenceError::query("track store lock poisoned")
}

#[async_trait]
impl TrackRepository for InMemoryTrackRepository {
    async fn list(&self, limit: usize) -> Result<Vec<Track>, TrackPersistenceError> {
        let tracks = self.tracks.read().map_err(|_| poisoned())?;
        Ok(tracks.values().take(limit).cloned().collect())
    }

    async fn search(&self, term: &SearchTerm) -> Result<Vec<Track>, TrackPersistenceError> {
        let tracks = self.tracks.read().map_err(|_| poisoned())?;
        Ok(tracks
            .values()
            .filter(|track| track.matches(term))
            .cloned()
            .collect())
    }

    async fn find_by_slug(&self, slug: &TrackSlug) -> Result<Option<Track>, TrackPersistenceError> {
        let tracks = self.tracks.read().map_err(|_| poisoned())?;
        Ok(tracks.values().find(|track| track.slug() == slug).cloned())
    }

    async fn upsert_many(&self, incoming: &[Track]) -> Result<usize, TrackPersistenceError> {
        let mut tracks = self.tracks.write().map_err(|_| poisoned())?;
        for track in incoming {
            tracks.retain(|key, _| key.2 != *track.slug());
            tracks.insert(order_key(track), track.clone());
        }
        Ok(incoming.len())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::TrackRecord;
    use rstest::{fixture, rstest};

    fn track(name: &str, artist: &str) -> Track {
        Track::try_from(TrackRecord {
            slug: None,
            name: name.to_owned(),
            artist: artist.to_owned(),
            album: "Album".to_owned(),
            genre: "Electronic".to_owned(),
            duration_seconds: 240,
        })
        .expect("valid track")
    }

    #[fixture]
    fn repo() -> InMemoryTrackRepository {
        InMemoryTrackRepository::with_tracks([
            track("Windowlicker", "Aphex Twin"),
            track("Around the World", "Daft Punk"),
            track("Aerodynamic", "Daft Punk"),
        ])
    }

    #[rstest]
    #[tokio::test]
    async fn list_orders_by_artist_then_name(repo: InMemoryTrackRepository) {
        let names: Vec<_> = repo
            .list(10)
            .await
            .expect("list")
            .iter()
            .map(|t| t.name().to_owned())
            .collect();
        assert_eq!(names, vec!["Windowlicker", "Aerodynamic", "Around the World"]);
    }

    #[rstest]
    #[tokio::test]
    async fn list_honours_limit(repo: InMemoryTrackRepository) {
        assert_eq!(repo.list(2).await.expect("list").len(), 2);
    }

    #[rstest]
    #[case("daft", 2)]
    #[case("ELECTRONIC", 3)]
    #[case("window", 1)]
    #[case("polka", 0)]
    #[tokio::test]
    async fn search_matches_case_insensitively(
        repo: InMemoryTrackRepository,
        #[case] raw: &str,
        #[case] expected: usize,
    ) {
        let term = SearchTerm::new(raw).expect("term");
        assert_eq!(repo.search(&term).await.expect("search").len(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_replaces_by_slug(repo: InMemoryTrackRepository) {
        let replacement = Track::try_from(TrackRecord {
            slug: Some("windowlicker-aphex-twin".to_owned()),
            name: "Windowlicker".to_owned(),
            artist: "Aphex Twin".to_owned(),
            album: "Windowlicker EP".to_owned(),
            genre: "IDM".to_owned(),
            duration_seconds: 367,
        })
        .expect("valid track");

        let written = repo
            .upsert_many(std::slice::from_ref(&replacement))
            .await
            .expect("upsert");
        assert_eq!(written, 1);
        assert_eq!(repo.list(10).await.expect("list").len(), 3);

        let stored = repo
            .find_by_slug(replacement.slug())
            .await
            .expect("lookup")
            .expect("present");
        assert_eq!(stored.album(), "Windowlicker EP");
    }
}
