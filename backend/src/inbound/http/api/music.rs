//! Catalogue endpoints: top tracks and search.

use actix_web::{HttpRequest, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, SearchTerm, Track};
use crate::inbound::http::ApiResult;
use crate::inbound::http::routes::{names, path_for};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::search_term_error;

/// One catalogue entry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackResponse {
    #[schema(example = "blue-monday-new-order")]
    pub slug: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// `m:ss` label.
    #[schema(example = "7:28")]
    pub duration: String,
    #[schema(example = 448)]
    pub duration_seconds: u32,
}

impl From<&Track> for TrackResponse {
    fn from(track: &Track) -> Self {
        Self {
            slug: track.slug().to_string(),
            name: track.name().to_owned(),
            artist: track.artist().to_owned(),
            album: track.album().to_owned(),
            genre: track.genre().to_owned(),
            duration: track.duration().label(),
            duration_seconds: track.duration().seconds(),
        }
    }
}

/// `GET /api/music/` body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MusicResponse {
    #[schema(example = "success")]
    pub status: String,
    pub content: Vec<TrackResponse>,
}

/// Query string for `GET /api/search/`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring matched against name, artist, album and genre.
    #[serde(default)]
    pub query: Option<String>,
}

/// One search hit.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchHit {
    pub title: String,
    pub summary: String,
    pub genre: String,
    /// Path of the track's detail page.
    #[schema(example = "/result/blue-monday-new-order")]
    pub url: String,
}

/// `GET /api/search/` body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<SearchHit>,
}

/// Top tracks. Public; the list may be empty.
#[utoipa::path(
    get,
    path = "/api/music/",
    responses(
        (status = 200, description = "Top tracks", body = MusicResponse),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Storage unavailable", body = Error)
    ),
    tags = ["music"],
    operation_id = "music",
    security([])
)]
pub async fn music(state: web::Data<HttpState>) -> ApiResult<web::Json<MusicResponse>> {
    let tracks = state.music.top_tracks().await?;
    Ok(web::Json(MusicResponse {
        status: "success".to_owned(),
        content: tracks.iter().map(TrackResponse::from).collect(),
    }))
}

/// Search the catalogue.
#[utoipa::path(
    get,
    path = "/api/search/",
    params(SearchParams),
    responses(
        (status = 200, description = "Ranked results, possibly empty", body = SearchResponse),
        (status = 400, description = "Missing or blank query", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["music"],
    operation_id = "search",
    security([])
)]
pub async fn search(
    req: HttpRequest,
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<SearchResponse>> {
    let raw = params.into_inner().query.unwrap_or_default();
    let term = SearchTerm::new(&raw).map_err(|error| search_term_error(&error))?;
    let found = state.search.search(term).await?;
    let results = found
        .results()
        .iter()
        .map(|hit| {
            path_for(&req, names::RESULT, &[hit.slug().as_ref()]).map(|url| SearchHit {
                title: hit.title().to_owned(),
                summary: hit.summary().to_owned(),
                genre: hit.genre().to_owned(),
                url,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(web::Json(SearchResponse {
        query: found.term().as_str().to_owned(),
        count: found.count(),
        results,
    }))
}

#[cfg(test)]
#[path = "music_tests.rs"]
mod tests;
