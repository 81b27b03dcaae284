//! Askama templates for the HTML pages.
//!
//! Views hold pre-formatted strings so templates stay free of domain logic.
//! Links are reversed from named routes before rendering and marked `safe`
//! in the templates; everything user supplied goes through HTML escaping.

use askama::Template;

use crate::domain::{SearchResults, Track};

use super::forms::FormErrors;
use super::routes::paths;

/// Links shown in the page header.
#[derive(Debug, Clone)]
pub struct Nav {
    pub music: String,
    pub search: String,
    pub login: String,
    pub signup: String,
    pub logout: String,
    /// The viewer's own profile; `None` for anonymous visitors.
    pub profile: Option<String>,
}

impl Nav {
    /// Header for a visitor who is not signed in.
    pub fn anonymous() -> Self {
        Self {
            music: paths::MUSIC.to_owned(),
            search: paths::SEARCH.to_owned(),
            login: paths::LOGIN.to_owned(),
            signup: paths::SIGNUP.to_owned(),
            logout: paths::LOGOUT.to_owned(),
            profile: None,
        }
    }

    /// Header for a signed-in viewer whose profile lives at `href`.
    pub fn signed_in(href: String) -> Self {
        Self {
            profile: Some(href),
            ..Self::anonymous()
        }
    }
}

/// One row of the music table.
#[derive(Debug, Clone)]
pub struct TrackView {
    pub slug: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub duration: String,
    pub href: String,
}

impl TrackView {
    pub fn new(track: &Track, href: String) -> Self {
        Self {
            slug: track.slug().to_string(),
            name: track.name().to_owned(),
            artist: track.artist().to_owned(),
            album: track.album().to_owned(),
            genre: track.genre().to_owned(),
            duration: track.duration().label(),
            href,
        }
    }
}

/// One search hit.
#[derive(Debug, Clone)]
pub struct ResultView {
    pub title: String,
    pub summary: String,
    pub genre: String,
    pub href: String,
}

/// A completed search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub query: String,
    pub summary: String,
    pub results: Vec<ResultView>,
}

impl SearchOutcome {
    /// Pair each result with its detail link, in ranked order.
    pub fn new(found: &SearchResults, hrefs: Vec<String>) -> Self {
        let results = found
            .results()
            .iter()
            .zip(hrefs)
            .map(|(result, href)| ResultView {
                title: result.title().to_owned(),
                summary: result.summary().to_owned(),
                genre: result.genre().to_owned(),
                href,
            })
            .collect();
        Self {
            query: found.term().as_str().to_owned(),
            summary: found.summary(),
            results,
        }
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub nav: Nav,
    pub csrf_token: String,
    pub action: String,
    pub username: String,
    pub next: Option<String>,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupPage {
    pub nav: Nav,
    pub csrf_token: String,
    pub action: String,
    pub username: String,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfilePage {
    pub nav: Nav,
    pub csrf_token: String,
    pub username: String,
    pub bio: String,
    /// Only the owner is offered the bio editor.
    pub is_owner: bool,
    pub update_href: String,
}

#[derive(Template)]
#[template(path = "update_profile.html")]
pub struct UpdateProfilePage {
    pub nav: Nav,
    pub csrf_token: String,
    pub action: String,
    pub bio: String,
    pub profile_href: String,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "music.html")]
pub struct MusicPage {
    pub nav: Nav,
    pub tracks: Vec<TrackView>,
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchPage {
    pub nav: Nav,
    pub csrf_token: String,
    pub action: String,
    pub query: String,
    pub errors: FormErrors,
    pub outcome: Option<SearchOutcome>,
}

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultPage {
    pub nav: Nav,
    pub track: TrackView,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub nav: Nav,
    /// Status line, e.g. `404 Not Found`.
    pub status: String,
    pub message: String,
    pub trace_id: Option<String>,
}
