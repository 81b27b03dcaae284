//! Catalogue pages: the music listing, search and track details.

use actix_web::{HttpRequest, HttpResponse, web};

use crate::domain::{Error, SearchTerm, Track};
use crate::inbound::http::forms::{FormErrors, SearchForm, SearchQuery};
use crate::inbound::http::routes::{names, path_for, paths};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::templates::{MusicPage, ResultPage, SearchOutcome, SearchPage, TrackView};
use crate::inbound::http::validation::search_term_error;

use super::{PageContext, PageResult, redirect, render};

fn track_path(req: &HttpRequest, slug: &str) -> Result<String, Error> {
    path_for(req, names::RESULT, &[slug])
}

/// `GET /`: the music page is the landing page.
pub async fn index(req: HttpRequest) -> PageResult {
    Ok(redirect(&path_for(&req, names::MUSIC, &[])?))
}

/// Top tracks table. Public.
pub async fn music_page(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
) -> PageResult {
    let page = PageContext::load(&req, session, &state).await?;
    page.respond(render_music(&req, &state, &page).await)
}

async fn render_music(
    req: &HttpRequest,
    state: &HttpState,
    page: &PageContext,
) -> Result<HttpResponse, Error> {
    let tracks = state
        .music
        .top_tracks()
        .await?
        .iter()
        .map(|track| {
            track_path(req, track.slug().as_ref()).map(|href| TrackView::new(track, href))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    render(&MusicPage {
        nav: page.nav.clone(),
        tracks,
    })
}

/// `GET /search/`, running the search when `?query=` is present.
pub async fn search_page(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<SearchQuery>,
) -> PageResult {
    let page = PageContext::load(&req, session, &state).await?;
    let result = match query.into_inner().query {
        Some(raw) => run_search(&req, &state, &page, raw).await,
        None => render_search(&page, String::new(), FormErrors::default(), None),
    };
    page.respond(result)
}

/// `POST /search/` from the search form.
pub async fn search_submit(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<SearchForm>,
) -> PageResult {
    let page = PageContext::load(&req, session, &state).await?;
    let form = form.into_inner();
    page.check_csrf(form.csrf_token.as_deref())?;
    page.respond(run_search(&req, &state, &page, form.query).await)
}

async fn run_search(
    req: &HttpRequest,
    state: &HttpState,
    page: &PageContext,
    raw: String,
) -> Result<HttpResponse, Error> {
    let term = match SearchTerm::new(&raw) {
        Ok(term) => term,
        Err(error) => {
            let errors = FormErrors::from_error(search_term_error(&error))?;
            return render_search(page, raw, errors, None);
        }
    };
    let found = state.search.search(term).await?;
    let hrefs = found
        .results()
        .iter()
        .map(|result| track_path(req, result.slug().as_ref()))
        .collect::<Result<Vec<_>, Error>>()?;
    let outcome = SearchOutcome::new(&found, hrefs);
    render_search(page, outcome.query.clone(), FormErrors::default(), Some(outcome))
}

fn render_search(
    page: &PageContext,
    query: String,
    errors: FormErrors,
    outcome: Option<SearchOutcome>,
) -> Result<HttpResponse, Error> {
    render(&SearchPage {
        nav: page.nav.clone(),
        csrf_token: page.session.csrf_token()?,
        action: paths::SEARCH.to_owned(),
        query,
        errors,
        outcome,
    })
}

/// Details for one track, linked from search results.
pub async fn result_page(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    slug: web::Path<String>,
) -> PageResult {
    let page = PageContext::load(&req, session, &state).await?;
    page.respond(render_result(&req, &state, &page, &slug).await)
}

async fn render_result(
    req: &HttpRequest,
    state: &HttpState,
    page: &PageContext,
    slug: &str,
) -> Result<HttpResponse, Error> {
    let track: Track = state.music.track(slug).await?;
    let href = track_path(req, track.slug().as_ref())?;
    render(&ResultPage {
        nav: page.nav.clone(),
        track: TrackView::new(&track, href),
    })
}

#[cfg(test)]
#[path = "music_tests.rs"]
mod tests;
