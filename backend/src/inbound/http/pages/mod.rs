//! Server-rendered HTML pages.
//!
//! Handlers load a [`PageContext`] (session, signed-in viewer and header
//! links), do their work against domain ports and render an askama
//! template. Failures become [`PageError`], which renders `error.html` with
//! the status the domain error maps to.

use std::fmt;

use actix_web::http::{StatusCode, header};
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use askama::Template;
use tracing::warn;

use crate::domain::{Error, TRACE_ID_HEADER, User};
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::error::{redact_if_internal, status_for};
use crate::inbound::http::routes::{names, path_for, paths};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::templates::{ErrorPage, Nav};

pub mod accounts;
pub mod music;

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Result alias for page handlers.
pub type PageResult = Result<HttpResponse, PageError>;

/// A domain error rendered as an HTML error page.
#[derive(Debug)]
pub struct PageError {
    error: Error,
    nav: Nav,
}

impl PageError {
    pub fn new(error: Error, nav: Nav) -> Self {
        Self { error, nav }
    }

    /// The underlying domain error.
    pub fn error(&self) -> &Error {
        &self.error
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl From<Error> for PageError {
    fn from(error: Error) -> Self {
        Self::new(error, Nav::anonymous())
    }
}

impl ResponseError for PageError {
    fn status_code(&self) -> StatusCode {
        status_for(self.error.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let shown = redact_if_internal(&self.error);
        let page = ErrorPage {
            nav: self.nav.clone(),
            status: format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Error")
            ),
            message: shown.message().to_owned(),
            trace_id: shown.trace_id().map(str::to_owned),
        };

        let mut builder = HttpResponse::build(status);
        if let Some(id) = shown.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        match page.render() {
            Ok(body) => builder.content_type(HTML_CONTENT_TYPE).body(body),
            Err(error) => {
                warn!(%error, "error page failed to render");
                builder
                    .content_type("text/plain; charset=utf-8")
                    .body(page.message)
            }
        }
    }
}

/// Per-request view of the session and the signed-in user.
pub struct PageContext {
    pub session: SessionContext,
    /// `None` when nobody is signed in or the account no longer exists.
    pub viewer: Option<User>,
    pub nav: Nav,
}

impl PageContext {
    /// Resolve the session's user and build the header links.
    pub async fn load(
        req: &HttpRequest,
        session: SessionContext,
        state: &HttpState,
    ) -> Result<Self, PageError> {
        let viewer = match session.user_id()? {
            Some(id) => state.profiles.user_by_id(&id).await?,
            None => None,
        };
        let nav = match &viewer {
            Some(user) => Nav::signed_in(profile_path(req, user)?),
            None => Nav::anonymous(),
        };
        Ok(Self {
            session,
            viewer,
            nav,
        })
    }

    /// Wrap `error` so it renders with this viewer's header.
    pub fn fail(&self, error: Error) -> PageError {
        PageError::new(error, self.nav.clone())
    }

    /// Attach this viewer's header to a handler's failure, if any.
    pub fn respond(&self, result: Result<HttpResponse, Error>) -> PageResult {
        result.map_err(|error| self.fail(error))
    }

    /// Reject a form post whose CSRF token does not match the session.
    pub fn check_csrf(&self, submitted: Option<&str>) -> Result<(), PageError> {
        self.session
            .verify_csrf(submitted)
            .map_err(|error| self.fail(error))
    }
}

/// Render `template` as a `200 OK` HTML response.
///
/// Pages embed the session's CSRF token so they must never be shared by
/// caches.
pub fn render(template: &impl Template) -> Result<HttpResponse, Error> {
    let body = template
        .render()
        .map_err(|error| Error::internal(format!("template rendering failed: {error}")))?;
    Ok(HttpResponse::Ok()
        .content_type(HTML_CONTENT_TYPE)
        .insert_header(private_no_cache_header())
        .body(body))
}

/// `302 Found` pointing at `location`.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Send an anonymous visitor to the login page, remembering where they were.
pub fn login_redirect(req: &HttpRequest) -> HttpResponse {
    let here = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.path().to_owned(), ToString::to_string);
    let next: String = url::form_urlencoded::byte_serialize(here.as_bytes()).collect();
    redirect(&format!("{}?next={next}", paths::LOGIN))
}

/// Path of `user`'s profile page.
pub fn profile_path(req: &HttpRequest, user: &User) -> Result<String, Error> {
    path_for(req, names::PROFILE, &[user.username().as_ref()])
}

/// Fallback for methods a page does not accept.
pub async fn method_not_allowed(req: HttpRequest) -> PageResult {
    Err(Error::method_not_allowed(format!("Method \"{}\" not allowed.", req.method())).into())
}
