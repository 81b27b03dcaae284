//! Test helpers for inbound HTTP components.

use std::sync::{Arc, OnceLock};

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use regex::Regex;

use crate::domain::{AccountService, CatalogueService, Track, TrackRecord};
use crate::inbound::http::routes;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::stylesheets::StaticAssets;
use crate::inbound::http::validation::{form_config, json_config, query_config};
use crate::outbound::memory::{InMemoryTrackRepository, InMemoryUserRepository};
use crate::outbound::security::Argon2Hasher;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// A small catalogue for page and endpoint tests.
pub fn sample_tracks() -> Vec<Track> {
    [
        ("Blue Monday", "New Order", "Power, Corruption & Lies", "Synth-pop", 448),
        ("Testify", "Rage Against the Machine", "The Battle of Los Angeles", "Rock", 210),
        ("Teardrop", "Massive Attack", "Mezzanine", "Trip hop", 330),
    ]
    .into_iter()
    .map(|(name, artist, album, genre, duration_seconds)| {
        Track::try_from(TrackRecord {
            slug: None,
            name: name.to_owned(),
            artist: artist.to_owned(),
            album: album.to_owned(),
            genre: genre.to_owned(),
            duration_seconds,
        })
        .expect("sample track is valid")
    })
    .collect()
}

/// HTTP state over in-memory adapters seeded with `tracks`.
///
/// Uses the cheapest Argon2 parameters so login tests stay fast.
pub fn memory_state_with(tracks: Vec<Track>) -> HttpState {
    let accounts = Arc::new(AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(Argon2Hasher::low_cost()),
    ));
    let catalogue = Arc::new(CatalogueService::new(Arc::new(
        InMemoryTrackRepository::with_tracks(tracks),
    )));
    HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        signup: accounts.clone(),
        profiles: accounts.clone(),
        profile_updates: accounts,
        music: catalogue.clone(),
        search: catalogue,
    })
}

/// HTTP state over in-memory adapters seeded with [`sample_tracks`].
pub fn memory_state() -> HttpState {
    memory_state_with(sample_tracks())
}

/// Initialise the full route table over `state`, as the server wires it.
pub async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .wrap(test_session_middleware())
            .app_data(web::Data::new(state))
            .app_data(web::Data::new(StaticAssets::default()))
            .app_data(json_config())
            .app_data(form_config())
            .app_data(query_config())
            .configure(routes::configure)
            .default_service(web::to(routes::not_found)),
    )
    .await
}

static CSRF_RE: OnceLock<Regex> = OnceLock::new();

/// The CSRF token embedded in a rendered form.
pub fn csrf_token_in(html: &str) -> Option<String> {
    CSRF_RE
        .get_or_init(|| {
            Regex::new(r#"name="csrfmiddlewaretoken" value="([0-9a-f]+)""#).expect("csrf regex")
        })
        .captures(html)
        .map(|caps| caps[1].to_owned())
}

/// Drives an app like a browser, carrying the session cookie between calls.
pub struct Browser<S> {
    app: S,
    cookie: Option<Cookie<'static>>,
}

impl<S> Browser<S>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    pub fn new(app: S) -> Self {
        Self { app, cookie: None }
    }

    /// Send `req` with the current cookie and remember any replacement.
    pub async fn send(&mut self, req: test::TestRequest) -> ServiceResponse<BoxBody> {
        let req = match &self.cookie {
            Some(cookie) => req.cookie(cookie.clone()),
            None => req,
        };
        let res = test::call_service(&self.app, req.to_request()).await;
        if let Some(cookie) = res.response().cookies().find(|c| c.name() == "session") {
            self.cookie = Some(cookie.into_owned());
        }
        res
    }

    /// `GET uri`, returning the status and body text.
    pub async fn get(&mut self, uri: &str) -> (StatusCode, String) {
        let res = self.send(test::TestRequest::get().uri(uri)).await;
        let status = res.status();
        let body = test::read_body(res).await;
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    /// Load a form page and return its CSRF token.
    pub async fn csrf_token(&mut self, uri: &str) -> String {
        let (status, html) = self.get(uri).await;
        assert_eq!(status, StatusCode::OK, "form page {uri} should render");
        csrf_token_in(&html).expect("form carries a csrf token")
    }

    /// `POST uri` with urlencoded `fields`.
    pub async fn post_form(
        &mut self,
        uri: &str,
        fields: &[(&str, &str)],
    ) -> ServiceResponse<BoxBody> {
        self.send(test::TestRequest::post().uri(uri).set_form(fields))
            .await
    }

    /// Fetch a form's token, then post `fields` with it.
    pub async fn submit(
        &mut self,
        uri: &str,
        fields: &[(&str, &str)],
    ) -> ServiceResponse<BoxBody> {
        let token = self.csrf_token(uri).await;
        let mut with_token = fields.to_vec();
        with_token.push(("csrfmiddlewaretoken", token.as_str()));
        self.post_form(uri, &with_token).await
    }

    /// Create an account through the signup page; the browser ends signed in.
    pub async fn sign_up(&mut self, username: &str, password: &str) {
        let res = self
            .submit(
                "/signup/",
                &[
                    ("username", username),
                    ("password1", password),
                    ("password2", password),
                ],
            )
            .await;
        assert_eq!(res.status(), StatusCode::FOUND, "signup should redirect");
    }
}

/// Value of the `Location` header.
pub fn location(res: &ServiceResponse<BoxBody>) -> Option<String> {
    res.headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}
