//! Server harness and browser-like client for behaviour suites.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The server listens on a loopback
//! socket and is stopped when the [`ServerWorld`] drops, even if a step
//! panics.

use std::cell::RefCell;
use std::net::TcpListener;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite, time::Duration as CookieDuration};
use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use awc::Client;
use regex::Regex;
use rstest::fixture;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;
use tracklist::Trace;
use tracklist::domain::ports::TrackRepository;
use tracklist::domain::{AccountService, CatalogueService, Track, TrackRecord};
use tracklist::inbound::http::routes;
use tracklist::inbound::http::state::{HttpState, HttpStatePorts};
use tracklist::inbound::http::stylesheets::StaticAssets;
use tracklist::inbound::http::validation::{form_config, json_config, query_config};
use tracklist::outbound::memory::{InMemoryTrackRepository, InMemoryUserRepository};
use tracklist::outbound::security::Argon2Hasher;

pub(crate) mod steps;

/// What the last request returned.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    pub(crate) status: u16,
    pub(crate) location: Option<String>,
    pub(crate) content_type: Option<String>,
    pub(crate) cache_control: Option<String>,
    pub(crate) body: String,
}

impl Snapshot {
    pub(crate) fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body is JSON")
    }
}

/// A running server plus the client-side state a browser would keep.
pub(crate) struct ServerWorld {
    runtime: Runtime,
    local: LocalSet,
    base_url: String,
    server: ServerHandle,
    tracks: Arc<InMemoryTrackRepository>,
    cookie: RefCell<Option<String>>,
    last: RefCell<Option<Snapshot>>,
}

impl Drop for ServerWorld {
    fn drop(&mut self) {
        let server = self.server.clone();
        self.local.block_on(&self.runtime, async move {
            server.stop(true).await;
        });
    }
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(PersistentSession::default().session_ttl(CookieDuration::hours(2)))
        .build()
}

fn http_state(tracks: Arc<InMemoryTrackRepository>) -> HttpState {
    let accounts = Arc::new(AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(Argon2Hasher::low_cost()),
    ));
    let catalogue = Arc::new(CatalogueService::new(tracks));
    HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        signup: accounts.clone(),
        profiles: accounts.clone(),
        profile_updates: accounts,
        music: catalogue.clone(),
        search: catalogue,
    })
}

async fn spawn_server(
    state: HttpState,
    assets: StaticAssets,
) -> Result<(String, ServerHandle), String> {
    let key = Key::generate();
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;

    let state = web::Data::new(state);
    let assets = web::Data::new(assets);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(assets.clone())
            .app_data(json_config())
            .app_data(form_config())
            .app_data(query_config())
            .wrap(session_middleware(key.clone()))
            .wrap(Trace)
            .configure(routes::configure)
            .default_service(web::to(routes::not_found))
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

/// Start a server over empty in-memory storage and the bundled stylesheets.
#[fixture]
pub(crate) fn world() -> ServerWorld {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let tracks = Arc::new(InMemoryTrackRepository::new());
    let assets = StaticAssets::open_or_empty(&Path::new(env!("CARGO_MANIFEST_DIR")).join("static"));
    let state = http_state(tracks.clone());
    let (base_url, server) = local
        .block_on(&runtime, spawn_server(state, assets))
        .expect("server should start");

    ServerWorld {
        runtime,
        local,
        base_url,
        server,
        tracks,
        cookie: RefCell::new(None),
        last: RefCell::new(None),
    }
}

static CSRF_RE: OnceLock<Regex> = OnceLock::new();

fn csrf_token_in(html: &str) -> Option<String> {
    CSRF_RE
        .get_or_init(|| {
            Regex::new(r#"name="csrfmiddlewaretoken" value="([0-9a-f]+)""#).expect("csrf regex")
        })
        .captures(html)
        .map(|caps| caps[1].to_owned())
}

enum Body {
    Empty,
    Form(Vec<(String, String)>),
    Json(serde_json::Value),
}

impl ServerWorld {
    /// Add a track to the catalogue the server reads from.
    pub(crate) fn add_track(&self, name: &str, artist: &str, album: &str, genre: &str, seconds: u32) {
        let track = Track::try_from(TrackRecord {
            slug: None,
            name: name.to_owned(),
            artist: artist.to_owned(),
            album: album.to_owned(),
            genre: genre.to_owned(),
            duration_seconds: seconds,
        })
        .expect("valid track");
        let tracks = self.tracks.clone();
        self.local
            .block_on(&self.runtime, async move {
                tracks.upsert_many(std::slice::from_ref(&track)).await
            })
            .expect("track stored");
    }

    fn send(&self, method: Method, path: &str, body: Body) -> Snapshot {
        let url = format!("{}{path}", self.base_url);
        let cookie = self.cookie.borrow().clone();
        let (snapshot, set_cookie) = self.local.block_on(&self.runtime, async move {
            let client = Client::builder().disable_redirects().finish();
            let mut request = client.request(method, url);
            if let Some(cookie) = cookie {
                request = request.insert_header((header::COOKIE, cookie));
            }
            let mut response = match body {
                Body::Empty => request.send().await,
                Body::Form(fields) => request.send_form(&fields).await,
                Body::Json(value) => request.send_json(&value).await,
            }
            .expect("request should complete");
            let header_value = |name: header::HeaderName| {
                response
                    .headers()
                    .get(name)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned)
            };
            let location = header_value(header::LOCATION);
            let content_type = header_value(header::CONTENT_TYPE);
            let cache_control = header_value(header::CACHE_CONTROL);
            let set_cookie = response
                .headers()
                .get_all(header::SET_COOKIE)
                .filter_map(|value| value.to_str().ok())
                .filter_map(|value| value.split(';').next())
                .find(|pair| pair.starts_with("session="))
                .map(str::to_owned);
            let status = response.status().as_u16();
            let bytes = response.body().await.expect("response body");
            (
                Snapshot {
                    status,
                    location,
                    content_type,
                    cache_control,
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                },
                set_cookie,
            )
        });
        if let Some(pair) = set_cookie {
            *self.cookie.borrow_mut() = (pair != "session=").then_some(pair);
        }
        *self.last.borrow_mut() = Some(snapshot.clone());
        snapshot
    }

    /// `GET path` with the stored session cookie.
    pub(crate) fn get(&self, path: &str) -> Snapshot {
        self.send(Method::GET, path, Body::Empty)
    }

    /// Send a bodyless request with any method.
    pub(crate) fn request(&self, method: Method, path: &str) -> Snapshot {
        self.send(method, path, Body::Empty)
    }

    /// `POST path` with a JSON body.
    pub(crate) fn post_json(&self, path: &str, value: serde_json::Value) -> Snapshot {
        self.send(Method::POST, path, Body::Json(value))
    }

    /// `POST path` with a urlencoded body, exactly as given.
    pub(crate) fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Snapshot {
        let owned = fields
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        self.send(Method::POST, path, Body::Form(owned))
    }

    /// Load the form at `path`, then post `fields` with its CSRF token.
    pub(crate) fn submit(&self, path: &str, fields: &[(&str, &str)]) -> Snapshot {
        let page = self.get(path);
        let token = csrf_token_in(&page.body).expect("form carries a csrf token");
        let mut with_token = fields.to_vec();
        with_token.push(("csrfmiddlewaretoken", token.as_str()));
        self.post_form(path, &with_token)
    }

    /// Whether the client currently holds a session cookie.
    pub(crate) fn has_session(&self) -> bool {
        self.cookie.borrow().is_some()
    }

    /// The last response.
    pub(crate) fn last(&self) -> Snapshot {
        self.last.borrow().clone().expect("a request has been made")
    }
}
