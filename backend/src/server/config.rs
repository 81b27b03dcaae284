//! HTTP server configuration object and helpers.

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tracklist::inbound::http::state::HttpState;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

const DEFAULT_PORT: u16 = 8080;

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))
}

fn default_static_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static")
}

/// Application settings loaded via OrthoConfig from `APP_*` variables and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "APP")]
pub struct AppSettings {
    /// Socket address to listen on.
    #[ortho_config(default = default_bind_addr())]
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string; in-memory storage is used when absent.
    pub database_url: Option<String>,
    /// Directory holding the `css/` stylesheet folder.
    pub static_root: Option<PathBuf>,
}

impl AppSettings {
    /// Return the configured bind address; `0.0.0.0:8080` unless overridden.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return the configured static root, falling back to the bundled assets.
    pub fn static_root(&self) -> PathBuf {
        self.static_root.clone().unwrap_or_else(default_static_root)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) static_root: PathBuf,
    pub(crate) http_state: Option<HttpState>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            static_root: default_static_root(),
            http_state: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Serve handlers from pre-built ports.
    ///
    /// Without this the server runs over fresh in-memory adapters.
    #[must_use]
    pub fn with_http_state(mut self, state: HttpState) -> Self {
        self.http_state = Some(state);
        self
    }

    /// Serve stylesheets from `<root>/css`.
    #[must_use]
    pub fn with_static_root(mut self, root: PathBuf) -> Self {
        self.static_root = root;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
