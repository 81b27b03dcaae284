//! Tracklist entry-point: loads configuration, prepares storage, seeds the
//! catalogue and runs the HTTP server.

mod server;

use std::ffi::OsString;
use std::io;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, ServerConfig, build_adapters, create_server};
use tracklist::catalogue_seed::{CatalogueSeedSettings, seed_catalogue_on_startup};
use tracklist::inbound::http::health::HealthState;
use tracklist::inbound::http::session_config::{
    BuildMode, SessionSettings, session_settings_from_env,
};
use tracklist::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

/// Settings come from `APP_*`/`CATALOGUE_SEED_*` variables and config files;
/// process arguments are not parsed.
fn settings_args() -> [OsString; 1] {
    [OsString::from("tracklist")]
}

/// Build the Prometheus middleware, logging and continuing without it on
/// failure.
#[cfg(feature = "metrics")]
fn initialize_metrics<E: std::fmt::Display>(
    build: impl FnOnce() -> Result<PrometheusMetrics, E>,
) -> Option<PrometheusMetrics> {
    match build() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "metrics disabled: Prometheus middleware failed to build");
            None
        }
    }
}

/// Read the session cookie settings from the process environment.
fn load_session_settings(mode: BuildMode) -> io::Result<SessionSettings> {
    session_settings_from_env(&DefaultEnv::new(), mode).map_err(io::Error::other)
}

async fn connect_database(database_url: &str) -> io::Result<DbPool> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|error| io::Error::other(format!("migration task failed: {error}")))?
        .map_err(io::Error::other)?;
    info!(applied, "database migrations complete");
    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|error| io::Error::other(error.to_string()))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let session = load_session_settings(BuildMode::from_debug_assertions())?;
    let app_settings = AppSettings::load_from_iter(settings_args())
        .map_err(|error| io::Error::other(error.to_string()))?;
    let seed_settings = CatalogueSeedSettings::load_from_iter(settings_args())
        .map_err(|error| io::Error::other(error.to_string()))?;

    let db_pool = match app_settings.database_url() {
        Some(url) => Some(connect_database(url).await?),
        None => {
            info!("no database configured; using in-memory storage");
            None
        }
    };
    let adapters = build_adapters(db_pool.as_ref());
    seed_catalogue_on_startup(&seed_settings, adapters.tracks.as_ref())
        .await
        .map_err(io::Error::other)?;

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        app_settings.bind_addr(),
    )
    .with_http_state(adapters.http_state)
    .with_static_root(app_settings.static_root());

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("tracklist")
            .endpoint("/metrics")
            .build()
    }));

    info!(addr = %config.bind_addr(), "starting server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
