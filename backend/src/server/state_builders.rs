//! Builders wiring storage adapters into the HTTP state ports.

use std::sync::Arc;

use tracklist::domain::ports::{TrackRepository, UserRepository};
use tracklist::domain::{AccountService, CatalogueService};
use tracklist::inbound::http::state::{HttpState, HttpStatePorts};
use tracklist::outbound::memory::{InMemoryTrackRepository, InMemoryUserRepository};
use tracklist::outbound::persistence::{DbPool, DieselTrackRepository, DieselUserRepository};
use tracklist::outbound::security::Argon2Hasher;

/// HTTP state plus a handle on the catalogue store it reads from, so
/// startup seeding writes where the handlers look.
pub struct Adapters {
    pub http_state: HttpState,
    pub tracks: Arc<dyn TrackRepository>,
}

fn wire<U, T>(users: Arc<U>, tracks: Arc<T>) -> Adapters
where
    U: UserRepository + 'static,
    T: TrackRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(users, Arc::new(Argon2Hasher::default())));
    let catalogue = Arc::new(CatalogueService::new(tracks.clone()));
    let http_state = HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        signup: accounts.clone(),
        profiles: accounts.clone(),
        profile_updates: accounts,
        music: catalogue.clone(),
        search: catalogue,
    });
    Adapters { http_state, tracks }
}

/// Build adapters over PostgreSQL when a pool is available, otherwise over
/// process-local memory.
pub fn build_adapters(pool: Option<&DbPool>) -> Adapters {
    match pool {
        Some(pool) => wire(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselTrackRepository::new(pool.clone())),
        ),
        None => wire(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTrackRepository::new()),
        ),
    }
}
