//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LoginService, MusicQuery, ProfileCommand, ProfileQuery, SignupService, TrackSearch,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub signup: Arc<dyn SignupService>,
    pub profiles: Arc<dyn ProfileQuery>,
    pub profile_updates: Arc<dyn ProfileCommand>,
    pub music: Arc<dyn MusicQuery>,
    pub search: Arc<dyn TrackSearch>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub signup: Arc<dyn SignupService>,
    pub profiles: Arc<dyn ProfileQuery>,
    pub profile_updates: Arc<dyn ProfileCommand>,
    pub music: Arc<dyn MusicQuery>,
    pub search: Arc<dyn TrackSearch>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use tracklist::domain::{AccountService, CatalogueService};
    /// use tracklist::inbound::http::state::{HttpState, HttpStatePorts};
    /// use tracklist::outbound::memory::{InMemoryTrackRepository, InMemoryUserRepository};
    /// use tracklist::outbound::security::Argon2Hasher;
    ///
    /// let accounts = Arc::new(AccountService::new(
    ///     Arc::new(InMemoryUserRepository::new()),
    ///     Arc::new(Argon2Hasher::default()),
    /// ));
    /// let catalogue = Arc::new(CatalogueService::new(Arc::new(InMemoryTrackRepository::new())));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: accounts.clone(),
    ///     signup: accounts.clone(),
    ///     profiles: accounts.clone(),
    ///     profile_updates: accounts,
    ///     music: catalogue.clone(),
    ///     search: catalogue,
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            signup,
            profiles,
            profile_updates,
            music,
            search,
        } = ports;
        Self {
            login,
            signup,
            profiles,
            profile_updates,
            music,
            search,
        }
    }
}
