//! Driving port for login/authentication use-cases.
//!
//! Inbound adapters call this port to authenticate credentials without
//! knowing the backing store, which keeps handler tests deterministic.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    ///
    /// Unknown usernames and wrong passwords fail identically with an
    /// `invalid_request` error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}
