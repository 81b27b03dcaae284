//! Driving port for reading user profiles.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for profile lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileQuery: Send + Sync {
    /// Look up a profile by username; `not_found` when no such user exists
    /// (including usernames that could never be valid).
    async fn profile(&self, username: &str) -> Result<User, Error>;

    /// Resolve the user behind a session id. `None` when the account no
    /// longer exists.
    async fn user_by_id(&self, id: &UserId) -> Result<Option<User>, Error>;
}
