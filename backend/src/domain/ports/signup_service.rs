//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, NewAccount, User};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignupService: Send + Sync {
    /// Create an account. A taken username fails with `invalid_request`
    /// and `details.field == "username"`.
    async fn register(&self, account: &NewAccount) -> Result<User, Error>;
}
