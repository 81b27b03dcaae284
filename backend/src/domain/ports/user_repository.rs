//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Bio, User, UserAccount, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername { username: String } => "username already registered: {username}",
    }
}

/// Storage for accounts and their credentials.
///
/// Username comparisons are exact (case-sensitive).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account, failing with
    /// [`UserPersistenceError::DuplicateUsername`] when the username is taken.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError>;

    /// Fetch an account (including its password hash) by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Fetch the public view of a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Replace a user's bio, returning the updated user or `None` when the
    /// id is unknown.
    async fn update_bio(
        &self,
        id: &UserId,
        bio: &Bio,
    ) -> Result<Option<User>, UserPersistenceError>;
}
