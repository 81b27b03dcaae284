//! Account domain service.
//!
//! Implements the login, signup and profile driving ports on top of the
//! [`UserRepository`] and [`PasswordHasher`] driven ports. Password hashing
//! runs on the blocking pool so request threads stay responsive.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, ProfileCommand, ProfileQuery, SignupService,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Bio, DUPLICATE_USERNAME_MESSAGE, Error, INVALID_LOGIN_MESSAGE, LoginCredentials, NewAccount,
    PasswordHash, TraceId, User, UserAccount, UserId, Username,
};

/// Plaintext hashed once to give unknown usernames the same verification
/// cost as real accounts.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-users";

/// Account service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
    decoy: Arc<OnceLock<PasswordHash>>,
}

impl<R, H> AccountService<R, H> {
    /// Create a new service over the given repository and hasher.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self {
            users,
            hasher,
            decoy: Arc::new(OnceLock::new()),
        }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { .. } => duplicate_username(),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn duplicate_username() -> Error {
    Error::invalid_request(DUPLICATE_USERNAME_MESSAGE)
        .with_details(json!({ "field": "username", "code": "duplicate_username" }))
}

fn invalid_login() -> Error {
    Error::invalid_request(INVALID_LOGIN_MESSAGE)
        .with_details(json!({ "code": "invalid_credentials" }))
}

impl<R, H> AccountService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn hash_password(&self, password: Zeroizing<String>) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        TraceId::run_blocking(move || hasher.hash(&password))
            .await
            .map_err(|error| Error::internal(format!("password hashing task failed: {error}")))?
            .map_err(map_hash_error)
    }

    /// Verify against the stored hash, or against a decoy hash when the
    /// account does not exist (always reporting a mismatch).
    async fn verify_password(
        &self,
        password: Zeroizing<String>,
        stored: Option<PasswordHash>,
    ) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let decoy = Arc::clone(&self.decoy);
        TraceId::run_blocking(move || match stored {
            Some(hash) => hasher.verify(&password, &hash),
            None => {
                let decoy_hash = match decoy.get() {
                    Some(hash) => hash.clone(),
                    None => {
                        let hash = hasher.hash(DECOY_PASSWORD)?;
                        decoy.get_or_init(|| hash).clone()
                    }
                };
                hasher.verify(&password, &decoy_hash)?;
                Ok(false)
            }
        })
        .await
        .map_err(|error| Error::internal(format!("password verification task failed: {error}")))?
        .map_err(map_hash_error)
    }
}

#[async_trait]
impl<R, H> LoginService for AccountService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let account = match Username::new(credentials.username()) {
            Ok(username) => self
                .users
                .find_by_username(&username)
                .await
                .map_err(map_persistence_error)?,
            Err(_) => None,
        };
        let stored = account.as_ref().map(|found| found.password_hash().clone());
        let password = Zeroizing::new(credentials.password().to_owned());
        let verified = self.verify_password(password, stored).await?;

        match account {
            Some(found) if verified => {
                info!(user_id = %found.user().id(), "user authenticated");
                Ok(found.into_user())
            }
            _ => {
                debug!("login rejected");
                Err(invalid_login())
            }
        }
    }
}

#[async_trait]
impl<R, H> SignupService for AccountService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn register(&self, account: &NewAccount) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_username(account.username())
            .await
            .map_err(map_persistence_error)?;
        if existing.is_some() {
            return Err(duplicate_username());
        }

        let password_hash = self
            .hash_password(Zeroizing::new(account.password().to_owned()))
            .await?;
        let user = User::new(UserId::random(), account.username().clone(), Bio::default());
        self.users
            .insert(&UserAccount::new(user.clone(), password_hash))
            .await
            .map_err(map_persistence_error)?;

        info!(user_id = %user.id(), "account registered");
        Ok(user)
    }
}

#[async_trait]
impl<R, H> ProfileQuery for AccountService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn profile(&self, username: &str) -> Result<User, Error> {
        let Ok(username) = Username::new(username) else {
            return Err(Error::not_found("user not found"));
        };
        self.users
            .find_by_username(&username)
            .await
            .map_err(map_persistence_error)?
            .map(UserAccount::into_user)
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn user_by_id(&self, id: &UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)
    }
}

#[async_trait]
impl<R, H> ProfileCommand for AccountService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn update_bio(&self, id: &UserId, bio: Bio) -> Result<User, Error> {
        let updated = self
            .users
            .update_bio(id, &bio)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;
        info!(user_id = %id, "profile updated");
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
