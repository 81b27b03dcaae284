//! Port for one-way password hashing.
//!
//! Implementations are synchronous and CPU-bound; services call them through
//! [`TraceId::run_blocking`](crate::domain::TraceId::run_blocking).

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing the plaintext failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// A stored hash could not be parsed.
        Malformed { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hash and verify passwords.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash for storage.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Check a candidate password against a stored hash.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}
