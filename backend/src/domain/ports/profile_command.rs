//! Driving port for editing the signed-in user's profile.

use async_trait::async_trait;

use crate::domain::{Bio, Error, User, UserId};

/// Domain use-case port for profile updates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileCommand: Send + Sync {
    /// Replace the user's bio and return the updated profile.
    async fn update_bio(&self, id: &UserId, bio: Bio) -> Result<User, Error>;
}
