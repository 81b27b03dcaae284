//! Memory-backed [`UserRepository`].

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Bio, User, UserAccount, UserId, Username};

/// Accounts keyed by exact username.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: RwLock<HashMap<String, UserAccount>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> UserPersistenceError {
    UserPersistenceError::query("user store lock poisoned")
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        let key = account.user().username().as_ref().to_owned();
        if accounts.contains_key(&key) {
            return Err(UserPersistenceError::duplicate_username(key));
        }
        accounts.insert(key, account.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        Ok(accounts.get(username.as_ref()).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let accounts = self.accounts.read().map_err(|_| poisoned())?;
        Ok(accounts
            .values()
            .find(|account| account.user().id() == id)
            .map(|account| account.user().clone()))
    }

    async fn update_bio(
        &self,
        id: &UserId,
        bio: &Bio,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut accounts = self.accounts.write().map_err(|_| poisoned())?;
        let Some(account) = accounts
            .values_mut()
            .find(|account| account.user().id() == id)
        else {
            return Ok(None);
        };
        let user = account.user().clone().with_bio(bio.clone());
        *account = UserAccount::new(user.clone(), account.password_hash().clone());
        Ok(Some(user))
    }
}
