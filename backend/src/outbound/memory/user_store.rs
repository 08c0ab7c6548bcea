use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{ListId, StatKind, User, UserAccount, Username};

use super::lock;

/// In-memory [`UserRepository`].
#[derive(Default)]
pub struct InMemoryUserRepository {
    accounts: std::sync::Mutex<Vec<UserAccount>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_user<T>(
        &self,
        username: &Username,
        apply: impl FnOnce(&mut User) -> T,
    ) -> Option<T> {
        let mut accounts = lock(&self.accounts);
        accounts
            .iter_mut()
            .find(|account| &account.user.username == username)
            .map(|account| apply(&mut account.user))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut accounts = lock(&self.accounts);
        if accounts
            .iter()
            .any(|existing| existing.user.username == account.user.username)
        {
            return Err(UserPersistenceError::duplicate("username"));
        }
        if accounts
            .iter()
            .any(|existing| existing.user.email == account.user.email)
        {
            return Err(UserPersistenceError::duplicate("email"));
        }
        accounts.push(account.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.with_user(username, |user| user.clone()))
    }

    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let accounts = lock(&self.accounts);
        Ok(accounts
            .iter()
            .find(|account| account.user.email.as_ref() == email)
            .cloned())
    }

    async fn search(&self, fragment: &str) -> Result<Vec<User>, UserPersistenceError> {
        let needle = fragment.trim().to_lowercase();
        let accounts = lock(&self.accounts);
        let mut users: Vec<User> = accounts
            .iter()
            .filter(|account| {
                account
                    .user
                    .username
                    .as_ref()
                    .to_lowercase()
                    .contains(&needle)
            })
            .map(|account| account.user.clone())
            .collect();
        users.sort_by(|left, right| left.username.cmp(&right.username));
        Ok(users)
    }

    async fn adjust_stat(
        &self,
        username: &Username,
        kind: StatKind,
        delta: i32,
    ) -> Result<(), UserPersistenceError> {
        self.with_user(username, |user| user.stats.adjust(kind, delta));
        Ok(())
    }

    async fn add_followed_list(
        &self,
        username: &Username,
        list_id: &ListId,
    ) -> Result<(), UserPersistenceError> {
        self.with_user(username, |user| {
            if !user.follows(list_id) {
                user.followed_lists.push(*list_id);
            }
        });
        Ok(())
    }

    async fn remove_followed_list(
        &self,
        username: &Username,
        list_id: &ListId,
    ) -> Result<(), UserPersistenceError> {
        self.with_user(username, |user| {
            user.followed_lists.retain(|followed| followed != list_id);
        });
        Ok(())
    }
}
