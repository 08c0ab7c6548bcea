//! Driving ports for registration, login and profile lookups.
//!
//! Inbound adapters call these use-cases with validated values; the accounts
//! service implements all three traits.

use async_trait::async_trait;

use crate::domain::{AccessToken, Error, LoginCredentials, Registration, User, Username};

/// Token and profile returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: AccessToken,
    pub user: User,
}

#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Create an account. Duplicate usernames or emails are a conflict.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Exchange credentials for a bearer token.
    async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome, Error>;
}

#[async_trait]
pub trait AccountsQuery: Send + Sync {
    async fn is_username_available(&self, username: &Username) -> Result<bool, Error>;

    /// Public profile for `username`; not found when unknown.
    async fn profile(&self, username: &Username) -> Result<User, Error>;

    /// Case-insensitive username search used by the discover page.
    async fn search_users(&self, fragment: &str) -> Result<Vec<User>, Error>;
}

/// Resolves a bearer token to the username it was issued for.
///
/// Synchronous so request extractors can resolve identity without awaiting.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, bearer: &str) -> Result<Username, Error>;
}
