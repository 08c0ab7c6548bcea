//! Accounts domain service: registration, login and token checks.
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    AccessTokenCodec, AccountsCommand, AccountsQuery, Authenticator, LoginOutcome,
    PasswordHashError, PasswordHasher, TokenError, UserPersistenceError, UserRepository,
};
use crate::domain::{Error, LoginCredentials, Registration, User, UserAccount, Username};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Accounts service implementing the account driving ports.
#[derive(Clone)]
pub struct AccountsService<R, H, T> {
    users: Arc<R>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<R, H, T> AccountsService<R, H, T> {
    pub fn new(users: Arc<R>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Duplicate { .. } => {
            Error::conflict("Username or email already exists")
        }
        UserPersistenceError::Connection { message } => {
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Expired => Error::unauthorized("Token expired"),
        TokenError::Invalid { message } => {
            debug!(%message, "rejected bearer token");
            Error::unauthorized("Invalid token")
        }
        TokenError::Signing { message } => {
            Error::internal(format!("token signing failed: {message}"))
        }
    }
}

#[async_trait]
impl<R, H, T> AccountsCommand for AccountsService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher,
    T: AccessTokenCodec,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(map_hash_error)?;
        let user = User::new(
            registration.username().clone(),
            registration.email().clone(),
            self.clock.utc(),
        );
        let account = UserAccount {
            user: user.clone(),
            password_hash,
        };
        self.users.insert(&account).await.map_err(map_user_error)?;
        Ok(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome, Error> {
        let Some(account) = self
            .users
            .find_account_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &account.password_hash)
            .map_err(map_hash_error)?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self
            .tokens
            .issue(&account.user.username, self.clock.utc())
            .map_err(map_token_error)?;
        Ok(LoginOutcome {
            token,
            user: account.user,
        })
    }
}

#[async_trait]
impl<R, H, T> AccountsQuery for AccountsService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher,
    T: AccessTokenCodec,
{
    async fn is_username_available(&self, username: &Username) -> Result<bool, Error> {
        let existing = self
            .users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?;
        Ok(existing.is_none())
    }

    async fn profile(&self, username: &Username) -> Result<User, Error> {
        self.users
            .find_by_username(username)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    async fn search_users(&self, fragment: &str) -> Result<Vec<User>, Error> {
        self.users
            .search(fragment.trim())
            .await
            .map_err(map_user_error)
    }
}

impl<R, H, T> Authenticator for AccountsService<R, H, T>
where
    R: UserRepository,
    H: PasswordHasher,
    T: AccessTokenCodec,
{
    fn authenticate(&self, bearer: &str) -> Result<Username, Error> {
        self.tokens
            .verify(bearer, self.clock.utc())
            .map(|subject| subject.username)
            .map_err(map_token_error)
    }
}

#[cfg(test)]
#[path = "accounts_service_tests.rs"]
mod tests;
