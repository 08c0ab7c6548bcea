//! Driven ports for password hashing and bearer token signing.
//!
//! Both are synchronous: hashing is CPU-bound and token signing is pure.
use chrono::{DateTime, Utc};

use crate::domain::{AccessToken, PasswordHash, TokenSubject, Username};

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashers.
    pub enum PasswordHashError {
        /// The stored hash could not be parsed.
        Malformed { message: String } => "stored password hash is malformed: {message}",
        /// Hashing itself failed.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// One-way password hashing.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Returns `Ok(false)` on a mismatch.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}

define_port_error! {
    /// Failures raised while issuing or checking access tokens.
    pub enum TokenError {
        /// The token's expiry is in the past.
        Expired => "token expired",
        /// Signature, structure or claims were rejected.
        Invalid { message: String } => "token invalid: {message}",
        /// The token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Issues and verifies signed bearer tokens naming a user.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokenCodec: Send + Sync {
    fn issue(
        &self,
        username: &Username,
        issued_at: DateTime<Utc>,
    ) -> Result<AccessToken, TokenError>;

    /// Decode `token` and check its expiry against `now`.
    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<TokenSubject, TokenError>;
}
