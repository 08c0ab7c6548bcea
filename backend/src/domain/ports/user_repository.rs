//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{ListId, StatKind, User, UserAccount, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique constraint on username or email was violated.
        Duplicate { field: String } => "a user with this {field} already exists",
    }
}

/// Storage for registered users and their denormalised counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account. Fails with `Duplicate` when the username or
    /// email is taken.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError>;

    /// Fetch a user by handle.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and stored credential by normalised email.
    async fn find_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// Users whose handle contains `fragment`, case-insensitively, ordered
    /// by username. A blank fragment matches everyone.
    async fn search(&self, fragment: &str) -> Result<Vec<User>, UserPersistenceError>;

    /// Add `delta` to one activity counter, saturating at zero.
    async fn adjust_stat(
        &self,
        username: &Username,
        kind: StatKind,
        delta: i32,
    ) -> Result<(), UserPersistenceError>;

    /// Add `list_id` to the user's followed set. Adding twice is a no-op.
    async fn add_followed_list(
        &self,
        username: &Username,
        list_id: &ListId,
    ) -> Result<(), UserPersistenceError>;

    /// Remove `list_id` from the user's followed set.
    async fn remove_followed_list(
        &self,
        username: &Username,
        list_id: &ListId,
    ) -> Result<(), UserPersistenceError>;
}
