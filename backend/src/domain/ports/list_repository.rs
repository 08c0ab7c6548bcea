//! Driven port for list storage.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{List, ListId, ListPatch, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by list repository adapters.
    pub enum ListPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "list repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "list repository query failed: {message}",
    }
}

/// Storage for user-curated lists.
///
/// Listing methods return the newest lists first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListRepository: Send + Sync {
    async fn insert(&self, list: &List) -> Result<(), ListPersistenceError>;

    async fn find_by_id(&self, id: &ListId) -> Result<Option<List>, ListPersistenceError>;

    /// Lists owned by `owner`.
    async fn list_by_owner(&self, owner: &Username) -> Result<Vec<List>, ListPersistenceError>;

    /// Collaborative lists naming `collaborator`.
    async fn list_shared_with(
        &self,
        collaborator: &Username,
    ) -> Result<Vec<List>, ListPersistenceError>;

    /// Fetch the subset of `ids` that still exist.
    async fn find_many(&self, ids: &[ListId]) -> Result<Vec<List>, ListPersistenceError>;

    /// Apply the present fields of `patch`. Returns `None` when the list is
    /// gone.
    async fn update(
        &self,
        id: &ListId,
        patch: &ListPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<List>, ListPersistenceError>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: &ListId) -> Result<bool, ListPersistenceError>;

    /// Add `delta` to the follower counter, saturating at zero. Returns the
    /// new count, or `None` when the list is gone.
    async fn adjust_follower_count(
        &self,
        id: &ListId,
        delta: i32,
    ) -> Result<Option<u32>, ListPersistenceError>;
}
