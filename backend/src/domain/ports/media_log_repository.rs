//! Driven port for personal media shelves.
use async_trait::async_trait;

use crate::domain::{LogEntry, LogEntryId, MediaKind, Shelf, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by media log adapters.
    pub enum MediaLogPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "media log repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "media log repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaLogRepository: Send + Sync {
    async fn insert(&self, entry: &LogEntry) -> Result<(), MediaLogPersistenceError>;

    /// Entries on one shelf in insertion order.
    async fn list(
        &self,
        owner: &Username,
        kind: MediaKind,
        shelf: Shelf,
    ) -> Result<Vec<LogEntry>, MediaLogPersistenceError>;

    /// Remove an entry from the owner's shelf. Returns `false` when no entry
    /// matched.
    async fn remove(
        &self,
        owner: &Username,
        kind: MediaKind,
        shelf: Shelf,
        id: &LogEntryId,
    ) -> Result<bool, MediaLogPersistenceError>;
}
