//! Driving ports for personal media shelves.

use async_trait::async_trait;

use crate::domain::{Error, LogEntry, LogEntryId, MediaKind, NewLogEntry, Shelf, Username};

#[async_trait]
pub trait MediaLogCommand: Send + Sync {
    async fn add(&self, entry: NewLogEntry) -> Result<LogEntry, Error>;

    async fn remove(
        &self,
        owner: &Username,
        kind: MediaKind,
        shelf: Shelf,
        id: &LogEntryId,
    ) -> Result<(), Error>;
}

#[async_trait]
pub trait MediaLogQuery: Send + Sync {
    async fn list(
        &self,
        owner: &Username,
        kind: MediaKind,
        shelf: Shelf,
    ) -> Result<Vec<LogEntry>, Error>;
}
