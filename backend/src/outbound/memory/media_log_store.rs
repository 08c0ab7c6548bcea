use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{MediaLogPersistenceError, MediaLogRepository};
use crate::domain::{LogEntry, LogEntryId, MediaKind, Shelf, Username};

use super::lock;

/// In-memory [`MediaLogRepository`]. Entries keep insertion order.
#[derive(Default)]
pub struct InMemoryMediaLogRepository {
    entries: Mutex<Vec<LogEntry>>,
}

impl InMemoryMediaLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn on_shelf(entry: &LogEntry, owner: &Username, kind: MediaKind, shelf: Shelf) -> bool {
    &entry.owner == owner && entry.kind == kind && entry.shelf == shelf
}

#[async_trait]
impl MediaLogRepository for InMemoryMediaLogRepository {
    async fn insert(&self, entry: &LogEntry) -> Result<(), MediaLogPersistenceError> {
        lock(&self.entries).push(entry.clone());
        Ok(())
    }

    async fn list(
        &self,
        owner: &Username,
        kind: MediaKind,
        shelf: Shelf,
    ) -> Result<Vec<LogEntry>, MediaLogPersistenceError> {
        Ok(lock(&self.entries)
            .iter()
            .filter(|entry| on_shelf(entry, owner, kind, shelf))
            .cloned()
            .collect())
    }

    async fn remove(
        &self,
        owner: &Username,
        kind: MediaKind,
        shelf: Shelf,
        id: &LogEntryId,
    ) -> Result<bool, MediaLogPersistenceError> {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|entry| !(&entry.id == id && on_shelf(entry, owner, kind, shelf)));
        Ok(entries.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LogEntryDraft, NewLogEntry};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn name(raw: &str) -> Username {
        Username::new(raw).expect("username")
    }

    fn entry(media_id: &str, shelf: Shelf) -> LogEntry {
        NewLogEntry::try_new(
            name("reader"),
            MediaKind::Book,
            shelf,
            LogEntryDraft {
                media_id,
                title: "Dune",
                ..LogEntryDraft::default()
            },
        )
        .expect("entry")
        .into_entry(
            Utc.with_ymd_and_hms(2026, 7, 1, 9, 0, 0)
                .single()
                .expect("timestamp"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn shelves_are_kept_apart_in_insertion_order() {
        let store = InMemoryMediaLogRepository::new();
        for (id, shelf) in [("b", Shelf::Log), ("a", Shelf::Log), ("c", Shelf::Later)] {
            store.insert(&entry(id, shelf)).await.expect("insert");
        }

        let logged = store
            .list(&name("reader"), MediaKind::Book, Shelf::Log)
            .await
            .expect("list");
        let ids: Vec<&str> = logged.iter().map(|entry| entry.media_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[rstest]
    #[tokio::test]
    async fn remove_requires_matching_shelf() {
        let store = InMemoryMediaLogRepository::new();
        let stored = entry("a", Shelf::Later);
        store.insert(&stored).await.expect("insert");

        let wrong_shelf = store
            .remove(&name("reader"), MediaKind::Book, Shelf::Log, &stored.id)
            .await
            .expect("remove");
        assert!(!wrong_shelf);
        let removed = store
            .remove(&name("reader"), MediaKind::Book, Shelf::Later, &stored.id)
            .await
            .expect("remove");
        assert!(removed);
    }
}
