//! Media log domain service.
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    MediaLogCommand, MediaLogPersistenceError, MediaLogQuery, MediaLogRepository, UserRepository,
};
use crate::domain::user_stats::adjust_user_stat;
use crate::domain::{
    Error, LogEntry, LogEntryId, MediaKind, NewLogEntry, Shelf, StatKind, Username,
};

/// Media log service implementing the shelf driving ports.
#[derive(Clone)]
pub struct MediaLogsService<M, U> {
    logs: Arc<M>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<M, U> MediaLogsService<M, U> {
    pub fn new(logs: Arc<M>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { logs, users, clock }
    }
}

fn map_log_error(error: MediaLogPersistenceError) -> Error {
    match error {
        MediaLogPersistenceError::Connection { message } => {
            Error::internal(format!("media log repository unavailable: {message}"))
        }
        MediaLogPersistenceError::Query { message } => {
            Error::internal(format!("media log repository error: {message}"))
        }
    }
}

#[async_trait]
impl<M, U> MediaLogCommand for MediaLogsService<M, U>
where
    M: MediaLogRepository,
    U: UserRepository,
{
    async fn add(&self, entry: NewLogEntry) -> Result<LogEntry, Error> {
        let entry = entry.into_entry(self.clock.utc());
        self.logs.insert(&entry).await.map_err(map_log_error)?;
        if entry.shelf == Shelf::Log {
            adjust_user_stat(self.users.as_ref(), &entry.owner, StatKind::Media, 1).await;
        }
        Ok(entry)
    }

    async fn remove(
        &self,
        owner: &Username,
        kind: MediaKind,
        shelf: Shelf,
        id: &LogEntryId,
    ) -> Result<(), Error> {
        let removed = self
            .logs
            .remove(owner, kind, shelf, id)
            .await
            .map_err(map_log_error)?;
        if !removed {
            return Err(Error::not_found("Entry not found"));
        }
        if shelf == Shelf::Log {
            adjust_user_stat(self.users.as_ref(), owner, StatKind::Media, -1).await;
        }
        Ok(())
    }
}

#[async_trait]
impl<M, U> MediaLogQuery for MediaLogsService<M, U>
where
    M: MediaLogRepository,
    U: UserRepository,
{
    async fn list(
        &self,
        owner: &Username,
        kind: MediaKind,
        shelf: Shelf,
    ) -> Result<Vec<LogEntry>, Error> {
        self.logs
            .list(owner, kind, shelf)
            .await
            .map_err(map_log_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::LogEntryDraft;
    use crate::domain::ports::{MockMediaLogRepository, MockUserRepository};
    use crate::domain::service_test_support::{fixture_clock, fixture_timestamp, user};
    use rstest::rstest;

    fn make_service(
        logs: MockMediaLogRepository,
        users: MockUserRepository,
    ) -> MediaLogsService<MockMediaLogRepository, MockUserRepository> {
        MediaLogsService::new(Arc::new(logs), Arc::new(users), fixture_clock())
    }

    fn new_entry(shelf: Shelf) -> NewLogEntry {
        NewLogEntry::try_new(
            user("listener"),
            MediaKind::Music,
            shelf,
            LogEntryDraft {
                media_id: "3135556",
                title: "Harder, Better, Faster, Stronger",
                ..LogEntryDraft::default()
            },
        )
        .expect("valid entry")
    }

    #[rstest]
    #[case::log_shelf(Shelf::Log, 1)]
    #[case::later_shelf(Shelf::Later, 0)]
    #[tokio::test]
    async fn add_counts_only_log_shelf(#[case] shelf: Shelf, #[case] stat_calls: usize) {
        let mut logs = MockMediaLogRepository::new();
        logs.expect_insert().times(1).return_once(|_| Ok(()));
        let mut users = MockUserRepository::new();
        users
            .expect_adjust_stat()
            .withf(|_, kind, delta| *kind == StatKind::Media && *delta == 1)
            .times(stat_calls)
            .returning(|_, _, _| Ok(()));
        let service = make_service(logs, users);

        let entry = service.add(new_entry(shelf)).await.expect("added");
        assert_eq!(entry.added_at, fixture_timestamp());
        assert_eq!(entry.shelf, shelf);
    }

    #[tokio::test]
    async fn remove_missing_entry_is_not_found() {
        let mut logs = MockMediaLogRepository::new();
        logs.expect_remove().return_once(|_, _, _, _| Ok(false));
        let mut users = MockUserRepository::new();
        users.expect_adjust_stat().never();
        let service = make_service(logs, users);

        let error = service
            .remove(
                &user("listener"),
                MediaKind::Music,
                Shelf::Log,
                &LogEntryId::random(),
            )
            .await
            .expect_err("missing");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), "Entry not found");
    }

    #[tokio::test]
    async fn stat_failures_do_not_fail_the_request() {
        let mut logs = MockMediaLogRepository::new();
        logs.expect_remove().return_once(|_, _, _, _| Ok(true));
        let mut users = MockUserRepository::new();
        users.expect_adjust_stat().return_once(|_, _, _| {
            Err(crate::domain::ports::UserPersistenceError::connection("down"))
        });
        let service = make_service(logs, users);

        service
            .remove(
                &user("listener"),
                MediaKind::Music,
                Shelf::Log,
                &LogEntryId::random(),
            )
            .await
            .expect("removed despite counter failure");
    }
}
