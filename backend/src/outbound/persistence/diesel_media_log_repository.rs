//! PostgreSQL-backed `MediaLogRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MediaLogPersistenceError, MediaLogRepository};
use crate::domain::{LOG_RATING_MAX, LogEntry, LogEntryId, MediaKind, Shelf, Username};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MediaLogRow, NewMediaLogRow};
use super::pool::DbPool;
use super::schema::media_log_entries;

/// Diesel-backed implementation of the [`MediaLogRepository`] port.
#[derive(Clone)]
pub struct DieselMediaLogRepository {
    pool: DbPool,
}

impl DieselMediaLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> MediaLogPersistenceError {
    map_diesel_error(
        error,
        MediaLogPersistenceError::query,
        MediaLogPersistenceError::connection,
    )
}

impl TryFrom<MediaLogRow> for LogEntry {
    type Error = MediaLogPersistenceError;

    fn try_from(row: MediaLogRow) -> Result<Self, Self::Error> {
        let owner = Username::new(row.owner).map_err(|err| {
            MediaLogPersistenceError::query(format!("stored owner is invalid: {err}"))
        })?;
        let kind = row
            .media_type
            .parse::<MediaKind>()
            .map_err(|err| MediaLogPersistenceError::query(err.to_string()))?;
        let shelf = row
            .shelf
            .parse::<Shelf>()
            .map_err(MediaLogPersistenceError::query)?;
        let rating = row
            .rating
            .map(|value| {
                u8::try_from(value)
                    .ok()
                    .filter(|score| *score <= LOG_RATING_MAX)
                    .ok_or_else(|| {
                        MediaLogPersistenceError::query(format!("stored rating {value} out of range"))
                    })
            })
            .transpose()?;
        Ok(Self {
            id: LogEntryId::from_uuid(row.id),
            owner,
            kind,
            shelf,
            media_id: row.media_id,
            title: row.title,
            image_url: row.image_url,
            consumed_on: row.consumed_on,
            rating,
            tags: row.tags,
            added_at: row.added_at,
        })
    }
}

#[async_trait]
impl MediaLogRepository for DieselMediaLogRepository {
    async fn insert(&self, entry: &LogEntry) -> Result<(), MediaLogPersistenceError> {
        let row = NewMediaLogRow {
            id: *entry.id.as_uuid(),
            owner: entry.owner.as_ref(),
            media_type: entry.kind.as_str(),
            shelf: entry.shelf.as_str(),
            media_id: &entry.media_id,
            title: &entry.title,
            image_url: entry.image_url.as_deref(),
            consumed_on: entry.consumed_on,
            rating: entry.rating.map(i16::from),
            tags: &entry.tags,
            added_at: entry.added_at,
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MediaLogPersistenceError::connection))?;

        diesel::insert_into(media_log_entries::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn list(
        &self,
        owner: &Username,
        kind: MediaKind,
        shelf: Shelf,
    ) -> Result<Vec<LogEntry>, MediaLogPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MediaLogPersistenceError::connection))?;

        let rows: Vec<MediaLogRow> = media_log_entries::table
            .filter(media_log_entries::owner.eq(owner.as_ref()))
            .filter(media_log_entries::media_type.eq(kind.as_str()))
            .filter(media_log_entries::shelf.eq(shelf.as_str()))
            .order((media_log_entries::added_at.asc(), media_log_entries::id.asc()))
            .select(MediaLogRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter().map(LogEntry::try_from).collect()
    }

    async fn remove(
        &self,
        owner: &Username,
        kind: MediaKind,
        shelf: Shelf,
        id: &LogEntryId,
    ) -> Result<bool, MediaLogPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, MediaLogPersistenceError::connection))?;

        let removed = diesel::delete(
            media_log_entries::table
                .filter(media_log_entries::id.eq(id.as_uuid()))
                .filter(media_log_entries::owner.eq(owner.as_ref()))
                .filter(media_log_entries::media_type.eq(kind.as_str()))
                .filter(media_log_entries::shelf.eq(shelf.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_error)?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    #[fixture]
    fn row() -> MediaLogRow {
        MediaLogRow {
            id: Uuid::from_u128(5),
            owner: "reader".into(),
            media_type: "book".into(),
            shelf: "later".into(),
            media_id: "OL893415W".into(),
            title: "Dune".into(),
            image_url: None,
            consumed_on: NaiveDate::from_ymd_opt(2026, 2, 14),
            rating: Some(8),
            tags: vec!["sci-fi".into()],
            added_at: Utc
                .with_ymd_and_hms(2026, 2, 15, 8, 0, 0)
                .single()
                .expect("timestamp"),
        }
    }

    #[rstest]
    fn row_maps_to_entry(row: MediaLogRow) {
        let entry = LogEntry::try_from(row).expect("valid row");
        assert_eq!(entry.kind, MediaKind::Book);
        assert_eq!(entry.shelf, Shelf::Later);
        assert_eq!(entry.rating, Some(8));
        assert_eq!(entry.tags, vec!["sci-fi".to_owned()]);
    }

    #[rstest]
    #[case(Some(11))]
    #[case(Some(-1))]
    fn out_of_range_rating_is_rejected(mut row: MediaLogRow, #[case] rating: Option<i16>) {
        row.rating = rating;
        assert!(LogEntry::try_from(row).is_err());
    }

    #[rstest]
    fn unknown_shelf_is_rejected(mut row: MediaLogRow) {
        row.shelf = "dropped".into();
        let error = LogEntry::try_from(row).expect_err("unknown shelf");
        assert!(matches!(error, MediaLogPersistenceError::Query { .. }));
    }
}
