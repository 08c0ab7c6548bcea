//! PostgreSQL-backed `ListRepository`.
//!
//! List items are stored as a JSONB array of media references; collaborators
//! as a text array of usernames.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ListPersistenceError, ListRepository};
use crate::domain::{List, ListId, ListPatch, MediaRef, Username};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{ListChangeset, ListRow, NewListRow};
use super::pool::DbPool;
use super::schema::lists;
use super::sql_functions::greatest;

/// Diesel-backed implementation of the [`ListRepository`] port.
#[derive(Clone)]
pub struct DieselListRepository {
    pool: DbPool,
}

impl DieselListRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> ListPersistenceError {
    map_diesel_error(
        error,
        ListPersistenceError::query,
        ListPersistenceError::connection,
    )
}

fn encode_items(items: &[MediaRef]) -> Result<serde_json::Value, ListPersistenceError> {
    serde_json::to_value(items)
        .map_err(|err| ListPersistenceError::query(format!("failed to encode list items: {err}")))
}

fn usernames(collaborators: &[Username]) -> Vec<&str> {
    collaborators.iter().map(AsRef::as_ref).collect()
}

impl TryFrom<ListRow> for List {
    type Error = ListPersistenceError;

    fn try_from(row: ListRow) -> Result<Self, Self::Error> {
        let owner = Username::new(row.owner)
            .map_err(|err| ListPersistenceError::query(format!("stored owner is invalid: {err}")))?;
        let items: Vec<MediaRef> = serde_json::from_value(row.items).map_err(|err| {
            ListPersistenceError::query(format!("stored list items are unreadable: {err}"))
        })?;
        let collaborators = row
            .collaborators
            .into_iter()
            .map(Username::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                ListPersistenceError::query(format!("stored collaborator is invalid: {err}"))
            })?;
        Ok(Self {
            id: ListId::from_uuid(row.id),
            owner,
            name: row.name,
            description: row.description,
            items,
            is_public: row.is_public,
            is_collaborative: row.is_collaborative,
            collaborators,
            follower_count: u32::try_from(row.follower_count).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn rows_to_lists(rows: Vec<ListRow>) -> Result<Vec<List>, ListPersistenceError> {
    rows.into_iter().map(List::try_from).collect()
}

#[async_trait]
impl ListRepository for DieselListRepository {
    async fn insert(&self, list: &List) -> Result<(), ListPersistenceError> {
        let row = NewListRow {
            id: *list.id.as_uuid(),
            owner: list.owner.as_ref(),
            name: &list.name,
            description: &list.description,
            items: encode_items(&list.items)?,
            is_public: list.is_public,
            is_collaborative: list.is_collaborative,
            collaborators: usernames(&list.collaborators),
            follower_count: i32::try_from(list.follower_count).unwrap_or(i32::MAX),
            created_at: list.created_at,
            updated_at: list.updated_at,
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ListPersistenceError::connection))?;

        diesel::insert_into(lists::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_by_id(&self, id: &ListId) -> Result<Option<List>, ListPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ListPersistenceError::connection))?;

        let row: Option<ListRow> = lists::table
            .find(id.as_uuid())
            .select(ListRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(List::try_from).transpose()
    }

    async fn list_by_owner(&self, owner: &Username) -> Result<Vec<List>, ListPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ListPersistenceError::connection))?;

        let rows = lists::table
            .filter(lists::owner.eq(owner.as_ref()))
            .order(lists::created_at.desc())
            .select(ListRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows_to_lists(rows)
    }

    async fn list_shared_with(
        &self,
        collaborator: &Username,
    ) -> Result<Vec<List>, ListPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ListPersistenceError::connection))?;

        let rows = lists::table
            .filter(lists::is_collaborative.eq(true))
            .filter(lists::collaborators.contains(vec![collaborator.as_ref().to_owned()]))
            .order(lists::created_at.desc())
            .select(ListRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows_to_lists(rows)
    }

    async fn find_many(&self, ids: &[ListId]) -> Result<Vec<List>, ListPersistenceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ListPersistenceError::connection))?;

        let rows = lists::table
            .filter(lists::id.eq_any(uuids))
            .select(ListRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows_to_lists(rows)
    }

    async fn update(
        &self,
        id: &ListId,
        patch: &ListPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<List>, ListPersistenceError> {
        let changes = ListChangeset {
            name: patch.name.as_ref().map(AsRef::as_ref),
            description: patch.description.as_deref(),
            items: patch.items.as_deref().map(encode_items).transpose()?,
            is_public: patch.is_public,
            is_collaborative: patch.is_collaborative,
            collaborators: patch.collaborators.as_deref().map(usernames),
            updated_at,
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ListPersistenceError::connection))?;

        let row: Option<ListRow> = diesel::update(lists::table.find(id.as_uuid()))
            .set(&changes)
            .returning(ListRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(List::try_from).transpose()
    }

    async fn delete(&self, id: &ListId) -> Result<bool, ListPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ListPersistenceError::connection))?;

        let deleted = diesel::delete(lists::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(deleted > 0)
    }

    async fn adjust_follower_count(
        &self,
        id: &ListId,
        delta: i32,
    ) -> Result<Option<u32>, ListPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ListPersistenceError::connection))?;

        let count: Option<i32> = diesel::update(lists::table.find(id.as_uuid()))
            .set(lists::follower_count.eq(greatest(lists::follower_count + delta, 0)))
            .returning(lists::follower_count)
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        Ok(count.map(|value| u32::try_from(value).unwrap_or_default()))
    }
}
