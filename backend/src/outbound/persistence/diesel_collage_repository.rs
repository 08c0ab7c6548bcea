//! PostgreSQL-backed `CollageRepository`.
//!
//! Grid tiles are stored as a JSONB array of media references, the same
//! shape list items use.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CollagePersistenceError, CollageRepository};
use crate::domain::{Collage, CollageId, ExportFormat, GridSize, MediaRef, Username};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CollageChangeset, CollageRow, NewCollageRow};
use super::pool::DbPool;
use super::schema::collages;

/// Diesel-backed implementation of the [`CollageRepository`] port.
#[derive(Clone)]
pub struct DieselCollageRepository {
    pool: DbPool,
}

impl DieselCollageRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> CollagePersistenceError {
    map_diesel_error(
        error,
        CollagePersistenceError::query,
        CollagePersistenceError::connection,
    )
}

fn encode_items(items: &[MediaRef]) -> Result<serde_json::Value, CollagePersistenceError> {
    serde_json::to_value(items).map_err(|err| {
        CollagePersistenceError::query(format!("failed to encode collage items: {err}"))
    })
}

impl TryFrom<CollageRow> for Collage {
    type Error = CollagePersistenceError;

    fn try_from(row: CollageRow) -> Result<Self, Self::Error> {
        let owner = Username::new(row.owner).map_err(|err| {
            CollagePersistenceError::query(format!("stored owner is invalid: {err}"))
        })?;
        let grid_size = row
            .grid_size
            .parse::<GridSize>()
            .map_err(|err| CollagePersistenceError::query(err.to_string()))?;
        let export_format = row
            .export_format
            .parse::<ExportFormat>()
            .map_err(|err| CollagePersistenceError::query(err.to_string()))?;
        let items: Vec<MediaRef> = serde_json::from_value(row.items).map_err(|err| {
            CollagePersistenceError::query(format!("stored collage items are unreadable: {err}"))
        })?;
        Ok(Self {
            id: CollageId::from_uuid(row.id),
            owner,
            name: row.name,
            grid_size,
            items,
            show_titles: row.show_titles,
            export_format,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn rows_to_collages(rows: Vec<CollageRow>) -> Result<Vec<Collage>, CollagePersistenceError> {
    rows.into_iter().map(Collage::try_from).collect()
}

#[async_trait]
impl CollageRepository for DieselCollageRepository {
    async fn insert(&self, collage: &Collage) -> Result<(), CollagePersistenceError> {
        let row = NewCollageRow {
            id: *collage.id.as_uuid(),
            owner: collage.owner.as_ref(),
            name: &collage.name,
            grid_size: collage.grid_size.as_str(),
            items: encode_items(&collage.items)?,
            show_titles: collage.show_titles,
            export_format: collage.export_format.as_str(),
            created_at: collage.created_at,
            updated_at: collage.updated_at,
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CollagePersistenceError::connection))?;

        diesel::insert_into(collages::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_by_id(
        &self,
        id: &CollageId,
    ) -> Result<Option<Collage>, CollagePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CollagePersistenceError::connection))?;

        let row: Option<CollageRow> = collages::table
            .find(id.as_uuid())
            .select(CollageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(Collage::try_from).transpose()
    }

    async fn list_by_owner(
        &self,
        owner: &Username,
    ) -> Result<Vec<Collage>, CollagePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CollagePersistenceError::connection))?;

        let rows: Vec<CollageRow> = collages::table
            .filter(collages::owner.eq(owner.as_ref()))
            .order((collages::created_at.asc(), collages::id.asc()))
            .select(CollageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows_to_collages(rows)
    }

    async fn update(&self, collage: &Collage) -> Result<(), CollagePersistenceError> {
        let changes = CollageChangeset {
            name: &collage.name,
            grid_size: collage.grid_size.as_str(),
            items: encode_items(&collage.items)?,
            show_titles: collage.show_titles,
            export_format: collage.export_format.as_str(),
            updated_at: collage.updated_at,
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CollagePersistenceError::connection))?;

        diesel::update(collages::table.find(collage.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn delete_owned(
        &self,
        owner: &Username,
        id: &CollageId,
    ) -> Result<bool, CollagePersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CollagePersistenceError::connection))?;

        let deleted = diesel::delete(
            collages::table
                .filter(collages::id.eq(id.as_uuid()))
                .filter(collages::owner.eq(owner.as_ref())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_error)?;
        Ok(deleted > 0)
    }

    async fn recently_updated(
        &self,
        limit: usize,
    ) -> Result<Vec<Collage>, CollagePersistenceError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CollagePersistenceError::connection))?;

        let rows: Vec<CollageRow> = collages::table
            .order((collages::updated_at.desc(), collages::id.asc()))
            .limit(limit)
            .select(CollageRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows_to_collages(rows)
    }
}
