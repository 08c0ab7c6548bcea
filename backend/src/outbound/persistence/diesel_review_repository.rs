//! PostgreSQL-backed `ReviewRepository`.
//!
//! Comments and replies live in a JSONB column on the review row. Appends
//! are single `UPDATE` statements so concurrent comments are not lost.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Jsonb, Text, Timestamptz, Uuid as SqlUuid};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewPersistenceError, ReviewRepository};
use crate::domain::{
    Comment, CommentId, MediaKind, Rating, Reply, Review, ReviewId, Username,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewReviewRow, ReviewRow};
use super::pool::DbPool;
use super::schema::reviews;

const PUSH_COMMENT_SQL: &str = r"
UPDATE reviews
SET comments = comments || jsonb_build_array($2::jsonb),
    updated_at = $3
WHERE id = $1
";

const PUSH_REPLY_SQL: &str = r"
UPDATE reviews
SET comments = (
        SELECT COALESCE(
            jsonb_agg(
                CASE WHEN entry.elem ->> 'id' = $2
                    THEN jsonb_set(
                        entry.elem,
                        '{replies}',
                        COALESCE(entry.elem -> 'replies', '[]'::jsonb) || jsonb_build_array($3::jsonb)
                    )
                    ELSE entry.elem
                END
                ORDER BY entry.position
            ),
            '[]'::jsonb
        )
        FROM jsonb_array_elements(reviews.comments) WITH ORDINALITY AS entry(elem, position)
    ),
    updated_at = $4
WHERE id = $1
  AND EXISTS (
        SELECT 1
        FROM jsonb_array_elements(reviews.comments) AS existing(elem)
        WHERE existing.elem ->> 'id' = $2
  )
";

/// Diesel-backed implementation of the [`ReviewRepository`] port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> ReviewPersistenceError {
    map_diesel_error(
        error,
        ReviewPersistenceError::query,
        ReviewPersistenceError::connection,
    )
}

fn encode<T: serde::Serialize + ?Sized>(
    value: &T,
    what: &str,
) -> Result<serde_json::Value, ReviewPersistenceError> {
    serde_json::to_value(value)
        .map_err(|err| ReviewPersistenceError::query(format!("failed to encode {what}: {err}")))
}

fn stored_username(raw: String) -> Result<Username, ReviewPersistenceError> {
    Username::new(raw)
        .map_err(|err| ReviewPersistenceError::query(format!("stored username is invalid: {err}")))
}

fn stored_usernames(raw: Vec<String>) -> Result<BTreeSet<Username>, ReviewPersistenceError> {
    raw.into_iter().map(stored_username).collect()
}

impl TryFrom<ReviewRow> for Review {
    type Error = ReviewPersistenceError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let media_type = row
            .media_type
            .parse::<MediaKind>()
            .map_err(|err| ReviewPersistenceError::query(err.to_string()))?;
        let rating = Rating::new(i64::from(row.rating))
            .map_err(|err| ReviewPersistenceError::query(format!("stored rating: {err}")))?;
        let comments: Vec<Comment> = serde_json::from_value(row.comments).map_err(|err| {
            ReviewPersistenceError::query(format!("stored comments are unreadable: {err}"))
        })?;
        Ok(Self {
            id: ReviewId::from_uuid(row.id),
            author: stored_username(row.author)?,
            media_type,
            media_id: row.media_id,
            media_title: row.media_title,
            title: row.title,
            content: row.content,
            rating,
            comments,
            likes: stored_usernames(row.likes)?,
            dislikes: stored_usernames(row.dislikes)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn rows_to_reviews(rows: Vec<ReviewRow>) -> Result<Vec<Review>, ReviewPersistenceError> {
    rows.into_iter().map(Review::try_from).collect()
}

fn names(set: &BTreeSet<Username>) -> Vec<&str> {
    set.iter().map(AsRef::as_ref).collect()
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), ReviewPersistenceError> {
        let row = NewReviewRow {
            id: *review.id.as_uuid(),
            author: review.author.as_ref(),
            media_type: review.media_type.as_str(),
            media_id: &review.media_id,
            media_title: &review.media_title,
            title: &review.title,
            content: &review.content,
            rating: i16::from(review.rating.value()),
            comments: encode(&review.comments, "comments")?,
            likes: names(&review.likes),
            dislikes: names(&review.dislikes),
            created_at: review.created_at,
            updated_at: review.updated_at,
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewPersistenceError::connection))?;

        diesel::insert_into(reviews::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewPersistenceError::connection))?;

        let row: Option<ReviewRow> = reviews::table
            .find(id.as_uuid())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(Review::try_from).transpose()
    }

    async fn exists_for(
        &self,
        author: &Username,
        media_type: MediaKind,
        media_id: &str,
    ) -> Result<bool, ReviewPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewPersistenceError::connection))?;

        diesel::select(exists(
            reviews::table
                .filter(reviews::author.eq(author.as_ref()))
                .filter(reviews::media_type.eq(media_type.as_str()))
                .filter(reviews::media_id.eq(media_id)),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_error)
    }

    async fn list_for_media(
        &self,
        media_type: MediaKind,
        media_id: &str,
    ) -> Result<Vec<Review>, ReviewPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewPersistenceError::connection))?;

        let rows = reviews::table
            .filter(reviews::media_type.eq(media_type.as_str()))
            .filter(reviews::media_id.eq(media_id))
            .order(reviews::created_at.desc())
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows_to_reviews(rows)
    }

    async fn list_by_author(
        &self,
        author: &Username,
    ) -> Result<Vec<Review>, ReviewPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewPersistenceError::connection))?;

        let rows = reviews::table
            .filter(reviews::author.eq(author.as_ref()))
            .order(reviews::created_at.desc())
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows_to_reviews(rows)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Review>, ReviewPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewPersistenceError::connection))?;

        let rows = reviews::table
            .order(reviews::created_at.desc())
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .select(ReviewRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows_to_reviews(rows)
    }

    async fn push_comment(
        &self,
        id: &ReviewId,
        comment: &Comment,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ReviewPersistenceError> {
        let payload = encode(comment, "comment")?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewPersistenceError::connection))?;

        let updated = sql_query(PUSH_COMMENT_SQL)
            .bind::<SqlUuid, _>(id.as_uuid())
            .bind::<Jsonb, _>(&payload)
            .bind::<Timestamptz, _>(updated_at)
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(updated > 0)
    }

    async fn push_reply(
        &self,
        id: &ReviewId,
        comment_id: &CommentId,
        reply: &Reply,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, ReviewPersistenceError> {
        let payload = encode(reply, "reply")?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewPersistenceError::connection))?;

        let updated = sql_query(PUSH_REPLY_SQL)
            .bind::<SqlUuid, _>(id.as_uuid())
            .bind::<Text, _>(comment_id.to_string())
            .bind::<Jsonb, _>(&payload)
            .bind::<Timestamptz, _>(updated_at)
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(updated > 0)
    }

    async fn set_reactions(
        &self,
        id: &ReviewId,
        likes: &BTreeSet<Username>,
        dislikes: &BTreeSet<Username>,
    ) -> Result<bool, ReviewPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewPersistenceError::connection))?;

        let updated = diesel::update(reviews::table.find(id.as_uuid()))
            .set((
                reviews::likes.eq(names(likes)),
                reviews::dislikes.eq(names(dislikes)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ReviewPersistenceError::connection))?;

        let deleted = diesel::delete(reviews::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(deleted > 0)
    }
}
