//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live in the
//! repository modules so that each can map bad rows onto its own error.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{collages, lists, media_log_entries, reviews, users};

// ---------------------------------------------------------------------------
// User models
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile_picture: Option<String>,
    pub stat_lists: i32,
    pub stat_reviews: i32,
    pub stat_media: i32,
    pub followed_lists: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub profile_picture: Option<&'a str>,
    pub followed_lists: &'a [Uuid],
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// List models
// ---------------------------------------------------------------------------

/// Row struct for reading from the lists table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = lists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ListRow {
    pub id: Uuid,
    pub owner: String,
    pub name: String,
    pub description: String,
    pub items: serde_json::Value,
    pub is_public: bool,
    pub is_collaborative: bool,
    pub collaborators: Vec<String>,
    pub follower_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new list records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = lists)]
pub(crate) struct NewListRow<'a> {
    pub id: Uuid,
    pub owner: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub items: serde_json::Value,
    pub is_public: bool,
    pub is_collaborative: bool,
    pub collaborators: Vec<&'a str>,
    pub follower_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a list. `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = lists)]
pub(crate) struct ListChangeset<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub items: Option<serde_json::Value>,
    pub is_public: Option<bool>,
    pub is_collaborative: Option<bool>,
    pub collaborators: Option<Vec<&'a str>>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Review models
// ---------------------------------------------------------------------------

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub author: String,
    pub media_type: String,
    pub media_id: String,
    pub media_title: String,
    pub title: String,
    pub content: String,
    pub rating: i16,
    pub comments: serde_json::Value,
    pub likes: Vec<String>,
    pub dislikes: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new review records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub author: &'a str,
    pub media_type: &'a str,
    pub media_id: &'a str,
    pub media_title: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub rating: i16,
    pub comments: serde_json::Value,
    pub likes: Vec<&'a str>,
    pub dislikes: Vec<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Media log models
// ---------------------------------------------------------------------------

/// Row struct for reading from the media_log_entries table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = media_log_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MediaLogRow {
    pub id: Uuid,
    pub owner: String,
    pub media_type: String,
    pub shelf: String,
    pub media_id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub consumed_on: Option<NaiveDate>,
    pub rating: Option<i16>,
    pub tags: Vec<String>,
    pub added_at: DateTime<Utc>,
}

/// Insertable struct for creating new media log records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = media_log_entries)]
pub(crate) struct NewMediaLogRow<'a> {
    pub id: Uuid,
    pub owner: &'a str,
    pub media_type: &'a str,
    pub shelf: &'a str,
    pub media_id: &'a str,
    pub title: &'a str,
    pub image_url: Option<&'a str>,
    pub consumed_on: Option<NaiveDate>,
    pub rating: Option<i16>,
    pub tags: &'a [String],
    pub added_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Collage models
// ---------------------------------------------------------------------------

/// Row struct for reading from the collages table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = collages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CollageRow {
    pub id: Uuid,
    pub owner: String,
    pub name: String,
    pub grid_size: String,
    pub items: serde_json::Value,
    pub show_titles: bool,
    pub export_format: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new collage records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = collages)]
pub(crate) struct NewCollageRow<'a> {
    pub id: Uuid,
    pub owner: &'a str,
    pub name: &'a str,
    pub grid_size: &'a str,
    pub items: serde_json::Value,
    pub show_titles: bool,
    pub export_format: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full layout replacement for a collage.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = collages)]
pub(crate) struct CollageChangeset<'a> {
    pub name: &'a str,
    pub grid_size: &'a str,
    pub items: serde_json::Value,
    pub show_titles: bool,
    pub export_format: &'a str,
    pub updated_at: DateTime<Utc>,
}
