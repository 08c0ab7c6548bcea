//! Personal shelves: `/logs/{kind}/{shelf}`.
//!
//! The owner is always the bearer of the token; there is no way to read or
//! write another user's shelves.

use actix_web::{HttpResponse, delete, get, post, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, LogEntry, LogEntryDraft, LogEntryId, MediaKind, NewLogEntry, Shelf};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, parse_media_kind, parse_shelf};

/// Body for `POST /logs/{kind}/{shelf}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AddLogEntryRequest {
    #[schema(example = "603")]
    pub media_id: String,
    #[schema(example = "The Matrix")]
    pub title: String,
    pub image_url: Option<String>,
    /// `YYYY-MM-DD`; ignored on the `later` shelf.
    #[schema(example = "2024-03-31")]
    pub consumed_on: Option<String>,
    /// 0 to 10; ignored on the `later` shelf.
    pub rating: Option<i64>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryResponse {
    id: String,
    media_type: String,
    shelf: String,
    media_id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    consumed_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<u8>,
    tags: Vec<String>,
    added_at: DateTime<Utc>,
}

impl From<LogEntry> for LogEntryResponse {
    fn from(entry: LogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            media_type: entry.kind.as_str().to_owned(),
            shelf: entry.shelf.as_str().to_owned(),
            media_id: entry.media_id,
            title: entry.title,
            image_url: entry.image_url,
            consumed_on: entry.consumed_on,
            rating: entry.rating,
            tags: entry.tags,
            added_at: entry.added_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EntryRemovedResponse {
    message: String,
}

fn shelf_path(kind: &str, shelf: &str) -> Result<(MediaKind, Shelf), Error> {
    Ok((
        parse_media_kind(kind, FieldName::new("kind"))?,
        parse_shelf(shelf, FieldName::new("shelf"))?,
    ))
}

/// Entries on one shelf in insertion order.
#[utoipa::path(
    get,
    path = "/api/v1/logs/{kind}/{shelf}",
    params(
        ("kind" = String, Path, description = "movie, tv, book or music"),
        ("shelf" = String, Path, description = "log or later")
    ),
    responses(
        (status = 200, description = "Shelf contents", body = [LogEntryResponse]),
        (status = 400, description = "Unknown kind or shelf", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["logs"],
    operation_id = "listShelf"
)]
#[get("/logs/{kind}/{shelf}")]
pub async fn list_shelf(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<Vec<LogEntryResponse>>> {
    let (kind, shelf) = path.into_inner();
    let (kind, shelf) = shelf_path(&kind, &shelf)?;
    let entries = state
        .media_logs_query
        .list(user.username(), kind, shelf)
        .await?;
    Ok(web::Json(
        entries.into_iter().map(LogEntryResponse::from).collect(),
    ))
}

/// Add an entry to a shelf.
#[utoipa::path(
    post,
    path = "/api/v1/logs/{kind}/{shelf}",
    params(
        ("kind" = String, Path, description = "movie, tv, book or music"),
        ("shelf" = String, Path, description = "log or later")
    ),
    request_body = AddLogEntryRequest,
    responses(
        (status = 201, description = "Entry added", body = LogEntryResponse),
        (status = 400, description = "Invalid entry", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["logs"],
    operation_id = "addToShelf"
)]
#[post("/logs/{kind}/{shelf}")]
pub async fn add_to_shelf(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<(String, String)>,
    payload: web::Json<AddLogEntryRequest>,
) -> ApiResult<HttpResponse> {
    let (kind, shelf) = path.into_inner();
    let (kind, shelf) = shelf_path(&kind, &shelf)?;
    let body = payload.into_inner();
    let draft = LogEntryDraft {
        media_id: &body.media_id,
        title: &body.title,
        image_url: body.image_url.as_deref(),
        consumed_on: body.consumed_on.as_deref(),
        rating: body.rating,
        tags: body.tags,
    };
    let entry = NewLogEntry::try_new(user.0, kind, shelf, draft)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let stored = state.media_logs.add(entry).await?;
    Ok(HttpResponse::Created().json(LogEntryResponse::from(stored)))
}

/// Remove one entry.
#[utoipa::path(
    delete,
    path = "/api/v1/logs/{kind}/{shelf}/{entryId}",
    params(
        ("kind" = String, Path, description = "movie, tv, book or music"),
        ("shelf" = String, Path, description = "log or later"),
        ("entryId" = String, Path, description = "Entry identifier")
    ),
    responses(
        (status = 200, description = "Entry removed", body = EntryRemovedResponse),
        (status = 404, description = "Entry not found", body = ErrorSchema)
    ),
    tags = ["logs"],
    operation_id = "removeFromShelf"
)]
#[delete("/logs/{kind}/{shelf}/{entry_id}")]
pub async fn remove_from_shelf(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<(String, String, String)>,
) -> ApiResult<web::Json<EntryRemovedResponse>> {
    let (kind, shelf, raw_id) = path.into_inner();
    let (kind, shelf) = shelf_path(&kind, &shelf)?;
    let id: LogEntryId = parse_id(&raw_id, FieldName::new("entryId"))?;
    state
        .media_logs
        .remove(user.username(), kind, shelf, &id)
        .await?;
    Ok(web::Json(EntryRemovedResponse {
        message: "Entry removed".to_owned(),
    }))
}
