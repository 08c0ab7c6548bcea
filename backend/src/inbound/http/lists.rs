//! Curated list endpoints.
//!
//! Reads go through the visibility gate: a list the caller may not see is
//! reported as missing. Writes need a bearer token; sharing settings stay
//! with the owner even on collaborative lists.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::FollowOutcome;
use crate::domain::{Error, List, ListId, ListName, ListPatch, MediaRef, NewList, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{BearerUser, OptionalBearer};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error, parse_id, parse_username};

/// One media reference inside a list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaRefDto {
    #[schema(example = "movie")]
    pub media_type: String,
    #[schema(example = "603")]
    pub media_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl TryFrom<MediaRefDto> for MediaRef {
    type Error = Error;

    fn try_from(value: MediaRefDto) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.media_type, &value.media_id, value.title, value.image_url)
            .map_err(|err| invalid_value_error(FieldName::new("items"), &value.media_id, err.to_string()))
    }
}

impl From<&MediaRef> for MediaRefDto {
    fn from(value: &MediaRef) -> Self {
        Self {
            media_type: value.media_type().as_str().to_owned(),
            media_id: value.media_id().to_owned(),
            title: value.title().map(str::to_owned),
            image_url: value.image_url().map(str::to_owned),
        }
    }
}

pub(crate) fn parse_items(items: Vec<MediaRefDto>) -> Result<Vec<MediaRef>, Error> {
    items.into_iter().map(MediaRef::try_from).collect()
}

fn parse_collaborators(names: Vec<String>) -> Result<Vec<Username>, Error> {
    let field = FieldName::new("collaborators");
    names
        .iter()
        .map(|name| parse_username(name, field))
        .collect()
}

/// Body for `POST /lists`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    #[schema(example = "Comfort films")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<MediaRefDto>,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_collaborative: bool,
    #[serde(default)]
    pub collaborators: Vec<String>,
}

impl CreateListRequest {
    fn into_new_list(self, owner: Username) -> Result<NewList, Error> {
        let name = ListName::new(self.name.unwrap_or_default())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(NewList {
            owner,
            name,
            description: self.description.unwrap_or_default().trim().to_owned(),
            items: parse_items(self.items)?,
            is_public: self.is_public,
            is_collaborative: self.is_collaborative,
            collaborators: parse_collaborators(self.collaborators)?,
        })
    }
}

/// Body for `PUT /lists/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateListRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub items: Option<Vec<MediaRefDto>>,
    pub is_public: Option<bool>,
    pub is_collaborative: Option<bool>,
    pub collaborators: Option<Vec<String>>,
}

impl TryFrom<UpdateListRequest> for ListPatch {
    type Error = Error;

    fn try_from(value: UpdateListRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value
                .name
                .map(ListName::new)
                .transpose()
                .map_err(|err| Error::invalid_request(err.to_string()))?,
            description: value.description.map(|text| text.trim().to_owned()),
            items: value.items.map(parse_items).transpose()?,
            is_public: value.is_public,
            is_collaborative: value.is_collaborative,
            collaborators: value.collaborators.map(parse_collaborators).transpose()?,
        })
    }
}

/// Wire form of a list.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    id: String,
    owner: String,
    name: String,
    description: String,
    items: Vec<MediaRefDto>,
    is_public: bool,
    is_collaborative: bool,
    collaborators: Vec<String>,
    follower_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<List> for ListResponse {
    fn from(list: List) -> Self {
        Self {
            id: list.id.to_string(),
            owner: list.owner.into(),
            name: list.name,
            description: list.description,
            items: list.items.iter().map(MediaRefDto::from).collect(),
            is_public: list.is_public,
            is_collaborative: list.is_collaborative,
            collaborators: list.collaborators.into_iter().map(String::from).collect(),
            follower_count: list.follower_count,
            created_at: list.created_at,
            updated_at: list.updated_at,
        }
    }
}

fn to_responses(lists: Vec<List>) -> Vec<ListResponse> {
    lists.into_iter().map(ListResponse::from).collect()
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    following: bool,
    follower_count: u32,
}

impl From<FollowOutcome> for FollowResponse {
    fn from(value: FollowOutcome) -> Self {
        Self {
            following: value.following,
            follower_count: value.follower_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    message: String,
}

fn list_id(raw: &str) -> Result<ListId, Error> {
    parse_id(raw, FieldName::new("id"))
}

/// Lists owned by the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/lists",
    responses(
        (status = 200, description = "Owned lists", body = [ListResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "myLists"
)]
#[get("/lists")]
pub async fn my_lists(
    state: web::Data<HttpState>,
    user: BearerUser,
) -> ApiResult<web::Json<Vec<ListResponse>>> {
    let lists = state.lists_query.owned(user.username()).await?;
    Ok(web::Json(to_responses(lists)))
}

/// Collaborative lists the caller may edit.
#[utoipa::path(
    get,
    path = "/api/v1/lists/shared",
    responses(
        (status = 200, description = "Shared lists", body = [ListResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "sharedLists"
)]
#[get("/lists/shared")]
pub async fn shared_lists(
    state: web::Data<HttpState>,
    user: BearerUser,
) -> ApiResult<web::Json<Vec<ListResponse>>> {
    let lists = state.lists_query.shared_with(user.username()).await?;
    Ok(web::Json(to_responses(lists)))
}

/// Lists the caller follows that still exist and remain readable.
#[utoipa::path(
    get,
    path = "/api/v1/lists/followed",
    responses(
        (status = 200, description = "Followed lists", body = [ListResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "followedLists"
)]
#[get("/lists/followed")]
pub async fn followed_lists(
    state: web::Data<HttpState>,
    user: BearerUser,
) -> ApiResult<web::Json<Vec<ListResponse>>> {
    let lists = state.lists_query.followed(user.username()).await?;
    Ok(web::Json(to_responses(lists)))
}

/// Lists of `username` visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/lists/user/{username}",
    params(("username" = String, Path, description = "List owner")),
    responses(
        (status = 200, description = "Visible lists", body = [ListResponse]),
        (status = 401, description = "Invalid token", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "userLists",
    security([], ("bearerAuth" = []))
)]
#[get("/lists/user/{username}")]
pub async fn user_lists(
    state: web::Data<HttpState>,
    viewer: OptionalBearer,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ListResponse>>> {
    let owner = parse_username(&path.into_inner(), FieldName::new("username"))?;
    let lists = state
        .lists_query
        .by_owner(&owner, viewer.username())
        .await?;
    Ok(web::Json(to_responses(lists)))
}

/// Read one list through the visibility gate.
#[utoipa::path(
    get,
    path = "/api/v1/lists/{id}",
    params(("id" = String, Path, description = "List identifier")),
    responses(
        (status = 200, description = "List", body = ListResponse),
        (status = 404, description = "List not found", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "getList",
    security([], ("bearerAuth" = []))
)]
#[get("/lists/{id}")]
pub async fn get_list(
    state: web::Data<HttpState>,
    viewer: OptionalBearer,
    path: web::Path<String>,
) -> ApiResult<web::Json<ListResponse>> {
    let id = list_id(&path.into_inner())?;
    let list = state.lists_query.get(&id, viewer.username()).await?;
    Ok(web::Json(list.into()))
}

/// Create a list owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/lists",
    request_body = CreateListRequest,
    responses(
        (status = 201, description = "List created", body = ListResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "createList"
)]
#[post("/lists")]
pub async fn create_list(
    state: web::Data<HttpState>,
    user: BearerUser,
    payload: web::Json<CreateListRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_new_list(user.0)?;
    let list = state.lists.create(draft).await?;
    Ok(HttpResponse::Created().json(ListResponse::from(list)))
}

/// Apply a partial update.
#[utoipa::path(
    put,
    path = "/api/v1/lists/{id}",
    params(("id" = String, Path, description = "List identifier")),
    request_body = UpdateListRequest,
    responses(
        (status = 200, description = "Updated list", body = ListResponse),
        (status = 400, description = "No data provided", body = ErrorSchema),
        (status = 403, description = "Not permitted", body = ErrorSchema),
        (status = 404, description = "List not found", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "updateList"
)]
#[put("/lists/{id}")]
pub async fn update_list(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
    payload: web::Json<UpdateListRequest>,
) -> ApiResult<web::Json<ListResponse>> {
    let id = list_id(&path.into_inner())?;
    let patch = ListPatch::try_from(payload.into_inner())?;
    let list = state.lists.update(user.username(), &id, patch).await?;
    Ok(web::Json(list.into()))
}

/// Delete a list. Owner only.
#[utoipa::path(
    delete,
    path = "/api/v1/lists/{id}",
    params(("id" = String, Path, description = "List identifier")),
    responses(
        (status = 200, description = "List deleted", body = MessageResponse),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "List not found", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "deleteList"
)]
#[delete("/lists/{id}")]
pub async fn delete_list(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = list_id(&path.into_inner())?;
    state.lists.delete(user.username(), &id).await?;
    Ok(web::Json(MessageResponse {
        message: "List deleted successfully".to_owned(),
    }))
}

/// Follow a readable list.
#[utoipa::path(
    post,
    path = "/api/v1/lists/{id}/follow",
    params(("id" = String, Path, description = "List identifier")),
    responses(
        (status = 200, description = "Now following", body = FollowResponse),
        (status = 404, description = "List not found", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "followList"
)]
#[post("/lists/{id}/follow")]
pub async fn follow_list(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<FollowResponse>> {
    let id = list_id(&path.into_inner())?;
    let outcome = state.lists.follow(user.username(), &id).await?;
    Ok(web::Json(outcome.into()))
}

/// Stop following a list.
#[utoipa::path(
    delete,
    path = "/api/v1/lists/{id}/follow",
    params(("id" = String, Path, description = "List identifier")),
    responses(
        (status = 200, description = "No longer following", body = FollowResponse),
        (status = 404, description = "List not found", body = ErrorSchema)
    ),
    tags = ["lists"],
    operation_id = "unfollowList"
)]
#[delete("/lists/{id}/follow")]
pub async fn unfollow_list(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<FollowResponse>> {
    let id = list_id(&path.into_inner())?;
    let outcome = state.lists.unfollow(user.username(), &id).await?;
    Ok(web::Json(outcome.into()))
}
