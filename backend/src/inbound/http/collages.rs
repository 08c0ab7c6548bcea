//! Poster collage endpoints.
//!
//! Anyone may browse collages. Saving, editing and deleting need a bearer
//! token, and only the owner may change a collage.

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Collage, CollageDraft, CollageId, CollageLayout, Error, trending_limit,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::BearerUser;
use crate::inbound::http::lists::{MediaRefDto, parse_items};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_fields_error, parse_id, parse_username,
};

/// Body for `POST /collages` and `PUT /collages/{id}`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CollageRequest {
    #[schema(example = "Best of 1999")]
    pub name: String,
    /// `3x3`, `4x4` or `5x5`.
    #[schema(example = "3x3")]
    pub grid_size: String,
    pub items: Vec<MediaRefDto>,
    pub show_titles: bool,
    /// `png` (default) or `jpeg`.
    pub export_format: Option<String>,
}

impl CollageRequest {
    fn into_layout(self) -> Result<CollageLayout, Error> {
        let items = parse_items(self.items)?;
        CollageLayout::try_new(CollageDraft {
            name: &self.name,
            grid_size: &self.grid_size,
            items,
            show_titles: self.show_titles,
            export_format: self.export_format.as_deref(),
        })
        .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollageResponse {
    id: String,
    username: String,
    name: String,
    grid_size: String,
    items: Vec<MediaRefDto>,
    show_titles: bool,
    export_format: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Collage> for CollageResponse {
    fn from(collage: Collage) -> Self {
        Self {
            id: collage.id.to_string(),
            username: collage.owner.into(),
            name: collage.name,
            grid_size: collage.grid_size.as_str().to_owned(),
            items: collage.items.iter().map(MediaRefDto::from).collect(),
            show_titles: collage.show_titles,
            export_format: collage.export_format.as_str().to_owned(),
            created_at: collage.created_at,
            updated_at: collage.updated_at,
        }
    }
}

fn to_responses(collages: Vec<Collage>) -> Vec<CollageResponse> {
    collages.into_iter().map(CollageResponse::from).collect()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CollageSavedResponse {
    message: String,
    id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CollageDeletedResponse {
    message: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CollageOwnerQuery {
    pub username: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendingCollagesQuery {
    /// Defaults to 10, capped at 50.
    pub limit: Option<usize>,
}

fn collage_id(raw: &str) -> Result<CollageId, Error> {
    parse_id(raw, FieldName::new("id"))
}

/// Collages saved by `username`, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/collages",
    params(CollageOwnerQuery),
    responses(
        (status = 200, description = "Collages", body = [CollageResponse]),
        (status = 400, description = "Username is required", body = ErrorSchema)
    ),
    tags = ["collages"],
    operation_id = "userCollages",
    security([])
)]
#[get("/collages")]
pub async fn user_collages(
    state: web::Data<HttpState>,
    query: web::Query<CollageOwnerQuery>,
) -> ApiResult<web::Json<Vec<CollageResponse>>> {
    let field = FieldName::new("username");
    let raw = query
        .into_inner()
        .username
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| missing_fields_error(field, "Username is required"))?;
    let owner = parse_username(&raw, field)?;
    let collages = state.collages_query.by_owner(&owner).await?;
    Ok(web::Json(to_responses(collages)))
}

/// Most recently edited collages across all users.
#[utoipa::path(
    get,
    path = "/api/v1/collages/trending",
    params(TrendingCollagesQuery),
    responses(
        (status = 200, description = "Recently edited collages", body = [CollageResponse])
    ),
    tags = ["collages"],
    operation_id = "trendingCollages",
    security([])
)]
#[get("/collages/trending")]
pub async fn trending_collages(
    state: web::Data<HttpState>,
    query: web::Query<TrendingCollagesQuery>,
) -> ApiResult<web::Json<Vec<CollageResponse>>> {
    let limit = trending_limit(query.into_inner().limit);
    let collages = state.collages_query.trending(limit).await?;
    Ok(web::Json(to_responses(collages)))
}

/// Read one collage.
#[utoipa::path(
    get,
    path = "/api/v1/collages/{id}",
    params(("id" = String, Path, description = "Collage identifier")),
    responses(
        (status = 200, description = "Collage", body = CollageResponse),
        (status = 404, description = "Collage not found", body = ErrorSchema)
    ),
    tags = ["collages"],
    operation_id = "getCollage",
    security([])
)]
#[get("/collages/{id}")]
pub async fn get_collage(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CollageResponse>> {
    let id = collage_id(&path.into_inner())?;
    let collage = state.collages_query.get(&id).await?;
    Ok(web::Json(collage.into()))
}

/// Save a new collage owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/collages",
    request_body = CollageRequest,
    responses(
        (status = 201, description = "Collage saved", body = CollageSavedResponse),
        (status = 400, description = "Missing required fields", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["collages"],
    operation_id = "saveCollage"
)]
#[post("/collages")]
pub async fn save_collage(
    state: web::Data<HttpState>,
    user: BearerUser,
    payload: web::Json<CollageRequest>,
) -> ApiResult<HttpResponse> {
    let layout = payload.into_inner().into_layout()?;
    let collage = state.collages.save(user.0, layout).await?;
    Ok(HttpResponse::Created().json(CollageSavedResponse {
        message: "Collage saved successfully".to_owned(),
        id: collage.id.to_string(),
    }))
}

/// Replace the layout of a collage the caller owns.
#[utoipa::path(
    put,
    path = "/api/v1/collages/{id}",
    params(("id" = String, Path, description = "Collage identifier")),
    request_body = CollageRequest,
    responses(
        (status = 200, description = "Collage updated", body = CollageSavedResponse),
        (status = 400, description = "Missing required fields", body = ErrorSchema),
        (status = 404, description = "Collage not found", body = ErrorSchema)
    ),
    tags = ["collages"],
    operation_id = "updateCollage"
)]
#[put("/collages/{id}")]
pub async fn update_collage(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
    payload: web::Json<CollageRequest>,
) -> ApiResult<web::Json<CollageSavedResponse>> {
    let id = collage_id(&path.into_inner())?;
    let layout = payload.into_inner().into_layout()?;
    let collage = state
        .collages
        .update(user.username(), &id, layout)
        .await?;
    Ok(web::Json(CollageSavedResponse {
        message: "Collage updated successfully".to_owned(),
        id: collage.id.to_string(),
    }))
}

/// Delete a collage the caller owns.
#[utoipa::path(
    delete,
    path = "/api/v1/collages/{id}",
    params(("id" = String, Path, description = "Collage identifier")),
    responses(
        (status = 200, description = "Collage deleted", body = CollageDeletedResponse),
        (status = 404, description = "Collage not found or unauthorized", body = ErrorSchema)
    ),
    tags = ["collages"],
    operation_id = "deleteCollage"
)]
#[delete("/collages/{id}")]
pub async fn delete_collage(
    state: web::Data<HttpState>,
    user: BearerUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<CollageDeletedResponse>> {
    let id = collage_id(&path.into_inner())?;
    state.collages.delete(user.username(), &id).await?;
    Ok(web::Json(CollageDeletedResponse {
        message: "Collage deleted successfully".to_owned(),
    }))
}
