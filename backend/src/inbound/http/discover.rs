//! Discovery: people search and prompt-driven recommendations.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, RecommendationEntry, RecommendationRequest, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::OptionalBearer;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_media_kind};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserSearchParams {
    /// Case-insensitive username fragment; blank lists everyone.
    pub query: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredUser {
    username: String,
    profile_picture: Option<String>,
}

impl From<User> for DiscoveredUser {
    fn from(user: User) -> Self {
        Self {
            username: user.username.into(),
            profile_picture: user.profile_picture,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserSearchResponse {
    users: Vec<DiscoveredUser>,
}

/// Body for `POST /discover/recommendations`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationRequestBody {
    #[schema(example = "slow-burn space films")]
    pub prompt: String,
    /// movie (default), tv, book or music.
    pub media_type: Option<String>,
    /// 1 to 10, default 5.
    pub limit: Option<i64>,
}

impl TryFrom<RecommendationRequestBody> for RecommendationRequest {
    type Error = Error;

    fn try_from(value: RecommendationRequestBody) -> Result<Self, Self::Error> {
        let kind = value
            .media_type
            .as_deref()
            .map(|raw| parse_media_kind(raw, FieldName::new("mediaType")))
            .transpose()?;
        Self::try_new(&value.prompt, kind, value.limit)
            .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    recommendations: Vec<RecommendationEntry>,
}

/// Find users by name.
#[utoipa::path(
    get,
    path = "/api/v1/discover/users",
    params(UserSearchParams),
    responses((status = 200, description = "Matching users", body = UserSearchResponse)),
    tags = ["discover"],
    operation_id = "discoverUsers",
    security([])
)]
#[get("/discover/users")]
pub async fn discover_users(
    state: web::Data<HttpState>,
    params: web::Query<UserSearchParams>,
) -> ApiResult<web::Json<UserSearchResponse>> {
    let users = state
        .accounts_query
        .search_users(params.query.as_deref().unwrap_or_default())
        .await?;
    Ok(web::Json(UserSearchResponse {
        users: users.into_iter().map(DiscoveredUser::from).collect(),
    }))
}

/// Ask the language model for titles and resolve each against a catalogue.
///
/// Lookups that fail are reported inline as `{ title, error }`.
#[utoipa::path(
    post,
    path = "/api/v1/discover/recommendations",
    request_body = RecommendationRequestBody,
    responses(
        (status = 200, description = "`{ recommendations: [{ title, media } | { title, error }] }`"),
        (status = 400, description = "Invalid prompt, media type or limit", body = ErrorSchema),
        (status = 500, description = "Language model unavailable", body = ErrorSchema)
    ),
    tags = ["discover"],
    operation_id = "recommend",
    security([], ("bearerAuth" = []))
)]
#[post("/discover/recommendations")]
pub async fn recommend(
    state: web::Data<HttpState>,
    viewer: OptionalBearer,
    payload: web::Json<RecommendationRequestBody>,
) -> ApiResult<web::Json<RecommendationsResponse>> {
    let request = RecommendationRequest::try_from(payload.into_inner())?;
    info!(
        kind = request.kind().as_str(),
        limit = request.limit(),
        signed_in = viewer.username().is_some(),
        "recommendation requested"
    );
    let recommendations = state.recommendations.recommend(request).await?;
    Ok(web::Json(RecommendationsResponse { recommendations }))
}
