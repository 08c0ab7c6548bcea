//! Television metadata proxied from TMDB.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::TvShow;
use crate::domain::ports::map_upstream_error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, search_query};

const SHOW_NOT_FOUND: &str = "Show not found";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TvSearchParams {
    pub query: Option<String>,
}

/// Search series by name.
#[utoipa::path(
    get,
    path = "/api/v1/tv/search",
    params(TvSearchParams),
    responses(
        (status = 200, description = "Matching series"),
        (status = 400, description = "Missing query", body = ErrorSchema)
    ),
    tags = ["tv"],
    operation_id = "searchTv",
    security([])
)]
#[get("/tv/search")]
pub async fn search_tv(
    state: web::Data<HttpState>,
    params: web::Query<TvSearchParams>,
) -> ApiResult<web::Json<Vec<TvShow>>> {
    let query = search_query(params.query.as_deref(), FieldName::new("query"))?;
    let shows = state
        .tv
        .search(&query)
        .await
        .map_err(|err| map_upstream_error(err, SHOW_NOT_FOUND))?;
    Ok(web::Json(shows))
}

/// Today's trending series, most popular first.
#[utoipa::path(
    get,
    path = "/api/v1/tv/trending",
    responses(
        (status = 200, description = "Trending series"),
        (status = 500, description = "Upstream failure", body = ErrorSchema)
    ),
    tags = ["tv"],
    operation_id = "trendingTv",
    security([])
)]
#[get("/tv/trending")]
pub async fn trending_tv(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TvShow>>> {
    let shows = state
        .tv
        .trending()
        .await
        .map_err(|err| map_upstream_error(err, SHOW_NOT_FOUND))?;
    Ok(web::Json(shows))
}
