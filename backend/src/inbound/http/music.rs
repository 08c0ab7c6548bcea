//! Track metadata proxied from Deezer.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::Track;
use crate::domain::ports::map_upstream_error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, search_query};

const TRACK_NOT_FOUND: &str = "Track not found";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MusicSearchParams {
    /// Free-text search across track, artist and album.
    pub q: Option<String>,
}

/// Search tracks.
#[utoipa::path(
    get,
    path = "/api/v1/music/search",
    params(MusicSearchParams),
    responses(
        (status = 200, description = "Matching tracks"),
        (status = 400, description = "Missing query", body = ErrorSchema)
    ),
    tags = ["music"],
    operation_id = "searchMusic",
    security([])
)]
#[get("/music/search")]
pub async fn search_music(
    state: web::Data<HttpState>,
    params: web::Query<MusicSearchParams>,
) -> ApiResult<web::Json<Vec<Track>>> {
    let query = search_query(params.q.as_deref(), FieldName::new("q"))?;
    let tracks = state
        .music
        .search(&query)
        .await
        .map_err(|err| map_upstream_error(err, TRACK_NOT_FOUND))?;
    Ok(web::Json(tracks))
}

/// One track by Deezer id.
#[utoipa::path(
    get,
    path = "/api/v1/music/tracks/{id}",
    params(("id" = u64, Path, description = "Deezer track id")),
    responses(
        (status = 200, description = "Track"),
        (status = 404, description = "Track not found", body = ErrorSchema)
    ),
    tags = ["music"],
    operation_id = "trackDetails",
    security([])
)]
#[get("/music/tracks/{id}")]
pub async fn track_details(
    state: web::Data<HttpState>,
    path: web::Path<u64>,
) -> ApiResult<web::Json<Track>> {
    let track = state
        .music
        .track(path.into_inner())
        .await
        .map_err(|err| map_upstream_error(err, TRACK_NOT_FOUND))?;
    Ok(web::Json(track))
}
