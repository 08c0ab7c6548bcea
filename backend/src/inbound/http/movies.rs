//! Film metadata proxied from TMDB.
//!
//! Bodies are the camelCase serialisations of the catalogue records;
//! filtering by year, rating and genre happens in the movie service.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::MovieSearchRequest;
use crate::domain::{MovieDetails, MovieFilters, MovieSearchPage, MovieSummary};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error, search_query};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MovieSearchParams {
    /// Free-text title search.
    pub query: Option<String>,
    /// 1-based TMDB page.
    pub page: Option<u32>,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    /// Comma-separated genre names; every one must match.
    pub genre: Option<String>,
}

impl MovieSearchParams {
    fn into_request(self) -> ApiResult<MovieSearchRequest> {
        let query = search_query(self.query.as_deref(), FieldName::new("query"))?;
        let page = match self.page {
            None => 1,
            Some(0) => {
                return Err(invalid_value_error(
                    FieldName::new("page"),
                    "0",
                    "page must be at least 1",
                ));
            }
            Some(page) => page,
        };
        Ok(MovieSearchRequest {
            query,
            page,
            filters: MovieFilters {
                year_start: self.year_start,
                year_end: self.year_end,
                rating_min: self.rating_min,
                rating_max: self.rating_max,
                genres: MovieFilters::parse_genres(self.genre.as_deref()),
            },
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestionParams {
    pub query: Option<String>,
}

/// Search films with optional local filters.
#[utoipa::path(
    get,
    path = "/api/v1/movies/search",
    params(MovieSearchParams),
    responses(
        (status = 200, description = "`{ movies, totalPages, currentPage }`"),
        (status = 400, description = "Missing query", body = ErrorSchema),
        (status = 500, description = "Upstream failure", body = ErrorSchema)
    ),
    tags = ["movies"],
    operation_id = "searchMovies",
    security([])
)]
#[get("/movies/search")]
pub async fn search_movies(
    state: web::Data<HttpState>,
    params: web::Query<MovieSearchParams>,
) -> ApiResult<web::Json<MovieSearchPage>> {
    let request = params.into_inner().into_request()?;
    Ok(web::Json(state.movies.search(request).await?))
}

/// Top five title matches for type-ahead.
#[utoipa::path(
    get,
    path = "/api/v1/movies/suggestions",
    params(SuggestionParams),
    responses(
        (status = 200, description = "Up to five films"),
        (status = 400, description = "Missing query", body = ErrorSchema)
    ),
    tags = ["movies"],
    operation_id = "movieSuggestions",
    security([])
)]
#[get("/movies/suggestions")]
pub async fn movie_suggestions(
    state: web::Data<HttpState>,
    params: web::Query<SuggestionParams>,
) -> ApiResult<web::Json<Vec<MovieSummary>>> {
    let query = search_query(params.query.as_deref(), FieldName::new("query"))?;
    Ok(web::Json(state.movies.suggestions(&query).await?))
}

/// A random existing film.
#[utoipa::path(
    get,
    path = "/api/v1/movies/random",
    responses(
        (status = 200, description = "Film details"),
        (status = 404, description = "No film found after repeated attempts", body = ErrorSchema)
    ),
    tags = ["movies"],
    operation_id = "randomMovie",
    security([])
)]
#[get("/movies/random")]
pub async fn random_movie(state: web::Data<HttpState>) -> ApiResult<web::Json<MovieDetails>> {
    Ok(web::Json(state.movies.random().await?))
}

/// Details for one film, including the top-billed cast.
#[utoipa::path(
    get,
    path = "/api/v1/movies/{id}",
    params(("id" = u64, Path, description = "TMDB film id")),
    responses(
        (status = 200, description = "Film details"),
        (status = 404, description = "Movie not found", body = ErrorSchema)
    ),
    tags = ["movies"],
    operation_id = "movieDetails",
    security([])
)]
#[get("/movies/{id}")]
pub async fn movie_details(
    state: web::Data<HttpState>,
    path: web::Path<u64>,
) -> ApiResult<web::Json<MovieDetails>> {
    Ok(web::Json(state.movies.details(path.into_inner()).await?))
}
