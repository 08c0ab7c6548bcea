//! Book metadata proxied from OpenLibrary.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::map_upstream_error;
use crate::domain::{BookDetails, BookSummary, SUGGESTION_LIMIT};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, search_query};

/// Results returned by a full book search.
pub const BOOK_SEARCH_LIMIT: usize = 10;
const BOOK_NOT_FOUND: &str = "Book not found";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookSearchParams {
    pub query: Option<String>,
}

async fn search(
    state: &HttpState,
    params: BookSearchParams,
    limit: usize,
) -> ApiResult<web::Json<Vec<BookSummary>>> {
    let query = search_query(params.query.as_deref(), FieldName::new("query"))?;
    let books = state
        .books
        .search(&query, limit)
        .await
        .map_err(|err| map_upstream_error(err, BOOK_NOT_FOUND))?;
    Ok(web::Json(books))
}

/// Search works by title or author.
#[utoipa::path(
    get,
    path = "/api/v1/books/search",
    params(BookSearchParams),
    responses(
        (status = 200, description = "Up to ten works"),
        (status = 400, description = "Missing query", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "searchBooks",
    security([])
)]
#[get("/books/search")]
pub async fn search_books(
    state: web::Data<HttpState>,
    params: web::Query<BookSearchParams>,
) -> ApiResult<web::Json<Vec<BookSummary>>> {
    search(&state, params.into_inner(), BOOK_SEARCH_LIMIT).await
}

/// Type-ahead suggestions.
#[utoipa::path(
    get,
    path = "/api/v1/books/suggestions",
    params(BookSearchParams),
    responses(
        (status = 200, description = "Up to five works"),
        (status = 400, description = "Missing query", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "bookSuggestions",
    security([])
)]
#[get("/books/suggestions")]
pub async fn book_suggestions(
    state: web::Data<HttpState>,
    params: web::Query<BookSearchParams>,
) -> ApiResult<web::Json<Vec<BookSummary>>> {
    search(&state, params.into_inner(), SUGGESTION_LIMIT).await
}

/// Work details with resolved author names.
#[utoipa::path(
    get,
    path = "/api/v1/books/{workId}",
    params(("workId" = String, Path, description = "OpenLibrary work id, e.g. OL45804W")),
    responses(
        (status = 200, description = "Work details"),
        (status = 404, description = "Book not found", body = ErrorSchema)
    ),
    tags = ["books"],
    operation_id = "bookDetails",
    security([])
)]
#[get("/books/{work_id}")]
pub async fn book_details(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<BookDetails>> {
    let details = state
        .books
        .details(path.trim())
        .await
        .map_err(|err| map_upstream_error(err, BOOK_NOT_FOUND))?;
    Ok(web::Json(details))
}
