//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! layers, the ports at the hexagon's edges, and the services that implement
//! the driving ports. Nothing here depends on actix, Diesel or reqwest.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Username, User, UserAccount: identities and profiles.
//! - List, ListAccess, ListPatch: curated lists and their visibility gate.
//! - Review, Comment, Reply, Reaction: reviews and discussion.
//! - LogEntry, Shelf: personal media logs.
//! - Collage, GridSize: poster grids built from media references.
//! - Catalogue read models (movies, series, books, tracks).
//! - Services: one per use-case group, generic over their driven ports.

pub mod auth;
pub mod catalogue;
pub mod collages;
pub mod error;
pub mod lists;
pub mod media;
pub mod media_logs;
pub mod ports;
pub mod recommendations;
pub mod reviews;
pub mod trace_id;
pub mod user;

mod accounts_service;
mod collages_service;
mod lists_service;
mod media_logs_service;
mod movies_service;
mod recommendations_service;
mod reviews_service;
mod user_stats;

#[cfg(test)]
mod service_test_support;

pub use self::accounts_service::AccountsService;
pub use self::auth::{
    AccessToken, LoginCredentials, LoginValidationError, PASSWORD_MIN, Registration,
    RegistrationValidationError, TokenSubject,
};
pub use self::catalogue::{
    BookDetails, BookSummary, CAST_LIMIT, CastMember, MovieDetails, MovieFilters,
    MovieSearchPage, MovieSummary, SUGGESTION_LIMIT, SearchQuery, SearchValidationError,
    TMDB_IMAGE_BASE, Track, TvShow, genre_name, tmdb_image_url,
};
pub use self::collages::{
    Collage, CollageDraft, CollageId, CollageLayout, CollageValidationError,
    DEFAULT_TRENDING_COLLAGES, ExportFormat, GridSize, MAX_TRENDING_COLLAGES, trending_limit,
};
pub use self::collages_service::CollagesService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::lists::{
    LIST_NAME_MAX, List, ListAccess, ListId, ListName, ListPatch, ListValidationError, NewList,
    normalise_collaborators,
};
pub use self::lists_service::ListsService;
pub use self::media::{MediaKind, MediaRef, MediaRefValidationError, UnknownMediaKind};
pub use self::media_logs::{
    INVALID_DATE_MESSAGE, LOG_RATING_MAX, LogEntry, LogEntryDraft, LogEntryId,
    LogEntryValidationError, NewLogEntry, Shelf, parse_log_date,
};
pub use self::media_logs_service::MediaLogsService;
pub use self::movies_service::{MoviesService, RANDOM_MOVIE_ATTEMPTS};
pub use self::recommendations::{
    DEFAULT_RECOMMENDATION_LIMIT, MAX_PROMPT_CHARS, MAX_RECOMMENDATION_LIMIT,
    RecommendationEntry, RecommendationRequest, RecommendationValidationError, normalise_titles,
};
pub use self::recommendations_service::{RecommendationCatalogues, RecommendationsService};
pub use self::reviews::{
    Comment, CommentId, NewReview, RECENT_REVIEWS_LIMIT, Rating, Reaction, ReactionOutcome, Reply,
    Review, ReviewId, ReviewSort, ReviewValidationError, UNKNOWN_MEDIA_TITLE,
};
pub use self::reviews_service::ReviewsService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, PasswordHash, StatKind, USERNAME_MAX, User, UserAccount, UserStats,
    UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use encyclomedia::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
