//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, metadata providers, credentials) are
//! implemented by outbound adapters and mocked with `mockall` in service
//! tests. Driving ports are the use-cases inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts;
mod collage_repository;
mod collages;
mod credentials;
mod list_repository;
mod lists;
mod media_catalogues;
mod media_log_repository;
mod media_logs;
mod movie_catalogue;
mod movies_query;
mod recommendation_source;
mod recommendations_query;
mod review_repository;
mod reviews;
mod upstream_error;
mod user_repository;

pub use accounts::{AccountsCommand, AccountsQuery, Authenticator, LoginOutcome};
#[cfg(test)]
pub use collage_repository::MockCollageRepository;
pub use collage_repository::{CollagePersistenceError, CollageRepository};
pub use collages::{CollagesCommand, CollagesQuery};
#[cfg(test)]
pub use credentials::{MockAccessTokenCodec, MockPasswordHasher};
pub use credentials::{AccessTokenCodec, PasswordHashError, PasswordHasher, TokenError};
#[cfg(test)]
pub use list_repository::MockListRepository;
pub use list_repository::{ListPersistenceError, ListRepository};
pub use lists::{FollowOutcome, ListsCommand, ListsQuery};
#[cfg(test)]
pub use media_catalogues::{MockBookCatalogue, MockMusicCatalogue, MockTvCatalogue};
pub use media_catalogues::{BookCatalogue, MusicCatalogue, TvCatalogue};
#[cfg(test)]
pub use media_log_repository::MockMediaLogRepository;
pub use media_log_repository::{MediaLogPersistenceError, MediaLogRepository};
pub use media_logs::{MediaLogCommand, MediaLogQuery};
pub use movie_catalogue::MovieCatalogue;
#[cfg(test)]
pub use movie_catalogue::MockMovieCatalogue;
pub use movies_query::{MovieSearchRequest, MoviesQuery};
#[cfg(test)]
pub use recommendation_source::MockRecommendationSource;
pub use recommendation_source::RecommendationSource;
pub use recommendations_query::RecommendationsQuery;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewPersistenceError, ReviewRepository};
pub use reviews::{ReviewsCommand, ReviewsQuery};
pub use upstream_error::{UpstreamError, map_upstream_error};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
