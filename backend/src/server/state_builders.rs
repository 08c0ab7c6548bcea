//! Builders for HTTP state ports.
//!
//! Community data goes through Diesel repositories when a pool is configured
//! and through the in-memory stores otherwise; both share one generic wiring
//! path so the services never know which backend they run on.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use encyclomedia::domain::ports::{
    CollageRepository, ListRepository, MediaLogRepository, ReviewRepository, UserRepository,
};
use encyclomedia::domain::{
    AccountsService, CollagesService, ListsService, MediaLogsService, MoviesService, RecommendationCatalogues,
    RecommendationsService, ReviewsService,
};
use encyclomedia::inbound::http::state::{CataloguePorts, HttpState, HttpStatePorts};
use encyclomedia::outbound::deezer::DeezerHttpSource;
use encyclomedia::outbound::llm::ChatCompletionsSource;
use encyclomedia::outbound::memory::{
    InMemoryCollageRepository, InMemoryListRepository, InMemoryMediaLogRepository, InMemoryReviewRepository,
    InMemoryUserRepository,
};
use encyclomedia::outbound::openlibrary::OpenLibraryHttpSource;
use encyclomedia::outbound::persistence::{
    DieselCollageRepository, DieselListRepository, DieselMediaLogRepository, DieselReviewRepository, DieselUserRepository,
};
use encyclomedia::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};
use encyclomedia::outbound::tmdb::TmdbHttpSource;

use super::ServerConfig;
use super::config::UpstreamConfig;

/// Repositories backing the community use-cases.
struct Repositories<U, L, R, M, C> {
    users: Arc<U>,
    lists: Arc<L>,
    reviews: Arc<R>,
    logs: Arc<M>,
    collages: Arc<C>,
}

/// Wire the community services over one set of repositories.
fn community_ports<U, L, R, M, C>(
    repos: Repositories<U, L, R, M, C>,
    tokens: Arc<JwtTokenCodec>,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    L: ListRepository + 'static,
    R: ReviewRepository + 'static,
    M: MediaLogRepository + 'static,
    C: CollageRepository + 'static,
{
    let Repositories {
        users,
        lists,
        reviews,
        logs,
        collages,
    } = repos;
    let accounts = Arc::new(AccountsService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher::new()),
        tokens,
        clock.clone(),
    ));
    let lists = Arc::new(ListsService::new(lists, users.clone(), clock.clone()));
    let reviews = Arc::new(ReviewsService::new(reviews, users.clone(), clock.clone()));
    let logs = Arc::new(MediaLogsService::new(logs, users, clock.clone()));
    let collages = Arc::new(CollagesService::new(collages, clock));
    HttpStatePorts {
        accounts: accounts.clone(),
        accounts_query: accounts.clone(),
        authenticator: accounts,
        lists: lists.clone(),
        lists_query: lists,
        reviews: reviews.clone(),
        reviews_query: reviews,
        media_logs: logs.clone(),
        media_logs_query: logs,
        collages: collages.clone(),
        collages_query: collages,
    }
}

fn build_community_ports(config: &ServerConfig) -> HttpStatePorts {
    let tokens = Arc::new(JwtTokenCodec::new(
        config.jwt_secret.clone(),
        config.token_ttl,
    ));
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            community_ports(
                Repositories {
                    users: Arc::new(DieselUserRepository::new(pool.clone())),
                    lists: Arc::new(DieselListRepository::new(pool.clone())),
                    reviews: Arc::new(DieselReviewRepository::new(pool.clone())),
                    logs: Arc::new(DieselMediaLogRepository::new(pool.clone())),
                    collages: Arc::new(DieselCollageRepository::new(pool.clone())),
                },
                tokens,
                clock,
            )
        }
        None => {
            info!("no database configured; community data is kept in memory");
            community_ports(
                Repositories {
                    users: Arc::new(InMemoryUserRepository::new()),
                    lists: Arc::new(InMemoryListRepository::new()),
                    reviews: Arc::new(InMemoryReviewRepository::new()),
                    logs: Arc::new(InMemoryMediaLogRepository::new()),
                    collages: Arc::new(InMemoryCollageRepository::new()),
                },
                tokens,
                clock,
            )
        }
    }
}

/// Build the provider clients and the services layered over them.
fn build_catalogue_ports(upstream: &UpstreamConfig) -> Result<CataloguePorts, reqwest::Error> {
    let tmdb = Arc::new(TmdbHttpSource::new(
        upstream.tmdb_base_url.clone(),
        upstream.tmdb_api_key.clone(),
        upstream.timeout,
    )?);
    let books = Arc::new(OpenLibraryHttpSource::new(
        upstream.openlibrary_base_url.clone(),
        upstream.timeout,
    )?);
    let music = Arc::new(DeezerHttpSource::new(
        upstream.deezer_base_url.clone(),
        upstream.timeout,
    )?);
    let llm = Arc::new(ChatCompletionsSource::new(
        upstream.llm_base_url.clone(),
        upstream.llm_api_key.clone(),
        upstream.llm_model.clone(),
        upstream.timeout,
    )?);
    let recommendations = RecommendationsService::new(
        llm,
        RecommendationCatalogues {
            movies: tmdb.clone(),
            tv: tmdb.clone(),
            books: books.clone(),
            music: music.clone(),
        },
    );
    Ok(CataloguePorts {
        movies: Arc::new(MoviesService::new(tmdb.clone())),
        tv: tmdb,
        books,
        music,
        recommendations: Arc::new(recommendations),
    })
}

/// Assemble handler state from the server configuration.
///
/// # Errors
///
/// Returns the [`reqwest::Error`] raised when an HTTP client cannot be built.
pub(crate) fn build_http_state(config: &ServerConfig) -> Result<HttpState, reqwest::Error> {
    Ok(HttpState::new(
        build_community_ports(config),
        build_catalogue_ports(&config.upstream)?,
    ))
}
