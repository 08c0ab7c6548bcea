//! Test helpers for inbound HTTP components.
//!
//! [`TestApp`] wires the real services over the in-memory repositories and a
//! canned metadata catalogue, so handler tests exercise everything below the
//! HTTP edge without network or database access.

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use mockable::DefaultClock;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccessTokenCodec, BookCatalogue, MovieCatalogue, MusicCatalogue, RecommendationSource,
    TvCatalogue, UpstreamError,
};
use crate::domain::{
    AccountsService, BookDetails, BookSummary, CastMember, CollagesService, ListsService, MediaLogsService,
    MovieDetails, MovieSearchPage, MovieSummary, MoviesService, RecommendationCatalogues,
    RecommendationRequest, RecommendationsService, Registration, ReviewsService, SearchQuery,
    Track, TvShow, Username,
};
use crate::inbound::http::state::{CataloguePorts, HttpState, HttpStatePorts};
use crate::outbound::memory::{
    InMemoryCollageRepository, InMemoryListRepository, InMemoryMediaLogRepository, InMemoryReviewRepository,
    InMemoryUserRepository,
};
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenCodec};

pub const TEST_PASSWORD: &str = "correct horse battery";
/// Highest film id the stub catalogue knows; every id up to it resolves.
pub const LATEST_MOVIE_ID: u64 = 603;

/// `Authorization` header carrying `token`.
pub fn bearer_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// Canned metadata provider covering every catalogue port.
///
/// Queries containing `missing` find nothing; ids other than the fixtures
/// are reported as not found upstream.
#[derive(Debug, Default, Clone)]
pub struct StubCatalogue;

fn matrix() -> MovieSummary {
    MovieSummary {
        id: 603,
        title: "The Matrix".to_owned(),
        overview: "A hacker learns the truth.".to_owned(),
        release_date: Some("1999-03-31".to_owned()),
        poster_url: Some("https://image.tmdb.org/t/p/w500/matrix.jpg".to_owned()),
        vote_average: 8.2,
        popularity: 80.0,
        genres: vec!["Action".to_owned(), "Science Fiction".to_owned()],
    }
}

fn reloaded() -> MovieSummary {
    MovieSummary {
        id: 604,
        title: "The Matrix Reloaded".to_owned(),
        overview: String::new(),
        release_date: Some("2003-05-15".to_owned()),
        poster_url: None,
        vote_average: 7.0,
        popularity: 60.0,
        genres: vec!["Action".to_owned()],
    }
}

#[async_trait]
impl MovieCatalogue for StubCatalogue {
    async fn search(
        &self,
        query: &SearchQuery,
        page: u32,
    ) -> Result<MovieSearchPage, UpstreamError> {
        let movies = if query.as_ref().contains("missing") {
            Vec::new()
        } else {
            vec![matrix(), reloaded()]
        };
        Ok(MovieSearchPage {
            movies,
            total_pages: 1,
            current_page: page,
        })
    }

    async fn details(&self, id: u64) -> Result<MovieDetails, UpstreamError> {
        if id == 0 || id > LATEST_MOVIE_ID {
            return Err(UpstreamError::not_found(format!("movie {id}")));
        }
        let summary = matrix();
        Ok(MovieDetails {
            id,
            title: summary.title,
            overview: summary.overview,
            tagline: Some("Welcome to the Real World.".to_owned()),
            release_date: summary.release_date,
            runtime: Some(136),
            poster_url: summary.poster_url,
            backdrop_url: None,
            vote_average: summary.vote_average,
            genres: summary.genres,
            cast: vec![CastMember {
                name: "Keanu Reeves".to_owned(),
                character: "Neo".to_owned(),
                profile_url: None,
            }],
        })
    }

    async fn latest_id(&self) -> Result<u64, UpstreamError> {
        Ok(LATEST_MOVIE_ID)
    }
}

fn breaking_bad() -> TvShow {
    TvShow {
        id: 1396,
        name: "Breaking Bad".to_owned(),
        overview: String::new(),
        first_air_date: Some("2008-01-20".to_owned()),
        poster_url: None,
        vote_average: 8.9,
        popularity: 300.0,
    }
}

#[async_trait]
impl TvCatalogue for StubCatalogue {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<TvShow>, UpstreamError> {
        if query.as_ref().contains("missing") {
            return Ok(Vec::new());
        }
        Ok(vec![breaking_bad()])
    }

    async fn trending(&self) -> Result<Vec<TvShow>, UpstreamError> {
        Ok(vec![breaking_bad()])
    }
}

#[async_trait]
impl BookCatalogue for StubCatalogue {
    async fn search(
        &self,
        query: &SearchQuery,
        limit: usize,
    ) -> Result<Vec<BookSummary>, UpstreamError> {
        if query.as_ref().contains("missing") {
            return Ok(Vec::new());
        }
        Ok((1..=12)
            .map(|n| BookSummary {
                id: format!("OL{n}W"),
                title: format!("Dune {n}"),
                author: "Frank Herbert".to_owned(),
                cover_url: "https://covers.openlibrary.org/b/id/10909258-M.jpg".to_owned(),
                first_publish_year: Some(1965),
            })
            .take(limit)
            .collect())
    }

    async fn details(&self, work_id: &str) -> Result<BookDetails, UpstreamError> {
        if work_id != "OL1W" {
            return Err(UpstreamError::not_found(format!("work {work_id}")));
        }
        Ok(BookDetails {
            id: work_id.to_owned(),
            title: "Dune".to_owned(),
            authors: vec!["Frank Herbert".to_owned()],
            description: "Spice.".to_owned(),
            genres: vec!["Science fiction".to_owned()],
            languages: vec!["ENG".to_owned()],
            publish_date: Some("1965".to_owned()),
            cover_url: "https://covers.openlibrary.org/b/id/10909258-L.jpg".to_owned(),
        })
    }
}

fn track() -> Track {
    Track {
        id: 3_135_556,
        title: "Harder, Better, Faster, Stronger".to_owned(),
        artist: "Daft Punk".to_owned(),
        album: "Discovery".to_owned(),
        cover_url: None,
        preview_url: None,
        duration_secs: 224,
    }
}

#[async_trait]
impl MusicCatalogue for StubCatalogue {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Track>, UpstreamError> {
        if query.as_ref().contains("missing") {
            return Ok(Vec::new());
        }
        Ok(vec![track()])
    }

    async fn track(&self, id: u64) -> Result<Track, UpstreamError> {
        if id == 3_135_556 {
            Ok(track())
        } else {
            Err(UpstreamError::not_found(format!("track {id}")))
        }
    }
}

#[async_trait]
impl RecommendationSource for StubCatalogue {
    async fn suggest_titles(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<String>, UpstreamError> {
        if request.prompt().contains("offline") {
            return Err(UpstreamError::transport("model unreachable"));
        }
        Ok(vec!["The Matrix".to_owned(), "missing film".to_owned()])
    }
}

/// In-memory handler state plus direct access to the token codec.
pub struct TestApp {
    state: HttpState,
    tokens: Arc<JwtTokenCodec>,
}

impl TestApp {
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let clock: Arc<dyn mockable::Clock> = Arc::new(DefaultClock);
        let tokens = Arc::new(JwtTokenCodec::new(
            Zeroizing::new("test-secret".to_owned()),
            Duration::minutes(15),
        ));
        let accounts = Arc::new(AccountsService::new(
            users.clone(),
            Arc::new(Argon2PasswordHasher::new()),
            tokens.clone(),
            clock.clone(),
        ));
        let lists = Arc::new(ListsService::new(
            Arc::new(InMemoryListRepository::new()),
            users.clone(),
            clock.clone(),
        ));
        let reviews = Arc::new(ReviewsService::new(
            Arc::new(InMemoryReviewRepository::new()),
            users.clone(),
            clock.clone(),
        ));
        let logs = Arc::new(MediaLogsService::new(
            Arc::new(InMemoryMediaLogRepository::new()),
            users,
            clock.clone(),
        ));
        let collages = Arc::new(CollagesService::new(
            Arc::new(InMemoryCollageRepository::new()),
            clock,
        ));
        let catalogue = Arc::new(StubCatalogue);
        let recommendations = RecommendationsService::new(
            catalogue.clone(),
            RecommendationCatalogues {
                movies: catalogue.clone(),
                tv: catalogue.clone(),
                books: catalogue.clone(),
                music: catalogue.clone(),
            },
        );

        let state = HttpState::new(
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
            },
            CataloguePorts {
                movies: Arc::new(MoviesService::with_seed(catalogue.clone(), 7)),
                tv: catalogue.clone(),
                books: catalogue.clone(),
                music: catalogue,
                recommendations: Arc::new(recommendations),
            },
        );
        Self { state, tokens }
    }

    pub fn data(&self) -> web::Data<HttpState> {
        web::Data::new(self.state.clone())
    }

    pub fn state(&self) -> &HttpState {
        &self.state
    }

    /// Sign a token for `username` without touching the user store.
    pub fn token_for(&self, username: &str) -> String {
        let username = Username::new(username).expect("valid username");
        self.tokens
            .issue(&username, Utc::now())
            .expect("token signs")
            .as_str()
            .to_owned()
    }

    /// Register `username` and return a bearer token for it.
    pub async fn sign_up(&self, username: &str) -> String {
        let registration = Registration::try_from_parts(
            username,
            &format!("{username}@example.com"),
            TEST_PASSWORD,
        )
        .expect("valid registration");
        self.state
            .accounts
            .register(registration)
            .await
            .expect("registration succeeds");
        self.token_for(username)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
