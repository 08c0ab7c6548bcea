//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, AccountsQuery, Authenticator, BookCatalogue, CollagesCommand, CollagesQuery,
    ListsCommand, ListsQuery, MediaLogCommand, MediaLogQuery, MoviesQuery, MusicCatalogue, RecommendationsQuery,
    ReviewsCommand, ReviewsQuery, TvCatalogue,
};

/// Parameter object bundling the community use-cases: accounts, lists,
/// reviews, personal logs and collages.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountsCommand>,
    pub accounts_query: Arc<dyn AccountsQuery>,
    pub authenticator: Arc<dyn Authenticator>,
    pub lists: Arc<dyn ListsCommand>,
    pub lists_query: Arc<dyn ListsQuery>,
    pub reviews: Arc<dyn ReviewsCommand>,
    pub reviews_query: Arc<dyn ReviewsQuery>,
    pub media_logs: Arc<dyn MediaLogCommand>,
    pub media_logs_query: Arc<dyn MediaLogQuery>,
    pub collages: Arc<dyn CollagesCommand>,
    pub collages_query: Arc<dyn CollagesQuery>,
}

/// Metadata lookups proxied to third-party providers.
#[derive(Clone)]
pub struct CataloguePorts {
    pub movies: Arc<dyn MoviesQuery>,
    pub tv: Arc<dyn TvCatalogue>,
    pub books: Arc<dyn BookCatalogue>,
    pub music: Arc<dyn MusicCatalogue>,
    pub recommendations: Arc<dyn RecommendationsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountsCommand>,
    pub accounts_query: Arc<dyn AccountsQuery>,
    pub authenticator: Arc<dyn Authenticator>,
    pub lists: Arc<dyn ListsCommand>,
    pub lists_query: Arc<dyn ListsQuery>,
    pub reviews: Arc<dyn ReviewsCommand>,
    pub reviews_query: Arc<dyn ReviewsQuery>,
    pub media_logs: Arc<dyn MediaLogCommand>,
    pub media_logs_query: Arc<dyn MediaLogQuery>,
    pub collages: Arc<dyn CollagesCommand>,
    pub collages_query: Arc<dyn CollagesQuery>,
    pub movies: Arc<dyn MoviesQuery>,
    pub tv: Arc<dyn TvCatalogue>,
    pub books: Arc<dyn BookCatalogue>,
    pub music: Arc<dyn MusicCatalogue>,
    pub recommendations: Arc<dyn RecommendationsQuery>,
}

impl HttpState {
    /// Flatten the two port bundles into handler state.
    pub fn new(ports: HttpStatePorts, catalogues: CataloguePorts) -> Self {
        let HttpStatePorts {
            accounts,
            accounts_query,
            authenticator,
            lists,
            lists_query,
            reviews,
            reviews_query,
            media_logs,
            media_logs_query,
            collages,
            collages_query,
        } = ports;
        let CataloguePorts {
            movies,
            tv,
            books,
            music,
            recommendations,
        } = catalogues;
        Self {
            accounts,
            accounts_query,
            authenticator,
            lists,
            lists_query,
            reviews,
            reviews_query,
            media_logs,
            media_logs_query,
            collages,
            collages_query,
            movies,
            tv,
            books,
            music,
            recommendations,
        }
    }
}
