//! Prompt-driven recommendations: ask the language model for titles, then
//! resolve each one against the metadata provider for the requested kind.
//!
//! Lookups run one after another with no retry. A failed lookup becomes an
//! inline error entry; only a model failure fails the whole request.
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    BookCatalogue, MovieCatalogue, MusicCatalogue, RecommendationSource, RecommendationsQuery,
    TvCatalogue, UpstreamError, map_upstream_error,
};
use crate::domain::{
    Error, MediaKind, MediaRef, RecommendationEntry, RecommendationRequest, SearchQuery,
    normalise_titles,
};

const NO_MATCH: &str = "No match found";
const LOOKUP_FAILED: &str = "Metadata lookup failed";

/// Catalogue ports consulted when resolving suggested titles.
#[derive(Clone)]
pub struct RecommendationCatalogues {
    pub movies: Arc<dyn MovieCatalogue>,
    pub tv: Arc<dyn TvCatalogue>,
    pub books: Arc<dyn BookCatalogue>,
    pub music: Arc<dyn MusicCatalogue>,
}

/// Recommendation service implementing [`RecommendationsQuery`].
#[derive(Clone)]
pub struct RecommendationsService<S> {
    source: Arc<S>,
    catalogues: RecommendationCatalogues,
}

impl<S> RecommendationsService<S> {
    pub fn new(source: Arc<S>, catalogues: RecommendationCatalogues) -> Self {
        Self { source, catalogues }
    }
}

impl<S> RecommendationsService<S>
where
    S: RecommendationSource,
{
    /// First catalogue match for `title`, or `None` when the provider had
    /// nothing.
    async fn lookup(&self, kind: MediaKind, title: &str) -> Result<Option<MediaRef>, UpstreamError> {
        let query = SearchQuery::new(title)
            .map_err(|err| UpstreamError::rejected(err.to_string()))?;
        let found = match kind {
            MediaKind::Movie => self
                .catalogues
                .movies
                .search(&query, 1)
                .await?
                .movies
                .into_iter()
                .next()
                .map(|movie| (movie.id.to_string(), movie.title, movie.poster_url)),
            MediaKind::Tv => self
                .catalogues
                .tv
                .search(&query)
                .await?
                .into_iter()
                .next()
                .map(|show| (show.id.to_string(), show.name, show.poster_url)),
            MediaKind::Book => self
                .catalogues
                .books
                .search(&query, 1)
                .await?
                .into_iter()
                .next()
                .map(|book| (book.id, book.title, Some(book.cover_url))),
            MediaKind::Music => self
                .catalogues
                .music
                .search(&query)
                .await?
                .into_iter()
                .next()
                .map(|track| (track.id.to_string(), track.title, track.cover_url)),
        };

        found
            .map(|(id, matched_title, image)| {
                MediaRef::new(kind, id)
                    .map(|media| media.with_title(Some(matched_title)).with_image_url(image))
                    .map_err(|err| UpstreamError::decode(err.to_string()))
            })
            .transpose()
    }

    async fn resolve(&self, kind: MediaKind, title: String) -> RecommendationEntry {
        match self.lookup(kind, &title).await {
            Ok(Some(media)) => RecommendationEntry::Found { title, media },
            Ok(None) => RecommendationEntry::Failed {
                title,
                error: NO_MATCH.to_owned(),
            },
            Err(UpstreamError::NotFound { .. }) => RecommendationEntry::Failed {
                title,
                error: NO_MATCH.to_owned(),
            },
            Err(error) => {
                warn!(%title, kind = kind.as_str(), %error, "recommendation lookup failed");
                RecommendationEntry::Failed {
                    title,
                    error: LOOKUP_FAILED.to_owned(),
                }
            }
        }
    }
}

#[async_trait]
impl<S> RecommendationsQuery for RecommendationsService<S>
where
    S: RecommendationSource,
{
    async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<Vec<RecommendationEntry>, Error> {
        let titles = self
            .source
            .suggest_titles(&request)
            .await
            .map_err(|err| map_upstream_error(err, "No recommendations available"))?;

        let mut entries = Vec::new();
        for title in normalise_titles(titles, request.limit()) {
            entries.push(self.resolve(request.kind(), title).await);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockBookCatalogue, MockMovieCatalogue, MockMusicCatalogue, MockRecommendationSource,
        MockTvCatalogue,
    };
    use crate::domain::{ErrorCode, MovieSearchPage, MovieSummary};

    fn catalogues(movies: MockMovieCatalogue) -> RecommendationCatalogues {
        RecommendationCatalogues {
            movies: Arc::new(movies),
            tv: Arc::new(MockTvCatalogue::new()),
            books: Arc::new(MockBookCatalogue::new()),
            music: Arc::new(MockMusicCatalogue::new()),
        }
    }

    fn page_with(id: u64, title: &str) -> MovieSearchPage {
        MovieSearchPage {
            movies: vec![MovieSummary {
                id,
                title: title.to_owned(),
                overview: String::new(),
                release_date: None,
                poster_url: Some(format!("https://img.example/{id}.jpg")),
                vote_average: 7.0,
                popularity: 1.0,
                genres: Vec::new(),
            }],
            total_pages: 1,
            current_page: 1,
        }
    }

    fn request() -> RecommendationRequest {
        RecommendationRequest::try_new("slow-burn space films", None, Some(3)).expect("valid")
    }

    #[tokio::test]
    async fn keeps_successes_when_one_lookup_fails() {
        let mut source = MockRecommendationSource::new();
        source.expect_suggest_titles().return_once(|_| {
            Ok(vec![
                "Solaris".to_owned(),
                "Sunshine".to_owned(),
                "Moon".to_owned(),
                "Interstellar".to_owned(),
            ])
        });
        let mut movies = MockMovieCatalogue::new();
        movies
            .expect_search()
            .times(3)
            .returning(|query, _| match query.as_ref() {
                "Solaris" => Ok(page_with(593, "Solaris")),
                "Sunshine" => Err(UpstreamError::timeout("tmdb")),
                _ => Ok(MovieSearchPage {
                    movies: Vec::new(),
                    total_pages: 0,
                    current_page: 1,
                }),
            });
        let service = RecommendationsService::new(Arc::new(source), catalogues(movies));

        let entries = service.recommend(request()).await.expect("entries");

        assert_eq!(entries.len(), 3);
        match &entries[0] {
            RecommendationEntry::Found { media, .. } => {
                assert_eq!(media.media_id(), "593");
                assert_eq!(media.media_type(), MediaKind::Movie);
            }
            other => panic!("expected a match, got {other:?}"),
        }
        assert_eq!(
            entries[1],
            RecommendationEntry::Failed {
                title: "Sunshine".into(),
                error: LOOKUP_FAILED.into(),
            }
        );
        assert_eq!(
            entries[2],
            RecommendationEntry::Failed {
                title: "Moon".into(),
                error: NO_MATCH.into(),
            }
        );
    }

    #[tokio::test]
    async fn model_failure_fails_request() {
        let mut source = MockRecommendationSource::new();
        source
            .expect_suggest_titles()
            .return_once(|_| Err(UpstreamError::transport("connection reset")));
        let service =
            RecommendationsService::new(Arc::new(source), catalogues(MockMovieCatalogue::new()));

        let error = service.recommend(request()).await.expect_err("failed");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn routes_lookups_by_media_kind() {
        let mut source = MockRecommendationSource::new();
        source
            .expect_suggest_titles()
            .return_once(|_| Ok(vec!["Dune".to_owned()]));
        let mut books = MockBookCatalogue::new();
        books.expect_search().return_once(|_, _| {
            Ok(vec![crate::domain::BookSummary {
                id: "OL893415W".into(),
                title: "Dune".into(),
                author: "Frank Herbert".into(),
                cover_url: "https://covers.example/1-M.jpg".into(),
                first_publish_year: Some(1965),
            }])
        });
        let catalogues = RecommendationCatalogues {
            books: Arc::new(books),
            ..catalogues(MockMovieCatalogue::new())
        };
        let service = RecommendationsService::new(Arc::new(source), catalogues);

        let request =
            RecommendationRequest::try_new("desert epics", Some(MediaKind::Book), None).expect("valid");
        let entries = service.recommend(request).await.expect("entries");

        match &entries[0] {
            RecommendationEntry::Found { media, .. } => {
                assert_eq!(media.media_type(), MediaKind::Book);
                assert_eq!(media.image_url(), Some("https://covers.example/1-M.jpg"));
            }
            other => panic!("expected a match, got {other:?}"),
        }
    }
}
