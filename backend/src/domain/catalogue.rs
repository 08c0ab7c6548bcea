//! Read models for third-party metadata (films, series, books and tracks).
//!
//! Provider adapters decode their payloads into these types; the domain adds
//! local filtering on top (release year, score, genres) that the providers'
//! search endpoints do not offer.

use serde::Serialize;

/// Base URL prepended to TMDB poster and profile paths.
pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Number of cast members kept on movie details.
pub const CAST_LIMIT: usize = 20;

/// Number of titles returned by suggestion endpoints.
pub const SUGGESTION_LIMIT: usize = 5;

/// Fixed TMDB movie genre table.
const TMDB_GENRES: [(u32, &str); 19] = [
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// Resolve a TMDB genre id to its display name.
///
/// # Examples
/// ```
/// use encyclomedia::domain::genre_name;
///
/// assert_eq!(genre_name(878), Some("Science Fiction"));
/// assert_eq!(genre_name(1), None);
/// ```
pub fn genre_name(id: u32) -> Option<&'static str> {
    TMDB_GENRES
        .iter()
        .find(|(genre_id, _)| *genre_id == id)
        .map(|(_, name)| *name)
}

/// Prefix a TMDB image path with the CDN base.
pub fn tmdb_image_url(path: Option<&str>) -> Option<String> {
    path.filter(|value| !value.is_empty())
        .map(|value| format!("{TMDB_IMAGE_BASE}{value}"))
}

/// Validation errors for catalogue searches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchValidationError {
    #[error("query parameter is required")]
    EmptyQuery,
    #[error("page must be at least 1")]
    InvalidPage,
}

/// Non-blank free-text search string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn new(raw: impl Into<String>) -> Result<Self, SearchValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SearchValidationError::EmptyQuery);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for SearchQuery {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// One film in a search or trending listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub release_date: Option<String>,
    pub poster_url: Option<String>,
    pub vote_average: f64,
    pub popularity: f64,
    pub genres: Vec<String>,
}

impl MovieSummary {
    /// Four-digit release year parsed from `release_date`.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
    }
}

/// Page of film search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSearchPage {
    pub movies: Vec<MovieSummary>,
    pub total_pages: u32,
    pub current_page: u32,
}

/// Optional local filters applied to film search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieFilters {
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
    pub rating_min: Option<f64>,
    pub rating_max: Option<f64>,
    /// Every listed genre must be present, compared by exact name.
    pub genres: Vec<String>,
}

impl MovieFilters {
    /// Parse the comma-separated genre filter used by the search endpoint.
    pub fn parse_genres(raw: Option<&str>) -> Vec<String> {
        raw.map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|genre| !genre.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether `movie` satisfies every configured filter.
    ///
    /// A film with no release date passes the year bounds.
    pub fn matches(&self, movie: &MovieSummary) -> bool {
        let year_ok = movie.release_year().is_none_or(|year| {
            self.year_start.is_none_or(|bound| year >= bound)
                && self.year_end.is_none_or(|bound| year <= bound)
        });
        let rating_ok = self
            .rating_min
            .is_none_or(|bound| movie.vote_average >= bound)
            && self
                .rating_max
                .is_none_or(|bound| movie.vote_average <= bound);
        let genres_ok = self.genres.iter().all(|wanted| {
            movie
                .genres
                .iter()
                .any(|genre| genre == wanted)
        });
        year_ok && rating_ok && genres_ok
    }
}

/// Member of a film's cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub name: String,
    pub character: String,
    pub profile_url: Option<String>,
}

/// Full film record with cast.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub tagline: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub vote_average: f64,
    pub genres: Vec<String>,
    pub cast: Vec<CastMember>,
}

/// One television series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TvShow {
    pub id: u64,
    pub name: String,
    pub overview: String,
    pub first_air_date: Option<String>,
    pub poster_url: Option<String>,
    pub vote_average: f64,
    pub popularity: f64,
}

/// One book in a search listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSummary {
    /// OpenLibrary work key without the `/works/` prefix.
    pub id: String,
    pub title: String,
    pub author: String,
    pub cover_url: String,
    pub first_publish_year: Option<i32>,
}

/// Full book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetails {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    pub genres: Vec<String>,
    pub languages: Vec<String>,
    pub publish_date: Option<String>,
    pub cover_url: String,
}

/// One music track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover_url: Option<String>,
    pub preview_url: Option<String>,
    pub duration_secs: u32,
}
