//! Transport DTOs for TMDB JSON responses.
//!
//! TMDB returns empty strings for unknown dates and `null` for missing image
//! paths; both become `None` on the way into domain records.

use serde::Deserialize;

use crate::domain::{
    CAST_LIMIT, CastMember, MovieDetails, MovieSearchPage, MovieSummary, TvShow, genre_name,
    tmdb_image_url,
};

#[derive(Debug, Deserialize)]
pub(super) struct MoviePageDto {
    #[serde(default = "first_page")]
    pub(super) page: u32,
    #[serde(default)]
    pub(super) total_pages: u32,
    #[serde(default)]
    pub(super) results: Vec<MovieResultDto>,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub(super) struct MovieResultDto {
    pub(super) id: u64,
    #[serde(default)]
    pub(super) title: String,
    #[serde(default)]
    pub(super) overview: String,
    pub(super) release_date: Option<String>,
    pub(super) poster_path: Option<String>,
    #[serde(default)]
    pub(super) vote_average: f64,
    #[serde(default)]
    pub(super) popularity: f64,
    #[serde(default)]
    pub(super) genre_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MovieDetailsDto {
    pub(super) id: u64,
    #[serde(default)]
    pub(super) title: String,
    #[serde(default)]
    pub(super) overview: String,
    pub(super) tagline: Option<String>,
    pub(super) release_date: Option<String>,
    pub(super) runtime: Option<u32>,
    pub(super) poster_path: Option<String>,
    pub(super) backdrop_path: Option<String>,
    #[serde(default)]
    pub(super) vote_average: f64,
    #[serde(default)]
    pub(super) genres: Vec<GenreDto>,
    #[serde(default)]
    pub(super) credits: CreditsDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenreDto {
    pub(super) name: String,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CreditsDto {
    #[serde(default)]
    pub(super) cast: Vec<CastDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CastDto {
    #[serde(default)]
    pub(super) name: String,
    #[serde(default)]
    pub(super) character: String,
    pub(super) profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct LatestMovieDto {
    pub(super) id: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct TvPageDto {
    #[serde(default)]
    pub(super) results: Vec<TvResultDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TvResultDto {
    pub(super) id: u64,
    #[serde(default)]
    pub(super) name: String,
    #[serde(default)]
    pub(super) overview: String,
    pub(super) first_air_date: Option<String>,
    pub(super) poster_path: Option<String>,
    #[serde(default)]
    pub(super) vote_average: f64,
    #[serde(default)]
    pub(super) popularity: f64,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl MoviePageDto {
    pub(super) fn into_domain(self) -> MovieSearchPage {
        MovieSearchPage {
            movies: self
                .results
                .into_iter()
                .map(MovieResultDto::into_domain)
                .collect(),
            total_pages: self.total_pages,
            current_page: self.page,
        }
    }
}

impl MovieResultDto {
    fn into_domain(self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title,
            overview: self.overview,
            release_date: non_blank(self.release_date),
            poster_url: tmdb_image_url(self.poster_path.as_deref()),
            vote_average: self.vote_average,
            popularity: self.popularity,
            genres: self
                .genre_ids
                .into_iter()
                .filter_map(genre_name)
                .map(str::to_owned)
                .collect(),
        }
    }
}

impl MovieDetailsDto {
    pub(super) fn into_domain(self) -> MovieDetails {
        MovieDetails {
            id: self.id,
            title: self.title,
            overview: self.overview,
            tagline: non_blank(self.tagline),
            release_date: non_blank(self.release_date),
            runtime: self.runtime,
            poster_url: tmdb_image_url(self.poster_path.as_deref()),
            backdrop_url: tmdb_image_url(self.backdrop_path.as_deref()),
            vote_average: self.vote_average,
            genres: self.genres.into_iter().map(|genre| genre.name).collect(),
            cast: self
                .credits
                .cast
                .into_iter()
                .take(CAST_LIMIT)
                .map(|member| CastMember {
                    name: member.name,
                    character: member.character,
                    profile_url: tmdb_image_url(member.profile_path.as_deref()),
                })
                .collect(),
        }
    }
}

impl TvPageDto {
    /// Shows in the order TMDB returned them.
    pub(super) fn into_domain(self) -> Vec<TvShow> {
        self.results
            .into_iter()
            .map(|show| TvShow {
                id: show.id,
                name: show.name,
                overview: show.overview,
                first_air_date: non_blank(show.first_air_date),
                poster_url: tmdb_image_url(show.poster_path.as_deref()),
                vote_average: show.vote_average,
                popularity: show.popularity,
            })
            .collect()
    }
}
