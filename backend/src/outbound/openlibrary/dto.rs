//! Transport DTOs for OpenLibrary search, work and author documents.

use serde::Deserialize;

use crate::domain::{BookDetails, BookSummary};

/// Cover shown when OpenLibrary has no cover for a work.
const DEFAULT_COVER_ID: i64 = 10_909_258;
const COVERS_BASE: &str = "https://covers.openlibrary.org/b/id";
const GENRE_LIMIT: usize = 3;

const UNKNOWN_AUTHOR: &str = "Unknown Author";
const UNKNOWN_TITLE: &str = "Unknown Title";
const UNKNOWN_GENRE: &str = "Unknown Genre";
const UNKNOWN_LANGUAGE: &str = "Unknown Language";
const NO_DESCRIPTION: &str = "No description available";

#[derive(Debug, Clone, Copy)]
pub(super) enum CoverSize {
    Medium,
    Large,
}

pub(super) fn cover_url(cover_id: Option<i64>, size: CoverSize) -> String {
    let suffix = match size {
        CoverSize::Medium => "M",
        CoverSize::Large => "L",
    };
    let id = cover_id.unwrap_or(DEFAULT_COVER_ID);
    format!("{COVERS_BASE}/{id}-{suffix}.jpg")
}

/// Strip the `/works/` prefix from a work key.
pub(super) fn work_id(key: &str) -> &str {
    key.trim_start_matches("/works/")
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchResponseDto {
    #[serde(default)]
    pub(super) docs: Vec<SearchDocDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchDocDto {
    #[serde(default)]
    pub(super) key: String,
    pub(super) title: Option<String>,
    #[serde(default)]
    pub(super) author_name: Vec<String>,
    pub(super) cover_i: Option<i64>,
    pub(super) first_publish_year: Option<i32>,
}

impl SearchResponseDto {
    pub(super) fn into_domain(self) -> Vec<BookSummary> {
        self.docs
            .into_iter()
            .map(|doc| BookSummary {
                id: work_id(&doc.key).to_owned(),
                title: doc.title.unwrap_or_else(|| UNKNOWN_TITLE.to_owned()),
                author: doc
                    .author_name
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| UNKNOWN_AUTHOR.to_owned()),
                cover_url: cover_url(doc.cover_i, CoverSize::Medium),
                first_publish_year: doc.first_publish_year,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct WorkDto {
    #[serde(default)]
    pub(super) key: String,
    pub(super) title: Option<String>,
    #[serde(default)]
    pub(super) authors: Vec<WorkAuthorDto>,
    pub(super) description: Option<TextValueDto>,
    #[serde(default)]
    pub(super) subjects: Vec<String>,
    #[serde(default)]
    pub(super) covers: Vec<i64>,
    #[serde(default)]
    pub(super) languages: Vec<KeyRefDto>,
    pub(super) first_publish_date: Option<String>,
    pub(super) created: Option<TypedValueDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WorkAuthorDto {
    pub(super) author: Option<KeyRefDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct KeyRefDto {
    pub(super) key: String,
}

/// Descriptions arrive either as a bare string or as `{type, value}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum TextValueDto {
    Plain(String),
    Typed(TypedValueDto),
}

#[derive(Debug, Deserialize)]
pub(super) struct TypedValueDto {
    pub(super) value: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct AuthorDto {
    pub(super) name: Option<String>,
}

impl TextValueDto {
    fn into_text(self) -> String {
        match self {
            Self::Plain(text) => text,
            Self::Typed(typed) => typed.value,
        }
    }
}

impl WorkDto {
    /// Author document keys, for example `/authors/OL23919A`.
    pub(super) fn author_keys(&self) -> Vec<String> {
        self.authors
            .iter()
            .filter_map(|entry| entry.author.as_ref())
            .map(|author| author.key.clone())
            .filter(|key| !key.is_empty())
            .collect()
    }

    /// Build the domain record; `authors` holds the names resolved so far.
    pub(super) fn into_domain(self, requested_id: &str, authors: Vec<String>) -> BookDetails {
        let id = if self.key.is_empty() {
            requested_id.to_owned()
        } else {
            work_id(&self.key).to_owned()
        };
        let mut genres: Vec<String> = self.subjects.into_iter().take(GENRE_LIMIT).collect();
        if genres.is_empty() {
            genres.push(UNKNOWN_GENRE.to_owned());
        }
        let mut languages: Vec<String> = self
            .languages
            .iter()
            .filter_map(|language| language.key.rsplit('/').next())
            .filter(|code| !code.is_empty())
            .map(str::to_uppercase)
            .collect();
        if languages.is_empty() {
            languages.push(UNKNOWN_LANGUAGE.to_owned());
        }

        BookDetails {
            id,
            title: self.title.unwrap_or_else(|| UNKNOWN_TITLE.to_owned()),
            authors: if authors.is_empty() {
                vec![UNKNOWN_AUTHOR.to_owned()]
            } else {
                authors
            },
            description: self
                .description
                .map(TextValueDto::into_text)
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| NO_DESCRIPTION.to_owned()),
            genres,
            languages,
            publish_date: self
                .first_publish_date
                .or_else(|| self.created.map(|created| created.value)),
            cover_url: cover_url(self.covers.first().copied(), CoverSize::Large),
        }
    }
}
