//! Reqwest-backed OpenLibrary adapter.
//!
//! OpenLibrary needs no credentials. Work details take one extra request per
//! author; an author lookup that fails is skipped rather than failing the
//! whole record.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use tracing::debug;

use super::dto::{AuthorDto, SearchResponseDto, WorkDto, work_id};
use crate::domain::ports::{BookCatalogue, UpstreamError};
use crate::domain::{BookDetails, BookSummary, SearchQuery};
use crate::outbound::http_support::{build_client, fetch_json};

const PROVIDER: &str = "OpenLibrary";

/// Default OpenLibrary root.
pub const DEFAULT_OPENLIBRARY_BASE_URL: &str = "https://openlibrary.org";

/// OpenLibrary adapter implementing [`BookCatalogue`].
pub struct OpenLibraryHttpSource {
    client: Client,
    base_url: Url,
}

impl OpenLibraryHttpSource {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        self.client.get(format!("{base}/{path}"))
    }

    async fn author_names(&self, keys: Vec<String>) -> Vec<String> {
        let mut names = Vec::with_capacity(keys.len());
        for key in keys {
            match fetch_json::<AuthorDto>(PROVIDER, self.get(&format!("{key}.json"))).await {
                Ok(AuthorDto { name: Some(name) }) if !name.trim().is_empty() => names.push(name),
                Ok(_) => debug!(%key, "author record has no name"),
                Err(error) => debug!(%key, %error, "author lookup failed; skipping"),
            }
        }
        names
    }
}

fn validate_work_id(raw: &str) -> Result<&str, UpstreamError> {
    let id = work_id(raw.trim());
    if id.is_empty() || !id.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return Err(UpstreamError::rejected(format!("invalid work id: {raw}")));
    }
    Ok(id)
}

#[async_trait]
impl BookCatalogue for OpenLibraryHttpSource {
    async fn search(
        &self,
        query: &SearchQuery,
        limit: usize,
    ) -> Result<Vec<BookSummary>, UpstreamError> {
        let limit = limit.max(1).to_string();
        let request = self
            .get("search.json")
            .query(&[("q", query.as_ref()), ("limit", limit.as_str())]);
        let decoded: SearchResponseDto = fetch_json(PROVIDER, request).await?;
        Ok(decoded.into_domain())
    }

    async fn details(&self, work_id: &str) -> Result<BookDetails, UpstreamError> {
        let id = validate_work_id(work_id)?;
        let work: WorkDto = fetch_json(PROVIDER, self.get(&format!("works/{id}.json"))).await?;
        let authors = self.author_names(work.author_keys()).await;
        Ok(work.into_domain(id, authors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::http_support::decode_json;
    use rstest::rstest;

    #[rstest]
    #[case::bare("OL45804W", "OL45804W")]
    #[case::prefixed("/works/OL45804W", "OL45804W")]
    #[case::padded("  OL45804W ", "OL45804W")]
    fn accepts_work_keys(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(validate_work_id(raw).expect("valid"), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::traversal("../authors/OL1A")]
    #[case::query("OL1W?x=1")]
    fn rejects_malformed_work_keys(#[case] raw: &str) {
        assert!(matches!(
            validate_work_id(raw),
            Err(UpstreamError::Rejected { .. })
        ));
    }

    #[rstest]
    fn search_fills_defaults() {
        let body = br#"{"docs": [
            {"key": "/works/OL27448W", "title": "The Lord of the Rings",
             "author_name": ["J.R.R. Tolkien", "Someone Else"], "cover_i": 14625765,
             "first_publish_year": 1954},
            {"key": "/works/OL1W"}
        ]}"#;

        let books = decode_json::<SearchResponseDto>("OpenLibrary", body)
            .expect("decodes")
            .into_domain();

        assert_eq!(books[0].id, "OL27448W");
        assert_eq!(books[0].author, "J.R.R. Tolkien");
        assert_eq!(
            books[0].cover_url,
            "https://covers.openlibrary.org/b/id/14625765-M.jpg"
        );
        assert_eq!(books[1].title, "Unknown Title");
        assert_eq!(books[1].author, "Unknown Author");
        assert_eq!(
            books[1].cover_url,
            "https://covers.openlibrary.org/b/id/10909258-M.jpg"
        );
    }

    #[rstest]
    #[case::plain(r#""A hobbit goes on an adventure.""#)]
    #[case::typed(r#"{"type": "/type/text", "value": "A hobbit goes on an adventure."}"#)]
    fn work_description_accepts_both_shapes(#[case] description: &str) {
        let body = format!(
            r#"{{"key": "/works/OL262758W", "title": "The Hobbit", "description": {description},
                "subjects": ["Fantasy", "Dragons", "Dwarves", "Wizards"],
                "covers": [6979861, 1],
                "languages": [{{"key": "/languages/eng"}}],
                "authors": [{{"author": {{"key": "/authors/OL26320A"}}}}, {{"type": "x"}}]}}"#
        );

        let work = decode_json::<WorkDto>("OpenLibrary", body.as_bytes()).expect("decodes");
        assert_eq!(work.author_keys(), vec!["/authors/OL26320A".to_owned()]);

        let details = work.into_domain("OL262758W", vec!["J.R.R. Tolkien".into()]);
        assert_eq!(details.description, "A hobbit goes on an adventure.");
        assert_eq!(details.genres, vec!["Fantasy", "Dragons", "Dwarves"]);
        assert_eq!(details.languages, vec!["ENG"]);
        assert_eq!(
            details.cover_url,
            "https://covers.openlibrary.org/b/id/6979861-L.jpg"
        );
    }

    #[rstest]
    fn sparse_work_uses_placeholders() {
        let work = decode_json::<WorkDto>("OpenLibrary", br#"{"title": "Sparse"}"#)
            .expect("decodes");

        let details = work.into_domain("OL9W", Vec::new());
        assert_eq!(details.id, "OL9W");
        assert_eq!(details.authors, vec!["Unknown Author"]);
        assert_eq!(details.genres, vec!["Unknown Genre"]);
        assert_eq!(details.languages, vec!["Unknown Language"]);
        assert_eq!(details.description, "No description available");
        assert_eq!(details.publish_date, None);
        assert!(details.cover_url.ends_with("/10909258-L.jpg"));
    }
}
