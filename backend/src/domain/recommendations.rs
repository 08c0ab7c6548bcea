//! Prompt-driven recommendations.

use serde::Serialize;

use super::{MediaKind, MediaRef};

/// Titles requested when the caller does not specify a limit.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 5;
/// Upper bound on titles requested from the language model.
pub const MAX_RECOMMENDATION_LIMIT: usize = 10;
/// Upper bound on prompt length in characters.
pub const MAX_PROMPT_CHARS: usize = 500;

/// Validation errors for recommendation requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecommendationValidationError {
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error("prompt must be at most {max} characters")]
    PromptTooLong { max: usize },
    #[error("limit must be between 1 and {max}")]
    InvalidLimit { max: usize },
}

/// A validated recommendation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRequest {
    prompt: String,
    kind: MediaKind,
    limit: usize,
}

impl RecommendationRequest {
    pub fn try_new(
        prompt: &str,
        kind: Option<MediaKind>,
        limit: Option<i64>,
    ) -> Result<Self, RecommendationValidationError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(RecommendationValidationError::EmptyPrompt);
        }
        if prompt.chars().count() > MAX_PROMPT_CHARS {
            return Err(RecommendationValidationError::PromptTooLong {
                max: MAX_PROMPT_CHARS,
            });
        }
        let limit = match limit {
            None => DEFAULT_RECOMMENDATION_LIMIT,
            Some(raw) => usize::try_from(raw)
                .ok()
                .filter(|value| (1..=MAX_RECOMMENDATION_LIMIT).contains(value))
                .ok_or(RecommendationValidationError::InvalidLimit {
                    max: MAX_RECOMMENDATION_LIMIT,
                })?,
        };
        Ok(Self {
            prompt: prompt.to_owned(),
            kind: kind.unwrap_or(MediaKind::Movie),
            limit,
        })
    }

    pub fn prompt(&self) -> &str {
        self.prompt.as_str()
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Outcome of resolving one suggested title against a catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecommendationEntry {
    /// The title resolved to a catalogue record.
    Found { title: String, media: MediaRef },
    /// The lookup failed; the error is reported inline.
    Failed { title: String, error: String },
}

impl RecommendationEntry {
    pub fn title(&self) -> &str {
        match self {
            Self::Found { title, .. } | Self::Failed { title, .. } => title.as_str(),
        }
    }
}

/// Normalise titles returned by the language model: trim, drop blanks and
/// case-insensitive duplicates, and cap at `limit`.
pub fn normalise_titles(titles: Vec<String>, limit: usize) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(limit);
    for title in titles {
        let trimmed = title.trim();
        if trimmed.is_empty()
            || kept
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(trimmed))
        {
            continue;
        }
        kept.push(trimmed.to_owned());
        if kept.len() == limit {
            break;
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_kind_and_limit() {
        let request = RecommendationRequest::try_new("cosy mysteries", None, None)
            .expect("valid request");
        assert_eq!(request.kind(), MediaKind::Movie);
        assert_eq!(request.limit(), DEFAULT_RECOMMENDATION_LIMIT);
    }

    #[rstest]
    #[case(0)]
    #[case(11)]
    #[case(-3)]
    fn rejects_bad_limits(#[case] limit: i64) {
        assert_eq!(
            RecommendationRequest::try_new("x", None, Some(limit)),
            Err(RecommendationValidationError::InvalidLimit {
                max: MAX_RECOMMENDATION_LIMIT
            })
        );
    }

    #[rstest]
    fn rejects_blank_prompt() {
        assert_eq!(
            RecommendationRequest::try_new("  ", Some(MediaKind::Book), None),
            Err(RecommendationValidationError::EmptyPrompt)
        );
    }

    #[rstest]
    fn normalises_model_titles() {
        let titles = vec![
            " Dune ".to_owned(),
            "dune".to_owned(),
            String::new(),
            "Arrival".to_owned(),
            "Contact".to_owned(),
        ];
        assert_eq!(normalise_titles(titles, 2), vec!["Dune", "Arrival"]);
    }
}
