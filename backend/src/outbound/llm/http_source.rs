//! Reqwest-backed recommendation source speaking the OpenAI chat
//! completions protocol.
//!
//! The model is asked for one title per line. Parsing is forgiving about
//! list markers and quotes; blanks and duplicates are left for the domain
//! to normalise.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{ChatMessageDto, ChatRequestDto, ChatResponseDto};
use crate::domain::RecommendationRequest;
use crate::domain::ports::{RecommendationSource, UpstreamError};
use crate::outbound::http_support::{build_client, fetch_json};

const PROVIDER: &str = "LLM";
const TEMPERATURE: f32 = 0.7;

/// Default OpenAI-compatible API root.
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
/// Default chat model.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You recommend media titles. Reply with one title per line \
and nothing else: no numbering, no commentary, no release years.";

/// Chat-completions adapter implementing [`RecommendationSource`].
pub struct ChatCompletionsSource {
    client: Client,
    base_url: Url,
    api_key: Option<Zeroizing<String>>,
    model: String,
}

impl ChatCompletionsSource {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        api_key: Option<Zeroizing<String>>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
        })
    }
}

fn user_prompt(request: &RecommendationRequest) -> String {
    format!(
        "Suggest {limit} {kind} titles for this request: {prompt}",
        limit = request.limit(),
        kind = request.kind().as_str(),
        prompt = request.prompt(),
    )
}

/// Split a model reply into candidate titles.
fn parse_titles(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(strip_list_marker)
        .map(|line| {
            line.trim()
                .trim_matches(|ch: char| matches!(ch, '"' | '\'' | '*'))
                .trim()
        })
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))
    {
        return rest;
    }
    let rest = line.trim_start_matches(|ch: char| ch.is_ascii_digit());
    if rest.len() == line.len() {
        return line;
    }
    rest.strip_prefix('.')
        .or_else(|| rest.strip_prefix(')'))
        .unwrap_or(line)
}

#[async_trait]
impl RecommendationSource for ChatCompletionsSource {
    async fn suggest_titles(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<String>, UpstreamError> {
        let key = self
            .api_key
            .as_ref()
            .ok_or_else(|| UpstreamError::not_configured(PROVIDER))?;
        let prompt = user_prompt(request);
        let body = ChatRequestDto {
            model: self.model.as_str(),
            messages: [
                ChatMessageDto {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessageDto {
                    role: "user",
                    content: prompt.as_str(),
                },
            ],
            temperature: TEMPERATURE,
        };
        let url = format!(
            "{}/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        );
        let request_builder = self
            .client
            .post(url)
            .bearer_auth(key.as_str())
            .json(&body);

        let decoded: ChatResponseDto = fetch_json(PROVIDER, request_builder).await?;
        let reply = decoded
            .into_text()
            .ok_or_else(|| UpstreamError::decode("LLM reply had no content"))?;
        let titles = parse_titles(&reply);
        debug!(model = %self.model, count = titles.len(), "model suggested titles");
        Ok(titles)
    }
}
