//! Driven port for the language model that proposes titles.
use async_trait::async_trait;

use crate::domain::RecommendationRequest;

use super::UpstreamError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Ask the model for titles matching the request's prompt and media
    /// kind. The result may contain blanks or duplicates; callers normalise.
    async fn suggest_titles(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<String>, UpstreamError>;
}
