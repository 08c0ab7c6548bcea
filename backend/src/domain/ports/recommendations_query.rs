//! Driving port for prompt-based recommendations.

use async_trait::async_trait;

use crate::domain::{Error, RecommendationEntry, RecommendationRequest};

#[async_trait]
pub trait RecommendationsQuery: Send + Sync {
    /// Ask the model for titles, then resolve each against the catalogue
    /// for the requested media kind. Lookup failures are reported inline.
    async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<Vec<RecommendationEntry>, Error>;
}
