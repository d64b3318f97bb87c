//! Recommendation collaborator boundary.

use crate::error::Result;
use crate::expression::ExpressionSample;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Movies suggested for a detected emotion.
///
/// Field names follow the backend's JSON (`detected_emotion`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub detected_emotion: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Backend that turns an expression sample into movie recommendations.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn recommend(&self, sample: &ExpressionSample) -> Result<RecommendationResult>;
}
