//! RecommendationApiClient - REST client for the movie recommendation backend.
//!
//! `POST {base}/detect_emotion/` with `{ "expressions": { label: confidence } }`,
//! answered by `{ "detected_emotion": "...", "recommendations": [...] }`.

use crate::endpoint;
use async_trait::async_trait;
use moodflix_core::config::ServiceEndpoints;
use moodflix_core::error::{MoodflixError, Result};
use moodflix_core::expression::ExpressionSample;
use moodflix_core::recommendation::{RecommendationResult, RecommendationService};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DETECT_EMOTION_PATH: &str = "detect_emotion/";

/// Client that asks the recommendation backend for movies matching a sample.
#[derive(Clone)]
pub struct RecommendationApiClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Serialize)]
struct DetectEmotionRequest<'a> {
    expressions: &'a ExpressionSample,
}

/// The backend answers an empty sample with `200 {"error": "..."}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DetectEmotionResponse {
    Recommendations(RecommendationResult),
    Rejected { error: String },
}

impl RecommendationApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn from_endpoints(endpoints: &ServiceEndpoints) -> Self {
        Self::new(
            endpoints.recommendation_url.clone(),
            endpoints.request_timeout(),
        )
    }
}

#[async_trait]
impl RecommendationService for RecommendationApiClient {
    async fn recommend(&self, sample: &ExpressionSample) -> Result<RecommendationResult> {
        let url = endpoint(&self.base_url, DETECT_EMOTION_PATH);

        let response = self
            .client
            .post(&url)
            .json(&DetectEmotionRequest {
                expressions: sample,
            })
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| MoodflixError::network(format!("Failed to reach {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MoodflixError::http(status.as_u16(), error_text));
        }

        match response.json::<DetectEmotionResponse>().await? {
            DetectEmotionResponse::Recommendations(result) => {
                tracing::debug!(
                    "[RecommendationApi] {} -> {} recommendations",
                    result.detected_emotion,
                    result.recommendations.len()
                );
                Ok(result)
            }
            DetectEmotionResponse::Rejected { error } => {
                Err(MoodflixError::http(status.as_u16(), error))
            }
        }
    }
}
