//! Report Client: best-effort delivery of a qualifying sample.

use super::display::DisplayState;
use moodflix_core::expression::ExpressionSample;
use moodflix_core::recommendation::RecommendationService;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Backend answered and the display was updated.
    Applied,
    /// Backend answered after the view was torn down; result dropped.
    Discarded,
    /// Request failed; display left unchanged.
    Failed,
}

/// Sends one sample and absorbs the answer into [`DisplayState`].
///
/// Never returns an error: failures are logged and the display keeps its
/// previous (possibly empty) content. No retries.
#[derive(Clone)]
pub struct ReportClient {
    service: Arc<dyn RecommendationService>,
    display: Arc<DisplayState>,
}

impl ReportClient {
    pub fn new(service: Arc<dyn RecommendationService>, display: Arc<DisplayState>) -> Self {
        Self { service, display }
    }

    pub async fn report(&self, sample: &ExpressionSample) -> ReportOutcome {
        let Some(epoch) = self.display.epoch() else {
            tracing::debug!("[ReportClient] View closed, not reporting");
            return ReportOutcome::Discarded;
        };

        match self.service.recommend(sample).await {
            Ok(result) => {
                let emotion = result.detected_emotion.clone();
                let count = result.recommendations.len();
                if self.display.apply(epoch, result) {
                    tracing::info!(
                        "[ReportClient] Detected emotion: {} ({} recommendations)",
                        emotion,
                        count
                    );
                    ReportOutcome::Applied
                } else {
                    ReportOutcome::Discarded
                }
            }
            Err(e) if e.is_transient() => {
                tracing::warn!("[ReportClient] Error sending expressions to backend: {}", e);
                ReportOutcome::Failed
            }
            Err(e) => {
                tracing::error!("[ReportClient] Error sending expressions to backend: {}", e);
                ReportOutcome::Failed
            }
        }
    }

    /// False once the view has been torn down.
    pub fn is_open(&self) -> bool {
        self.display.epoch().is_some()
    }
}
