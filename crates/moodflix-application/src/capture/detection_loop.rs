//! Detection Loop: timer-driven sampling of the inference collaborator.
//!
//! Two states. **Idle** has no timer. **Armed** owns a timer task that spawns
//! one tick per period. Ticks are not queued behind each other: a slow tick
//! does not delay the next one, but while a report is in flight
//! ([`CaptureState`]) every new tick is a no-op.

use super::report::{ReportClient, ReportOutcome};
use super::state::CaptureState;
use moodflix_core::detection::{DetectionOverlay, DisplaySize, ExpressionDetector, FaceDetection};
use moodflix_core::expression::DominantExpression;
use moodflix_core::media::MediaStream;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Armed,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// A report was in flight, or the view closed mid-tick; nothing drawn.
    Skipped,
    /// No face, or the first face carried no scores.
    NoFace,
    /// The detector failed; handled like `NoFace`.
    DetectionFailed,
    /// Dominant expression at or below the threshold.
    BelowThreshold(DominantExpression),
    /// Report sent and its result shown.
    Reported(DominantExpression),
    /// Report sent but failed, or its result arrived after teardown.
    ReportFailed(DominantExpression),
}

/// Loop tuning, usually built from `CaptureSettings`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopConfig {
    pub period: Duration,
    /// Strict: a report needs `confidence > report_threshold`.
    pub report_threshold: f64,
    pub display_size: DisplaySize,
}

impl From<&moodflix_core::config::CaptureSettings> for LoopConfig {
    fn from(settings: &moodflix_core::config::CaptureSettings) -> Self {
        Self {
            period: settings.tick_period(),
            report_threshold: settings.report_threshold,
            display_size: settings.display_size(),
        }
    }
}

/// Everything one tick needs, shared by the timer and its tick tasks.
struct TickWorker {
    detector: Arc<dyn ExpressionDetector>,
    reporter: ReportClient,
    overlay: Arc<dyn DetectionOverlay>,
    capture: CaptureState,
    config: LoopConfig,
}

impl TickWorker {
    async fn tick(&self, stream: &MediaStream) -> TickOutcome {
        if self.capture.is_capturing() {
            return TickOutcome::Skipped;
        }

        let detections = match self.detector.detect(stream).await {
            Ok(detections) => detections,
            Err(e) => {
                tracing::warn!("[DetectionLoop] Detection pass failed: {}", e);
                return TickOutcome::DetectionFailed;
            }
        };

        if !self.reporter.is_open() {
            return TickOutcome::Skipped;
        }
        self.draw(stream, &detections);

        let Some(first) = detections.first() else {
            return TickOutcome::NoFace;
        };
        let Some(top) = first.expressions.dominant() else {
            return TickOutcome::NoFace;
        };

        if top.confidence <= self.config.report_threshold {
            return TickOutcome::BelowThreshold(top);
        }

        // Another tick may have claimed the flag while we were detecting.
        let Some(_guard) = self.capture.try_begin() else {
            return TickOutcome::Skipped;
        };

        tracing::debug!(
            "[DetectionLoop] Reporting {} ({:.2})",
            top.label,
            top.confidence
        );
        match self.reporter.report(&first.expressions).await {
            ReportOutcome::Applied => TickOutcome::Reported(top),
            ReportOutcome::Failed | ReportOutcome::Discarded => TickOutcome::ReportFailed(top),
        }
    }

    fn draw(&self, stream: &MediaStream, detections: &[FaceDetection]) {
        let source = self.detector.frame_size(stream);
        let resized: Vec<FaceDetection> = detections
            .iter()
            .map(|d| d.resized(source, self.config.display_size))
            .collect();
        self.overlay.render(&resized);
    }
}

pub struct DetectionLoop {
    worker: Arc<TickWorker>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl DetectionLoop {
    pub fn new(
        detector: Arc<dyn ExpressionDetector>,
        reporter: ReportClient,
        overlay: Arc<dyn DetectionOverlay>,
        config: LoopConfig,
    ) -> Self {
        Self {
            worker: Arc::new(TickWorker {
                detector,
                reporter,
                overlay,
                capture: CaptureState::new(),
                config,
            }),
            timer: Mutex::new(None),
        }
    }

    pub fn state(&self) -> LoopState {
        let armed = self
            .lock_timer()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished());
        if armed { LoopState::Armed } else { LoopState::Idle }
    }

    pub fn is_capturing(&self) -> bool {
        self.worker.capture.is_capturing()
    }

    /// Idle -> Armed: starts sampling `stream` every period.
    ///
    /// Any previously registered timer is cancelled first, so re-arming never
    /// leaves two timers running. Must be called inside a Tokio runtime.
    pub fn arm(&self, stream: MediaStream) {
        self.arm_if(stream, || true);
    }

    /// Arms only if `still_wanted` holds, checked under the timer lock.
    ///
    /// A concurrent [`disarm`](Self::disarm) either runs before the check or
    /// waits for the new timer and aborts it.
    pub fn arm_if(&self, stream: MediaStream, still_wanted: impl FnOnce() -> bool) -> bool {
        let mut timer = self.lock_timer();
        if !still_wanted() {
            return false;
        }
        if let Some(previous) = timer.take() {
            previous.abort();
            tracing::debug!("[DetectionLoop] Cleared previous timer");
        }

        let worker = Arc::clone(&self.worker);
        let period = worker.config.period;
        *timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let worker = Arc::clone(&worker);
                let stream = stream.clone();
                tokio::spawn(async move {
                    let outcome = worker.tick(&stream).await;
                    tracing::debug!("[DetectionLoop] Tick: {:?}", outcome);
                });
            }
        }));

        tracing::info!(
            "[DetectionLoop] Armed ({}ms period, threshold {})",
            period.as_millis(),
            self.worker.config.report_threshold
        );
        true
    }

    /// Armed -> Idle. In-flight ticks are not cancelled.
    pub fn disarm(&self) -> bool {
        match self.lock_timer().take() {
            Some(handle) => {
                handle.abort();
                tracing::info!("[DetectionLoop] Disarmed");
                true
            }
            None => false,
        }
    }

    /// Runs one tick immediately, outside the timer.
    pub async fn tick(&self, stream: &MediaStream) -> TickOutcome {
        self.worker.tick(stream).await
    }

    fn lock_timer(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        match self.timer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for DetectionLoop {
    fn drop(&mut self) {
        self.disarm();
    }
}
