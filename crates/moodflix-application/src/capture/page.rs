//! The capture view: gate, camera, detection loop and recommendations wired
//! together with a mount/unmount lifecycle.

use super::detection_loop::{DetectionLoop, LoopConfig, LoopState};
use super::display::DisplayState;
use super::gate::{GateDecision, SessionGate};
use super::media::MediaAcquirer;
use super::report::ReportClient;
use crate::session::SessionContext;
use moodflix_core::config::CaptureSettings;
use moodflix_core::detection::{DetectionOverlay, ExpressionDetector, NoopOverlay};
use moodflix_core::media::CameraDevice;
use moodflix_core::recommendation::{RecommendationResult, RecommendationService};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Collaborators the capture view is built from.
pub struct CaptureDeps {
    pub session: SessionContext,
    pub camera: Arc<dyn CameraDevice>,
    pub detector: Arc<dyn ExpressionDetector>,
    pub recommendations: Arc<dyn RecommendationService>,
    pub overlay: Arc<dyn DetectionOverlay>,
    pub settings: CaptureSettings,
}

impl CaptureDeps {
    pub fn new(
        session: SessionContext,
        camera: Arc<dyn CameraDevice>,
        detector: Arc<dyn ExpressionDetector>,
        recommendations: Arc<dyn RecommendationService>,
    ) -> Self {
        Self {
            session,
            camera,
            detector,
            recommendations,
            overlay: Arc::new(NoopOverlay),
            settings: CaptureSettings::default(),
        }
    }

    pub fn with_overlay(mut self, overlay: Arc<dyn DetectionOverlay>) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn with_settings(mut self, settings: CaptureSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// What the capture view renders right now.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureView {
    SignInRequired {
        notice: &'static str,
        redirect_to: &'static str,
    },
    Capturing {
        live_feed: bool,
        loop_state: LoopState,
        detected_emotion: Option<String>,
        recommendations: Vec<String>,
    },
}

struct PageInner {
    gate: SessionGate,
    media: MediaAcquirer,
    detection: DetectionLoop,
    display: Arc<DisplayState>,
    detector: Arc<dyn ExpressionDetector>,
    model_uri: String,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl PageInner {
    /// Loads models, opens the camera, then arms the loop.
    ///
    /// Any failure is logged and leaves the loop Idle.
    async fn start(self: Arc<Self>, epoch: u64) {
        if let Err(e) = self.detector.load_models(&self.model_uri).await {
            tracing::error!("[CapturePage] Error loading models: {}", e);
            return;
        }
        tracing::info!("[CapturePage] Models loaded");

        let Ok(stream) = self.media.acquire().await else {
            // Already logged by the acquirer; capture UI stays without a feed.
            return;
        };

        let stream_id = stream.id().to_string();
        let armed = self
            .detection
            .arm_if(stream, || self.display.epoch() == Some(epoch));
        if !armed {
            tracing::debug!("[CapturePage] Torn down while starting, releasing stream");
            self.media.release_if_held(&stream_id);
        }
    }

    /// Disarms the loop and releases the stream in one pass.
    ///
    /// The display closes first so a concurrent `start` sees a stale epoch
    /// before its arm check.
    fn teardown(&self) {
        self.display.close();
        self.detection.disarm();
        self.media.release();

        let tasks = match self.tasks.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        for task in tasks {
            task.abort();
        }
    }

    fn track(&self, task: JoinHandle<()>) {
        match self.tasks.lock() {
            Ok(mut guard) => guard.push(task),
            Err(poisoned) => poisoned.into_inner().push(task),
        }
    }
}

/// The emotion-detection page.
///
/// `mount` corresponds to the view appearing, `unmount` to it going away.
/// Both are safe to call repeatedly.
pub struct CapturePage {
    inner: Arc<PageInner>,
}

impl CapturePage {
    pub fn new(deps: CaptureDeps) -> Self {
        let display = Arc::new(DisplayState::new());
        let reporter = ReportClient::new(deps.recommendations, Arc::clone(&display));
        let detection = DetectionLoop::new(
            Arc::clone(&deps.detector),
            reporter,
            deps.overlay,
            LoopConfig::from(&deps.settings),
        );

        Self {
            inner: Arc::new(PageInner {
                gate: SessionGate::new(deps.session),
                media: MediaAcquirer::new(deps.camera),
                detection,
                display,
                detector: deps.detector,
                model_uri: deps.settings.model_uri,
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Shows the view. Must be called inside a Tokio runtime.
    ///
    /// When the gate redirects, nothing is started: no camera request, no
    /// timer. Otherwise startup runs in the background and a watcher tears
    /// the view down as soon as the session ends.
    pub fn mount(&self) -> GateDecision {
        // Subscribe before evaluating so a logout in between is not missed.
        let mut session_rx = self.inner.gate.watch();
        session_rx.borrow_and_update();
        let mounted_logouts = self.inner.gate.logout_count();

        let decision = self.inner.gate.evaluate();
        if let GateDecision::Redirect { to, .. } = decision {
            tracing::info!("[SessionGate] Not signed in, redirecting to {}", to);
            return decision;
        }

        // Re-mount: drop whatever the previous mount started.
        self.inner.teardown();
        let epoch = self.inner.display.open();

        let starter = tokio::spawn(Arc::clone(&self.inner).start(epoch));
        self.inner.track(starter);

        let inner = Arc::clone(&self.inner);
        let watcher = tokio::spawn(async move {
            while session_rx.changed().await.is_ok() {
                let signed_out = session_rx.borrow_and_update().is_none();
                if signed_out || inner.gate.logout_count() != mounted_logouts {
                    tracing::info!("[SessionGate] Session ended, tearing down capture");
                    inner.teardown();
                    break;
                }
            }
        });
        self.inner.track(watcher);

        decision
    }

    /// Hides the view: cancels the timer, releases the camera and clears
    /// the display. Late results are discarded.
    pub fn unmount(&self) {
        self.inner.teardown();
    }

    pub fn view(&self) -> CaptureView {
        if let GateDecision::Redirect { to, notice } = self.inner.gate.evaluate() {
            return CaptureView::SignInRequired {
                notice,
                redirect_to: to,
            };
        }

        let shown = self.inner.display.snapshot();
        CaptureView::Capturing {
            live_feed: self.inner.media.is_live(),
            loop_state: self.inner.detection.state(),
            detected_emotion: shown.as_ref().map(|r| r.detected_emotion.clone()),
            recommendations: shown.map(|r| r.recommendations).unwrap_or_default(),
        }
    }

    pub fn loop_state(&self) -> LoopState {
        self.inner.detection.state()
    }

    pub fn is_live(&self) -> bool {
        self.inner.media.is_live()
    }

    pub fn is_capturing(&self) -> bool {
        self.inner.detection.is_capturing()
    }

    pub fn recommendations(&self) -> Option<RecommendationResult> {
        self.inner.display.snapshot()
    }

    /// Receiver notified whenever the shown recommendations change.
    pub fn watch_recommendations(
        &self,
    ) -> tokio::sync::watch::Receiver<Option<RecommendationResult>> {
        self.inner.display.subscribe()
    }
}

impl Drop for CapturePage {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}
