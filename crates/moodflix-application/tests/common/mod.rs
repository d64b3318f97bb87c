//! Mock collaborators for capture tests.
#![allow(dead_code)]

use async_trait::async_trait;
use moodflix_core::MoodflixError;
use moodflix_core::detection::{
    BoundingBox, DetectionOverlay, DisplaySize, ExpressionDetector, FaceDetection,
};
use moodflix_core::error::Result;
use moodflix_core::expression::{ExpressionLabel, ExpressionSample};
use moodflix_core::media::{CameraDevice, MediaConstraints, MediaStream, MediaTrack};
use moodflix_core::recommendation::{RecommendationResult, RecommendationService};
use moodflix_infrastructure::replay::VirtualTrack;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn size() -> DisplaySize {
    DisplaySize {
        width: 640,
        height: 480,
    }
}

pub fn sample(scores: &[(ExpressionLabel, f64)]) -> ExpressionSample {
    ExpressionSample::from_scores(scores.iter().copied()).unwrap()
}

pub fn face(scores: &[(ExpressionLabel, f64)]) -> FaceDetection {
    FaceDetection {
        bounding_box: BoundingBox {
            x: 100.0,
            y: 80.0,
            width: 200.0,
            height: 220.0,
            score: 0.95,
        },
        expressions: sample(scores),
    }
}

pub fn happy() -> Vec<FaceDetection> {
    vec![face(&[
        (ExpressionLabel::Happy, 0.92),
        (ExpressionLabel::Sad, 0.05),
        (ExpressionLabel::Neutral, 0.03),
    ])]
}

pub fn live_stream() -> MediaStream {
    let track: Arc<dyn MediaTrack> = Arc::new(VirtualTrack::new());
    MediaStream::new("test-stream", size(), vec![track])
}

// ============================================================================
// Camera
// ============================================================================

#[derive(Default)]
pub struct MockCamera {
    pub opened: AtomicUsize,
    pub deny: bool,
    pub streams: Mutex<Vec<MediaStream>>,
}

impl MockCamera {
    pub fn denying() -> Self {
        Self {
            deny: true,
            ..Default::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// True if any stream handed out still has a live track.
    pub fn any_live(&self) -> bool {
        self.streams.lock().unwrap().iter().any(|s| s.is_active())
    }
}

#[async_trait]
impl CameraDevice for MockCamera {
    async fn open(&self, _constraints: MediaConstraints) -> Result<MediaStream> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        if self.deny {
            return Err(MoodflixError::camera("NotAllowedError: Permission denied"));
        }
        let stream = live_stream();
        self.streams.lock().unwrap().push(stream.clone());
        Ok(stream)
    }
}

// ============================================================================
// Detector
// ============================================================================

/// Plays back scripted results; an exhausted script repeats `fallback`.
pub struct ScriptedDetector {
    script: Mutex<VecDeque<Result<Vec<FaceDetection>>>>,
    fallback: Vec<FaceDetection>,
    pub calls: AtomicUsize,
    pub fail_load: bool,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Result<Vec<FaceDetection>>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Vec::new(),
            calls: AtomicUsize::new(0),
            fail_load: false,
        }
    }

    /// Returns `detections` on every pass.
    pub fn always(detections: Vec<FaceDetection>) -> Self {
        Self {
            fallback: detections,
            ..Self::new(Vec::new())
        }
    }

    pub fn failing_load() -> Self {
        Self {
            fail_load: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExpressionDetector for ScriptedDetector {
    async fn load_models(&self, _model_uri: &str) -> Result<()> {
        if self.fail_load {
            return Err(MoodflixError::inference("404 /models/tiny_face_detector"));
        }
        Ok(())
    }

    async fn detect(&self, _stream: &MediaStream) -> Result<Vec<FaceDetection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().unwrap().pop_front() {
            Some(next) => next,
            None => Ok(self.fallback.clone()),
        }
    }
}

// ============================================================================
// Recommendation backend
// ============================================================================

pub struct MockRecommendations {
    pub received: Mutex<Vec<ExpressionSample>>,
    pub delay: Duration,
    /// Per-call failure script; `true` fails that call. Exhausted = succeed.
    pub failures: Mutex<VecDeque<bool>>,
}

impl MockRecommendations {
    pub fn new() -> Self {
        Self {
            received: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
            failures: Mutex::new(VecDeque::new()),
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    pub fn failing_on(script: &[bool]) -> Self {
        Self {
            failures: Mutex::new(script.iter().copied().collect()),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

#[async_trait]
impl RecommendationService for MockRecommendations {
    async fn recommend(&self, sample: &ExpressionSample) -> Result<RecommendationResult> {
        self.received.lock().unwrap().push(sample.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failures.lock().unwrap().pop_front().unwrap_or(false) {
            return Err(MoodflixError::network("connection reset by peer"));
        }
        let top = sample
            .dominant()
            .map(|d| d.label.to_string())
            .unwrap_or_else(|| "neutral".to_string());
        Ok(RecommendationResult {
            recommendations: vec![format!("{} movie #1", top), format!("{} movie #2", top)],
            detected_emotion: top,
        })
    }
}

// ============================================================================
// Overlay
// ============================================================================

#[derive(Default)]
pub struct RecordingOverlay {
    pub frames: Mutex<Vec<usize>>,
}

impl RecordingOverlay {
    pub fn renders(&self) -> usize {
        self.frames.lock().unwrap().len()
    }
}

impl DetectionOverlay for RecordingOverlay {
    fn render(&self, detections: &[FaceDetection]) {
        self.frames.lock().unwrap().push(detections.len());
    }
}
