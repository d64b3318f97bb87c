//! Recorded camera/detector pair.
//!
//! Feeds pre-recorded face detections through the capture loop without a
//! physical camera or a model runtime. The recording is JSON Lines: each
//! non-blank line is the array of detections for one tick.
//!
//! ```text
//! []
//! [{"bounding_box":{"x":10,"y":20,"width":100,"height":120,"score":0.97},
//!   "expressions":{"happy":0.92,"sad":0.05,"neutral":0.03}}]
//! ```

use async_trait::async_trait;
use moodflix_core::detection::{DisplaySize, ExpressionDetector, FaceDetection};
use moodflix_core::error::{MoodflixError, Result};
use moodflix_core::media::{CameraDevice, MediaConstraints, MediaStream, MediaTrack};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A track with no device behind it.
#[derive(Debug)]
pub struct VirtualTrack {
    live: AtomicBool,
}

impl VirtualTrack {
    pub fn new() -> Self {
        Self {
            live: AtomicBool::new(true),
        }
    }
}

impl Default for VirtualTrack {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaTrack for VirtualTrack {
    fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

/// Camera that always grants a single virtual video track.
#[derive(Debug, Clone)]
pub struct VirtualCamera {
    frame_size: DisplaySize,
}

impl VirtualCamera {
    pub fn new(frame_size: DisplaySize) -> Self {
        Self { frame_size }
    }
}

#[async_trait]
impl CameraDevice for VirtualCamera {
    async fn open(&self, constraints: MediaConstraints) -> Result<MediaStream> {
        if !constraints.video {
            return Err(MoodflixError::camera("virtual camera only provides video"));
        }
        let track: Arc<dyn MediaTrack> = Arc::new(VirtualTrack::new());
        Ok(MediaStream::new(
            format!("virtual-{}", uuid::Uuid::new_v4()),
            self.frame_size,
            vec![track],
        ))
    }
}

/// Detector that replays recorded ticks in order.
///
/// Once the recording is exhausted every further pass reports no faces,
/// unless built with [`looping`](Self::looping).
#[derive(Debug)]
pub struct ReplayDetector {
    frames: Vec<Vec<FaceDetection>>,
    cursor: AtomicUsize,
    looping: bool,
    loaded: AtomicBool,
}

impl ReplayDetector {
    pub fn new(frames: Vec<Vec<FaceDetection>>) -> Self {
        Self {
            frames,
            cursor: AtomicUsize::new(0),
            looping: false,
            loaded: AtomicBool::new(false),
        }
    }

    /// Restart from the first recorded tick after the last one.
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    /// Parses a JSON Lines recording.
    pub fn parse(content: &str) -> Result<Self> {
        let mut frames = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let frame: Vec<FaceDetection> = serde_json::from_str(line).map_err(|e| {
                MoodflixError::Serialization {
                    format: "JSON".to_string(),
                    message: format!("line {}: {}", index + 1, e),
                }
            })?;
            frames.push(frame);
        }
        Ok(Self::new(frames))
    }

    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let detector = Self::parse(&content)?;
        tracing::info!(
            "[ReplayDetector] Loaded {} recorded ticks from {}",
            detector.frames.len(),
            path.display()
        );
        Ok(detector)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn next_frame(&self) -> Vec<FaceDetection> {
        if self.frames.is_empty() {
            return Vec::new();
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let index = if self.looping {
            index % self.frames.len()
        } else {
            index
        };
        self.frames.get(index).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl ExpressionDetector for ReplayDetector {
    async fn load_models(&self, model_uri: &str) -> Result<()> {
        tracing::debug!("[ReplayDetector] Ignoring model uri {}", model_uri);
        self.loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn detect(&self, stream: &MediaStream) -> Result<Vec<FaceDetection>> {
        if !self.loaded.load(Ordering::SeqCst) {
            return Err(MoodflixError::inference("models not loaded"));
        }
        if !stream.is_active() {
            return Err(MoodflixError::inference("stream has no live track"));
        }
        Ok(self.next_frame())
    }
}
