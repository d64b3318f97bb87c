//! Inference collaborator boundary.
//!
//! Face detection, landmark extraction and expression classification all
//! happen inside an external model runtime. This module only describes what
//! the capture loop asks of it and what comes back.

use crate::error::Result;
use crate::expression::ExpressionSample;
use crate::media::MediaStream;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Axis-aligned face box in source-frame pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Detector confidence that this box contains a face
    #[serde(default)]
    pub score: f64,
}

/// Width/height pair used to map detections onto the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

/// One detected face with its expression scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub bounding_box: BoundingBox,
    pub expressions: ExpressionSample,
}

impl FaceDetection {
    /// Rescales the bounding box from `source` frame dimensions to `target`.
    pub fn resized(&self, source: DisplaySize, target: DisplaySize) -> Self {
        if source.width == 0 || source.height == 0 || source == target {
            return self.clone();
        }
        let sx = f64::from(target.width) / f64::from(source.width);
        let sy = f64::from(target.height) / f64::from(source.height);
        let b = self.bounding_box;
        Self {
            bounding_box: BoundingBox {
                x: b.x * sx,
                y: b.y * sy,
                width: b.width * sx,
                height: b.height * sy,
                score: b.score,
            },
            expressions: self.expressions.clone(),
        }
    }
}

/// Face + expression inference over the current frame of a live stream.
#[async_trait]
pub trait ExpressionDetector: Send + Sync {
    /// Loads the face detector, landmark and expression networks.
    ///
    /// Must complete before the first call to [`detect`](Self::detect).
    async fn load_models(&self, model_uri: &str) -> Result<()>;

    /// Runs one detection pass over the stream's current frame.
    ///
    /// Zero faces is a normal, successful result.
    async fn detect(&self, stream: &MediaStream) -> Result<Vec<FaceDetection>>;

    /// Native frame size of the detector input.
    fn frame_size(&self, stream: &MediaStream) -> DisplaySize {
        stream.frame_size()
    }
}

/// Drawing surface layered over the video (boxes and expression captions).
pub trait DetectionOverlay: Send + Sync {
    /// Clears the surface and draws the given detections.
    fn render(&self, detections: &[FaceDetection]);
}

/// Overlay that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOverlay;

impl DetectionOverlay for NoopOverlay {
    fn render(&self, _detections: &[FaceDetection]) {}
}
