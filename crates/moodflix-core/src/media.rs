//! Host media boundary: camera devices, streams and their tracks.

use crate::detection::DisplaySize;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Constraints passed when requesting a stream from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConstraints {
    pub video: bool,
    pub audio: bool,
}

impl MediaConstraints {
    /// Video enabled, audio disabled.
    pub const VIDEO_ONLY: Self = Self {
        video: true,
        audio: false,
    };
}

/// A single live track inside a stream.
///
/// `stop` must be idempotent; stopping an ended track does nothing.
pub trait MediaTrack: Send + Sync {
    fn stop(&self);
    fn is_live(&self) -> bool;
}

/// Opaque handle to a live stream granted by the host.
#[derive(Clone)]
pub struct MediaStream {
    id: String,
    frame_size: DisplaySize,
    tracks: Vec<Arc<dyn MediaTrack>>,
}

impl MediaStream {
    pub fn new(
        id: impl Into<String>,
        frame_size: DisplaySize,
        tracks: Vec<Arc<dyn MediaTrack>>,
    ) -> Self {
        Self {
            id: id.into(),
            frame_size,
            tracks,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn frame_size(&self) -> DisplaySize {
        self.frame_size
    }

    /// True while at least one track is still live.
    pub fn is_active(&self) -> bool {
        self.tracks.iter().any(|t| t.is_live())
    }

    /// Stops every track of the stream.
    pub fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }
}

impl fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStream")
            .field("id", &self.id)
            .field("frame_size", &self.frame_size)
            .field("tracks", &self.tracks.len())
            .field("active", &self.is_active())
            .finish()
    }
}

/// Local camera access.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Requests a stream; awaits the host's permission decision.
    ///
    /// # Errors
    ///
    /// `Camera` when permission is denied or no device exists.
    async fn open(&self, constraints: MediaConstraints) -> Result<MediaStream>;
}
