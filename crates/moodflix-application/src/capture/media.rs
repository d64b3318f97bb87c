//! Media Acquirer: owns the camera stream for the capture view.

use moodflix_core::error::{MoodflixError, Result};
use moodflix_core::media::{CameraDevice, MediaConstraints, MediaStream};
use std::sync::{Arc, Mutex};

pub struct MediaAcquirer {
    camera: Arc<dyn CameraDevice>,
    stream: Mutex<Option<MediaStream>>,
}

impl MediaAcquirer {
    pub fn new(camera: Arc<dyn CameraDevice>) -> Self {
        Self {
            camera,
            stream: Mutex::new(None),
        }
    }

    /// Requests a video-only stream and holds it until [`release`](Self::release).
    ///
    /// Returns the already-held stream if one is live. Failures (permission
    /// denied, no device) are logged and returned; there is no retry.
    pub async fn acquire(&self) -> Result<MediaStream> {
        if let Some(stream) = self.held()?
            && stream.is_active()
        {
            return Ok(stream);
        }

        let stream = match self.camera.open(MediaConstraints::VIDEO_ONLY).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!("[MediaAcquirer] Error accessing camera: {}", e);
                return Err(e);
            }
        };

        let previous = self.lock()?.replace(stream.clone());
        if let Some(previous) = previous {
            previous.stop_all();
        }
        tracing::info!("[MediaAcquirer] Acquired stream {}", stream.id());
        Ok(stream)
    }

    /// Stops every track of the held stream.
    ///
    /// Idempotent; returns whether a stream was actually released.
    pub fn release(&self) -> bool {
        let taken = match self.stream.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        Self::stop(taken)
    }

    /// Releases the held stream only if it is the one with `stream_id`.
    pub fn release_if_held(&self, stream_id: &str) -> bool {
        let taken = {
            let mut guard = match self.stream.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if guard.as_ref().is_some_and(|held| held.id() == stream_id) {
                guard.take()
            } else {
                None
            }
        };
        Self::stop(taken)
    }

    fn stop(taken: Option<MediaStream>) -> bool {
        match taken {
            Some(stream) => {
                stream.stop_all();
                tracing::info!("[MediaAcquirer] Released stream {}", stream.id());
                true
            }
            None => false,
        }
    }

    /// True while a held stream has a live track.
    pub fn is_live(&self) -> bool {
        self.held()
            .ok()
            .flatten()
            .is_some_and(|stream| stream.is_active())
    }

    fn held(&self) -> Result<Option<MediaStream>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<MediaStream>>> {
        self.stream
            .lock()
            .map_err(|e| MoodflixError::internal(format!("media lock poisoned: {}", e)))
    }
}

impl Drop for MediaAcquirer {
    fn drop(&mut self) {
        self.release();
    }
}
