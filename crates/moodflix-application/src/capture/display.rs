//! Display state of the capture view.

use moodflix_core::recommendation::RecommendationResult;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::watch;

/// Latest recommendations shown next to the video.
///
/// Results are tagged with the mount epoch they were requested in. Once the
/// view is torn down (or re-mounted), results from an older epoch are
/// dropped instead of written.
pub struct DisplayState {
    current: watch::Sender<Option<RecommendationResult>>,
    epoch: AtomicU64,
    open: AtomicBool,
}

impl DisplayState {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            current,
            epoch: AtomicU64::new(0),
            open: AtomicBool::new(false),
        }
    }

    /// Starts a new mount epoch and accepts results again.
    pub fn open(&self) -> u64 {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.open.store(true, Ordering::SeqCst);
        epoch
    }

    /// Stops accepting results and clears what is shown.
    pub fn close(&self) {
        self.open.store(false, Ordering::SeqCst);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.current.send_if_modified(|shown| shown.take().is_some());
    }

    /// Current epoch, `None` while closed.
    pub fn epoch(&self) -> Option<u64> {
        self.open
            .load(Ordering::SeqCst)
            .then(|| self.epoch.load(Ordering::SeqCst))
    }

    /// Replaces the shown result wholesale if `epoch` is still current.
    pub fn apply(&self, epoch: u64, result: RecommendationResult) -> bool {
        if self.epoch() != Some(epoch) {
            tracing::debug!(
                "[DisplayState] Discarding result for stale epoch {}",
                epoch
            );
            return false;
        }
        self.current.send_replace(Some(result));
        true
    }

    pub fn snapshot(&self) -> Option<RecommendationResult> {
        self.current.borrow().clone()
    }

    /// Receiver notified whenever the shown result changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<RecommendationResult>> {
        self.current.subscribe()
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::new()
    }
}
