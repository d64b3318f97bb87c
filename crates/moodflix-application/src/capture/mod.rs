//! Capture/detection/report loop behind the emotion-detection view.

pub mod detection_loop;
pub mod display;
pub mod gate;
pub mod media;
pub mod page;
pub mod report;
pub mod state;

pub use detection_loop::{DetectionLoop, LoopConfig, LoopState, TickOutcome};
pub use display::DisplayState;
pub use gate::{GateDecision, SIGN_IN_NOTICE, SIGN_IN_ROUTE, SessionGate};
pub use media::MediaAcquirer;
pub use page::{CaptureDeps, CapturePage, CaptureView};
pub use report::{ReportClient, ReportOutcome};
pub use state::{CaptureGuard, CaptureState};
