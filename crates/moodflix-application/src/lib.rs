pub mod auth_usecase;
pub mod capture;
pub mod session;

pub use auth_usecase::AuthUseCase;
pub use capture::{CaptureDeps, CapturePage, CaptureView};
pub use session::SessionContext;
