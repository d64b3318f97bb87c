//! Local file storage.

pub mod session_storage;

pub use session_storage::FileSessionStore;
