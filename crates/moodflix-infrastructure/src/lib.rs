pub mod config_service;
pub mod paths;
pub mod replay;
pub mod storage;

pub use config_service::ConfigService;
pub use paths::MoodflixPaths;
pub use replay::{ReplayDetector, VirtualCamera};
pub use storage::FileSessionStore;
