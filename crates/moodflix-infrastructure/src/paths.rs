//! Platform path resolution for MoodFlix files.
//!
//! ```text
//! ~/.config/moodflix/          # Config directory
//! ├── config.toml              # Application configuration
//! └── session.json             # Signed-in session (token + user)
//! ```

use std::path::PathBuf;

const APP_DIR: &str = "moodflix";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot determine config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for moodflix_core::MoodflixError {
    fn from(err: PathError) -> Self {
        moodflix_core::MoodflixError::config(err.to_string())
    }
}

pub struct MoodflixPaths;

impl MoodflixPaths {
    /// `~/.config/moodflix/` on Linux, the platform equivalent elsewhere.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// # Security Note
    ///
    /// Holds a bearer token; written with 600 permissions on Unix.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.json"))
    }
}
