//! Domain types and collaborator ports for the MoodFlix client.

pub mod auth;
pub mod config;
pub mod detection;
pub mod error;
pub mod expression;
pub mod media;
pub mod recommendation;
pub mod session;

// Re-export common error type
pub use error::MoodflixError;
