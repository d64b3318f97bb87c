//! HTTP clients for the MoodFlix backends.

pub mod auth_api_client;
pub mod recommendation_api_client;

pub use auth_api_client::AuthApiClient;
pub use recommendation_api_client::RecommendationApiClient;

/// Joins a base URL and a path without doubling or dropping the slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
