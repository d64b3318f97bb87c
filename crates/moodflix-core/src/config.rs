//! Root configuration model (`config.toml`).

use crate::detection::DisplaySize;
use crate::error::{MoodflixError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_TICK_PERIOD_MS: u64 = 1000;
pub const DEFAULT_REPORT_THRESHOLD: f64 = 0.8;
pub const DEFAULT_RECOMMENDATION_URL: &str = "http://localhost:8000";
pub const DEFAULT_AUTH_URL: &str = "http://localhost:5000";

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RootConfig {
    pub capture: CaptureSettings,
    pub services: ServiceEndpoints,
    pub logging: LoggingSettings,
}

impl RootConfig {
    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.capture.report_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(MoodflixError::config(format!(
                "capture.report_threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        if self.capture.tick_period_ms == 0 {
            return Err(MoodflixError::config(
                "capture.tick_period_ms must be greater than zero",
            ));
        }
        if self.services.request_timeout_secs == 0 {
            return Err(MoodflixError::config(
                "services.request_timeout_secs must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Detection loop tuning.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CaptureSettings {
    /// Sampling period of the detection timer
    pub tick_period_ms: u64,
    /// A report is sent only when the dominant confidence is strictly above this
    pub report_threshold: f64,
    pub video_width: u32,
    pub video_height: u32,
    /// Where the inference runtime loads its networks from
    pub model_uri: String,
}

impl CaptureSettings {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    pub fn display_size(&self) -> DisplaySize {
        DisplaySize {
            width: self.video_width,
            height: self.video_height,
        }
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            report_threshold: DEFAULT_REPORT_THRESHOLD,
            video_width: 640,
            video_height: 480,
            model_uri: "/models".to_string(),
        }
    }
}

/// Backend base URLs.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServiceEndpoints {
    pub recommendation_url: String,
    pub auth_url: String,
    pub request_timeout_secs: u64,
}

impl ServiceEndpoints {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            recommendation_url: DEFAULT_RECOMMENDATION_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing-subscriber` filter directive, e.g. `info` or `moodflix=debug`
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
