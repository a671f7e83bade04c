// Configuration structs

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";
pub const DEFAULT_PIPELINE_URL: &str = "http://localhost:5000/api/v1";

/// Client settings, merged from `~/.focusflow/config.toml` and environment
/// variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the main REST backend.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Base URL of the voice pipeline backend (`process-full` and
    /// `get-voice-id` live on a different port than the main API).
    #[serde(default = "default_pipeline_url")]
    pub pipeline_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Voice processing poller settings.
    #[serde(default)]
    pub poll: PollSettings,

    /// Credentials used by the `verify` subcommand.
    #[serde(default)]
    pub verify: VerifySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollSettings {
    /// Seconds between status polls.
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,

    /// Overall deadline for a voice processing run, in seconds.
    #[serde(default = "default_poll_timeout")]
    pub timeout_secs: u64,
}

/// Backend account used when driving the verification suites.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifySettings {
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub password: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            pipeline_url: default_pipeline_url(),
            request_timeout_secs: default_request_timeout(),
            poll: PollSettings::default(),
            verify: VerifySettings::default(),
        }
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            timeout_secs: default_poll_timeout(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl PollSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_pipeline_url() -> String {
    DEFAULT_PIPELINE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    5
}

fn default_poll_interval() -> u64 {
    5
}

fn default_poll_timeout() -> u64 {
    120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_backend_conventions() {
        let settings = Settings::default();
        assert_eq!(settings.api_url, "http://localhost:3000/api/v1");
        assert_eq!(settings.poll.interval_secs, 5);
        assert_eq!(settings.poll.timeout_secs, 120);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str("api_url = \"http://10.0.0.2:3000/api/v1\"")
            .expect("partial settings should parse");
        assert_eq!(settings.api_url, "http://10.0.0.2:3000/api/v1");
        assert_eq!(settings.request_timeout_secs, 5);
        assert!(settings.verify.email.is_none());
    }
}
