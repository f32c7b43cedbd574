//! Runtime configuration.
//!
//! Settings are read once from a JSON file at process start and passed by
//! value into the fetcher. Requester settings live under the `YMAPI` key:
//!
//! ```json
//! {
//!     "YMAPI": {
//!         "session_id": "Session_id=...",
//!         "max_retries": 3,
//!         "between_attempt_sleep_time": 1.0,
//!         "timeout": 15.0
//!     }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ResolverError, Result};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.json";

/// Host accepted in playlist links by default.
pub const DEFAULT_SERVICE_HOST: &str = "music.yandex.ru";

/// Top-level configuration file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    /// Settings for the upstream requester.
    #[serde(rename = "YMAPI")]
    pub requester: RequesterConfig,

    /// Host accepted by the link classifier.
    #[serde(default = "default_service_host")]
    pub service_host: String,
}

/// Settings consumed by [`crate::api::PlaylistFetcher`].
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RequesterConfig {
    /// Raw cookie header value sent to the legacy endpoint.
    pub session_id: String,

    /// Extra attempts allowed after the first one.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Seconds to wait before every attempt after the first.
    #[serde(default = "default_sleep_time")]
    pub between_attempt_sleep_time: f64,

    /// Per-attempt request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: f64,
}

fn default_service_host() -> String {
    DEFAULT_SERVICE_HOST.to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_sleep_time() -> f64 {
    1.0
}

fn default_timeout() -> f64 {
    15.0
}

impl Config {
    /// Build a config with defaults around a session token.
    pub fn new<S: Into<String>>(session_id: S) -> Self {
        Self {
            requester: RequesterConfig::new(session_id),
            service_host: default_service_host(),
        }
    }

    /// Load and validate a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate config JSON.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.service_host.is_empty() {
            return Err(ResolverError::Config(
                "service_host must not be empty".to_string(),
            ));
        }
        self.requester.validate()
    }
}

impl RequesterConfig {
    /// Build requester settings with default retry and timeout values.
    pub fn new<S: Into<String>>(session_id: S) -> Self {
        Self {
            session_id: session_id.into(),
            max_retries: default_max_retries(),
            between_attempt_sleep_time: default_sleep_time(),
            timeout: default_timeout(),
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let sleep = self.between_attempt_sleep_time;
        if Duration::try_from_secs_f64(sleep).is_err() {
            return Err(ResolverError::Config(format!(
                "between_attempt_sleep_time must be a non-negative number of seconds, got {}",
                sleep
            )));
        }
        if self.timeout <= 0.0 || Duration::try_from_secs_f64(self.timeout).is_err() {
            return Err(ResolverError::Config(format!(
                "timeout must be a positive number of seconds, got {}",
                self.timeout
            )));
        }
        Ok(())
    }

    /// Total attempts a fetch may use.
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay inserted before every retry.
    ///
    /// Only meaningful after [`validate`](Self::validate) succeeded.
    pub fn sleep_duration(&self) -> Duration {
        Duration::from_secs_f64(self.between_attempt_sleep_time)
    }

    /// Per-attempt request timeout.
    ///
    /// Only meaningful after [`validate`](Self::validate) succeeded.
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_json_str(r#"{"YMAPI": {"session_id": "Session_id=abc"}}"#)
            .unwrap();
        assert_eq!(config.requester.session_id, "Session_id=abc");
        assert_eq!(config.requester.max_retries, 3);
        assert_eq!(config.requester.sleep_duration(), Duration::from_secs(1));
        assert_eq!(config.requester.timeout_duration(), Duration::from_secs(15));
        assert_eq!(config.service_host, DEFAULT_SERVICE_HOST);
    }

    #[test]
    fn test_explicit_values() {
        let config = Config::from_json_str(
            r#"{
                "YMAPI": {
                    "session_id": "s",
                    "max_retries": 0,
                    "between_attempt_sleep_time": 0.25,
                    "timeout": 2
                },
                "service_host": "music.example"
            }"#,
        )
        .unwrap();
        assert_eq!(config.requester.total_attempts(), 1);
        assert_eq!(config.requester.sleep_duration(), Duration::from_millis(250));
        assert_eq!(config.requester.timeout_duration(), Duration::from_secs(2));
        assert_eq!(config.service_host, "music.example");
    }

    #[test]
    fn test_missing_session_id_rejected() {
        let err = Config::from_json_str(r#"{"YMAPI": {}}"#).unwrap_err();
        assert!(matches!(err, ResolverError::ParseError(_)));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut requester = RequesterConfig::new("s");
        requester.timeout = 0.0;
        assert!(matches!(requester.validate(), Err(ResolverError::Config(_))));

        let mut requester = RequesterConfig::new("s");
        requester.between_attempt_sleep_time = -1.0;
        assert!(matches!(requester.validate(), Err(ResolverError::Config(_))));
    }

    #[test]
    fn test_unrepresentable_durations_rejected() {
        let mut requester = RequesterConfig::new("s");
        requester.timeout = 1e20;
        assert!(matches!(requester.validate(), Err(ResolverError::Config(_))));
        assert!(crate::PlaylistFetcher::new(requester).is_err());

        let mut requester = RequesterConfig::new("s");
        requester.between_attempt_sleep_time = 1e20;
        assert!(matches!(requester.validate(), Err(ResolverError::Config(_))));
        assert!(crate::PlaylistFetcher::new(requester).is_err());

        let mut requester = RequesterConfig::new("s");
        requester.between_attempt_sleep_time = f64::NAN;
        assert!(matches!(requester.validate(), Err(ResolverError::Config(_))));
    }
}
