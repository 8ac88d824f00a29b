//! Frame runtime configuration, its sources, and startup validation.

use serde::{Deserialize, Serialize};

use crate::{error::FrameConfigError, retry::RetryPolicy};

/// Largest accepted `retry_attempts`.
pub const MAX_RETRY_ATTEMPTS: u32 = 10;
/// Accepted range for `retry_delay_ms`.
pub const RETRY_DELAY_RANGE_MS: std::ops::RangeInclusive<u64> = 100..=10_000;

const MANIFEST_VARS: [&str; 3] = [
    "FRAME_MANIFEST_HEADER",
    "FRAME_MANIFEST_PAYLOAD",
    "FRAME_MANIFEST_SIGNATURE",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Startup configuration for the frame runtime.
pub struct FrameConfig {
    /// Host platform API key. Required.
    pub api_key: String,
    /// Project name advertised in frame metadata.
    pub project_name: String,
    /// Public URL of the app, used for manifests and callbacks.
    pub public_url: Option<String>,
    /// App icon URL.
    pub icon_url: Option<String>,
    /// Splash screen image URL.
    pub splash_image_url: Option<String>,
    /// Splash screen background color.
    pub splash_background_color: Option<String>,
    /// Start connecting as soon as the runtime starts.
    pub auto_initialize: bool,
    /// Automatic retries after a failed handshake.
    pub retry_attempts: u32,
    /// Base delay of the exponential backoff.
    pub retry_delay_ms: u64,
    /// How long to wait for the readiness signal per attempt.
    pub ready_timeout_ms: u64,
    /// How often host readiness is polled while waiting.
    pub ready_poll_interval_ms: u64,
    /// Emit `[frame]` debug traces.
    pub debug: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_name: "frame-app".to_string(),
            public_url: None,
            icon_url: None,
            splash_image_url: None,
            splash_background_color: None,
            auto_initialize: true,
            retry_attempts: 3,
            retry_delay_ms: 1_000,
            ready_timeout_ms: 10_000,
            ready_poll_interval_ms: 100,
            debug: false,
        }
    }
}

impl FrameConfig {
    /// Default configuration with `api_key` set.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Parses a (possibly partial) camelCase JSON configuration and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON is malformed or the result fails [`Self::validate`].
    pub fn from_json_str(raw: &str) -> Result<Self, FrameConfigError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| FrameConfigError::fatal("config", err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `FRAME_*` variables through `lookup`, falling back to defaults, and validates.
    ///
    /// # Errors
    ///
    /// Returns an error when a numeric or boolean variable does not parse or validation fails.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, FrameConfigError> {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let config = Self {
            api_key: text("FRAME_API_KEY").unwrap_or_default(),
            project_name: text("FRAME_PROJECT_NAME").unwrap_or(defaults.project_name),
            public_url: text("FRAME_PUBLIC_URL"),
            icon_url: text("FRAME_ICON_URL"),
            splash_image_url: text("FRAME_SPLASH_IMAGE_URL"),
            splash_background_color: text("FRAME_SPLASH_BACKGROUND_COLOR"),
            auto_initialize: parse_var(
                text("FRAME_AUTO_INITIALIZE"),
                "autoInitialize",
                defaults.auto_initialize,
            )?,
            retry_attempts: parse_var(
                text("FRAME_RETRY_ATTEMPTS"),
                "retryAttempts",
                defaults.retry_attempts,
            )?,
            retry_delay_ms: parse_var(
                text("FRAME_RETRY_DELAY_MS"),
                "retryDelayMs",
                defaults.retry_delay_ms,
            )?,
            ready_timeout_ms: parse_var(
                text("FRAME_READY_TIMEOUT_MS"),
                "readyTimeoutMs",
                defaults.ready_timeout_ms,
            )?,
            ready_poll_interval_ms: defaults.ready_poll_interval_ms,
            debug: parse_var(text("FRAME_DEBUG"), "debug", defaults.debug)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks required fields and numeric bounds.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint. A missing API key is not recoverable.
    pub fn validate(&self) -> Result<(), FrameConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(FrameConfigError::fatal("apiKey", "API key is required"));
        }
        if self.retry_attempts > MAX_RETRY_ATTEMPTS {
            return Err(FrameConfigError::recoverable(
                "retryAttempts",
                format!("retry attempts must be between 0 and {MAX_RETRY_ATTEMPTS}"),
            ));
        }
        if !RETRY_DELAY_RANGE_MS.contains(&self.retry_delay_ms) {
            return Err(FrameConfigError::recoverable(
                "retryDelayMs",
                "retry delay must be between 100ms and 10s",
            ));
        }
        if self.ready_timeout_ms == 0 {
            return Err(FrameConfigError::recoverable(
                "readyTimeoutMs",
                "ready timeout must be positive",
            ));
        }
        if self.ready_poll_interval_ms == 0 {
            return Err(FrameConfigError::recoverable(
                "readyPollIntervalMs",
                "ready poll interval must be positive",
            ));
        }
        Ok(())
    }

    /// Backoff policy derived from this configuration.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, self.retry_delay_ms)
    }
}

fn parse_var<T: std::str::FromStr>(
    raw: Option<String>,
    field: &'static str,
    default: T,
) -> Result<T, FrameConfigError> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| FrameConfigError::recoverable(field, format!("cannot parse `{raw}`"))),
        None => Ok(default),
    }
}

/// Lists non-fatal environment problems worth surfacing at startup.
///
/// Reports a missing public URL and a host manifest that is only partially configured.
pub fn environment_warnings(lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let present = |key: &str| lookup(key).is_some_and(|value| !value.trim().is_empty());
    let mut warnings = Vec::new();

    if !present("FRAME_PUBLIC_URL") {
        warnings.push("FRAME_PUBLIC_URL is required for the frame manifest and callbacks".into());
    }

    let missing = MANIFEST_VARS.iter().filter(|key| !present(key)).count();
    if missing > 0 && missing < MANIFEST_VARS.len() {
        warnings.push(
            "partial host manifest configuration; all manifest variables are required for notifications"
                .into(),
        );
    }

    warnings
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_fatal() {
        let err = FrameConfig::default().validate().expect_err("must fail");
        assert_eq!(err.field, "apiKey");
        assert!(!err.recoverable);
    }

    #[test]
    fn bounds_are_enforced() {
        let mut config = FrameConfig::with_api_key("key");
        config.retry_attempts = 11;
        assert_eq!(config.validate().expect_err("attempts").field, "retryAttempts");

        let mut config = FrameConfig::with_api_key("key");
        config.retry_delay_ms = 99;
        assert_eq!(config.validate().expect_err("delay").field, "retryDelayMs");

        let mut config = FrameConfig::with_api_key("key");
        config.ready_timeout_ms = 0;
        assert_eq!(config.validate().expect_err("timeout").field, "readyTimeoutMs");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            FrameConfig::from_json_str(r#"{"apiKey":"k","retryAttempts":5,"debug":true}"#)
                .expect("config");
        assert_eq!(config.retry_attempts, 5);
        assert!(config.debug);
        assert_eq!(config.retry_delay_ms, 1_000);
        assert_eq!(config.ready_timeout_ms, 10_000);
        assert!(config.auto_initialize);
    }

    #[test]
    fn env_values_override_defaults() {
        let config = FrameConfig::from_env_with(env(&[
            ("FRAME_API_KEY", "abc"),
            ("FRAME_PROJECT_NAME", "bootcamp"),
            ("FRAME_RETRY_ATTEMPTS", "2"),
            ("FRAME_RETRY_DELAY_MS", "500"),
            ("FRAME_AUTO_INITIALIZE", "false"),
        ]))
        .expect("config");

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.project_name, "bootcamp");
        assert_eq!(config.retry_policy(), RetryPolicy::new(2, 500));
        assert!(!config.auto_initialize);
    }

    #[test]
    fn unparsable_env_value_names_field() {
        let err = FrameConfig::from_env_with(env(&[
            ("FRAME_API_KEY", "abc"),
            ("FRAME_RETRY_ATTEMPTS", "many"),
        ]))
        .expect_err("must fail");
        assert_eq!(err.field, "retryAttempts");
    }

    #[test]
    fn warns_about_partial_manifest_and_missing_url() {
        let warnings = environment_warnings(env(&[("FRAME_MANIFEST_HEADER", "h")]));
        assert_eq!(warnings.len(), 2);

        let complete = environment_warnings(env(&[
            ("FRAME_PUBLIC_URL", "https://app.example"),
            ("FRAME_MANIFEST_HEADER", "h"),
            ("FRAME_MANIFEST_PAYLOAD", "p"),
            ("FRAME_MANIFEST_SIGNATURE", "s"),
        ]));
        assert!(complete.is_empty());
    }
}
