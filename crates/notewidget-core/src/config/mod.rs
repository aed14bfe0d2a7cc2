//! Worker configuration.
//!
//! Resolved from environment variables. `from_lookup` takes any key lookup so
//! hosts and tests can feed values without touching the process environment.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::{Color, WidgetTheme};
use crate::schedule::{RetryPolicy, MIN_PERIODIC_INTERVAL_MINUTES};
use crate::util::{is_http_url, normalize_text_option};

pub const ENV_REMOTE_BASE_URL: &str = "NOTEWIDGET_REMOTE_BASE_URL";
pub const ENV_WIDGET_PATH: &str = "NOTEWIDGET_WIDGET_PATH";
pub const ENV_UPDATES_PATH: &str = "NOTEWIDGET_UPDATES_PATH";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "NOTEWIDGET_FETCH_TIMEOUT_SECS";
pub const ENV_SYNC_INTERVAL_MINUTES: &str = "NOTEWIDGET_SYNC_INTERVAL_MINUTES";
pub const ENV_RETRY_MAX_ATTEMPTS: &str = "NOTEWIDGET_RETRY_MAX_ATTEMPTS";
pub const ENV_RETRY_BACKOFF_SECS: &str = "NOTEWIDGET_RETRY_BACKOFF_SECS";
pub const ENV_WIDGET_BACKGROUND: &str = "NOTEWIDGET_WIDGET_BACKGROUND";
pub const ENV_WIDGET_TEXT_COLOR: &str = "NOTEWIDGET_WIDGET_TEXT_COLOR";

const DEFAULT_WIDGET_PATH: &str = "notes/widget.json";
const DEFAULT_UPDATES_PATH: &str = "notes/updates.json";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RETRY_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BACKOFF_SECS: u64 = 30;
const MAX_RETRY_BACKOFF_SECS: u64 = 3_600;

/// Where the two remote documents live.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub widget_path: String,
    pub updates_path: String,
    pub fetch_timeout: Duration,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RemoteConfig")
            .field("base_url", &redact_query(&self.base_url))
            .field("widget_path", &redact_query(&self.widget_path))
            .field("updates_path", &redact_query(&self.updates_path))
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

/// Everything the sync worker and its host loop need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub remote: RemoteConfig,
    pub sync_interval: Duration,
    pub retry: RetryPolicy,
    pub theme: WidgetTheme,
}

impl WorkerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = optional_trimmed(&lookup, ENV_REMOTE_BASE_URL)
            .ok_or(ConfigError::MissingVar(ENV_REMOTE_BASE_URL))?;
        if !is_http_url(&base_url) {
            return Err(ConfigError::Invalid(format!(
                "{ENV_REMOTE_BASE_URL} must start with http:// or https://"
            )));
        }

        let widget_path = value_or_default(&lookup, ENV_WIDGET_PATH, DEFAULT_WIDGET_PATH);
        let updates_path = value_or_default(&lookup, ENV_UPDATES_PATH, DEFAULT_UPDATES_PATH);
        if widget_path == updates_path {
            return Err(ConfigError::Invalid(format!(
                "{ENV_WIDGET_PATH} and {ENV_UPDATES_PATH} must point at different documents"
            )));
        }

        let fetch_timeout_secs = parse_in_range(
            &lookup,
            ENV_FETCH_TIMEOUT_SECS,
            DEFAULT_FETCH_TIMEOUT_SECS,
            1..=60,
        )?;

        let sync_interval_minutes = parse_in_range(
            &lookup,
            ENV_SYNC_INTERVAL_MINUTES,
            MIN_PERIODIC_INTERVAL_MINUTES,
            MIN_PERIODIC_INTERVAL_MINUTES..=24 * 60,
        )?;

        let retry_max_attempts = parse_in_range(
            &lookup,
            ENV_RETRY_MAX_ATTEMPTS,
            u64::from(DEFAULT_RETRY_MAX_ATTEMPTS),
            0..=10,
        )?;
        let retry_backoff_secs = parse_in_range(
            &lookup,
            ENV_RETRY_BACKOFF_SECS,
            DEFAULT_RETRY_BACKOFF_SECS,
            1..=MAX_RETRY_BACKOFF_SECS,
        )?;

        let theme = WidgetTheme {
            background_color: parse_color(&lookup, ENV_WIDGET_BACKGROUND)?,
            text_color: parse_color(&lookup, ENV_WIDGET_TEXT_COLOR)?,
        };

        Ok(Self {
            remote: RemoteConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                widget_path,
                updates_path,
                fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            },
            sync_interval: Duration::from_secs(sync_interval_minutes * 60),
            retry: RetryPolicy {
                // Bounded to 0..=10 above.
                max_attempts: u32::try_from(retry_max_attempts).unwrap_or(u32::MAX),
                initial_backoff: Duration::from_secs(retry_backoff_secs),
                max_backoff: Duration::from_secs(MAX_RETRY_BACKOFF_SECS),
            },
            theme,
        })
    }

    /// Periodic interval in whole minutes, as the trigger facility takes it.
    pub const fn sync_interval_minutes(&self) -> u64 {
        self.sync_interval.as_secs() / 60
    }
}

fn parse_in_range(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
    range: std::ops::RangeInclusive<u64>,
) -> Result<u64, ConfigError> {
    let Some(raw) = optional_trimmed(lookup, name) else {
        return Ok(default);
    };
    let value = raw.parse::<u64>().map_err(|_| {
        ConfigError::Invalid(format!(
            "{name} must be an integer in [{}, {}]",
            range.start(),
            range.end()
        ))
    })?;
    if !range.contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{name} must be in [{}, {}]",
            range.start(),
            range.end()
        )));
    }
    Ok(value)
}

fn parse_color(
    lookup: impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<Color>, ConfigError> {
    let Some(raw) = optional_trimmed(lookup, name) else {
        return Ok(None);
    };
    let color = raw
        .parse::<Color>()
        .map_err(|error| ConfigError::Invalid(format!("{name}: {error}")))?;
    Ok(Color::from_raw_setting(color.argb()))
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    normalize_text_option(lookup(name))
}

/// Query strings on realtime-database URLs usually carry an auth secret.
fn redact_query(value: &str) -> String {
    match value.split_once('?') {
        Some((head, _)) => format!("{head}?[REDACTED]"),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(map: &HashMap<&str, &str>) -> Result<WorkerConfig, ConfigError> {
        WorkerConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string()))
    }

    fn minimal() -> HashMap<&'static str, &'static str> {
        let mut map = HashMap::new();
        map.insert(ENV_REMOTE_BASE_URL, "https://notes.example.com/");
        map
    }

    #[test]
    fn config_requires_remote_base_url() {
        let err = from_map(&HashMap::new()).unwrap_err();
        assert!(err.to_string().contains(ENV_REMOTE_BASE_URL));
    }

    #[test]
    fn config_applies_defaults() {
        let config = from_map(&minimal()).unwrap();

        assert_eq!(config.remote.base_url, "https://notes.example.com");
        assert_eq!(config.remote.widget_path, "notes/widget.json");
        assert_eq!(config.remote.updates_path, "notes/updates.json");
        assert_eq!(config.remote.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.sync_interval_minutes(), 15);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.theme, WidgetTheme::default());
    }

    #[test]
    fn config_rejects_short_sync_interval() {
        let mut map = minimal();
        map.insert(ENV_SYNC_INTERVAL_MINUTES, "5");
        let err = from_map(&map).unwrap_err();
        assert!(err.to_string().contains(ENV_SYNC_INTERVAL_MINUTES));
    }

    #[test]
    fn config_rejects_non_http_base_url() {
        let mut map = minimal();
        map.insert(ENV_REMOTE_BASE_URL, "notes.example.com");
        assert!(from_map(&map).is_err());
    }

    #[test]
    fn config_rejects_identical_document_paths() {
        let mut map = minimal();
        map.insert(ENV_UPDATES_PATH, "notes/widget.json");
        assert!(from_map(&map).is_err());
    }

    #[test]
    fn config_parses_theme_colors() {
        let mut map = minimal();
        map.insert(ENV_WIDGET_BACKGROUND, "#202020");
        map.insert(ENV_WIDGET_TEXT_COLOR, "#00000000");
        let config = from_map(&map).unwrap();

        assert_eq!(
            config.theme.background_color.map(Color::argb),
            Some(0xFF20_2020)
        );
        assert_eq!(config.theme.text_color, None);
    }

    #[test]
    fn config_redacts_auth_query_in_debug() {
        let mut map = minimal();
        map.insert(ENV_WIDGET_PATH, "notes/widget.json?auth=sensitive-secret");
        let config = from_map(&map).unwrap();

        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("sensitive-secret"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
