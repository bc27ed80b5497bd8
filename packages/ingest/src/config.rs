//! Pipeline configuration read from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use quake_feed_feed::registry::DEFAULT_FEED_ID;

/// Default timeout for every outbound HTTP request.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings needed to build a [`Pipeline`](crate::Pipeline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Registered feed to poll (`QUAKE_FEED`).
    pub feed_id: String,
    /// `DuckDB` file holding the `earthquakes` table (`QUAKE_DB_PATH`).
    pub db_path: PathBuf,
    /// Reverse geocoding API key (`BIGDATACLOUD_API_KEY`).
    pub geocoder_api_key: Option<String>,
    /// Per-request timeout for feed and geocoder calls
    /// (`QUAKE_HTTP_TIMEOUT_SECS`).
    pub http_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            feed_id: DEFAULT_FEED_ID.to_string(),
            db_path: quake_feed_database::paths::earthquakes_db_path(),
            geocoder_api_key: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl PipelineConfig {
    /// Reads the configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `get`, falling back to defaults for
    /// unset, empty, or unparseable values.
    #[must_use]
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            feed_id: get("QUAKE_FEED").unwrap_or(defaults.feed_id),
            db_path: get("QUAKE_DB_PATH").map_or(defaults.db_path, PathBuf::from),
            geocoder_api_key: get("BIGDATACLOUD_API_KEY"),
            http_timeout: get("QUAKE_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map_or(defaults.http_timeout, Duration::from_secs),
        }
    }
}

/// Reads the internal scheduler period from `FETCH_INTERVAL_SECS`.
///
/// Returns `None` when unset, zero, or unparseable, which disables the
/// scheduler.
#[must_use]
pub fn fetch_interval_from_env() -> Option<Duration> {
    parse_interval(std::env::var("FETCH_INTERVAL_SECS").ok().as_deref())
}

fn parse_interval(value: Option<&str>) -> Option<Duration> {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn from_map(vars: &[(&str, &str)]) -> PipelineConfig {
        let map: BTreeMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        PipelineConfig::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = from_map(&[]);
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.feed_id, "usgs_all_hour");
        assert!(config.geocoder_api_key.is_none());
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_overrides() {
        let config = from_map(&[
            ("QUAKE_FEED", "usgs_all_day"),
            ("QUAKE_DB_PATH", "/tmp/quakes.duckdb"),
            ("BIGDATACLOUD_API_KEY", "secret"),
            ("QUAKE_HTTP_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(config.feed_id, "usgs_all_day");
        assert_eq!(config.db_path, PathBuf::from("/tmp/quakes.duckdb"));
        assert_eq!(config.geocoder_api_key.as_deref(), Some("secret"));
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn ignores_empty_and_invalid_values() {
        let config = from_map(&[("BIGDATACLOUD_API_KEY", ""), ("QUAKE_HTTP_TIMEOUT_SECS", "soon")]);
        assert!(config.geocoder_api_key.is_none());
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn parses_fetch_interval() {
        assert_eq!(parse_interval(Some("3600")), Some(Duration::from_secs(3600)));
        assert_eq!(parse_interval(Some("0")), None);
        assert_eq!(parse_interval(Some("hourly")), None);
        assert_eq!(parse_interval(None), None);
    }
}
