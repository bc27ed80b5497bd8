//! Compile-time registry of reverse geocoding service configurations.
//!
//! Each service is defined in a TOML file under `services/` and embedded
//! at compile time.

use serde::Deserialize;

/// A reverse geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"bigdatacloud"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Reverse geocoding endpoint URL.
    pub base_url: String,
    /// Language for returned place names.
    #[serde(default = "default_language")]
    pub locality_language: String,
}

fn default_language() -> String {
    "en".to_string()
}

const BIGDATACLOUD_TOML: &str = include_str!("../services/bigdatacloud.toml");

/// Returns the `BigDataCloud` service configuration.
///
/// # Panics
///
/// Panics if the embedded TOML config is malformed.
#[must_use]
pub fn bigdatacloud() -> GeocodingService {
    toml::de::from_str(BIGDATACLOUD_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse geocoding service 'bigdatacloud': {e}"))
}
