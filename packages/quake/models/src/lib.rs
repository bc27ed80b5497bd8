#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Normalized earthquake record and reverse-geocoded location types.
//!
//! Every feed feature is projected into a flat [`EarthquakeRecord`] with
//! sentinel defaults applied per field, then enriched with a
//! [`LocationInfo`] from the reverse geocoder before it is stored.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Sentinel for location fields the geocoder could not resolve.
pub const UNKNOWN: &str = "Unknown";

/// Sentinel for an absent alert level.
pub const NO_ALERT: &str = "None";

/// Wall-clock rendering used for every stored timestamp (second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Hours added to UTC to derive the local (UTC+8) timestamps.
pub const LOCAL_OFFSET_HOURS: i64 = 8;

/// Reverse-geocoded location of an event's epicenter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInfo {
    /// Principal subdivision (state, province, prefecture, ...).
    pub region: String,
    /// Country name.
    pub country: String,
    /// Continent name.
    pub continent: String,
    /// Nearest locality (city, town, ...).
    pub locality: String,
}

impl LocationInfo {
    /// Returns a location with every field set to [`UNKNOWN`].
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            region: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            continent: UNKNOWN.to_string(),
            locality: UNKNOWN.to_string(),
        }
    }

    /// Builds a location from optional parts, substituting [`UNKNOWN`] for
    /// any part that is missing or empty.
    #[must_use]
    pub fn from_parts(
        region: Option<&str>,
        country: Option<&str>,
        continent: Option<&str>,
        locality: Option<&str>,
    ) -> Self {
        Self {
            region: or_unknown(region),
            country: or_unknown(country),
            continent: or_unknown(continent),
            locality: or_unknown(locality),
        }
    }

    /// Whether every field is the [`UNKNOWN`] sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        [&self.region, &self.country, &self.continent, &self.locality]
            .iter()
            .all(|s| s.as_str() == UNKNOWN)
    }
}

impl Default for LocationInfo {
    fn default() -> Self {
        Self::unknown()
    }
}

fn or_unknown(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// One seismic event normalized from a feed feature.
///
/// `id` is the feed-assigned event ID and is the primary key in the store.
/// Records are inserted once and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeRecord {
    /// Feed-assigned event ID (stable across polls).
    pub id: String,
    /// Event magnitude.
    pub magnitude: f64,
    /// Human-readable place description (e.g., "10km N of X").
    pub place: Option<String>,
    /// Origin time in UTC, truncated to the second.
    pub time_utc: Option<NaiveDateTime>,
    /// Last update time in UTC, truncated to the second.
    pub last_updated_utc: Option<NaiveDateTime>,
    /// Origin time shifted by [`LOCAL_OFFSET_HOURS`].
    pub time_local: Option<NaiveDateTime>,
    /// Last update time shifted by [`LOCAL_OFFSET_HOURS`].
    pub last_updated_local: Option<NaiveDateTime>,
    /// Timezone offset from UTC in minutes at the epicenter (deprecated
    /// upstream, usually absent).
    pub tz_offset_minutes: i64,
    /// Event page URL.
    pub detail_url: Option<String>,
    /// Event map page URL (`detail_url` + `/map`).
    pub map_url: Option<String>,
    /// `GeoJSON` detail feed URL.
    pub detail_api: Option<String>,
    /// Number of "felt" reports submitted.
    pub felt_count: i64,
    /// Maximum reported community intensity.
    pub cdi: f64,
    /// Maximum estimated instrumental intensity.
    pub mmi: f64,
    /// PAGER alert level, or [`NO_ALERT`].
    pub alert_level: String,
    /// Review status (`automatic`, `reviewed`, `deleted`).
    pub status: Option<String>,
    /// `1` for large events in oceanic regions, otherwise `0`.
    pub tsunami_flag: i64,
    /// Significance score.
    pub significance: i64,
    /// Preferred contributing network code.
    pub network: Option<String>,
    /// Network-assigned event code.
    pub event_code: Option<String>,
    /// Comma-separated list of associated event IDs.
    pub ids: Option<String>,
    /// Comma-separated list of contributing networks.
    pub sources: Option<String>,
    /// Comma-separated list of available product types.
    pub types: Option<String>,
    /// Number of seismic stations used to locate the event.
    pub station_count: i64,
    /// Horizontal distance to the nearest station, in degrees.
    pub nearest_station_degrees: f64,
    /// Root-mean-square travel time residual, in seconds.
    pub rms: f64,
    /// Largest azimuthal gap between stations, in degrees.
    pub gap_degrees: f64,
    /// Magnitude algorithm (e.g., `ml`, `mb`, `mww`).
    pub magnitude_type: Option<String>,
    /// Seismic event type (e.g., `earthquake`, `quarry blast`).
    pub event_type: Option<String>,
    /// Feed-provided title.
    pub title: Option<String>,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Depth below the surface, in kilometers.
    pub depth_km: f64,
    /// Reverse-geocoded location.
    pub location: LocationInfo,
}

/// Renders a timestamp with [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_location_uses_sentinel_everywhere() {
        let location = LocationInfo::unknown();
        assert!(location.is_unknown());
        assert_eq!(location.country, "Unknown");
        assert_eq!(LocationInfo::default(), location);
    }

    #[test]
    fn from_parts_replaces_missing_and_empty() {
        let location = LocationInfo::from_parts(Some("Luzon"), Some(""), None, Some("  "));
        assert_eq!(location.region, "Luzon");
        assert_eq!(location.country, "Unknown");
        assert_eq!(location.continent, "Unknown");
        assert_eq!(location.locality, "Unknown");
        assert!(!location.is_unknown());
    }

    #[test]
    fn location_serializes_camel_case() {
        let json = serde_json::to_value(LocationInfo::unknown()).unwrap();
        assert_eq!(json["region"], "Unknown");
        assert_eq!(json["locality"], "Unknown");
    }

    #[test]
    fn formats_timestamp_to_seconds() {
        let ts = chrono::DateTime::from_timestamp(1_700_000_000, 0)
            .unwrap()
            .naive_utc();
        assert_eq!(format_timestamp(&ts), "2023-11-14 22:13:20");
    }
}
