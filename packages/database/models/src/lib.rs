#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Database row types for stored earthquakes.

use serde::{Deserialize, Serialize};

/// Read-side projection of a row in the `earthquakes` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEarthquake {
    /// Feed-assigned event ID.
    pub id: String,
    /// Event magnitude.
    pub magnitude: f64,
    /// Place description.
    pub place: Option<String>,
    /// Feed-provided title.
    pub title: Option<String>,
    /// Origin time in UTC (`YYYY-MM-DD HH:MM:SS`).
    pub time_utc: Option<String>,
    /// Origin time at UTC+8 (`YYYY-MM-DD HH:MM:SS`).
    pub time_local: Option<String>,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Depth in kilometers.
    pub depth_km: f64,
    /// PAGER alert level or `"None"`.
    pub alert_level: Option<String>,
    /// Tsunami flag (`0` or `1`).
    pub tsunami_flag: i64,
    /// Principal subdivision.
    pub region: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Continent.
    pub continent: Option<String>,
    /// Locality.
    pub locality: Option<String>,
}
