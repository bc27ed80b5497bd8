#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the quake feed server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the database row types to allow independent evolution of the API
//! contract.

use quake_feed_database_models::StoredEarthquake;
use serde::{Deserialize, Serialize};

/// Outcome of a trigger request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    /// The cycle completed.
    Success,
    /// The cycle failed or was rejected.
    Error,
}

/// Body of every `/fetch-data` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFetchResponse {
    /// `"success"` or `"error"`.
    pub status: ApiStatus,
    /// Human-readable outcome or error text.
    pub message: String,
}

impl ApiFetchResponse {
    /// A successful cycle that stored `inserted` new records.
    #[must_use]
    pub fn stored(inserted: u64) -> Self {
        Self {
            status: ApiStatus::Success,
            message: format!("Fetched and stored {inserted} new earthquake records"),
        }
    }

    /// A failed or rejected cycle.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Error,
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// A stored earthquake as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEarthquake {
    /// Feed-assigned event ID.
    pub id: String,
    /// Event magnitude.
    pub magnitude: f64,
    /// Place description.
    pub place: Option<String>,
    /// Feed-provided title.
    pub title: Option<String>,
    /// Origin time in UTC.
    pub time_utc: Option<String>,
    /// Origin time at UTC+8.
    pub time_local: Option<String>,
    /// Longitude.
    pub longitude: f64,
    /// Latitude.
    pub latitude: f64,
    /// Depth in kilometers.
    pub depth_km: f64,
    /// PAGER alert level.
    pub alert_level: Option<String>,
    /// Whether a tsunami flag was raised.
    pub tsunami: bool,
    /// Principal subdivision.
    pub region: Option<String>,
    /// Country.
    pub country: Option<String>,
    /// Continent.
    pub continent: Option<String>,
    /// Locality.
    pub locality: Option<String>,
}

impl From<StoredEarthquake> for ApiEarthquake {
    fn from(row: StoredEarthquake) -> Self {
        Self {
            id: row.id,
            magnitude: row.magnitude,
            place: row.place,
            title: row.title,
            time_utc: row.time_utc,
            time_local: row.time_local,
            longitude: row.longitude,
            latitude: row.latitude,
            depth_km: row.depth_km,
            alert_level: row.alert_level,
            tsunami: row.tsunami_flag != 0,
            region: row.region,
            country: row.country,
            continent: row.continent,
            locality: row.locality,
        }
    }
}

/// Query parameters for the earthquakes list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct EarthquakeQueryParams {
    /// Maximum number of events to return.
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_response_matches_wire_format() {
        let json = serde_json::to_value(ApiFetchResponse::stored(1)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "success",
                "message": "Fetched and stored 1 new earthquake records"
            })
        );
    }

    #[test]
    fn error_response_matches_wire_format() {
        let json = serde_json::to_value(ApiFetchResponse::error("boom")).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "boom");
    }
}
