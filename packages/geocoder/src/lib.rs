#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reverse geocoding for earthquake epicenters.
//!
//! Resolves a latitude/longitude pair to a [`LocationInfo`] of region,
//! country, continent, and locality using the `BigDataCloud` reverse
//! geocoding API (configured in `services/bigdatacloud.toml`).
//!
//! [`ReverseGeocoder::resolve`] never fails: any HTTP error, non-success
//! status, or missing response field degrades to the `"Unknown"` sentinel
//! so a geocoding outage cannot abort an ingestion cycle.

pub mod bigdatacloud;
pub mod service_registry;

use async_trait::async_trait;
use quake_feed_quake_models::LocationInfo;
use thiserror::Error;

pub use bigdatacloud::BigDataCloudGeocoder;

/// Errors from a single reverse geocoding lookup.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Geocoding service returned HTTP {status}")]
    Status {
        /// The HTTP status code.
        status: u16,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Resolves coordinates to a location, degrading to sentinels on failure.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Resolves `(latitude, longitude)` to a location. Never fails; fields
    /// that cannot be resolved are `"Unknown"`.
    async fn resolve(&self, latitude: f64, longitude: f64) -> LocationInfo;
}
