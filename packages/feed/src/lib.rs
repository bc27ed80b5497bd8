#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Earthquake feed fetching and normalization.
//!
//! A [`FeedSource`] fetches one `GeoJSON` feature collection per call. The
//! [`normalize`] module projects each feature into a flat
//! [`EarthquakeRecord`](quake_feed_quake_models::EarthquakeRecord).
//! Available feeds are declared in embedded TOML files (see [`registry`]).

pub mod normalize;
pub mod parsing;
pub mod raw;
pub mod registry;
pub mod usgs;

use async_trait::async_trait;

pub use raw::{Feature, FeedCollection, Geometry, Properties, parse_feed};

/// Errors that can occur while fetching or parsing a feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed or returned a non-success status.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The payload is not a valid feature collection.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// No feed with the requested ID is registered.
    #[error("Unknown feed '{id}'")]
    UnknownFeed {
        /// The requested feed ID.
        id: String,
    },
}

/// A source of earthquake feature collections.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Returns a unique identifier for this feed (e.g., `"usgs_all_hour"`).
    fn id(&self) -> &str;

    /// Fetches the current feature collection.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] if the request fails or the payload cannot be
    /// parsed.
    async fn fetch(&self) -> Result<FeedCollection, FeedError>;
}
