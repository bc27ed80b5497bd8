//! Feed registry: loads all feed definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/feed/feeds/` is baked into the binary at
//! compile time via [`include_str!`].

use serde::Deserialize;

use crate::FeedError;

/// Feed used when none is configured.
pub const DEFAULT_FEED_ID: &str = "usgs_all_hour";

/// A polled earthquake feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedDefinition {
    /// Unique identifier (e.g., `"usgs_all_hour"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// `GeoJSON` endpoint URL.
    pub url: String,
}

const FEED_TOMLS: &[(&str, &str)] = &[
    ("usgs_all_hour", include_str!("../feeds/usgs_all_hour.toml")),
    ("usgs_all_day", include_str!("../feeds/usgs_all_day.toml")),
    ("usgs_m4_5_day", include_str!("../feeds/usgs_m4_5_day.toml")),
    (
        "usgs_significant_week",
        include_str!("../feeds/usgs_significant_week.toml"),
    ),
];

/// Returns every registered feed.
///
/// # Panics
///
/// Panics if any embedded TOML config is malformed.
#[must_use]
pub fn all_feeds() -> Vec<FeedDefinition> {
    FEED_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse feed definition '{name}': {e}"))
        })
        .collect()
}

/// Looks up a feed by ID.
///
/// # Errors
///
/// Returns [`FeedError::UnknownFeed`] if no feed has the given ID.
pub fn feed_by_id(id: &str) -> Result<FeedDefinition, FeedError> {
    all_feeds()
        .into_iter()
        .find(|f| f.id == id)
        .ok_or_else(|| FeedError::UnknownFeed { id: id.to_string() })
}
