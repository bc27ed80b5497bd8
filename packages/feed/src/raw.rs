//! Typed view of a `GeoJSON` earthquake feed payload.
//!
//! `id`, `properties`, `geometry`, and `geometry.coordinates` are required
//! on every feature. A feature missing any of them fails the whole parse.
//! Every scalar property is optional.

use serde::Deserialize;

use crate::FeedError;

/// A feed payload: a collection of features.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedCollection {
    /// One entry per seismic event.
    pub features: Vec<Feature>,
}

/// One seismic event in the feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Feature {
    /// Feed-assigned event ID.
    pub id: String,
    /// Scalar event attributes.
    pub properties: Properties,
    /// Epicenter geometry.
    pub geometry: Geometry,
}

/// Epicenter as `[longitude, latitude, depth]`. May hold fewer than three
/// values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Geometry {
    /// Coordinate values in `lon, lat, depth` order.
    pub coordinates: Vec<f64>,
}

/// Scalar attributes of a feature, named as they appear on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Properties {
    #[serde(default)]
    pub mag: Option<f64>,
    #[serde(default)]
    pub place: Option<String>,
    /// Origin time, epoch milliseconds.
    #[serde(default)]
    pub time: Option<i64>,
    /// Last update time, epoch milliseconds.
    #[serde(default)]
    pub updated: Option<i64>,
    #[serde(default)]
    pub tz: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub felt: Option<i64>,
    #[serde(default)]
    pub cdi: Option<f64>,
    #[serde(default)]
    pub mmi: Option<f64>,
    #[serde(default)]
    pub alert: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tsunami: Option<i64>,
    #[serde(default)]
    pub sig: Option<i64>,
    #[serde(default)]
    pub net: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub ids: Option<String>,
    #[serde(default)]
    pub sources: Option<String>,
    #[serde(default)]
    pub types: Option<String>,
    #[serde(default)]
    pub nst: Option<i64>,
    #[serde(default)]
    pub dmin: Option<f64>,
    #[serde(default)]
    pub rms: Option<f64>,
    #[serde(default)]
    pub gap: Option<f64>,
    #[serde(default)]
    pub mag_type: Option<String>,
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Parses a raw feed payload.
///
/// # Errors
///
/// Returns [`FeedError::Json`] if the text is not JSON or any feature is
/// missing a required key.
pub fn parse_feed(text: &str) -> Result<FeedCollection, FeedError> {
    Ok(serde_json::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_usgs_feature() {
        let text = r#"{
            "type": "FeatureCollection",
            "metadata": {"count": 1},
            "features": [{
                "type": "Feature",
                "id": "us7000abcd",
                "properties": {
                    "mag": 5.4,
                    "place": "10km N of X",
                    "time": 1700000000000,
                    "magType": "mww",
                    "type": "earthquake",
                    "alert": null
                },
                "geometry": {"type": "Point", "coordinates": [120.1, 14.5, 10.0]}
            }]
        }"#;

        let collection = parse_feed(text).unwrap();
        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        assert_eq!(feature.id, "us7000abcd");
        assert_eq!(feature.properties.mag, Some(5.4));
        assert_eq!(feature.properties.mag_type.as_deref(), Some("mww"));
        assert_eq!(feature.properties.event_type.as_deref(), Some("earthquake"));
        assert!(feature.properties.alert.is_none());
        assert_eq!(feature.geometry.coordinates, vec![120.1, 14.5, 10.0]);
    }

    #[test]
    fn parses_empty_collection() {
        let collection = parse_feed(r#"{"features": []}"#).unwrap();
        assert!(collection.features.is_empty());
    }

    #[test]
    fn rejects_feature_without_properties() {
        let text = r#"{"features": [
            {"id": "a", "properties": {}, "geometry": {"coordinates": []}},
            {"id": "b", "geometry": {"coordinates": [1.0, 2.0, 3.0]}}
        ]}"#;
        assert!(matches!(parse_feed(text), Err(FeedError::Json(_))));
    }

    #[test]
    fn rejects_feature_without_coordinates() {
        let text = r#"{"features": [{"id": "a", "properties": {}, "geometry": {}}]}"#;
        assert!(parse_feed(text).is_err());
    }

    #[test]
    fn rejects_non_json() {
        assert!(parse_feed("<html>busy</html>").is_err());
    }
}
