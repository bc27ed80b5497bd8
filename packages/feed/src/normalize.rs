//! Projects feed features into flat [`EarthquakeRecord`]s.
//!
//! Absent properties fall back to per-field sentinels: numbers become `0`,
//! strings become `None`, and the alert level becomes `"None"`. Location
//! fields start as `"Unknown"` and are filled in by the geocoder later.

use quake_feed_quake_models::{EarthquakeRecord, LocationInfo, NO_ALERT};

use crate::parsing::{epoch_ms_to_local, epoch_ms_to_utc, non_empty};
use crate::raw::Feature;

/// Normalizes every feature in a collection, preserving order.
#[must_use]
pub fn normalize_features(features: &[Feature]) -> Vec<EarthquakeRecord> {
    let records: Vec<EarthquakeRecord> = features.iter().map(normalize_feature).collect();
    log::debug!("Normalized {} features", records.len());
    records
}

/// Normalizes a single feature.
#[must_use]
pub fn normalize_feature(feature: &Feature) -> EarthquakeRecord {
    let props = &feature.properties;
    let coords = &feature.geometry.coordinates;
    let coord = |i: usize| coords.get(i).copied().unwrap_or(0.0);

    let detail_url = non_empty(props.url.as_ref());
    let map_url = detail_url.as_ref().map(|url| format!("{url}/map"));

    EarthquakeRecord {
        id: feature.id.clone(),
        magnitude: props.mag.unwrap_or(0.0),
        place: non_empty(props.place.as_ref()),
        time_utc: epoch_ms_to_utc(props.time),
        last_updated_utc: epoch_ms_to_utc(props.updated),
        time_local: epoch_ms_to_local(props.time),
        last_updated_local: epoch_ms_to_local(props.updated),
        tz_offset_minutes: props.tz.unwrap_or(0),
        detail_url,
        map_url,
        detail_api: non_empty(props.detail.as_ref()),
        felt_count: props.felt.unwrap_or(0),
        cdi: props.cdi.unwrap_or(0.0),
        mmi: props.mmi.unwrap_or(0.0),
        alert_level: non_empty(props.alert.as_ref()).unwrap_or_else(|| NO_ALERT.to_string()),
        status: non_empty(props.status.as_ref()),
        tsunami_flag: props.tsunami.unwrap_or(0),
        significance: props.sig.unwrap_or(0),
        network: non_empty(props.net.as_ref()),
        event_code: non_empty(props.code.as_ref()),
        ids: non_empty(props.ids.as_ref()),
        sources: non_empty(props.sources.as_ref()),
        types: non_empty(props.types.as_ref()),
        station_count: props.nst.unwrap_or(0),
        nearest_station_degrees: props.dmin.unwrap_or(0.0),
        rms: props.rms.unwrap_or(0.0),
        gap_degrees: props.gap.unwrap_or(0.0),
        magnitude_type: non_empty(props.mag_type.as_ref()),
        event_type: non_empty(props.event_type.as_ref()),
        title: non_empty(props.title.as_ref()),
        longitude: coord(0),
        latitude: coord(1),
        depth_km: coord(2),
        location: LocationInfo::unknown(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use quake_feed_quake_models::format_timestamp;

    use super::*;
    use crate::raw::{Geometry, Properties};

    fn feature(properties: Properties, coordinates: Vec<f64>) -> Feature {
        Feature {
            id: "us7000abcd".to_string(),
            properties,
            geometry: Geometry { coordinates },
        }
    }

    #[test]
    fn absent_properties_use_sentinels() {
        let record = normalize_feature(&feature(Properties::default(), vec![]));

        assert_eq!(record.id, "us7000abcd");
        assert!(record.magnitude.abs() < f64::EPSILON);
        assert_eq!(record.felt_count, 0);
        assert!(record.cdi.abs() < f64::EPSILON);
        assert!(record.mmi.abs() < f64::EPSILON);
        assert_eq!(record.significance, 0);
        assert_eq!(record.tsunami_flag, 0);
        assert_eq!(record.station_count, 0);
        assert_eq!(record.tz_offset_minutes, 0);
        assert_eq!(record.alert_level, "None");
        assert!(record.place.is_none());
        assert!(record.status.is_none());
        assert!(record.network.is_none());
        assert!(record.magnitude_type.is_none());
        assert!(record.detail_url.is_none());
        assert!(record.map_url.is_none());
        assert!(record.time_utc.is_none());
        assert!(record.time_local.is_none());
        assert!(record.last_updated_utc.is_none());
        assert!(record.last_updated_local.is_none());
        assert!(record.location.is_unknown());
    }

    #[test]
    fn empty_coordinates_default_to_zero() {
        let record = normalize_feature(&feature(Properties::default(), vec![]));
        assert!(record.longitude.abs() < f64::EPSILON);
        assert!(record.latitude.abs() < f64::EPSILON);
        assert!(record.depth_km.abs() < f64::EPSILON);
    }

    #[test]
    fn partial_coordinates_default_missing_depth() {
        let record = normalize_feature(&feature(Properties::default(), vec![120.1, 14.5]));
        assert!((record.longitude - 120.1).abs() < f64::EPSILON);
        assert!((record.latitude - 14.5).abs() < f64::EPSILON);
        assert!(record.depth_km.abs() < f64::EPSILON);
    }

    #[test]
    fn maps_populated_properties() {
        let props = Properties {
            mag: Some(5.4),
            place: Some("10km N of X".to_string()),
            time: Some(1_700_000_000_000),
            updated: Some(1_700_000_600_000),
            url: Some("https://earthquake.usgs.gov/earthquakes/eventpage/us7000abcd".to_string()),
            alert: Some("green".to_string()),
            felt: Some(12),
            sig: Some(449),
            mag_type: Some("mww".to_string()),
            ..Properties::default()
        };
        let record = normalize_feature(&feature(props, vec![120.1, 14.5, 10.0]));

        assert!((record.magnitude - 5.4).abs() < f64::EPSILON);
        assert_eq!(record.place.as_deref(), Some("10km N of X"));
        assert_eq!(record.alert_level, "green");
        assert_eq!(record.felt_count, 12);
        assert_eq!(record.significance, 449);
        assert_eq!(
            record.map_url.as_deref(),
            Some("https://earthquake.usgs.gov/earthquakes/eventpage/us7000abcd/map")
        );
        assert!((record.longitude - 120.1).abs() < f64::EPSILON);
        assert!((record.latitude - 14.5).abs() < f64::EPSILON);
        assert!((record.depth_km - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn derives_utc_and_local_timestamps() {
        let props = Properties {
            time: Some(1_700_000_000_000),
            updated: Some(1_700_000_600_000),
            ..Properties::default()
        };
        let record = normalize_feature(&feature(props, vec![]));

        let utc = record.time_utc.unwrap();
        let local = record.time_local.unwrap();
        assert_eq!(local - utc, TimeDelta::hours(8));
        assert_eq!(format_timestamp(&utc), "2023-11-14 22:13:20");
        assert_eq!(format_timestamp(&local), "2023-11-15 06:13:20");
        assert_eq!(
            format_timestamp(&record.last_updated_utc.unwrap()),
            "2023-11-14 22:23:20"
        );
    }

    #[test]
    fn empty_strings_are_treated_as_absent() {
        let props = Properties {
            alert: Some(String::new()),
            url: Some(String::new()),
            place: Some(String::new()),
            ..Properties::default()
        };
        let record = normalize_feature(&feature(props, vec![]));
        assert_eq!(record.alert_level, "None");
        assert!(record.map_url.is_none());
        assert!(record.place.is_none());
    }

    #[test]
    fn normalizes_in_order() {
        let mut second = feature(Properties::default(), vec![]);
        second.id = "second".to_string();
        let records = normalize_features(&[feature(Properties::default(), vec![]), second]);
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["us7000abcd", "second"]);
    }
}
