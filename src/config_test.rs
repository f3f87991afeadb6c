#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn default_matches_constants() {
    let config = EditorConfig::default();
    assert_eq!(config.drag_threshold_px, 5.0);
    assert_eq!(config.zoom_steps, vec![0.1, 0.25, 0.5, 1.0, 2.0, 4.0, 8.0]);
    assert!(config.validate().is_ok());
}

#[test]
fn partial_json_keeps_defaults() {
    let config = EditorConfig::from_json(r#"{ "dragThresholdPx": 3, "maxZoom": 4 }"#).unwrap();
    assert_eq!(config.drag_threshold_px, 3.0);
    assert_eq!(config.max_zoom, 4.0);
    assert_eq!(config.min_zoom, 0.1);
}

#[test]
fn inverted_zoom_range_is_rejected() {
    let err = EditorConfig::from_json(r#"{ "minZoom": 5, "maxZoom": 2 }"#).unwrap_err();
    assert!(matches!(err, EditorError::Config(ref msg) if msg.contains("minZoom")));
}

#[test]
fn negative_threshold_is_rejected() {
    let err = EditorConfig::from_json(r#"{ "dragThresholdPx": -1 }"#).unwrap_err();
    assert!(matches!(err, EditorError::Config(ref msg) if msg.contains("dragThresholdPx")));
}

#[test]
fn unsorted_steps_are_rejected() {
    assert!(EditorConfig::from_json(r#"{ "zoomSteps": [1, 0.5] }"#).is_err());
}

#[test]
fn malformed_json_surfaces_serde_error() {
    assert!(matches!(EditorConfig::from_json("{"), Err(EditorError::Serde(_))));
}
