use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::coords::GeoPoint;
use crate::model::{GeoModel, Highlight};
use crate::options::SnapshotOptions;
use crate::types::{ImageMarker, Track, Waypoint};

/// Project the model into drawable primitives for the map renderer.
///
/// The collection bbox is the track's bounding region in
/// [min_lon, min_lat, max_lon, max_lat] order; the renderer issues its
/// one-shot fit-to-bounds whenever it changes. Every feature carries a
/// `kind` property: track, waypoint, image, or highlight.
pub fn to_feature_collection(model: &GeoModel, opts: &SnapshotOptions) -> FeatureCollection {
    let mut features = Vec::new();

    if opts.include_track {
        if let Some(f) = model.track().and_then(track_feature) {
            features.push(f);
        }
    }

    if opts.include_waypoints {
        for wpt in model.waypoints() {
            features.push(waypoint_feature(wpt));
        }
    }

    if opts.include_images {
        for marker in model.image_markers() {
            features.push(image_feature(marker));
        }
    }

    if opts.include_highlight {
        if let Some(h) = model.highlighted() {
            features.push(highlight_feature(h));
        }
    }

    FeatureCollection {
        bbox: model
            .bounds()
            .map(|b| vec![b.min_lon, b.min_lat, b.max_lon, b.max_lat]),
        features,
        foreign_members: None,
    }
}

/// Build a [lon, lat] coordinate array.
fn coords(pt: &GeoPoint) -> Vec<f64> {
    vec![pt.longitude, pt.latitude]
}

fn track_feature(track: &Track) -> Option<Feature> {
    // A single-point track cannot form a line; render it as a point.
    let geometry = match track.points.len() {
        0 => return None,
        1 => Geometry::new(Value::Point(coords(&track.points[0]))),
        _ => Geometry::new(Value::LineString(track.points.iter().map(coords).collect())),
    };

    let mut props = Map::new();
    props.insert("kind".to_string(), JsonValue::String("track".to_string()));
    Some(feature(geometry, props))
}

fn waypoint_feature(wpt: &Waypoint) -> Feature {
    let mut props = Map::new();
    props.insert("kind".to_string(), JsonValue::String("waypoint".to_string()));
    props.insert("name".to_string(), JsonValue::String(wpt.name.clone()));
    if let Some(ref time) = wpt.time {
        props.insert("time".to_string(), JsonValue::String(time.clone()));
    }
    feature(Geometry::new(Value::Point(coords(&wpt.position))), props)
}

fn image_feature(marker: &ImageMarker) -> Feature {
    let mut props = Map::new();
    props.insert("kind".to_string(), JsonValue::String("image".to_string()));
    props.insert("name".to_string(), JsonValue::String(marker.name.clone()));
    feature(Geometry::new(Value::Point(coords(&marker.position))), props)
}

fn highlight_feature(highlight: &Highlight) -> Feature {
    let mut props = Map::new();
    props.insert(
        "kind".to_string(),
        JsonValue::String("highlight".to_string()),
    );
    props.insert(
        "name".to_string(),
        JsonValue::String(highlight.name().to_string()),
    );
    feature(
        Geometry::new(Value::Point(coords(&highlight.position()))),
        props,
    )
}

fn feature(geometry: Geometry, props: Map<String, JsonValue>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exif::fixtures::gps_tiff;

    const TRACK_WITH_WAYPOINT: &str = r#"<?xml version="1.0"?>
<gpx version="1.1">
  <wpt lat="2.0" lon="3.0"><name>Summit</name><time>2025-01-01T00:00:00Z</time></wpt>
  <trk>
    <trkseg>
      <trkpt lat="1.0" lon="2.0"/>
      <trkpt lat="3.0" lon="4.0"/>
    </trkseg>
  </trk>
</gpx>"#;

    fn loaded_model() -> GeoModel {
        let mut model = GeoModel::new();
        model.load_track(TRACK_WITH_WAYPOINT).unwrap();
        model
    }

    fn kinds(fc: &FeatureCollection) -> Vec<String> {
        fc.features
            .iter()
            .map(|f| {
                f.properties.as_ref().unwrap()["kind"]
                    .as_str()
                    .unwrap()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_snapshot_features_and_bbox() {
        let mut model = loaded_model();
        let batch = model.begin_image_batch();
        model.ingest_file(
            batch,
            "photo.jpg",
            "image/jpeg",
            gps_tiff((10, 0, 0), Some(b'N'), (20, 0, 0), Some(b'E')),
        );

        let fc = to_feature_collection(&model, &SnapshotOptions::default());
        assert_eq!(kinds(&fc), vec!["track", "waypoint", "image"]);
        assert_eq!(fc.bbox.as_deref(), Some(&[2.0, 1.0, 4.0, 3.0][..]));

        let track = &fc.features[0];
        match &track.geometry.as_ref().unwrap().value {
            Value::LineString(line) => {
                assert_eq!(line.len(), 2);
                assert_eq!(line[0], vec![2.0, 1.0]); // [lon, lat]
            }
            _ => panic!("Expected LineString"),
        }

        let wpt_props = fc.features[1].properties.as_ref().unwrap();
        assert_eq!(wpt_props["name"], "Summit");
        assert_eq!(wpt_props["time"], "2025-01-01T00:00:00Z");

        let img_props = fc.features[2].properties.as_ref().unwrap();
        assert_eq!(img_props["name"], "photo.jpg");
    }

    #[test]
    fn test_empty_model_snapshot() {
        let model = GeoModel::new();
        let fc = to_feature_collection(&model, &SnapshotOptions::default());
        assert!(fc.features.is_empty());
        assert!(fc.bbox.is_none());
    }

    #[test]
    fn test_single_point_track_is_point() {
        let mut model = GeoModel::new();
        model
            .load_track(
                r#"<gpx><trk><trkseg><trkpt lat="5.0" lon="6.0"/></trkseg></trk></gpx>"#,
            )
            .unwrap();

        let fc = to_feature_collection(&model, &SnapshotOptions::default());
        match &fc.features[0].geometry.as_ref().unwrap().value {
            Value::Point(coords) => assert_eq!(coords, &vec![6.0, 5.0]),
            _ => panic!("Expected Point for single-point track"),
        }
    }

    #[test]
    fn test_highlight_feature_present() {
        let mut model = loaded_model();
        model.highlight_waypoint(0);

        let fc = to_feature_collection(&model, &SnapshotOptions::default());
        assert_eq!(kinds(&fc), vec!["track", "waypoint", "highlight"]);

        let props = fc.features[2].properties.as_ref().unwrap();
        assert_eq!(props["name"], "Summit");
        match &fc.features[2].geometry.as_ref().unwrap().value {
            Value::Point(coords) => assert_eq!(coords, &vec![3.0, 2.0]),
            _ => panic!("Expected Point"),
        }
    }

    #[test]
    fn test_layer_toggles() {
        let mut model = loaded_model();
        model.highlight_waypoint(0);

        let opts = SnapshotOptions {
            include_waypoints: false,
            include_highlight: false,
            ..Default::default()
        };
        let fc = to_feature_collection(&model, &opts);
        assert_eq!(kinds(&fc), vec!["track"]);
        // bbox is independent of layer toggles
        assert!(fc.bbox.is_some());
    }
}
