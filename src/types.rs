use serde::Serialize;

use crate::coords::GeoPoint;

/// Placeholder applied when a waypoint element carries no <name> child.
pub const DEFAULT_WAYPOINT_NAME: &str = "Waypoint";

/// One continuous path; point order is document order.
#[derive(Debug, Clone, Default)]
pub struct Track {
    pub points: Vec<GeoPoint>,
}

/// A named point of interest listed independently of the track.
#[derive(Debug, Clone)]
pub struct Waypoint {
    pub position: GeoPoint,
    pub name: String,
    pub time: Option<String>,
}

impl Waypoint {
    pub fn new(position: GeoPoint, name: Option<String>, time: Option<String>) -> Self {
        Self {
            position,
            name: name.unwrap_or_else(|| DEFAULT_WAYPOINT_NAME.to_string()),
            time,
        }
    }
}

/// A geotagged image, named by its source filename.
#[derive(Debug, Clone)]
pub struct ImageMarker {
    pub position: GeoPoint,
    pub name: String,
}

/// Raw image bytes keyed by filename, resolvable from a clicked marker.
#[derive(Debug, Clone, Serialize)]
pub struct ImageAsset {
    pub name: String,
    pub mime: String,
    pub data: Vec<u8>,
}
