use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::Serialize;

use crate::coords::{BoundingRegion, GeoPoint};
use crate::error::GpxPhotoMapError;
use crate::exif;
use crate::parser;
use crate::types::{ImageAsset, ImageMarker, Track, Waypoint};

type Result<T> = std::result::Result<T, GpxPhotoMapError>;

/// The transient visual-emphasis target; at most one at a time,
/// last write wins.
#[derive(Debug, Clone)]
pub enum Highlight {
    Waypoint(Waypoint),
    Image(ImageMarker),
}

impl Highlight {
    pub fn position(&self) -> GeoPoint {
        match self {
            Self::Waypoint(wpt) => wpt.position,
            Self::Image(marker) => marker.position,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Waypoint(wpt) => &wpt.name,
            Self::Image(marker) => &marker.name,
        }
    }
}

/// Row projection for the waypoint list view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaypointRow {
    pub time: Option<String>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Row projection for the image list view; rows arrive name-sorted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRow {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// The authoritative in-memory state for one loaded session.
///
/// Loading a track document replaces the track, waypoints, and bounds
/// wholesale; starting an image batch replaces the markers and assets
/// wholesale. All concurrent per-file extraction results funnel through
/// `ingest_file`, which drops results from superseded batches.
pub struct GeoModel {
    track: Option<Track>,
    waypoints: Vec<Waypoint>,
    bounds: Option<BoundingRegion>,
    markers: Vec<ImageMarker>,
    assets: HashMap<String, ImageAsset>,
    highlighted: Option<Highlight>,
    selected: Option<String>,
    batch: u64,
}

impl GeoModel {
    pub fn new() -> Self {
        Self {
            track: None,
            waypoints: Vec::new(),
            bounds: None,
            markers: Vec::new(),
            assets: HashMap::new(),
            highlighted: None,
            selected: None,
            batch: 0,
        }
    }

    /// Parse a track document and install it. The track, waypoint list, and
    /// bounding region are replaced together; on a parse failure nothing
    /// changes and the error is surfaced to the caller.
    pub fn load_track(&mut self, xml: &str) -> Result<()> {
        let (track, waypoints) = parser::parse_track_document(xml)?;
        self.bounds = BoundingRegion::from_points(&track.points);
        self.track = Some(track);
        self.waypoints = waypoints;
        Ok(())
    }

    /// Start a new image-directory batch, discarding the previous marker and
    /// asset collections. Returns the generation tag that in-flight per-file
    /// tasks must present to `ingest_file`; results tagged with an older
    /// generation are dropped, so stragglers from a superseded directory
    /// load cannot corrupt the current one.
    pub fn begin_image_batch(&mut self) -> u64 {
        self.batch += 1;
        self.markers.clear();
        self.assets.clear();
        self.batch
    }

    /// Apply one file's ingestion result. Returns false when the result
    /// belongs to a superseded batch and was discarded.
    ///
    /// Every current-batch file yields an asset (first insertion wins on
    /// duplicate names); a marker is added only when the MIME type indicates
    /// an image and a geotag could be extracted. The marker list stays
    /// name-sorted regardless of arrival order.
    pub fn ingest_file(&mut self, batch: u64, name: &str, mime: &str, bytes: Vec<u8>) -> bool {
        if batch != self.batch {
            return false;
        }

        if exif::is_image_mime(mime) {
            if let Some(position) = exif::extract_geotag(&bytes) {
                let idx = self
                    .markers
                    .binary_search_by(|m| m.name.as_str().cmp(name))
                    .unwrap_or_else(|i| i);
                self.markers.insert(
                    idx,
                    ImageMarker {
                        position,
                        name: name.to_string(),
                    },
                );
            }
        }

        if let Entry::Vacant(slot) = self.assets.entry(name.to_string()) {
            slot.insert(ImageAsset {
                name: name.to_string(),
                mime: mime.to_string(),
                data: bytes,
            });
        }
        true
    }

    /// Highlight a waypoint by its row index. False when out of range.
    pub fn highlight_waypoint(&mut self, index: usize) -> bool {
        match self.waypoints.get(index) {
            Some(wpt) => {
                self.highlighted = Some(Highlight::Waypoint(wpt.clone()));
                true
            }
            None => false,
        }
    }

    /// Highlight an image marker by filename. False when no such marker.
    pub fn highlight_image(&mut self, name: &str) -> bool {
        match self.markers.iter().find(|m| m.name == name) {
            Some(marker) => {
                self.highlighted = Some(Highlight::Image(marker.clone()));
                true
            }
            None => false,
        }
    }

    /// Resolve a marker's filename to its loaded asset for display.
    /// A miss is a typed result, never a fault; it occurs when the directory
    /// load has not completed or the name has no asset.
    pub fn select_image(&mut self, name: &str) -> Result<&ImageAsset> {
        match self.assets.get(name) {
            Some(asset) => {
                self.selected = Some(name.to_string());
                Ok(asset)
            }
            None => Err(GpxPhotoMapError::AssetNotFound {
                name: name.to_string(),
            }),
        }
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn bounds(&self) -> Option<&BoundingRegion> {
        self.bounds.as_ref()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Name-sorted, independent of extraction completion order.
    pub fn image_markers(&self) -> &[ImageMarker] {
        &self.markers
    }

    pub fn highlighted(&self) -> Option<&Highlight> {
        self.highlighted.as_ref()
    }

    pub fn selected_image(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn waypoint_rows(&self) -> Vec<WaypointRow> {
        self.waypoints
            .iter()
            .map(|wpt| WaypointRow {
                time: wpt.time.clone(),
                name: wpt.name.clone(),
                latitude: wpt.position.latitude,
                longitude: wpt.position.longitude,
            })
            .collect()
    }

    pub fn image_rows(&self) -> Vec<ImageRow> {
        self.markers
            .iter()
            .map(|m| ImageRow {
                name: m.name.clone(),
                latitude: m.position.latitude,
                longitude: m.position.longitude,
            })
            .collect()
    }
}

impl Default for GeoModel {
    fn default() -> Self {
        Self::new()
    }
}
