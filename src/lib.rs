mod console;
mod coords;
mod error;
mod exif;
mod ingest;
mod model;
mod options;
mod parser;
mod types;
mod view;

pub use coords::{BoundingRegion, GeoPoint, Hemisphere, to_decimal_degrees};
pub use error::GpxPhotoMapError;
pub use exif::{extract_geotag, is_image_mime};
pub use ingest::DirectoryFile;
pub use model::{GeoModel, Highlight, ImageRow, WaypointRow};
pub use options::SnapshotOptions;
pub use parser::parse_track_document;
pub use types::{ImageAsset, ImageMarker, Track, Waypoint};
pub use view::to_feature_collection;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

/// One geospatial session, exposed to the JS map renderer and list views.
#[wasm_bindgen]
pub struct GpxPhotoMap {
    model: Rc<RefCell<GeoModel>>,
}

#[wasm_bindgen]
impl GpxPhotoMap {
    #[wasm_bindgen(constructor)]
    pub fn new() -> GpxPhotoMap {
        console_error_panic_hook::set_once();
        GpxPhotoMap {
            model: Rc::new(RefCell::new(GeoModel::new())),
        }
    }

    /// Parse and install a track document; prior state survives a failure.
    #[wasm_bindgen(js_name = loadTrack)]
    pub fn load_track(&self, gpx: &str) -> Result<(), JsValue> {
        self.model.borrow_mut().load_track(gpx).map_err(JsValue::from)
    }

    /// Ingest a directory selection: an Array of {name, type, bytes}
    /// records. Returns once the batch is dispatched; markers and assets
    /// appear incrementally as per-file tasks resolve.
    #[wasm_bindgen(js_name = loadImageDirectory)]
    pub fn load_image_directory(&self, files: js_sys::Array) -> Result<(), JsValue> {
        let files = ingest::decode_files(&files)?;
        ingest::run_batch(Rc::clone(&self.model), files);
        Ok(())
    }

    /// Current drawable primitives as a GeoJSON FeatureCollection.
    #[wasm_bindgen(js_name = renderSnapshot)]
    pub fn render_snapshot(&self, options: JsValue) -> Result<JsValue, JsValue> {
        let opts = parse_options(options)?;
        let fc = view::to_feature_collection(&self.model.borrow(), &opts);
        serde_wasm_bindgen::to_value(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Track bounding region, or null before any track is loaded.
    pub fn bounds(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.model.borrow().bounds())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Waypoint list-view rows: time, name, latitude, longitude.
    #[wasm_bindgen(js_name = waypointRows)]
    pub fn waypoint_rows(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.model.borrow().waypoint_rows())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Image list-view rows, sorted by name: name, latitude, longitude.
    #[wasm_bindgen(js_name = imageRows)]
    pub fn image_rows(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.model.borrow().image_rows())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = highlightWaypoint)]
    pub fn highlight_waypoint(&self, index: usize) -> bool {
        self.model.borrow_mut().highlight_waypoint(index)
    }

    #[wasm_bindgen(js_name = highlightImage)]
    pub fn highlight_image(&self, name: &str) -> bool {
        self.model.borrow_mut().highlight_image(name)
    }

    /// Resolve a clicked marker/row name to its displayable asset.
    #[wasm_bindgen(js_name = selectImage)]
    pub fn select_image(&self, name: &str) -> Result<JsValue, JsValue> {
        let mut model = self.model.borrow_mut();
        let asset = model.select_image(name).map_err(JsValue::from)?;
        serde_wasm_bindgen::to_value(asset).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for GpxPhotoMap {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_options(options: JsValue) -> Result<SnapshotOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(SnapshotOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
