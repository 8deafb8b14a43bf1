use std::cell::RefCell;
use std::rc::Rc;

use serde::Deserialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;

use crate::console::console_log;
use crate::model::GeoModel;

/// One file from a directory selection, as handed over by the JS side.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryFile {
    pub name: String,
    #[serde(rename = "type", default)]
    pub mime: String,
    pub bytes: Vec<u8>,
}

pub fn decode_files(files: &js_sys::Array) -> Result<Vec<DirectoryFile>, JsValue> {
    files
        .iter()
        .map(|v| serde_wasm_bindgen::from_value(v).map_err(|e| JsValue::from_str(&e.to_string())))
        .collect()
}

/// Drive one directory selection through the model.
///
/// Files are dispatched in filename-sorted order, one task per file, so no
/// extraction blocks the consumer thread and a failing file cannot abort its
/// siblings. Every result funnels through the model's single serialization
/// point, which discards stragglers tagged with a superseded batch.
pub fn run_batch(model: Rc<RefCell<GeoModel>>, mut files: Vec<DirectoryFile>) {
    sort_by_name(&mut files);
    let batch = model.borrow_mut().begin_image_batch();

    for file in files {
        let model = Rc::clone(&model);
        spawn_local(async move {
            let stored = model
                .borrow_mut()
                .ingest_file(batch, &file.name, &file.mime, file.bytes);
            if !stored {
                console_log!("discarding stale result for {}", file.name);
            }
        });
    }
}

fn sort_by_name(files: &mut [DirectoryFile]) {
    files.sort_by(|a, b| a.name.cmp(&b.name));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> DirectoryFile {
        DirectoryFile {
            name: name.to_string(),
            mime: "image/jpeg".to_string(),
            bytes: Vec::new(),
        }
    }

    #[test]
    fn test_processing_order_is_filename_sorted() {
        let mut files = vec![file("b.jpg"), file("c.jpg"), file("a.jpg")];
        sort_by_name(&mut files);
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }
}
