use serde::Deserialize;

/// Layer toggles for the renderer snapshot (default: everything).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotOptions {
    #[serde(default = "default_true")]
    pub include_track: bool,

    #[serde(default = "default_true")]
    pub include_waypoints: bool,

    #[serde(default = "default_true")]
    pub include_images: bool,

    #[serde(default = "default_true")]
    pub include_highlight: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            include_track: true,
            include_waypoints: true,
            include_images: true,
            include_highlight: true,
        }
    }
}

fn default_true() -> bool {
    true
}
