use serde::{Deserialize, Serialize};

use crate::{DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM, FOCUS_ZOOM, STORAGE_KEY};

/// Compiled-in settings for the core. Shells may override them before the
/// first event, but nothing is read from the environment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Key of the key-value slot holding the report collection.
    pub storage_key: String,
    pub default_center: (f64, f64),
    pub default_zoom: f64,
    /// Zoom level the map flies to when focusing a report.
    pub focus_zoom: f64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            default_center: DEFAULT_MAP_CENTER,
            default_zoom: DEFAULT_MAP_ZOOM,
            focus_zoom: FOCUS_ZOOM,
        }
    }
}
