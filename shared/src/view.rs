use serde::{Deserialize, Serialize};

use crate::report::Severity;
use crate::sync::{FocusTarget, ListEntry, MapMarker};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PinMode {
    Idle,
    Pinning,
    FormOpen,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MapView {
    pub markers: Vec<MapMarker>,
    pub default_center_lat: f64,
    pub default_center_lng: f64,
    pub default_zoom: f64,
    /// Map taps are only forwarded while this is set.
    pub accepts_taps: bool,
    pub show_pin_hint: bool,
    /// Recenter target; acknowledge with `Event::FocusConsumed`.
    pub focus: Option<FocusTarget>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ListView {
    pub entries: Vec<ListEntry>,
    pub count: usize,
    pub is_empty: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FormView {
    pub lat: f64,
    pub lng: f64,
    pub default_severity: Severity,
    pub severities: Vec<Severity>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub is_loading: bool,
    pub mode: PinMode,
    pub pin_button_label: String,
    pub map: MapView,
    pub list: ListView,
    pub form: Option<FormView>,
}
