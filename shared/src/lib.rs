// Shared core for the incident map: reports pinned to map locations,
// shown as markers and as a newest-first list.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod board;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod model;
pub mod persistence;
pub mod pinning;
pub mod report;
pub mod store;
pub mod sync;
pub mod view;

pub use app::App;
pub use board::{ReportBoard, SubmitOutcome};
pub use capabilities::{Capabilities, Effect, KvSlot};
pub use config::CoreConfig;
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::{AppState, Model};
pub use persistence::{FileSlot, MemorySlot, ReportSlot, SlotError};
pub use pinning::{PinningEffect, PinningInput, PinningState};
pub use report::{
    Coordinate, FormDraft, Report, ReportDraft, ReportId, Severity, SeverityTone, ValidationError,
};
pub use store::ReportStore;
pub use sync::{FocusSignal, FocusTarget, ListEntry, MapMarker};
pub use view::{FormView, ListView, MapView, PinMode, ViewModel};

pub const STORAGE_KEY: &str = "reports";
/// Istanbul.
pub const DEFAULT_MAP_CENTER: (f64, f64) = (41.0082, 28.9784);
pub const DEFAULT_MAP_ZOOM: f64 = 13.0;
pub const FOCUS_ZOOM: f64 = 16.0;
pub const MAX_TITLE_LENGTH: usize = 120;
pub const MAX_DESCRIPTION_LENGTH: usize = 4096;
pub const START_PIN_LABEL: &str = "Report Smoke";
pub const CANCEL_PIN_LABEL: &str = "Cancel";
