use serde::{Deserialize, Serialize};

use crate::report::FormDraft;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    /// Sent once by the shell; loads the persisted collection.
    AppStarted,

    // --- Pin toggle button ---
    TogglePinning,

    // --- Map view ---
    MapTapped { lat: f64, lng: f64 },
    FocusConsumed { sequence: u64 },

    // --- Report form ---
    SubmitReport(FormDraft),
    CancelReport,

    // --- List view ---
    ReportSelected { id: u64 },

    // --- Capability responses ---
    #[serde(skip)]
    ReportsRestored(Result<Option<Vec<u8>>, String>),
    #[serde(skip)]
    ReportsPersisted(Result<(), String>),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::TogglePinning => "toggle_pinning",
            Self::MapTapped { .. } => "map_tapped",
            Self::FocusConsumed { .. } => "focus_consumed",
            Self::SubmitReport(_) => "submit_report",
            Self::CancelReport => "cancel_report",
            Self::ReportSelected { .. } => "report_selected",
            Self::ReportsRestored(_) => "reports_restored",
            Self::ReportsPersisted(_) => "reports_persisted",
        }
    }

    /// Events that come from the user rather than from a capability.
    #[must_use]
    pub const fn is_interaction(&self) -> bool {
        matches!(
            self,
            Self::TogglePinning
                | Self::MapTapped { .. }
                | Self::SubmitReport(_)
                | Self::CancelReport
                | Self::ReportSelected { .. }
        )
    }
}
