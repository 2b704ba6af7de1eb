use serde::{Deserialize, Serialize};

use crate::board::ReportBoard;
use crate::capabilities::KvSlot;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppState {
    /// Waiting for the persisted collection; interaction is ignored.
    #[default]
    Loading,
    Ready,
}

#[derive(Debug, Default)]
pub struct Model {
    pub state: AppState,
    pub board: ReportBoard<KvSlot>,
    /// Why the last submit was rejected; cleared when the form closes or succeeds.
    pub form_error: Option<String>,
}

impl Model {
    pub fn is_ready(&self) -> bool {
        self.state == AppState::Ready
    }

    pub fn set_form_error(&mut self, message: impl Into<String>) {
        self.form_error = Some(message.into());
    }

    pub fn clear_form_error(&mut self) {
        self.form_error = None;
    }
}
