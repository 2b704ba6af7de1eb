use tracing::{debug, info, warn};

use crate::board::{ReportBoard, SubmitOutcome};
use crate::capabilities::{Capabilities, KvSlot};
use crate::event::Event;
use crate::model::{AppState, Model};
use crate::pinning::PinningState;
use crate::report::{ReportId, Severity};
use crate::view::{FormView, ListView, MapView, PinMode, ViewModel};
use crate::{CANCEL_PIN_LABEL, START_PIN_LABEL};

#[derive(Default)]
pub struct App;

impl App {
    /// Sends the collection to the shell if the last update wrote it.
    fn persist(model: &mut Model, caps: &Capabilities) {
        let Some(bytes) = model.board.store_mut().slot_mut().take_pending() else {
            return;
        };
        let key = model.board.config().storage_key.clone();

        debug!(size = bytes.len(), "persisting reports");
        caps.key_value.set(key, bytes, |result| {
            Event::ReportsPersisted(result.map(|_| ()).map_err(|e| e.to_string()))
        });
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Self::Event, model: &mut Self::Model, caps: &Self::Capabilities) {
        debug!(event = event.name(), state = ?model.state, "update");

        if event.is_interaction() && !model.is_ready() {
            debug!(event = event.name(), "ignored while loading");
            return;
        }

        match event {
            Event::AppStarted => {
                if model.is_ready() {
                    debug!("already started");
                    return;
                }

                let key = model.board.config().storage_key.clone();
                caps.key_value.get(key, |result| {
                    Event::ReportsRestored(result.map_err(|e| e.to_string()))
                });
                caps.render.render();
            }

            Event::ReportsRestored(result) => {
                if model.is_ready() {
                    warn!("late restore ignored; collection already live");
                    return;
                }

                let bytes = result.unwrap_or_else(|e| {
                    warn!(error = %e, "failed to read persisted reports");
                    None
                });
                let config = model.board.config().clone();
                model.board = ReportBoard::initialize(KvSlot::restored(bytes), config);
                model.state = AppState::Ready;

                info!(count = model.board.reports().len(), "report store ready");
                caps.render.render();
            }

            Event::TogglePinning => {
                model.board.toggle_pin();
                caps.render.render();
            }

            Event::MapTapped { lat, lng } => {
                if model.board.map_tap(lat, lng) {
                    model.clear_form_error();
                    caps.render.render();
                }
            }

            Event::SubmitReport(form) => match model.board.submit(form) {
                SubmitOutcome::Created(report) => {
                    model.clear_form_error();
                    Self::persist(model, caps);
                    info!(id = %report.id, "report created");
                    caps.render.render();
                }
                SubmitOutcome::Rejected(e) => {
                    model.set_form_error(e.to_string());
                    caps.render.render();
                }
                SubmitOutcome::Ignored => {}
            },

            Event::CancelReport => {
                model.board.cancel();
                model.clear_form_error();
                caps.render.render();
            }

            Event::ReportSelected { id } => {
                if model.board.focus_on(ReportId(id)).is_some() {
                    caps.render.render();
                }
            }

            Event::FocusConsumed { sequence } => {
                if model.board.acknowledge_focus(sequence) {
                    caps.render.render();
                }
            }

            Event::ReportsPersisted(result) => {
                if let Err(e) = result {
                    warn!(error = %e, "shell failed to store reports");
                }
            }
        }
    }

    fn view(&self, model: &Self::Model) -> Self::ViewModel {
        let board = &model.board;
        let config = board.config();
        let state = board.state();

        let mode = match state {
            PinningState::Idle => PinMode::Idle,
            PinningState::Pinning => PinMode::Pinning,
            PinningState::FormOpen { .. } => PinMode::FormOpen,
        };

        let pin_button_label = if state.is_pinning() {
            CANCEL_PIN_LABEL
        } else {
            START_PIN_LABEL
        };

        let form = state.pending_location().map(|at| FormView {
            lat: at.lat(),
            lng: at.lng(),
            default_severity: Severity::default(),
            severities: Severity::ALL.to_vec(),
            error: model.form_error.clone(),
        });

        let entries = board.list_entries();
        let (default_center_lat, default_center_lng) = config.default_center;

        ViewModel {
            is_loading: !model.is_ready(),
            mode,
            pin_button_label: pin_button_label.to_string(),
            map: MapView {
                markers: board.markers(),
                default_center_lat,
                default_center_lng,
                default_zoom: config.default_zoom,
                accepts_taps: model.is_ready() && state.is_pinning(),
                show_pin_hint: state.is_pinning(),
                focus: board.focus().copied(),
            },
            list: ListView {
                count: entries.len(),
                is_empty: entries.is_empty(),
                entries,
            },
            form,
        }
    }
}
