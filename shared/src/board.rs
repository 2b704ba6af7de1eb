//! Wires the store, the pinning machine and the focus signal together.
//!
//! toggle pin -> tap -> submit: the draft is merged with the pending
//! location, appended (and persisted) by the store, and the map is focused
//! on the new report.

use tracing::{debug, info, warn};

use crate::config::CoreConfig;
use crate::persistence::ReportSlot;
use crate::pinning::{PinningEffect, PinningInput, PinningState};
use crate::report::{Coordinate, FormDraft, Report, ReportId, ValidationError};
use crate::store::ReportStore;
use crate::sync::{self, FocusSignal, FocusTarget, ListEntry, MapMarker};

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    Created(Report),
    /// The form stays open with its pending location.
    Rejected(ValidationError),
    /// No form was open.
    Ignored,
}

#[derive(Debug)]
pub struct ReportBoard<S> {
    store: ReportStore<S>,
    pinning: PinningState,
    focus: FocusSignal,
    config: CoreConfig,
}

impl<S: ReportSlot> ReportBoard<S> {
    pub fn initialize(slot: S, config: CoreConfig) -> Self {
        Self::from_store(ReportStore::initialize(slot), config)
    }

    pub fn from_store(store: ReportStore<S>, config: CoreConfig) -> Self {
        Self {
            store,
            pinning: PinningState::Idle,
            focus: FocusSignal::default(),
            config,
        }
    }

    pub fn store(&self) -> &ReportStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ReportStore<S> {
        &mut self.store
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn state(&self) -> PinningState {
        self.pinning
    }

    pub fn reports(&self) -> &[Report] {
        self.store.all()
    }

    fn step(&mut self, input: PinningInput) -> PinningEffect {
        let (next, effect) = self.pinning.apply(input);
        if effect == PinningEffect::Ignored {
            debug!(state = ?self.pinning, input = ?input, "ignored out-of-sequence input");
        }
        self.pinning = next;
        effect
    }

    pub fn toggle_pin(&mut self) {
        self.step(PinningInput::TogglePin);
    }

    /// Returns whether the tap captured a location.
    pub fn map_tap(&mut self, lat: f64, lng: f64) -> bool {
        let at = match Coordinate::new(lat, lng) {
            Ok(at) => at,
            Err(e) => {
                warn!(error = %e, "ignoring map tap");
                return false;
            }
        };
        self.step(PinningInput::MapTap(at)) != PinningEffect::Ignored
    }

    pub fn submit(&mut self, form: FormDraft) -> SubmitOutcome {
        if !self.pinning.is_form_open() {
            debug!(state = ?self.pinning, "submit without an open form");
            return SubmitOutcome::Ignored;
        }

        if let Err(e) = form.validate() {
            info!(error = %e, "report form rejected");
            return SubmitOutcome::Rejected(e);
        }

        let PinningEffect::Commit(location) = self.step(PinningInput::Submit) else {
            return SubmitOutcome::Ignored;
        };

        let draft = form.into_draft(location, self.store.now());
        let report = self.store.add(draft);
        self.focus.emit(report.coordinate(), self.config.focus_zoom);

        SubmitOutcome::Created(report)
    }

    pub fn cancel(&mut self) {
        self.step(PinningInput::Cancel);
    }

    /// Unknown ids are ignored.
    pub fn focus_on(&mut self, id: ReportId) -> Option<FocusTarget> {
        let Some(report) = self.store.get(id) else {
            debug!(%id, "focus requested for unknown report");
            return None;
        };
        Some(self.focus.emit(report.coordinate(), self.config.focus_zoom))
    }

    pub fn focus(&self) -> Option<&FocusTarget> {
        self.focus.current()
    }

    pub fn take_focus(&mut self) -> Option<FocusTarget> {
        self.focus.take()
    }

    pub fn acknowledge_focus(&mut self, sequence: u64) -> bool {
        self.focus.acknowledge(sequence)
    }

    pub fn markers(&self) -> Vec<MapMarker> {
        sync::markers(self.store.all())
    }

    pub fn list_entries(&self) -> Vec<ListEntry> {
        sync::list_entries(self.store.all())
    }
}

impl<S: ReportSlot + Default> Default for ReportBoard<S> {
    fn default() -> Self {
        Self::initialize(S::default(), CoreConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{self, MemorySlot};
    use crate::report::Severity;
    use chrono::{DateTime, Utc};

    fn board() -> ReportBoard<MemorySlot> {
        ReportBoard::initialize(MemorySlot::new(), CoreConfig::default())
    }

    fn smoke() -> FormDraft {
        FormDraft::new("Smoke", "x", Severity::High)
            .at_time("2025-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap())
    }

    #[test]
    fn pin_tap_submit_creates_and_focuses() {
        let mut board = board();

        board.toggle_pin();
        assert!(board.map_tap(41.0, 29.0));
        let SubmitOutcome::Created(report) = board.submit(smoke()) else {
            panic!("expected a report");
        };

        assert_eq!(board.reports(), [report.clone()]);
        assert_eq!((report.lat, report.lng), (41.0, 29.0));
        assert_eq!(report.severity, Severity::High);
        assert_eq!(board.state(), PinningState::Idle);

        let focus = board.focus().copied().unwrap();
        assert_eq!((focus.lat, focus.lng), (41.0, 29.0));
        assert_eq!(focus.zoom, board.config().focus_zoom);

        assert_eq!(persistence::load(board.store().slot()), [report]);
    }

    #[test]
    fn toggle_twice_creates_nothing() {
        let mut board = board();

        board.toggle_pin();
        board.toggle_pin();

        assert_eq!(board.state(), PinningState::Idle);
        assert!(board.reports().is_empty());
        assert!(board.store().slot().bytes().is_none());
    }

    #[test]
    fn cancel_form_discards_location() {
        let mut board = board();
        board.toggle_pin();
        board.map_tap(41.0, 29.0);

        board.cancel();

        assert_eq!(board.state(), PinningState::Idle);
        assert_eq!(board.submit(smoke()), SubmitOutcome::Ignored);
        assert!(board.reports().is_empty());
        assert!(board.focus().is_none());
    }

    #[test]
    fn tap_outside_pinning_is_ignored() {
        let mut board = board();

        assert!(!board.map_tap(41.0, 29.0));
        assert_eq!(board.state(), PinningState::Idle);
    }

    #[test]
    fn invalid_tap_is_ignored() {
        let mut board = board();
        board.toggle_pin();

        assert!(!board.map_tap(f64::NAN, 29.0));
        assert_eq!(board.state(), PinningState::Pinning);
    }

    #[test]
    fn rejected_draft_keeps_form_open() {
        let mut board = board();
        board.toggle_pin();
        board.map_tap(41.0, 29.0);

        let outcome = board.submit(FormDraft::new("", "x", Severity::Low));

        assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
        assert_eq!(
            board.state().pending_location(),
            Some(Coordinate::new(41.0, 29.0).unwrap())
        );
        assert!(matches!(board.submit(smoke()), SubmitOutcome::Created(_)));
    }

    #[test]
    fn selecting_same_report_twice_refocuses() {
        let mut board = board();
        board.toggle_pin();
        board.map_tap(41.0, 29.0);
        let SubmitOutcome::Created(report) = board.submit(smoke()) else {
            panic!("expected a report");
        };
        board.take_focus();

        let first = board.focus_on(report.id).unwrap();
        assert!(board.acknowledge_focus(first.sequence));
        let second = board.focus_on(report.id).unwrap();

        assert_ne!(first.sequence, second.sequence);
        assert_eq!(board.focus(), Some(&second));
    }

    #[test]
    fn focus_on_unknown_report_is_noop() {
        let mut board = board();
        assert!(board.focus_on(ReportId(404)).is_none());
        assert!(board.focus().is_none());
    }

    #[test]
    fn three_reports_project_to_both_views() {
        let mut board = board();
        for title in ["a", "b", "c"] {
            board.toggle_pin();
            board.map_tap(41.0, 29.0);
            board.submit(FormDraft::new(title, "x", Severity::Low));
        }

        let titles: Vec<_> = board.list_entries().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, ["c", "b", "a"]);
        assert_eq!(board.markers().len(), 3);
    }
}
