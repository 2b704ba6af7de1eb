//! The create-report interaction: idle, pinning a location, then the form.
//!
//! The pending location only exists inside `FormOpen`, so at most one report
//! can be in flight.

use serde::{Deserialize, Serialize};

use crate::report::Coordinate;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PinningState {
    #[default]
    Idle,
    Pinning,
    FormOpen { pending: Coordinate },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PinningInput {
    TogglePin,
    MapTap(Coordinate),
    Submit,
    Cancel,
}

/// What the caller has to do after a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PinningEffect {
    None,
    /// Input not valid in the current state; nothing changed.
    Ignored,
    /// Create a report at this location.
    Commit(Coordinate),
    /// The pending location (if any) was dropped.
    Discarded,
}

impl PinningState {
    #[must_use]
    pub fn apply(self, input: PinningInput) -> (PinningState, PinningEffect) {
        use PinningInput as I;
        use PinningState as S;

        match (self, input) {
            (S::Idle, I::TogglePin) => (S::Pinning, PinningEffect::None),
            (S::Pinning, I::TogglePin | I::Cancel) => (S::Idle, PinningEffect::Discarded),
            (S::Pinning, I::MapTap(at)) => (S::FormOpen { pending: at }, PinningEffect::None),
            (S::FormOpen { pending }, I::Submit) => (S::Idle, PinningEffect::Commit(pending)),
            (S::FormOpen { .. }, I::Cancel) => (S::Idle, PinningEffect::Discarded),
            (state, _) => (state, PinningEffect::Ignored),
        }
    }

    #[must_use]
    pub fn pending_location(&self) -> Option<Coordinate> {
        match self {
            PinningState::FormOpen { pending } => Some(*pending),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_pinning(&self) -> bool {
        matches!(self, PinningState::Pinning)
    }

    #[must_use]
    pub fn is_form_open(&self) -> bool {
        matches!(self, PinningState::FormOpen { .. })
    }
}
