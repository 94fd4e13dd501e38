//! Layer coordinator: owns the active layer and guards switches.

use civic_types::{Draft, Layer, Phase};

use crate::store::{PlayerState, phase_default};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Already on the requested layer.
    Unchanged,
    Switched { from: Layer, to: Layer },
    /// The live draft would be lost; ask first.
    NeedsConfirmation { target: Layer },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerCoordinator {
    active: Layer,
    pending: Option<Layer>,
}

impl LayerCoordinator {
    #[must_use]
    pub const fn new(active: Layer) -> Self {
        Self {
            active,
            pending: None,
        }
    }

    #[must_use]
    pub const fn active(&self) -> Layer {
        self.active
    }

    /// Target of a switch waiting on confirmation.
    #[must_use]
    pub const fn pending(&self) -> Option<Layer> {
        self.pending
    }

    /// Ask to move to `target`. `guarded` is the result of [`needs_confirmation`].
    pub fn request(&mut self, target: Layer, guarded: bool) -> SwitchOutcome {
        if target == self.active {
            self.pending = None;
            return SwitchOutcome::Unchanged;
        }
        if guarded {
            self.pending = Some(target);
            return SwitchOutcome::NeedsConfirmation { target };
        }
        self.switch_to(target)
    }

    /// Proceed with the pending switch, discarding the draft.
    pub fn confirm(&mut self) -> Option<SwitchOutcome> {
        let target = self.pending.take()?;
        Some(self.switch_to(target))
    }

    /// Drop the pending switch and stay put.
    pub fn cancel(&mut self) -> Option<Layer> {
        self.pending.take()
    }

    fn switch_to(&mut self, target: Layer) -> SwitchOutcome {
        let from = self.active;
        self.active = target;
        self.pending = None;
        tracing::info!(%from, to = %target, "Switched budget layer");
        SwitchOutcome::Switched { from, to: target }
    }
}

/// Whether `draft` differs from what reopening the slot would show: the
/// submitted value if there is one, else the phase default.
#[must_use]
pub fn is_unsaved(state: &PlayerState, phase: Phase, layer: Layer, draft: &Draft) -> bool {
    match state.submission(phase, layer) {
        Some(submitted) => draft != submitted,
        None => draft.values() != phase_default(phase, state.sectors()).as_slice(),
    }
}

/// Guard for switching from `active` to `target` while editing `phase`.
///
/// Only an unsaved draft headed for a layer with nothing submitted in this
/// phase asks for confirmation. Outside the editing scenes there is nothing
/// to lose.
#[must_use]
pub fn needs_confirmation(
    state: &PlayerState,
    phase: Option<Phase>,
    active: Layer,
    target: Layer,
    draft: &Draft,
) -> bool {
    let Some(phase) = phase else {
        return false;
    };
    target != active
        && is_unsaved(state, phase, active, draft)
        && !state.has_submission(phase, target)
}
