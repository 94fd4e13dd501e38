//! Budget-layer switching with the unsaved-changes guard.

use civic_core::{SwitchOutcome, needs_confirmation};
use civic_types::Layer;

use crate::App;

impl App {
    /// Tab: ask to switch to the other layer.
    pub fn toggle_layer(&mut self) -> SwitchOutcome {
        self.request_layer(self.active_layer().other())
    }

    /// Ask to switch to `target`. Editing an unsaved draft toward a layer with
    /// nothing submitted parks the request until [`App::confirm_layer_switch`].
    pub fn request_layer(&mut self, target: Layer) -> SwitchOutcome {
        let phase = self.scene.phase();
        let active = self.active_layer();
        let guarded = phase.is_some_and(|phase| {
            needs_confirmation(
                &self.player,
                Some(phase),
                active,
                target,
                self.editors.get(phase).draft(),
            )
        });
        let outcome = self.layers.request(target, guarded);
        match outcome {
            SwitchOutcome::Switched { .. } => self.after_layer_switch(),
            SwitchOutcome::NeedsConfirmation { target } => {
                tracing::debug!(%active, %target, "Layer switch awaiting confirmation");
            }
            SwitchOutcome::Unchanged => {}
        }
        outcome
    }

    /// Accept the pending switch, discarding the draft.
    pub fn confirm_layer_switch(&mut self) -> Option<SwitchOutcome> {
        let outcome = self.layers.confirm()?;
        if matches!(outcome, SwitchOutcome::Switched { .. }) {
            self.after_layer_switch();
        }
        Some(outcome)
    }

    /// Decline the pending switch; the draft stays as it was.
    pub fn cancel_layer_switch(&mut self) -> Option<Layer> {
        let target = self.layers.cancel()?;
        tracing::debug!(%target, "Layer switch cancelled");
        Some(target)
    }

    /// Whether a switch is waiting on the user.
    #[must_use]
    pub fn has_pending_switch(&self) -> bool {
        self.layers.pending().is_some()
    }

    pub(crate) fn after_layer_switch(&mut self) {
        self.gesture.cancel();
        self.persist_active_layer();
        if let Some(phase) = self.scene.phase() {
            self.seed_editor(phase);
        }
    }
}
