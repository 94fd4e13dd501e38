//! Durable state for the App.
//!
//! Every write is best-effort: a failure is logged, surfaced as a status
//! warning, and the in-memory state stays authoritative.

use civic_core::{LayerCoordinator, keys, phase_key, snapshot};
use civic_types::ui::CompareView;
use civic_types::{Layer, Phase};

use crate::App;
use crate::status::StatusMessage;

impl App {
    /// Merge stored snapshots into the player state and pick up the saved
    /// layer and comparison view.
    pub(crate) fn restore_from_store(&mut self) {
        for phase in Phase::ALL {
            let Some(raw) = self.store.get(phase_key(phase)) else {
                continue;
            };
            let restored = snapshot::decode(&raw, self.registry.len());
            let taken = self.player.merge(phase, restored);
            tracing::debug!(%phase, taken, "Restored allocations");
        }

        if let Some(raw) = self.store.get(keys::ACTIVE_LAYER) {
            match Layer::parse(&raw) {
                Some(layer) => self.layers = LayerCoordinator::new(layer),
                None => tracing::warn!(value = %raw, "Ignoring unknown stored layer"),
            }
        }

        self.view.compare_view = match self.store.get(keys::COMPARE_VIEW) {
            Some(raw) => CompareView::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Ignoring unknown stored comparison view");
                CompareView::for_layer(self.active_layer())
            }),
            None => CompareView::for_layer(self.active_layer()),
        };
    }

    pub(crate) fn persist_phase(&mut self, phase: Phase) {
        match snapshot::encode(self.player.phase(phase)) {
            Ok(json) => self.write_key(phase_key(phase), &json),
            Err(e) => tracing::warn!(%phase, "Failed to encode allocations: {e}"),
        }
    }

    pub(crate) fn persist_active_layer(&mut self) {
        let layer = self.active_layer();
        self.write_key(keys::ACTIVE_LAYER, layer.as_str());
    }

    pub(crate) fn persist_compare_view(&mut self) {
        let view = self.view.compare_view;
        self.write_key(keys::COMPARE_VIEW, view.as_str());
    }

    /// Remove both allocation snapshots.
    pub(crate) fn clear_persisted_allocations(&mut self) {
        for phase in Phase::ALL {
            if let Err(e) = self.store.remove(phase_key(phase)) {
                tracing::warn!(%phase, "Failed to clear stored allocations: {e}");
                self.set_status(StatusMessage::warning("Could not clear saved allocations"));
            }
        }
    }

    fn write_key(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, "Failed to persist: {e}");
            self.set_status(StatusMessage::warning("Could not save to disk; changes kept in memory"));
        }
    }
}
