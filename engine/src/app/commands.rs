//! Scene navigation and the submit / save-draft / restart / preset commands.

use thiserror::Error;

use civic_core::{Edit, phase_default, random_allocation};
use civic_types::ui::InputMode;
use civic_types::{Allocation, Layer, Phase, Preset, Scene, SceneTrigger, TransitionError};

use crate::App;
use crate::status::StatusMessage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("there is nothing to submit on this screen")]
    NotEditing,
    #[error("allocations total {total}%; they must total exactly 100%")]
    Incomplete { total: u32 },
    #[error("this allocation has already been submitted")]
    Locked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blind submitted; the other layer still needs one, so it is now active.
    NextLayer(Layer),
    /// Moved on to the next scene.
    Advanced(Scene),
}

impl App {
    /// Enter on a non-editing scene, submit on an editing one.
    pub fn continue_scene(&mut self) {
        let trigger = match self.scene {
            Scene::Intro => SceneTrigger::Start,
            Scene::Debrief | Scene::Revenue => SceneTrigger::Continue,
            Scene::Blind | Scene::Adjust => {
                if let Err(e) = self.submit() {
                    self.set_status(StatusMessage::warning(e.to_string()));
                }
                return;
            }
            Scene::Compare => return,
        };
        self.navigate(trigger);
    }

    /// Skip the revenue explorer (debrief only).
    pub fn skip(&mut self) {
        if self.scene == Scene::Debrief {
            self.navigate(SceneTrigger::Skip);
        }
    }

    pub fn open_debrief(&mut self) {
        self.navigate(SceneTrigger::OpenDebrief);
    }

    /// Forget every allocation, on disk too, and return to the intro.
    pub fn restart(&mut self) {
        self.player.clear();
        self.clear_persisted_allocations();
        self.gesture.cancel();
        self.layers.cancel();
        let n = self.registry.len();
        for phase in Phase::ALL {
            self.editors.get_mut(phase).seed(&phase_default(phase, n));
        }
        self.view.selected = 0;
        self.view.revenue_focus = None;
        self.view.input_mode = InputMode::default();
        tracing::info!("Session restarted");
        self.navigate(SceneTrigger::Restart);
    }

    /// Submit the on-screen draft for the active layer.
    pub fn submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        let phase = self.scene.phase().ok_or(SubmitError::NotEditing)?;
        let layer = self.active_layer();
        let allocation = self.complete_draft(phase)?;

        self.store_allocation(phase, layer, allocation)?;
        self.editors.get_mut(phase).lock();
        self.gesture.cancel();
        tracing::info!(%phase, %layer, "Submitted allocation");

        match phase {
            Phase::Blind => {
                self.persist_phase(Phase::Blind);
                let other = layer.other();
                if self.player.has_submission(Phase::Blind, other) {
                    self.navigate(SceneTrigger::BlindComplete);
                    return Ok(SubmitOutcome::Advanced(self.scene));
                }
                self.layers.request(other, false);
                self.after_layer_switch();
                self.set_status(StatusMessage::info(format!(
                    "Saved {}. Switching to {}...",
                    layer.display_name(),
                    other.display_name()
                )));
                Ok(SubmitOutcome::NextLayer(other))
            }
            Phase::Adjusted => {
                self.persist_phase(Phase::Blind);
                self.persist_phase(Phase::Adjusted);
                self.navigate(SceneTrigger::AdjustedSubmitted);
                Ok(SubmitOutcome::Advanced(self.scene))
            }
        }
    }

    /// Store the draft without locking or leaving the scene.
    pub fn save_draft(&mut self) -> Result<(), SubmitError> {
        let phase = self.scene.phase().ok_or(SubmitError::NotEditing)?;
        let layer = self.active_layer();
        let allocation = match self.complete_draft(phase) {
            Ok(allocation) => allocation,
            Err(e) => {
                self.set_status(StatusMessage::warning(e.to_string()));
                return Err(e);
            }
        };
        self.store_allocation(phase, layer, allocation)?;
        self.persist_phase(phase);
        tracing::info!(%phase, %layer, "Saved draft");
        self.set_status(StatusMessage::info(format!("Draft saved for {}", layer.display_name())));
        Ok(())
    }

    /// Apply the `index`-th preset from [`App::presets`] (blind round only).
    pub fn apply_preset(&mut self, index: usize) {
        if self.scene != Scene::Blind {
            self.set_status(StatusMessage::warning(
                "Presets are only available in the blind round",
            ));
            return;
        }
        let Some(preset) = self.presets().into_iter().nth(index) else {
            return;
        };
        self.view.preset_cursor = index;
        let layer = self.active_layer();
        let n = self.registry.len();
        let random = &mut *self.random;
        let resolved = preset.resolve(&self.registry, layer, |len| random_allocation(len, random));
        let allocation = match resolved {
            Ok(allocation) => allocation,
            Err(e) => {
                tracing::warn!(sectors = n, "Preset could not be applied: {e}");
                return;
            }
        };
        let edit = match preset {
            Preset::Random => Edit::Random(allocation),
            _ => Edit::Preset(allocation),
        };
        if self.apply(Phase::Blind, &edit) {
            let label = preset.label(&self.registry);
            self.set_status(StatusMessage::info(format!("Applied {label}")));
        }
    }

    /// Draw a fresh random allocation for the on-screen draft.
    pub fn randomize(&mut self) {
        let Some(phase) = self.scene.phase() else {
            return;
        };
        let allocation = match random_allocation(self.registry.len(), &mut *self.random) {
            Ok(allocation) => allocation,
            Err(e) => {
                tracing::warn!("Randomize failed: {e}");
                return;
            }
        };
        if self.apply(phase, &Edit::Random(allocation)) {
            self.set_status(StatusMessage::info(format!("Randomized {phase} allocations")));
        }
    }

    pub fn cycle_input_mode(&mut self) {
        let Some(phase) = self.scene.phase() else {
            return;
        };
        self.gesture.cancel();
        self.view.input_mode = self.view.input_mode.cycle(phase);
    }

    pub fn cycle_compare_view(&mut self) {
        self.view.compare_view = self.view.compare_view.next();
        self.persist_compare_view();
    }

    pub(crate) fn navigate(&mut self, trigger: SceneTrigger) {
        if let Err(e) = self.transition(trigger) {
            tracing::debug!("{e}");
        }
    }

    fn transition(&mut self, trigger: SceneTrigger) -> Result<(), TransitionError> {
        let from = self.scene;
        let to = from.next(trigger)?;
        self.gesture.cancel();
        self.scene = to;
        tracing::debug!(?from, ?to, ?trigger, "Scene transition");
        self.enter_scene(to);
        Ok(())
    }

    fn enter_scene(&mut self, scene: Scene) {
        match scene {
            Scene::Blind => self.seed_editor(Phase::Blind),
            Scene::Adjust => {
                let layer = self.active_layer();
                let values = self
                    .player
                    .submission(Phase::Adjusted, layer)
                    .or_else(|| self.player.submission(Phase::Blind, layer))
                    .map_or_else(
                        || phase_default(Phase::Adjusted, self.registry.len()),
                        |a| a.values().to_vec(),
                    );
                self.editors.adjusted.seed(&values);
                if !InputMode::available(Phase::Adjusted).contains(&self.view.input_mode) {
                    self.view.input_mode = InputMode::default();
                }
            }
            Scene::Revenue => self.view.revenue_focus = None,
            Scene::Intro | Scene::Debrief | Scene::Compare => {}
        }
    }

    /// Reset the controls for `phase` to the active layer's submission, or the
    /// phase default when there is none.
    pub(crate) fn seed_editor(&mut self, phase: Phase) {
        let values = self
            .player
            .submission(phase, self.active_layer())
            .map_or_else(
                || phase_default(phase, self.registry.len()),
                |a| a.values().to_vec(),
            );
        self.editors.get_mut(phase).seed(&values);
    }

    fn complete_draft(&self, phase: Phase) -> Result<Allocation, SubmitError> {
        let editor = self.editors.get(phase);
        if editor.is_locked() {
            return Err(SubmitError::Locked);
        }
        editor
            .draft()
            .to_allocation()
            .map_err(|_| SubmitError::Incomplete {
                total: editor.draft().total(),
            })
    }

    fn store_allocation(
        &mut self,
        phase: Phase,
        layer: Layer,
        allocation: Allocation,
    ) -> Result<(), SubmitError> {
        self.player.store(phase, layer, allocation).map_err(|e| {
            tracing::warn!(%phase, %layer, "Rejected allocation: {e}");
            SubmitError::Incomplete {
                total: self.editors.get(phase).draft().total(),
            }
        })
    }
}
