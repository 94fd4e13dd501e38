//! The session: one [`App`] owns all state and every handler takes `&mut self`.

mod commands;
mod editing;
mod init;
mod layers;
mod persistence;

use std::time::Instant;

use civic_core::{
    ComparisonReport, KeyValueStore, LayerCoordinator, PieGesture, PlayerState, RandomSource,
    RepresentationSync, Series, SeriesBuffer, chart_series,
};
use civic_types::ui::{CompareView, InputMode, Region, UiOptions};
use civic_types::{Layer, Phase, PhaseMap, Preset, Scene, SectorRegistry};

pub use commands::{SubmitError, SubmitOutcome};

use crate::status::StatusMessage;

pub type Editor = RepresentationSync<SeriesBuffer>;

/// Focused sector on the revenue screen, resolved against the active layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueDetail {
    pub name: String,
    pub icon: String,
    pub share: u32,
    /// Millions.
    pub amount: f64,
}

/// Pending layer-switch confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub target: Layer,
    pub message: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ViewState {
    pub(crate) ui_options: UiOptions,
    pub(crate) input_mode: InputMode,
    pub(crate) selected: usize,
    pub(crate) preset_cursor: usize,
    pub(crate) revenue_focus: Option<usize>,
    pub(crate) compare_view: CompareView,
    pub(crate) pie_region: Option<Region>,
    pub(crate) status: Option<StatusMessage>,
    pub(crate) should_quit: bool,
}

pub struct App {
    registry: SectorRegistry,
    player: PlayerState,
    store: Box<dyn KeyValueStore>,
    random: Box<dyn RandomSource>,
    scene: Scene,
    layers: LayerCoordinator,
    editors: PhaseMap<Editor>,
    gesture: PieGesture,
    view: ViewState,
}

impl App {
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.view.should_quit
    }

    pub fn request_quit(&mut self) {
        self.view.should_quit = true;
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.view.ui_options
    }

    #[must_use]
    pub fn registry(&self) -> &SectorRegistry {
        &self.registry
    }

    #[must_use]
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    #[must_use]
    pub fn scene(&self) -> Scene {
        self.scene
    }

    #[must_use]
    pub fn active_layer(&self) -> Layer {
        self.layers.active()
    }

    /// Controls for `phase`.
    #[must_use]
    pub fn editor(&self, phase: Phase) -> &Editor {
        self.editors.get(phase)
    }

    /// Controls for the scene on screen, if it edits anything.
    #[must_use]
    pub fn active_editor(&self) -> Option<&Editor> {
        self.scene.phase().map(|phase| self.editors.get(phase))
    }

    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        self.view.input_mode
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.view.selected
    }

    #[must_use]
    pub fn preset_cursor(&self) -> usize {
        self.view.preset_cursor
    }

    #[must_use]
    pub fn presets(&self) -> Vec<Preset> {
        Preset::menu(&self.registry)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    #[must_use]
    pub fn revenue_focus(&self) -> Option<usize> {
        self.view.revenue_focus
    }

    #[must_use]
    pub fn revenue_detail(&self) -> Option<RevenueDetail> {
        let index = self.view.revenue_focus?;
        let sector = self.registry.get(index)?;
        let layer = self.active_layer();
        let share = sector.reference_share(layer);
        Some(RevenueDetail {
            name: sector.name().to_string(),
            icon: sector.icon().to_string(),
            share,
            amount: self.registry.amount_for(share, layer),
        })
    }

    #[must_use]
    pub fn compare_view(&self) -> CompareView {
        self.view.compare_view
    }

    /// Table and metrics for the active layer.
    #[must_use]
    pub fn comparison(&self) -> ComparisonReport {
        ComparisonReport::build(&self.registry, &self.player, self.active_layer())
    }

    #[must_use]
    pub fn compare_series(&self) -> Vec<Series> {
        chart_series(&self.registry, &self.player, self.view.compare_view)
    }

    #[must_use]
    pub fn total_budget(&self) -> f64 {
        self.registry.total_budget(self.active_layer())
    }

    #[must_use]
    pub fn advisor(&self) -> String {
        self.scene.advisor(self.total_budget())
    }

    /// Whether the on-screen draft can be submitted.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.active_editor()
            .is_some_and(|editor| !editor.is_locked() && editor.draft().is_complete())
    }

    #[must_use]
    pub fn status(&self) -> Option<&StatusMessage> {
        self.view.status.as_ref()
    }

    /// Drop the status message once it has been shown long enough.
    pub fn expire_status(&mut self, now: Instant) {
        if self.view.status.as_ref().is_some_and(|s| s.is_expired(now)) {
            self.view.status = None;
        }
    }

    #[must_use]
    pub fn confirm_prompt(&self) -> Option<ConfirmPrompt> {
        let target = self.layers.pending()?;
        Some(ConfirmPrompt {
            target,
            message: format!(
                "You have unsaved changes for the {} layer. Switch to {} and lose them?",
                self.active_layer().display_name(),
                target.display_name()
            ),
        })
    }

    #[must_use]
    pub fn pie_region(&self) -> Option<Region> {
        self.view.pie_region
    }

    /// Record where the renderer drew the pie, for pointer hit-testing.
    pub fn set_pie_region(&mut self, region: Option<Region>) {
        self.view.pie_region = region;
    }

    pub(crate) fn set_status(&mut self, status: StatusMessage) {
        self.view.status = Some(status);
    }
}
