//! Application initialization for the App.

use civic_core::{
    KeyValueStore, LayerCoordinator, PieGesture, PlayerState, RandomSource, RepresentationSync,
    SeriesBuffer, phase_default,
};
use civic_types::ui::{CompareView, InputMode, UiOptions};
use civic_types::{Layer, Phase, PhaseMap, Scene, SectorRegistry};

use super::{App, Editor, ViewState};

impl App {
    /// Build a session over `store` and restore whatever it holds.
    ///
    /// Restore never fails: unreadable entries are logged and skipped.
    pub fn new(
        registry: SectorRegistry,
        store: Box<dyn KeyValueStore>,
        random: Box<dyn RandomSource>,
        ui_options: UiOptions,
    ) -> Self {
        let n = registry.len();
        let editors = PhaseMap {
            blind: new_editor(&registry, Phase::Blind),
            adjusted: new_editor(&registry, Phase::Adjusted),
        };

        let mut app = Self {
            player: PlayerState::new(n),
            registry,
            store,
            random,
            scene: Scene::Intro,
            layers: LayerCoordinator::default(),
            editors,
            gesture: PieGesture::default(),
            view: ViewState {
                ui_options,
                input_mode: InputMode::default(),
                selected: 0,
                preset_cursor: 0,
                revenue_focus: None,
                compare_view: CompareView::for_layer(Layer::default()),
                pie_region: None,
                status: None,
                should_quit: false,
            },
        };
        app.restore_from_store();
        app.seed_editor(Phase::Blind);
        tracing::info!(
            sectors = n,
            layer = %app.active_layer(),
            "Session ready"
        );
        app
    }
}

fn new_editor(registry: &SectorRegistry, phase: Phase) -> Editor {
    let ids = registry.iter().map(|s| s.id().clone()).collect();
    RepresentationSync::new(
        ids,
        &phase_default(phase, registry.len()),
        SeriesBuffer::default(),
    )
}
