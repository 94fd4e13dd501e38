//! Live edits: sector selection, keyboard adjust, and pie pointer events.

use civic_core::{Edit, wedge_at};
use civic_types::ui::InputMode;
use civic_types::{Phase, Scene};

use crate::App;
use crate::status::StatusMessage;

impl App {
    pub fn select_next(&mut self) {
        let n = self.registry.len();
        if self.view.input_mode == InputMode::Presets && self.scene.phase() == Some(Phase::Blind) {
            let presets = self.presets().len();
            self.view.preset_cursor = (self.view.preset_cursor + 1) % presets.max(1);
        } else if n > 0 {
            self.view.selected = (self.view.selected + 1) % n;
        }
    }

    pub fn select_prev(&mut self) {
        let n = self.registry.len();
        if self.view.input_mode == InputMode::Presets && self.scene.phase() == Some(Phase::Blind) {
            let presets = self.presets().len().max(1);
            self.view.preset_cursor = (self.view.preset_cursor + presets - 1) % presets;
        } else if n > 0 {
            self.view.selected = (self.view.selected + n - 1) % n;
        }
    }

    /// Apply the preset under the cursor.
    pub fn apply_selected_preset(&mut self) {
        self.apply_preset(self.view.preset_cursor);
    }

    /// Arrow-key adjust of the selected sector by `delta` points.
    ///
    /// Slider mode moves the slider; pie mode moves the wedge's end edge
    /// against the next wedge.
    pub fn adjust_selected(&mut self, delta: i32) {
        let Some(phase) = self.scene.phase() else {
            return;
        };
        let index = self.view.selected;
        let editor = self.editors.get(phase);
        let values = editor.draft().values();
        let Some(current) = values.get(index).copied() else {
            return;
        };
        let edit = match self.view.input_mode {
            InputMode::Sliders => Edit::Slider {
                index,
                value: current.saturating_add_signed(delta),
            },
            InputMode::Pie => Edit::Pie {
                base: values.to_vec(),
                gain: index,
                lose: (index + 1) % values.len(),
                delta,
            },
            InputMode::Presets => return,
        };
        self.apply(phase, &edit);
    }

    /// Set slider `index` directly.
    pub fn set_slider(&mut self, index: usize, value: u32) {
        if let Some(phase) = self.scene.phase() {
            self.apply(phase, &Edit::Slider { index, value });
        }
    }

    /// Pointer pressed at a terminal cell. Starts a drag when it lands on the pie.
    pub fn pie_pointer_down(&mut self, column: u16, row: u16) -> bool {
        let Some(phase) = self.scene.phase() else {
            return false;
        };
        if self.view.input_mode != InputMode::Pie || self.layers.pending().is_some() {
            return false;
        }
        let Some(region) = self.view.pie_region.filter(|r| r.contains(column, row)) else {
            return false;
        };
        let Some(angle) = region.angle_of(column, row) else {
            return false;
        };
        let editor = self.editors.get(phase);
        if editor.is_locked() {
            self.set_status(StatusMessage::warning(
                "Already submitted; switch layers or restart to change it",
            ));
            return false;
        }
        let values = editor.draft().values().to_vec();
        if !self.gesture.pointer_down(angle, &values) {
            return false;
        }
        if let Some(boundary) = self.gesture.boundary() {
            self.view.selected = boundary.left;
        }
        true
    }

    /// Pointer moved while pressed. Routed to the drag wherever the pointer is.
    pub fn pie_pointer_drag(&mut self, column: u16, row: u16) {
        if !self.gesture.is_dragging() {
            return;
        }
        let Some(angle) = self.pointer_angle(column, row) else {
            return;
        };
        if let Some(edit) = self.gesture.pointer_move(angle) {
            self.apply_drag(&edit);
        }
    }

    /// Pointer released. Always ends the drag.
    pub fn pie_pointer_up(&mut self, column: u16, row: u16) {
        if !self.gesture.is_dragging() {
            return;
        }
        let angle = self.pointer_angle(column, row);
        if let Some(edit) = self.gesture.pointer_up(angle) {
            self.apply_drag(&edit);
        }
    }

    /// Escape: abandon a drag, or decline a pending layer switch.
    pub fn cancel(&mut self) {
        if self.gesture.is_dragging() {
            self.gesture.cancel();
        } else if self.layers.pending().is_some() {
            self.cancel_layer_switch();
        }
    }

    /// Revenue explorer: move the focus to the next sector.
    pub fn focus_next_sector(&mut self) {
        let n = self.registry.len();
        if self.scene != Scene::Revenue || n == 0 {
            return;
        }
        self.view.revenue_focus = Some(self.view.revenue_focus.map_or(0, |i| (i + 1) % n));
    }

    pub fn focus_prev_sector(&mut self) {
        let n = self.registry.len();
        if self.scene != Scene::Revenue || n == 0 {
            return;
        }
        self.view.revenue_focus = Some(self.view.revenue_focus.map_or(n - 1, |i| (i + n - 1) % n));
    }

    /// Revenue explorer: focus the reference wedge under a click.
    pub fn focus_at(&mut self, column: u16, row: u16) -> bool {
        if self.scene != Scene::Revenue {
            return false;
        }
        let Some(angle) = self
            .view
            .pie_region
            .filter(|r| r.contains(column, row))
            .and_then(|r| r.angle_of(column, row))
        else {
            return false;
        };
        let reference = self.registry.reference_vector(self.active_layer());
        match wedge_at(&reference, angle) {
            Some(index) => {
                self.view.revenue_focus = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn clear_focus(&mut self) {
        self.view.revenue_focus = None;
    }

    fn pointer_angle(&self, column: u16, row: u16) -> Option<f64> {
        self.view.pie_region.and_then(|r| r.angle_of(column, row))
    }

    fn apply_drag(&mut self, edit: &Edit) {
        let Some(phase) = self.scene.phase() else {
            self.gesture.cancel();
            return;
        };
        if !self.apply(phase, edit) {
            self.gesture.cancel();
        }
    }

    /// Route `edit` to the `phase` controls. Returns whether it was accepted.
    pub(crate) fn apply(&mut self, phase: Phase, edit: &Edit) -> bool {
        match self.editors.get_mut(phase).apply_edit(edit) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(%phase, "Edit rejected: {e}");
                self.set_status(StatusMessage::warning(e.to_string()));
                false
            }
        }
    }
}
