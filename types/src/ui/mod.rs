//! UI state types for the TUI layer.
//!
//! Pure data types with no IO, no ratatui dependency.
//! Used by both the engine (state ownership) and tui (rendering/input).

use serde::{Deserialize, Serialize};

use crate::{Layer, Phase};

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}

/// Which control drives the live draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    Presets,
    Pie,
    #[default]
    Sliders,
}

impl InputMode {
    /// Modes offered while editing `phase`. Presets are a blind-round tool.
    #[must_use]
    pub fn available(phase: Phase) -> &'static [InputMode] {
        match phase {
            Phase::Blind => &[InputMode::Sliders, InputMode::Pie, InputMode::Presets],
            Phase::Adjusted => &[InputMode::Sliders, InputMode::Pie],
        }
    }

    #[must_use]
    pub fn cycle(self, phase: Phase) -> Self {
        let modes = Self::available(phase);
        let pos = modes.iter().position(|m| *m == self).unwrap_or(0);
        modes[(pos + 1) % modes.len()]
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            InputMode::Presets => "Presets",
            InputMode::Pie => "Pie",
            InputMode::Sliders => "Sliders",
        }
    }
}

/// Comparison chart selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareView {
    Operating,
    Capital,
    Combined,
}

impl CompareView {
    #[must_use]
    pub const fn for_layer(layer: Layer) -> Self {
        match layer {
            Layer::Operating => CompareView::Operating,
            Layer::Capital => CompareView::Capital,
        }
    }

    #[must_use]
    pub const fn layer(self) -> Option<Layer> {
        match self {
            CompareView::Operating => Some(Layer::Operating),
            CompareView::Capital => Some(Layer::Capital),
            CompareView::Combined => None,
        }
    }

    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            CompareView::Operating => CompareView::Capital,
            CompareView::Capital => CompareView::Combined,
            CompareView::Combined => CompareView::Operating,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CompareView::Operating => "operating",
            CompareView::Capital => "capital",
            CompareView::Combined => "combined",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "operating" => Some(CompareView::Operating),
            "capital" => Some(CompareView::Capital),
            "combined" => Some(CompareView::Combined),
            _ => None,
        }
    }
}

/// Screen rectangle in terminal cells, recorded by the renderer so pointer
/// events can be mapped back onto a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.x
            && row >= self.y
            && u32::from(column) < u32::from(self.x) + u32::from(self.width)
            && u32::from(row) < u32::from(self.y) + u32::from(self.height)
    }

    /// Clockwise angle from 12 o'clock, in `[0, 2π)`, of a cell relative to
    /// this region's centre. Both axes are scaled to `[-1, 1]`, matching how the
    /// pie canvas maps its bounds onto the region.
    #[must_use]
    pub fn angle_of(&self, column: u16, row: u16) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let x = (f64::from(column) - f64::from(self.x) + 0.5) / f64::from(self.width) * 2.0 - 1.0;
        let y = 1.0 - (f64::from(row) - f64::from(self.y) + 0.5) / f64::from(self.height) * 2.0;
        if x.abs() < f64::EPSILON && y.abs() < f64::EPSILON {
            return None;
        }
        Some(x.atan2(y).rem_euclid(std::f64::consts::TAU))
    }
}
