//! Core domain types for the civic budget simulator.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod allocation;
mod metrics;
mod normalize;
mod preset;
mod scene;
mod sector;
pub mod ui;

pub use allocation::{Allocation, AllocationError, Draft, TOTAL_PERCENT};
pub use metrics::{alignment, awareness, mean_absolute_difference};
pub use normalize::{NormalizeError, normalize, settle_on_first, transfer};
pub use preset::{Preset, PresetError, equal_split};
pub use scene::{Scene, SceneTrigger, TransitionError, format_millions};
pub use sector::{
    RawSector, RegistryError, Sector, SectorId, SectorRegistry, default_raw_sectors,
};

use serde::{Deserialize, Serialize};

// ============================================================================
// Layer & Phase
// ============================================================================

/// One of the two independent budget dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    #[default]
    Operating,
    Capital,
}

impl Layer {
    pub const ALL: [Layer; 2] = [Layer::Operating, Layer::Capital];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Layer::Operating => "operating",
            Layer::Capital => "capital",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Layer::Operating => "Operating",
            Layer::Capital => "Capital",
        }
    }

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Layer::Operating => Layer::Capital,
            Layer::Capital => Layer::Operating,
        }
    }

    /// Parse a layer from its storage name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "operating" => Some(Layer::Operating),
            "capital" => Some(Layer::Capital),
            _ => None,
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two allocation rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Uninformed first pass.
    Blind,
    /// Informed pass after seeing context.
    Adjusted,
}

impl Phase {
    pub const ALL: [Phase; 2] = [Phase::Blind, Phase::Adjusted];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Blind => "blind",
            Phase::Adjusted => "adjusted",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Phase::Blind => "Blind",
            Phase::Adjusted => "Adjusted",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value per layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayerMap<T> {
    pub operating: T,
    pub capital: T,
}

impl<T> LayerMap<T> {
    #[must_use]
    pub const fn new(operating: T, capital: T) -> Self {
        Self {
            operating,
            capital,
        }
    }

    #[must_use]
    pub fn get(&self, layer: Layer) -> &T {
        match layer {
            Layer::Operating => &self.operating,
            Layer::Capital => &self.capital,
        }
    }

    pub fn get_mut(&mut self, layer: Layer) -> &mut T {
        match layer {
            Layer::Operating => &mut self.operating,
            Layer::Capital => &mut self.capital,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(Layer, T) -> U) -> LayerMap<U> {
        LayerMap {
            operating: f(Layer::Operating, self.operating),
            capital: f(Layer::Capital, self.capital),
        }
    }
}

/// A value per phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseMap<T> {
    pub blind: T,
    pub adjusted: T,
}

impl<T> PhaseMap<T> {
    #[must_use]
    pub fn get(&self, phase: Phase) -> &T {
        match phase {
            Phase::Blind => &self.blind,
            Phase::Adjusted => &self.adjusted,
        }
    }

    pub fn get_mut(&mut self, phase: Phase) -> &mut T {
        match phase {
            Phase::Blind => &mut self.blind,
            Phase::Adjusted => &mut self.adjusted,
        }
    }
}
