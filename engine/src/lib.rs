//! Session engine for Civic - scene flow, layer switching, and persistence.
//!
//! This crate contains the [`App`] state machine without TUI dependencies.
//! Renderers read it through accessors and drive it through the command
//! methods; nothing here knows about terminals.

mod app;
mod status;

pub use app::{App, ConfirmPrompt, Editor, RevenueDetail, SubmitError, SubmitOutcome};
pub use status::{STATUS_TTL, StatusLevel, StatusMessage};

// Re-export the domain crates so the TUI and CLI need a single engine import.
pub use civic_core::{
    ComparisonReport, ComparisonRow, FileStore, KeyValueStore, MemoryStore, RandomSource, Series,
    StorageError, SwitchOutcome, ThreadRandom, wedge_spans,
};
pub use civic_types::ui::{CompareView, InputMode, Region, UiOptions};
pub use civic_types::{Layer, Phase, Preset, Scene, Sector, SectorRegistry, format_millions};
