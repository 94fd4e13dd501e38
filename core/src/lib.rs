//! Core state logic for the civic budget simulator.
//!
//! Everything that mutates or derives allocation state lives here: the player
//! state grid and its durable snapshot, the representation sync that keeps
//! sliders, pie, and draft identical, the pie gesture, the layer coordinator,
//! and the comparison report. No terminal or filesystem assumptions beyond the
//! [`KeyValueStore`] seam.

pub mod comparison;
pub mod coordinator;
pub mod pie;
pub mod random;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod sync;

pub use comparison::{ComparisonReport, ComparisonRow, Series, chart_series};
pub use coordinator::{LayerCoordinator, SwitchOutcome, is_unsaved, needs_confirmation};
pub use pie::{Boundary, PieGesture, nearest_boundary, wedge_at, wedge_spans};
pub use random::{RandomSource, SequenceRandom, ThreadRandom, random_allocation};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError, keys, phase_key};
pub use store::{PlayerState, phase_default};
pub use sync::{
    AsSeries, ChartSurface, Edit, EditError, EditSource, RepresentationSync, SeriesBuffer,
    SeriesPoint, SliderBank,
};
