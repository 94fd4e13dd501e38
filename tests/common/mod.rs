//! Shared test utilities and fixtures

#![allow(dead_code)]

use std::path::Path;

use civic_core::SequenceRandom;
use civic_engine::{App, FileStore, KeyValueStore, MemoryStore, SectorRegistry, UiOptions};

pub const CITY_MIX: usize = 3;
pub const EQUAL: [u32; 6] = [20, 16, 16, 16, 16, 16];
pub const CITY_CAPITAL: [u32; 6] = [68, 4, 3, 1, 22, 2];

pub fn session_with(registry: SectorRegistry, store: Box<dyn KeyValueStore>) -> App {
    App::new(
        registry,
        store,
        Box::new(SequenceRandom::new(vec![0.9, 0.1, 0.5, 0.3, 0.7, 0.2])),
        UiOptions::default(),
    )
}

pub fn memory_session() -> App {
    session_with(SectorRegistry::ottawa_2025(), Box::new(MemoryStore::new()))
}

pub fn file_session(dir: &Path) -> App {
    let store = FileStore::open(dir).expect("open file store");
    session_with(SectorRegistry::ottawa_2025(), Box::new(store))
}

/// Intro -> Debrief -> Blind.
pub fn start(app: &mut App) {
    app.continue_scene();
    app.skip();
}
