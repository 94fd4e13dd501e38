//! Sessions backed by the file store survive a restart of the program.

use std::fs;

use civic_engine::{FileStore, KeyValueStore, Layer, Phase, Scene};
use tempfile::tempdir;

use crate::common::{CITY_MIX, file_session, start};

#[test]
fn submissions_and_layer_survive_reopen() {
    let dir = tempdir().unwrap();
    {
        let mut app = file_session(dir.path());
        start(&mut app);
        app.apply_preset(CITY_MIX);
        app.submit().unwrap();
    }

    let app = file_session(dir.path());
    assert_eq!(app.scene(), Scene::Intro);
    assert_eq!(app.active_layer(), Layer::Capital);
    let operating = app
        .player()
        .submission(Phase::Blind, Layer::Operating)
        .map(|a| a.values().to_vec());
    assert_eq!(operating, Some(vec![34, 12, 29, 10, 12, 3]));
    assert!(!app.player().has_submission(Phase::Blind, Layer::Capital));
}

#[test]
fn restart_clears_the_file() {
    let dir = tempdir().unwrap();
    {
        let mut app = file_session(dir.path());
        start(&mut app);
        app.submit().unwrap();
        app.restart();
    }

    let store = FileStore::open(dir.path()).unwrap();
    assert!(store.get("blind_layers").is_none());
    assert!(store.get("adjusted_layers").is_none());
}

#[test]
fn corrupt_file_is_set_aside_and_session_starts_fresh() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(FileStore::FILE_NAME), "{ not json").unwrap();

    let app = file_session(dir.path());

    assert!(!app.player().has_submission(Phase::Blind, Layer::Operating));
    assert!(dir.path().join("state.json.corrupt").exists());
}
