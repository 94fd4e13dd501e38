//! End-to-end walks through the scenes against an in-memory store.

use civic_engine::{CompareView, Layer, Phase, Scene, SubmitOutcome, SwitchOutcome};

use crate::common::{CITY_CAPITAL, CITY_MIX, EQUAL, memory_session, start};

#[test]
fn full_session_reaches_results_with_metrics() {
    let mut app = memory_session();
    start(&mut app);

    // Operating: keep the equal split.
    assert_eq!(app.submit(), Ok(SubmitOutcome::NextLayer(Layer::Capital)));
    // Capital: take the city's own split.
    app.apply_preset(CITY_MIX);
    assert_eq!(app.submit(), Ok(SubmitOutcome::Advanced(Scene::Adjust)));
    assert_eq!(app.editor(Phase::Adjusted).draft().values(), &CITY_CAPITAL);
    assert_eq!(app.submit(), Ok(SubmitOutcome::Advanced(Scene::Compare)));

    let capital = app.comparison();
    assert_eq!(capital.layer, Layer::Capital);
    assert_eq!(capital.awareness_label(), "0.0%");
    assert_eq!(capital.alignment_label(), "100.0%");

    // Nothing adjusted on operating: it counts as all zeros.
    assert!(matches!(app.toggle_layer(), SwitchOutcome::Switched { .. }));
    let operating = app.comparison();
    assert_eq!(operating.layer, Layer::Operating);
    assert_eq!(operating.rows[0].blind, EQUAL[0]);
    assert_eq!(operating.rows[0].adjusted, 0);
    assert_eq!(operating.awareness_label(), "16.7%");
    assert_eq!(operating.alignment_label(), "83.3%");
}

#[test]
fn combined_view_lists_both_city_series() {
    let mut app = memory_session();
    start(&mut app);
    app.submit().unwrap();
    app.submit().unwrap();
    app.submit().unwrap();

    while app.compare_view() != CompareView::Combined {
        app.cycle_compare_view();
    }
    let labels: Vec<String> = app.compare_series().into_iter().map(|s| s.label).collect();
    assert_eq!(
        labels,
        ["City-Operating", "City-Capital", "Blind", "Adjusted"]
    );
}

#[test]
fn randomize_works_in_both_editing_scenes() {
    let mut app = memory_session();
    start(&mut app);
    app.randomize();
    let blind = app.editor(Phase::Blind).draft();
    assert!(blind.is_complete());
    assert_ne!(blind.values(), &EQUAL);

    app.submit().unwrap();
    app.submit().unwrap();
    assert_eq!(app.scene(), Scene::Adjust);
    app.randomize();
    assert!(app.editor(Phase::Adjusted).draft().is_complete());
    assert!(app.editor(Phase::Adjusted).is_consistent());
}

#[test]
fn restart_returns_to_a_clean_intro() {
    let mut app = memory_session();
    start(&mut app);
    app.submit().unwrap();
    app.restart();

    assert_eq!(app.scene(), Scene::Intro);
    assert!(!app.player().has_submission(Phase::Blind, Layer::Operating));
    start(&mut app);
    assert_eq!(app.editor(Phase::Blind).draft().values(), &EQUAL);
}
