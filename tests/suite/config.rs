//! Configured sector lists drive the whole session.

use civic_config::{CivicConfig, Settings};
use civic_engine::{Layer, MemoryStore, Phase};

use crate::common::{session_with, start};

const THREE_SECTORS: &str = r#"
[app]
ascii_only = true

[budget]
operating_total = 100.0

[[sectors]]
id = "roads"
name = "Roads"
operating = 50.0
capital = 80.0

[[sectors]]
id = "libraries"
name = "Libraries"
operating = 30.0
capital = 10.0

[[sectors]]
id = "parks"
name = "Parks"
operating = 20.0
capital = 10.0
"#;

#[test]
fn configured_sectors_replace_the_builtin_set() {
    let config = CivicConfig::parse(THREE_SECTORS).unwrap();
    let settings = Settings::resolve(Ok(Some(config)));
    assert!(settings.ui.ascii_only);
    assert_eq!(settings.registry.len(), 3);
    assert_eq!(
        settings.registry.reference_vector(Layer::Capital),
        vec![80, 10, 10]
    );

    let mut app = session_with(settings.registry, Box::new(MemoryStore::new()));
    start(&mut app);
    assert_eq!(app.editor(Phase::Blind).draft().values(), &[34, 33, 33]);
    assert!((app.total_budget() - 100.0).abs() < f64::EPSILON);
}

#[test]
fn broken_sector_list_falls_back_to_builtin() {
    let config = CivicConfig::parse(
        r#"
[[sectors]]
id = ""
name = "Nameless"
operating = 1.0
capital = 1.0
"#,
    )
    .unwrap();
    let settings = Settings::resolve(Ok(Some(config)));
    assert_eq!(settings.registry.len(), 6);
}
