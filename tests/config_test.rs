//! Configuration file tests

use std::path::PathBuf;
use virtual_agent_face::{
    config::{Config, EXAMPLE_CONFIG},
    host::{InputKind, RigDescription},
    Error,
};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("virtual-agent-face-{}-{name}", std::process::id()))
}

#[test]
fn test_config_file_round_trip() {
    let path = temp_path("config.yaml");
    let mut config = Config::default();
    config.gaze.cooldown_ms = 250;
    config.blink.double_blink_probability = 0.5;
    config.animation.active_input = None;

    config.to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded, config);
    loaded.validate().unwrap();
}

#[test]
fn test_example_config_parses() {
    let path = temp_path("example.yaml");
    std::fs::write(&path, EXAMPLE_CONFIG).unwrap();
    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.animation.state_machine, "State Machine 1");
    assert_eq!(loaded.blink.min_interval_ms, 500);
    assert_eq!(loaded.blink.max_interval_ms, 5000);
    assert_eq!(loaded.gaze.tick_ms, 300);
    assert_eq!(loaded.memory.interval_ms, 30_000);
}

#[test]
fn test_missing_config_file() {
    let result = Config::from_file(temp_path("does-not-exist.yaml"));
    assert!(matches!(result, Err(Error::IoError(_))));
}

#[test]
fn test_malformed_config_file() {
    let path = temp_path("malformed.yaml");
    std::fs::write(&path, "blink: [not, a, map]\n").unwrap();
    let result = Config::from_file(&path);
    std::fs::remove_file(&path).unwrap();

    match result {
        Err(Error::ConfigError(msg)) => assert!(msg.contains("Failed to parse config")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_rig_description_from_file() {
    let path = temp_path("rig.yaml");
    std::fs::write(
        &path,
        r#"canvas: { left: 0.0, top: 0.0, right: 800.0, bottom: 400.0 }
machines:
  - name: "Face"
    inputs:
      - { name: "mood", kind: number }
      - { name: "apply", kind: trigger }
      - { name: "blink", kind: boolean }
"#,
    )
    .unwrap();
    let rig = RigDescription::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(rig.canvas.width(), 800.0);
    assert_eq!(rig.canvas.height(), 400.0);
    assert_eq!(rig.machines[0].name, "Face");
    assert_eq!(rig.machines[0].inputs[1].kind, InputKind::Trigger);
}
