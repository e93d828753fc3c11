//! Configuration integration tests

use pnl_replay::config::{Config, ReplayMode};
use std::io::Write;

#[test]
fn test_config_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [clock]
        acceleration = 18000.0

        [replay]
        mode = "bounded"

        [telemetry]
        log_level = "warn"
        "#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.clock.acceleration, 18000.0);
    assert_eq!(config.replay.mode, ReplayMode::Bounded);
    assert_eq!(config.replay.retry_backoff_secs, 5);
    assert_eq!(config.telemetry.log_level, "warn");
}

#[test]
fn test_config_load_rejects_zero_acceleration() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[clock]\nacceleration = 0.0\n").unwrap();

    assert!(Config::load(file.path()).is_err());
}
