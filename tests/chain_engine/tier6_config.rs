//! Tier 6: configuration loading and enforcement.

use std::io::Write;

use questline::{AccessMode, ChainError, EngineConfig, NewMissionChain};
use tempfile::NamedTempFile;

use crate::test_utils::*;

#[test]
fn load_config_file_and_enforce_limits() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
access_mode = "read_write"

[limits]
max_missions_per_chain = 2

[logging]
level = "warn"
ansi = false
"#
    )
    .unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    assert_eq!(config.limits.max_missions_per_chain, Some(2));
    assert_eq!(config.limits.max_dependencies_per_chain, None);
    assert_eq!(config.logging.level, "warn");

    let mgr = setup_with(config);
    let id = chain_with(&mgr, "capped", &[1, 2]);
    assert!(matches!(
        mgr.add_mission_to_chain(id, m(3)),
        Err(ChainError::LimitExceeded { limit: 2, .. })
    ));
}

#[test]
fn read_only_config_from_toml() {
    let config = EngineConfig::from_toml_str(r#"access_mode = "read_only""#).unwrap();
    assert_eq!(config.access_mode, AccessMode::ReadOnly);

    let mgr = setup_with(config);
    assert_eq!(
        mgr.create_chain(NewMissionChain::new("nope")).unwrap_err(),
        ChainError::ReadOnly
    );
    assert!(mgr.list_chains().unwrap().is_empty());
}

#[test]
fn bad_config_is_a_config_error() {
    assert!(matches!(
        EngineConfig::from_toml_str(r#"access_mode = "sideways""#),
        Err(ChainError::Config { .. })
    ));
    assert!(matches!(
        EngineConfig::load("/definitely/not/here.toml"),
        Err(ChainError::Config { .. })
    ));
}

#[test]
fn config_round_trips_through_toml() {
    let config = EngineConfig::new()
        .max_missions_per_chain(10)
        .max_dependencies_per_chain(20)
        .log_level("debug");
    let text = config.to_toml_string().unwrap();
    assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
}
