//! Configuration unit tests.

use rv32emu_core::Config;

#[test]
fn defaults_give_one_mebibyte_and_no_tracing() {
    let config = Config::default();
    assert_eq!(config.memory.size, 1024 * 1024);
    assert!(!config.general.trace_instructions);
}

#[test]
fn empty_json_is_all_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.memory.size, 1024 * 1024);
}

#[test]
fn json_overrides_only_named_fields() {
    let config = Config::from_json(r#"{"memory": {"size": 65536}}"#).unwrap();
    assert_eq!(config.memory.size, 65536);
    assert!(!config.general.trace_instructions);

    let config = Config::from_json(r#"{"general": {"trace_instructions": true}}"#).unwrap();
    assert!(config.general.trace_instructions);
    assert_eq!(config.memory.size, 1024 * 1024);
}

#[test]
fn malformed_json_is_rejected() {
    assert!(Config::from_json("{not json").is_err());
}
