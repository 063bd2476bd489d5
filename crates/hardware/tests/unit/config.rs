use rstest::rstest;

use tacsim_core::common::ConfigError;
use tacsim_core::config::{Config, MemoryModel};

#[test]
fn default_config_validates() {
    assert_eq!(Config::default().validate(), Ok(()));
}

#[rstest]
#[case::queue_depth("core.queue_depth")]
#[case::token_depth("core.token_depth")]
#[case::fetch_burst("core.fetch_burst")]
#[case::memory_size("memory.size_words")]
#[case::scratchpad_uop("scratchpad.uop")]
#[case::scratchpad_inp("scratchpad.inp")]
#[case::scratchpad_wgt("scratchpad.wgt")]
#[case::scratchpad_acc("scratchpad.acc")]
#[case::scratchpad_out("scratchpad.out")]
fn zero_structural_field_rejected(#[case] field: &'static str) {
    let mut config = Config::default();
    match field {
        "core.queue_depth" => config.core.queue_depth = 0,
        "core.token_depth" => config.core.token_depth = 0,
        "core.fetch_burst" => config.core.fetch_burst = 0,
        "memory.size_words" => config.memory.size_words = 0,
        "scratchpad.uop" => config.scratchpad.uop = 0,
        "scratchpad.inp" => config.scratchpad.inp = 0,
        "scratchpad.wgt" => config.scratchpad.wgt = 0,
        "scratchpad.acc" => config.scratchpad.acc = 0,
        "scratchpad.out" => config.scratchpad.out = 0,
        _ => unreachable!("unknown case"),
    }
    assert_eq!(config.validate(), Err(ConfigError::ZeroField { field }));
}

#[test]
fn zero_memory_latency_rejected() {
    let mut config = Config::default();
    config.memory.latency = 0;
    assert_eq!(config.validate(), Err(ConfigError::ZeroLatency));
}

#[test]
fn row_buffer_needs_nonzero_cas() {
    let mut config = Config::default();
    config.memory.model = MemoryModel::RowBuffer;
    config.memory.t_cas = 0;
    assert_eq!(config.validate(), Err(ConfigError::ZeroLatency));
}

#[test]
fn partial_json_fills_defaults() {
    let config: Config = serde_json::from_str(
        r#"{
            "memory": { "model": "RowBuffer", "t_cas": 10 },
            "core": { "queue_depth": 2 }
        }"#,
    )
    .expect("valid json");
    assert_eq!(config.memory.model, MemoryModel::RowBuffer);
    assert_eq!(config.memory.t_cas, 10);
    assert_eq!(config.core.queue_depth, 2);
    // Untouched sections keep their defaults.
    assert_eq!(config.core.token_depth, 1);
    assert!(config.validate().is_ok());
}
