//! Config load validation tests for api-bridge-config.
// crates/api-bridge-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use api_bridge_config::BridgeConfig;
use api_bridge_config::ConfigError;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<BridgeConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(BridgeConfig::load(path), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(BridgeConfig::load(path), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(BridgeConfig::load(file.path()), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(BridgeConfig::load(file.path()), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_keys() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(b"unknown_key = true\n").map_err(|err| err.to_string())?;
    assert_invalid(BridgeConfig::load(file.path()), "unknown_key")?;
    Ok(())
}

#[test]
fn load_accepts_minimal_valid_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let document = r#"
tool_name_prefix = "bridge_"

[execution]
base_url = "http://127.0.0.1:9000"

[security]
confirmation_token = "REALLY"
"#;
    file.write_all(document.as_bytes()).map_err(|err| err.to_string())?;
    let config = BridgeConfig::load(file.path()).map_err(|err| err.to_string())?;
    if config.tool_name_prefix != "bridge_" {
        return Err("prefix not applied".to_string());
    }
    if config.execution.base_url != "http://127.0.0.1:9000" {
        return Err("base url not applied".to_string());
    }
    if config.security.confirmation_token != "REALLY" {
        return Err("token not applied".to_string());
    }
    Ok(())
}
