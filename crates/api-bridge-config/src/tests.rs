// crates/api-bridge-config/src/tests.rs
// ============================================================================
// Module: Configuration Unit Tests
// Description: Unit tests for defaults and section validation.
// Purpose: Validate that defaults are self-consistent and guards reject bad values.
// Dependencies: api-bridge-config
// ============================================================================

//! ## Overview
//! Checks that the default configuration validates cleanly and that each
//! section rejects its out-of-range values with a named field.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::BridgeConfig;
use crate::ConfigError;

// ============================================================================
// SECTION: Default Tests
// ============================================================================

#[test]
fn defaults_validate_cleanly() {
    let config = BridgeConfig::default();
    config.validate().expect("default config must validate");
}

#[test]
fn defaults_match_original_bridge_settings() {
    let config = BridgeConfig::default();
    assert!(config.enabled);
    assert_eq!(config.tool_name_prefix, "api_");
    assert_eq!(config.include_path_patterns, vec!["/**".to_string()]);
    assert!(config.exclude_path_patterns.contains(&"/actuator/**".to_string()));
    assert_eq!(config.execution.connect_timeout_ms, 3_000);
    assert_eq!(config.execution.read_timeout_ms, 30_000);
    assert!(config.execution.forward_incoming_authorization);
    assert!(!config.execution.forward_incoming_cookie);
    assert_eq!(config.smart_context.default_top_k, 8);
    assert!((config.smart_context.min_score - 0.08).abs() < f64::EPSILON);
    assert_eq!(config.response.max_chars, 8_000);
    assert_eq!(config.response.summary_threshold_chars, 4_000);
    assert_eq!(config.security.confirmation_token, "CONFIRM");
    assert!(config.security.risky_http_methods.contains("DELETE"));
}

// ============================================================================
// SECTION: Validation Tests
// ============================================================================

#[test]
fn zero_connect_timeout_is_rejected() {
    let mut config = BridgeConfig::default();
    config.execution.connect_timeout_ms = 0;
    let err = config.validate().expect_err("zero connect timeout must fail");
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("connect_timeout_ms"));
}

#[test]
fn out_of_range_min_score_is_rejected() {
    let mut config = BridgeConfig::default();
    config.smart_context.min_score = 1.5;
    let err = config.validate().expect_err("out-of-range score must fail");
    assert!(err.to_string().contains("min_score"));
}

#[test]
fn zero_response_limit_is_rejected() {
    let mut config = BridgeConfig::default();
    config.response.max_depth = 0;
    let err = config.validate().expect_err("zero depth must fail");
    assert!(err.to_string().contains("max_depth"));
}

#[test]
fn empty_confirmation_token_is_rejected_while_required() {
    let mut config = BridgeConfig::default();
    config.security.confirmation_token = String::new();
    let err = config.validate().expect_err("empty token must fail");
    assert!(err.to_string().contains("confirmation_token"));
}

#[test]
fn empty_confirmation_token_is_allowed_when_not_required() {
    let mut config = BridgeConfig::default();
    config.security.require_confirmation_for_risky_operations = false;
    config.security.confirmation_token = String::new();
    config.validate().expect("token unused when confirmation disabled");
}

#[test]
fn lowercase_risky_method_is_rejected() {
    let mut config = BridgeConfig::default();
    config.security.risky_http_methods.insert("delete".to_string());
    let err = config.validate().expect_err("lowercase method must fail");
    assert!(err.to_string().contains("risky_http_methods"));
}

#[test]
fn blank_pattern_is_rejected() {
    let mut config = BridgeConfig::default();
    config.security.blocked_path_patterns.push("   ".to_string());
    let err = config.validate().expect_err("blank pattern must fail");
    assert!(err.to_string().contains("blocked_path_patterns"));
}
