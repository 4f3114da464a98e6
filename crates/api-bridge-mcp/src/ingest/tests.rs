// crates/api-bridge-mcp/src/ingest/tests.rs
// ============================================================================
// Module: Operation Ingestion Unit Tests
// Description: Unit tests for raw operation filtering and normalization.
// Purpose: Validate filters, identity resolution, dedup, and risk marking.
// Dependencies: api-bridge-mcp, api-bridge-core, api-bridge-config
// ============================================================================

//! ## Overview
//! Feeds raw operation sets through ingestion and checks the surviving
//! records: glob and method filtering, generated operation identifiers,
//! tool name dedup suffixes, and the one-time risk classification.

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

use std::sync::Arc;

use api_bridge_config::BridgeConfig;
use api_bridge_core::HttpMethod;
use api_bridge_core::NoopAuditSink;
use api_bridge_core::SecurityPolicy;

use super::RawOperation;
use super::RawParameter;
use super::ingest_operations;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn raw(method: &str, path: &str) -> RawOperation {
    RawOperation {
        operation_id: None,
        method: method.to_string(),
        path: path.to_string(),
        description: String::new(),
        tags: Vec::new(),
        parameters: Vec::new(),
        request_body_required: false,
        request_body_schema: None,
    }
}

fn policy(config: &BridgeConfig) -> SecurityPolicy {
    SecurityPolicy::new(Arc::new(config.security.clone()), None, Arc::new(NoopAuditSink))
}

// ============================================================================
// SECTION: Filtering Tests
// ============================================================================

#[test]
fn default_excludes_drop_infrastructure_paths() {
    let config = BridgeConfig::default();
    let gate = policy(&config);
    let records = ingest_operations(
        vec![
            raw("GET", "/users"),
            raw("GET", "/v3/api-docs/swagger-config"),
            raw("GET", "/actuator/health"),
            raw("GET", "/error"),
        ],
        &config,
        &gate,
    );
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path, "/users");
}

#[test]
fn include_patterns_narrow_ingestion() {
    let mut config = BridgeConfig::default();
    config.include_path_patterns = vec!["/api/**".to_string()];
    let gate = policy(&config);
    let records = ingest_operations(
        vec![raw("GET", "/api/users"), raw("GET", "/users")],
        &config,
        &gate,
    );
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path, "/api/users");
}

#[test]
fn method_allowlist_filters_operations() {
    let mut config = BridgeConfig::default();
    config.include_http_methods = ["GET".to_string()].into_iter().collect();
    let gate = policy(&config);
    let records = ingest_operations(
        vec![raw("GET", "/users"), raw("POST", "/users")],
        &config,
        &gate,
    );
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].method, HttpMethod::Get);
}

#[test]
fn unknown_methods_are_dropped() {
    let config = BridgeConfig::default();
    let gate = policy(&config);
    let records = ingest_operations(vec![raw("FETCH", "/users")], &config, &gate);
    assert!(records.is_empty());
}

// ============================================================================
// SECTION: Identity and Naming Tests
// ============================================================================

#[test]
fn declared_operation_id_wins() {
    let config = BridgeConfig::default();
    let gate = policy(&config);
    let mut operation = raw("GET", "/users");
    operation.operation_id = Some("listUsers".to_string());
    let records = ingest_operations(vec![operation], &config, &gate);
    assert_eq!(records[0].operation_id, "listUsers");
    assert_eq!(records[0].tool_name, "api_listusers");
}

#[test]
fn generated_identity_comes_from_method_and_path() {
    let config = BridgeConfig::default();
    let gate = policy(&config);
    let records = ingest_operations(vec![raw("GET", "/users/{id}/orders")], &config, &gate);
    assert_eq!(records[0].operation_id, "get_users_id_orders");
    assert_eq!(records[0].tool_name, "api_get_users_id_orders");
}

#[test]
fn root_path_falls_back_to_a_stable_identity() {
    let config = BridgeConfig::default();
    let gate = policy(&config);
    let records = ingest_operations(vec![raw("GET", "/")], &config, &gate);
    assert_eq!(records[0].operation_id, "get_root");
}

#[test]
fn duplicate_tool_names_receive_suffixes() {
    let config = BridgeConfig::default();
    let gate = policy(&config);
    let records = ingest_operations(
        vec![raw("GET", "/users"), raw("GET", "users")],
        &config,
        &gate,
    );
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].tool_name, "api_get_users");
    assert_eq!(records[1].tool_name, "api_get_users_2");
}

#[test]
fn paths_are_normalized_to_a_leading_slash() {
    let config = BridgeConfig::default();
    let gate = policy(&config);
    let records = ingest_operations(vec![raw("GET", "users")], &config, &gate);
    assert_eq!(records[0].path, "/users");
}

// ============================================================================
// SECTION: Classification and Parameter Tests
// ============================================================================

#[test]
fn risk_is_classified_once_at_ingestion() {
    let config = BridgeConfig::default();
    let gate = policy(&config);
    let records = ingest_operations(
        vec![raw("GET", "/users"), raw("DELETE", "/users/{id}")],
        &config,
        &gate,
    );
    assert!(!records[0].risky);
    assert!(records[1].risky);
}

#[test]
fn unknown_parameter_locations_are_dropped() {
    let config = BridgeConfig::default();
    let gate = policy(&config);
    let mut operation = raw("GET", "/users");
    operation.parameters = vec![
        RawParameter {
            name: "id".to_string(),
            location: "Query".to_string(),
            required: true,
            schema: None,
        },
        RawParameter {
            name: "weird".to_string(),
            location: "matrix".to_string(),
            required: false,
            schema: None,
        },
    ];
    let records = ingest_operations(vec![operation], &config, &gate);
    assert_eq!(records[0].parameters.len(), 1);
    assert_eq!(records[0].parameters[0].name, "id");
}
