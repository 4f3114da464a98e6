// crates/api-bridge-mcp/src/request/tests.rs
// ============================================================================
// Module: Request Building Unit Tests
// Description: Unit tests for path, query, header, and body resolution.
// Purpose: Validate encoding, layering, and pre-network failures.
// Dependencies: api-bridge-mcp, api-bridge-core, api-bridge-config
// ============================================================================

//! ## Overview
//! Covers path placeholder substitution with segment encoding, query array
//! expansion, header layering order with credential forwarding, required
//! body enforcement, and base URL fallback.

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

use api_bridge_config::ExecutionConfig;
use api_bridge_core::BridgeError;
use api_bridge_core::HttpMethod;
use api_bridge_core::InvocationArguments;
use api_bridge_core::OperationRecord;
use api_bridge_core::ParameterLocation;
use api_bridge_core::ParameterRecord;
use serde_json::json;

use super::build_headers;
use super::build_query;
use super::resolve_base_url;
use super::resolve_body;
use super::resolve_path;
use crate::context::CallerContext;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn operation(path: &str, parameters: Vec<ParameterRecord>) -> OperationRecord {
    OperationRecord {
        tool_name: "api_sample".to_string(),
        operation_id: "sample".to_string(),
        method: HttpMethod::Get,
        path: path.to_string(),
        description: String::new(),
        tags: Vec::new(),
        parameters,
        request_body_required: false,
        request_body_schema: None,
        risky: false,
    }
}

fn parameter(name: &str, location: ParameterLocation) -> ParameterRecord {
    ParameterRecord {
        name: name.to_string(),
        location,
        required: false,
        schema: None,
    }
}

fn required_parameter(name: &str, location: ParameterLocation) -> ParameterRecord {
    ParameterRecord {
        required: true,
        ..parameter(name, location)
    }
}

// ============================================================================
// SECTION: Base URL Tests
// ============================================================================

#[test]
fn configured_base_url_wins_with_slashes_trimmed() {
    let mut execution = ExecutionConfig::default();
    execution.base_url = "https://api.example.com/v1//".to_string();
    assert_eq!(resolve_base_url(&execution, 8080), "https://api.example.com/v1");
}

#[test]
fn missing_base_url_falls_back_to_loopback() {
    let execution = ExecutionConfig::default();
    assert_eq!(resolve_base_url(&execution, 8080), "http://127.0.0.1:8080");

    let mut blank = ExecutionConfig::default();
    blank.base_url = "   ".to_string();
    assert_eq!(resolve_base_url(&blank, 9090), "http://127.0.0.1:9090");
}

// ============================================================================
// SECTION: Path Tests
// ============================================================================

#[test]
fn path_placeholders_substitute_with_segment_encoding() {
    let record = operation("/users/{id}/files/{name}", Vec::new());
    let arguments = InvocationArguments::from_value(json!({"id": 42, "name": "a b/c"}));
    let path = resolve_path(&record, &arguments).expect("path must resolve");
    assert_eq!(path, "/users/42/files/a%20b%2Fc");
}

#[test]
fn missing_required_path_parameter_fails_before_any_call() {
    let record = operation(
        "/users/{id}",
        vec![required_parameter("id", ParameterLocation::Path)],
    );
    let error = resolve_path(&record, &InvocationArguments::new())
        .expect_err("missing placeholder must fail");
    assert!(matches!(error, BridgeError::MissingPathParameter(name) if name == "id"));
}

#[test]
fn optional_absent_path_parameter_stays_literal() {
    let record = operation(
        "/users/{id}/files/{name}",
        vec![
            required_parameter("id", ParameterLocation::Path),
            parameter("name", ParameterLocation::Path),
        ],
    );
    let arguments = InvocationArguments::from_value(json!({"id": 7}));
    let path = resolve_path(&record, &arguments).expect("path must resolve");
    assert_eq!(path, "/users/7/files/{name}");
}

#[test]
fn path_without_placeholders_passes_through() {
    let record = operation("/health", Vec::new());
    let path = resolve_path(&record, &InvocationArguments::new()).expect("must resolve");
    assert_eq!(path, "/health");
}

// ============================================================================
// SECTION: Query Tests
// ============================================================================

#[test]
fn query_arrays_expand_to_repeated_keys() {
    let record = operation(
        "/search",
        vec![
            parameter("tag", ParameterLocation::Query),
            parameter("limit", ParameterLocation::Query),
        ],
    );
    let arguments =
        InvocationArguments::from_value(json!({"tag": ["a", "b"], "limit": 5}));
    let query = build_query(&record, &arguments);
    assert_eq!(
        query,
        vec![
            ("tag".to_string(), "a".to_string()),
            ("tag".to_string(), "b".to_string()),
            ("limit".to_string(), "5".to_string()),
        ]
    );
}

#[test]
fn null_and_empty_array_queries_are_omitted() {
    let record = operation(
        "/search",
        vec![
            parameter("tag", ParameterLocation::Query),
            parameter("filter", ParameterLocation::Query),
        ],
    );
    let arguments = InvocationArguments::from_value(json!({"tag": [], "filter": null}));
    assert!(build_query(&record, &arguments).is_empty());
}

#[test]
fn non_query_parameters_never_reach_the_query() {
    let record = operation("/users/{id}", vec![parameter("id", ParameterLocation::Path)]);
    let arguments = InvocationArguments::from_value(json!({"id": 7}));
    assert!(build_query(&record, &arguments).is_empty());
}

// ============================================================================
// SECTION: Header Tests
// ============================================================================

#[test]
fn header_layers_apply_in_order() {
    let mut execution = ExecutionConfig::default();
    execution
        .default_headers
        .insert("X-Tenant".to_string(), "default".to_string());
    let record = operation("/users", vec![parameter("X-Tenant", ParameterLocation::Header)]);
    let arguments = InvocationArguments::from_value(
        json!({"X-Tenant": "declared", "_headers": {"x-tenant": "override"}}),
    );
    let headers = build_headers(&execution, &record, &arguments, &CallerContext::new());
    assert_eq!(headers, vec![("X-Tenant".to_string(), "override".to_string())]);
}

#[test]
fn forwarded_authorization_applies_only_when_absent() {
    let execution = ExecutionConfig::default();
    let record = operation("/users", Vec::new());
    let context = CallerContext {
        authorization: Some("Bearer token".to_string()),
        cookie: None,
    };

    let forwarded =
        build_headers(&execution, &record, &InvocationArguments::new(), &context);
    assert_eq!(
        forwarded,
        vec![("Authorization".to_string(), "Bearer token".to_string())]
    );

    let explicit = InvocationArguments::from_value(
        json!({"_headers": {"authorization": "Bearer mine"}}),
    );
    let kept = build_headers(&execution, &record, &explicit, &context);
    assert_eq!(kept, vec![("authorization".to_string(), "Bearer mine".to_string())]);
}

#[test]
fn cookie_forwarding_requires_the_switch() {
    let record = operation("/users", Vec::new());
    let context = CallerContext {
        authorization: None,
        cookie: Some("session=abc".to_string()),
    };

    let withheld = build_headers(
        &ExecutionConfig::default(),
        &record,
        &InvocationArguments::new(),
        &context,
    );
    assert!(withheld.is_empty());

    let mut execution = ExecutionConfig::default();
    execution.forward_incoming_cookie = true;
    let forwarded = build_headers(&execution, &record, &InvocationArguments::new(), &context);
    assert_eq!(forwarded, vec![("Cookie".to_string(), "session=abc".to_string())]);
}

// ============================================================================
// SECTION: Body Tests
// ============================================================================

#[test]
fn required_body_must_be_present() {
    let mut record = operation("/orders", Vec::new());
    record.request_body_required = true;
    let error = resolve_body(&record, &InvocationArguments::new())
        .expect_err("missing required body must fail");
    assert!(matches!(error, BridgeError::MissingRequestBody(_)));

    let supplied = InvocationArguments::from_value(json!({"body": {"item": "x"}}));
    let body = resolve_body(&record, &supplied).expect("body must resolve");
    assert_eq!(body, Some(json!({"item": "x"})));
}

#[test]
fn optional_body_may_be_absent_or_null() {
    let mut record = operation("/orders", Vec::new());
    record.request_body_schema = Some(json!({"type": "object"}));
    assert_eq!(resolve_body(&record, &InvocationArguments::new()).expect("ok"), None);
    let null_body = InvocationArguments::from_value(json!({"body": null}));
    assert_eq!(resolve_body(&record, &null_body).expect("ok"), None);
}

#[test]
fn body_is_ignored_without_a_declared_request_body() {
    let record = operation("/orders", Vec::new());
    let supplied = InvocationArguments::from_value(json!({"body": {"item": "x"}}));
    assert_eq!(resolve_body(&record, &supplied).expect("ok"), None);
}
