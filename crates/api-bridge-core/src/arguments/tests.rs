// crates/api-bridge-core/src/arguments/tests.rs
// ============================================================================
// Module: Invocation Arguments Unit Tests
// Description: Unit tests for lenient argument coercions.
// Purpose: Validate string/number/boolean coercions and header extraction.
// Dependencies: api-bridge-core, serde_json
// ============================================================================

//! ## Overview
//! Validates that argument accessors coerce leniently and degrade to
//! defaults instead of failing the invocation.

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

use serde_json::json;

use super::InvocationArguments;
use super::KEY_HEADERS;

// ============================================================================
// SECTION: Coercion Tests
// ============================================================================

#[test]
fn from_value_ignores_non_objects() {
    let arguments = InvocationArguments::from_value(json!([1, 2, 3]));
    assert!(arguments.keys().is_empty());
}

#[test]
fn get_str_coerces_scalars() {
    let arguments = InvocationArguments::from_value(json!({
        "name": "neo",
        "count": 7,
        "flag": true,
        "nothing": null,
    }));
    assert_eq!(arguments.get_str("name").as_deref(), Some("neo"));
    assert_eq!(arguments.get_str("count").as_deref(), Some("7"));
    assert_eq!(arguments.get_str("flag").as_deref(), Some("true"));
    assert_eq!(arguments.get_str("nothing"), None);
    assert_eq!(arguments.get_str("missing"), None);
}

#[test]
fn get_bool_or_parses_strings_and_defaults() {
    let arguments = InvocationArguments::from_value(json!({
        "yes": "true",
        "garbage": "maybe",
        "object": {},
    }));
    assert!(arguments.get_bool_or("yes", false));
    assert!(arguments.get_bool_or("garbage", true));
    assert!(!arguments.get_bool_or("object", false));
    assert!(arguments.get_bool_or("missing", true));
}

#[test]
fn get_usize_or_handles_numbers_strings_and_negatives() {
    let arguments = InvocationArguments::from_value(json!({
        "depth": 3,
        "text": "12",
        "negative": -4,
    }));
    assert_eq!(arguments.get_usize_or("depth", 9), 3);
    assert_eq!(arguments.get_usize_or("text", 9), 12);
    assert_eq!(arguments.get_usize_or("negative", 9), 9);
    assert_eq!(arguments.get_usize_or("missing", 9), 9);
}

// ============================================================================
// SECTION: Header Tests
// ============================================================================

#[test]
fn header_map_renders_scalars_and_skips_composites() {
    let arguments = InvocationArguments::from_value(json!({
        KEY_HEADERS: {
            "X-Trace": "abc",
            "X-Retry": 2,
            "X-Nested": {"bad": true},
        },
    }));
    let headers = arguments.header_map();
    assert_eq!(headers.len(), 2);
    assert!(headers.contains(&("X-Trace".to_string(), "abc".to_string())));
    assert!(headers.contains(&("X-Retry".to_string(), "2".to_string())));
}

#[test]
fn header_map_is_empty_for_non_object_headers() {
    let arguments = InvocationArguments::from_value(json!({ KEY_HEADERS: "nope" }));
    assert!(arguments.header_map().is_empty());
}

// ============================================================================
// SECTION: Nested Arguments Tests
// ============================================================================

#[test]
fn nested_arguments_unwraps_objects_only() {
    let arguments = InvocationArguments::from_value(json!({
        "arguments": {"name": "trinity"},
    }));
    let nested = arguments.nested_arguments().expect("nested object expected");
    assert_eq!(nested.get_str("name").as_deref(), Some("trinity"));

    let scalar = InvocationArguments::from_value(json!({ "arguments": 5 }));
    assert!(scalar.nested_arguments().is_none());
}
