// crates/api-bridge-core/src/optimize.rs
// ============================================================================
// Module: Response Optimization
// Description: Projection and size-bounded summarization of API responses.
// Purpose: Keep tool results within model-friendly size limits.
// Dependencies: api-bridge-config, jsonpath_lib, serde_json, crate::arguments
// ============================================================================

//! ## Overview
//! Transforms raw upstream response bodies into bounded tool output. JSON
//! bodies may first be narrowed by a caller-supplied `JSONPath` projection,
//! then summarized with depth, object-entry, array-item, and string-length
//! limits. Non-JSON bodies pass through as opaque text. Every path ends with
//! a hard character cap so a single response can never flood the caller.
//!
//! Security posture: response bodies and projection expressions are untrusted;
//! projections are evaluated read-only against the parsed document and
//! failures degrade to diagnostics; see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use api_bridge_config::BridgeConfig;
use jsonpath_lib::select;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::arguments::InvocationArguments;
use crate::arguments::KEY_MAX_ARRAY_ITEMS;
use crate::arguments::KEY_MAX_DEPTH;
use crate::arguments::KEY_MAX_OBJECT_ENTRIES;
use crate::arguments::KEY_PROJECTION;
use crate::arguments::KEY_SUMMARIZE;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suffix appended wherever text is cut short.
const TRUNCATION_SUFFIX: &str = "...[truncated]";

/// Marker substituted for values below the depth limit.
const DEPTH_MARKER: &str = "[truncated-depth]";

/// Key added to objects that lost entries to the entry limit.
const OBJECT_MARKER_KEY: &str = "_truncated";

/// Value stored under the object truncation key.
const OBJECT_MARKER_VALUE: &str = "remaining keys omitted";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Optimized response payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimized {
    /// Bounded textual rendering of the response.
    pub text: String,
    /// Structured form of the response, absent for non-JSON bodies.
    pub structured_content: Option<Value>,
}

/// Effective per-call summarization limits.
#[derive(Debug, Clone, Copy)]
struct Limits {
    /// Maximum nesting depth before substitution.
    max_depth: usize,
    /// Maximum object entries kept per object.
    max_object_entries: usize,
    /// Maximum array items kept per array.
    max_array_items: usize,
    /// Maximum string length before truncation.
    truncate_strings_at: usize,
}

/// Bounds API response payloads for tool results.
///
/// # Invariants
/// - Output text never exceeds `response.max_chars` plus the truncation
///   suffix.
/// - Optimization never fails: malformed bodies and bad projections degrade
///   to diagnostic output.
#[derive(Debug, Clone)]
pub struct ResponseOptimizer {
    /// Shared bridge configuration snapshot.
    config: Arc<BridgeConfig>,
}

// ============================================================================
// SECTION: Optimizer
// ============================================================================

impl ResponseOptimizer {
    /// Creates an optimizer over the shared configuration.
    #[must_use]
    pub const fn new(config: Arc<BridgeConfig>) -> Self {
        Self {
            config,
        }
    }

    /// Optimizes one raw response body under the caller's arguments.
    #[must_use]
    pub fn optimize(&self, raw_body: &str, arguments: &InvocationArguments) -> Optimized {
        let response = &self.config.response;
        let Ok(parsed) = serde_json::from_str::<Value>(raw_body) else {
            return Optimized {
                text: bound_text(raw_body, response.max_chars),
                structured_content: None,
            };
        };

        let mut value = parsed;
        if response.projection_argument_enabled
            && let Some(projection) = arguments.get_str(KEY_PROJECTION)
            && !projection.trim().is_empty()
        {
            value = apply_projection(&value, projection.trim());
        }

        let summarize = arguments.get(KEY_SUMMARIZE).map_or_else(
            || {
                response.summarize_by_default
                    || raw_body.len() >= response.summary_threshold_chars
            },
            |_| arguments.get_bool_or(KEY_SUMMARIZE, false),
        );
        if summarize {
            let limits = Limits {
                max_depth: arguments.get_usize_or(KEY_MAX_DEPTH, response.max_depth),
                max_object_entries: arguments
                    .get_usize_or(KEY_MAX_OBJECT_ENTRIES, response.max_object_entries),
                max_array_items: arguments
                    .get_usize_or(KEY_MAX_ARRAY_ITEMS, response.max_array_items),
                truncate_strings_at: response.truncate_strings_at,
            };
            value = summarize_value(&value, 0, limits);
        }

        let serialized =
            serde_json::to_string(&value).unwrap_or_else(|_| raw_body.to_string());
        Optimized {
            text: bound_text(&serialized, response.max_chars),
            structured_content: Some(value),
        }
    }
}

// ============================================================================
// SECTION: Projection
// ============================================================================

/// Applies a `JSONPath` projection, degrading failures to diagnostics.
fn apply_projection(document: &Value, projection: &str) -> Value {
    match select(document, projection) {
        Ok(matches) if matches.is_empty() => json!({
            "projectionWarning": "projection matched nothing",
            "projection": projection,
        }),
        Ok(matches) if matches.len() == 1 => matches[0].clone(),
        Ok(matches) => Value::Array(matches.into_iter().cloned().collect()),
        Err(_) => json!({
            "projectionError": "invalid projection expression",
            "projection": projection,
        }),
    }
}

// ============================================================================
// SECTION: Summarization
// ============================================================================

/// Recursively bounds a value's depth, breadth, and string lengths.
fn summarize_value(value: &Value, depth: usize, limits: Limits) -> Value {
    if value.is_null() {
        return Value::Null;
    }
    if depth >= limits.max_depth {
        return Value::String(DEPTH_MARKER.to_string());
    }
    match value {
        Value::Object(entries) => {
            let mut summarized = Map::new();
            for (key, entry) in entries.iter().take(limits.max_object_entries) {
                summarized.insert(key.clone(), summarize_value(entry, depth + 1, limits));
            }
            if entries.len() > limits.max_object_entries {
                summarized.insert(
                    OBJECT_MARKER_KEY.to_string(),
                    Value::String(OBJECT_MARKER_VALUE.to_string()),
                );
            }
            Value::Object(summarized)
        }
        Value::Array(items) => {
            let mut summarized: Vec<Value> = items
                .iter()
                .take(limits.max_array_items)
                .map(|item| summarize_value(item, depth + 1, limits))
                .collect();
            if items.len() > limits.max_array_items {
                let omitted = items.len() - limits.max_array_items;
                summarized.push(Value::String(format!("[truncated {omitted} items]")));
            }
            Value::Array(summarized)
        }
        Value::String(text) => Value::String(bound_string(text, limits.truncate_strings_at)),
        other => other.clone(),
    }
}

/// Truncates a string value at a character boundary with a suffix.
fn bound_string(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut bounded: String = text.chars().take(limit).collect();
    bounded.push_str(TRUNCATION_SUFFIX);
    bounded
}

/// Caps rendered output text at the configured character limit.
fn bound_text(text: &str, max_chars: usize) -> String {
    bound_string(text, max_chars)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
