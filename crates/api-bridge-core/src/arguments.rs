// crates/api-bridge-core/src/arguments.rs
// ============================================================================
// Module: Invocation Arguments
// Description: Typed access to the per-invocation argument map.
// Purpose: Provide defensive, lenient accessors for untrusted tool input.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Every tool invocation carries one argument map scoped to that call. The
//! map mixes domain arguments (parameter values, `body`) with reserved
//! control keys. Accessors coerce leniently the way the bridge always has:
//! numbers and strings interconvert where sensible, and anything unusable
//! falls back to the supplied default instead of failing the call.
//! Security posture: argument values are untrusted caller input; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Reserved Keys
// ============================================================================

/// Reserved key carrying extra outbound headers.
pub const KEY_HEADERS: &str = "_headers";
/// Reserved key carrying a response projection expression.
pub const KEY_PROJECTION: &str = "_projection";
/// Reserved key overriding the summarize decision.
pub const KEY_SUMMARIZE: &str = "_summarize";
/// Reserved key overriding the summary depth limit.
pub const KEY_MAX_DEPTH: &str = "_maxDepth";
/// Reserved key overriding the summary array-item limit.
pub const KEY_MAX_ARRAY_ITEMS: &str = "_maxArrayItems";
/// Reserved key overriding the summary object-entry limit.
pub const KEY_MAX_OBJECT_ENTRIES: &str = "_maxObjectEntries";
/// Reserved key carrying the risky-operation confirmation token.
pub const KEY_CONFIRM: &str = "_confirm";
/// Reserved key carrying the request body value.
pub const KEY_BODY: &str = "body";
/// Gateway key carrying the free-text query.
pub const KEY_QUERY: &str = "query";
/// Gateway key carrying the requested candidate count.
pub const KEY_TOP_K: &str = "topK";
/// Gateway key carrying nested arguments for the delegated tool.
pub const KEY_ARGUMENTS: &str = "arguments";

// ============================================================================
// SECTION: Argument Map
// ============================================================================

/// Argument map for one tool invocation.
///
/// # Invariants
/// - Scoped to a single invocation; never retained across calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationArguments {
    /// Underlying key/value map in caller order.
    values: Map<String, Value>,
}

impl InvocationArguments {
    /// Creates an empty argument map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing JSON object map.
    #[must_use]
    pub const fn from_map(values: Map<String, Value>) -> Self {
        Self {
            values,
        }
    }

    /// Wraps a JSON value, using the empty map for non-objects.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::new(),
        }
    }

    /// Returns the raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    /// Returns true when a key is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Returns the argument key set in caller order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    /// Returns a string coercion of the value for a key.
    ///
    /// Strings pass through; numbers and booleans render to their canonical
    /// text; null, arrays, and objects yield `None`.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Returns a boolean coercion, falling back to the default.
    ///
    /// Booleans pass through; the strings `"true"`/`"false"` coerce; any
    /// other value yields the default.
    #[must_use]
    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => text.parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Returns a non-negative integer coercion, falling back to the default.
    #[must_use]
    pub fn get_usize_or(&self, key: &str, default: usize) -> usize {
        match self.values.get(key) {
            Some(Value::Number(number)) => number
                .as_u64()
                .and_then(|raw| usize::try_from(raw).ok())
                .unwrap_or(default),
            Some(Value::String(text)) => text.parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Returns the `_headers` object as name/value string pairs.
    ///
    /// Non-object values yield an empty list; non-scalar entries are
    /// skipped.
    #[must_use]
    pub fn header_map(&self) -> Vec<(String, String)> {
        let Some(Value::Object(map)) = self.values.get(KEY_HEADERS) else {
            return Vec::new();
        };
        let mut headers = Vec::with_capacity(map.len());
        for (name, value) in map {
            let rendered = match value {
                Value::String(text) => text.clone(),
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => continue,
            };
            headers.push((name.clone(), rendered));
        }
        headers
    }

    /// Returns the nested gateway `arguments` object, when present.
    #[must_use]
    pub fn nested_arguments(&self) -> Option<Self> {
        match self.values.get(KEY_ARGUMENTS) {
            Some(Value::Object(map)) => Some(Self::from_map(map.clone())),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
