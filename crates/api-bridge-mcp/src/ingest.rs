// crates/api-bridge-mcp/src/ingest.rs
// ============================================================================
// Module: Operation Ingestion
// Description: Filtering and normalization of raw API operation data.
// Purpose: Turn parser output into named, classified operation records.
// Dependencies: api-bridge-config, api-bridge-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The boundary between an interface-document parser and the bridge. Raw
//! operations arrive as loosely typed data; ingestion applies the path and
//! method filters, resolves an operation identity, derives a unique tool
//! name, classifies risk once, and emits immutable operation records. The
//! crate ships no parser; hosts implement [`OperationSource`] over whatever
//! document format they consume.
//! Security posture: raw operation data is untrusted input; unknown methods
//! and parameter locations are dropped rather than guessed; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use api_bridge_config::BridgeConfig;
use api_bridge_core::BridgeError;
use api_bridge_core::HttpMethod;
use api_bridge_core::OperationRecord;
use api_bridge_core::ParameterLocation;
use api_bridge_core::ParameterRecord;
use api_bridge_core::SecurityPolicy;
use api_bridge_core::ToolNameAllocator;
use api_bridge_core::pattern;
use api_bridge_core::to_tool_name;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Raw Types
// ============================================================================

/// Parameter data as produced by an interface-document parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawParameter {
    /// Parameter name.
    pub name: String,
    /// Parameter location token (`path`, `query`, `header`, `cookie`).
    pub location: String,
    /// Whether the parameter is required.
    #[serde(default)]
    pub required: bool,
    /// Declared parameter schema, when present.
    #[serde(default)]
    pub schema: Option<Value>,
}

/// Operation data as produced by an interface-document parser.
///
/// # Invariants
/// - `method` and parameter locations are raw tokens; ingestion validates
///   them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOperation {
    /// Declared operation identifier, when present.
    #[serde(default)]
    pub operation_id: Option<String>,
    /// Raw HTTP method token.
    pub method: String,
    /// Path template, with or without a leading slash.
    pub path: String,
    /// Operation description or summary.
    #[serde(default)]
    pub description: String,
    /// Declared tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Declared parameters.
    #[serde(default)]
    pub parameters: Vec<RawParameter>,
    /// Whether the request body is required.
    #[serde(default)]
    pub request_body_required: bool,
    /// Declared request body schema, when present.
    #[serde(default)]
    pub request_body_schema: Option<Value>,
}

/// External collaborator producing raw operations from an API document.
pub trait OperationSource {
    /// Fetches the current raw operation set.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError`] when the document cannot be obtained or read.
    fn fetch(&self) -> Result<Vec<RawOperation>, BridgeError>;
}

// ============================================================================
// SECTION: Ingestion
// ============================================================================

/// Filters, names, and classifies raw operations into records.
///
/// Operations failing the path globs or the method allowlist are dropped.
/// Tool names are deduplicated within the returned set; risk is computed
/// once here so every later gate sees a stable classification.
#[must_use]
pub fn ingest_operations(
    raw: Vec<RawOperation>,
    config: &BridgeConfig,
    policy: &SecurityPolicy,
) -> Vec<OperationRecord> {
    let mut allocator = ToolNameAllocator::new();
    let mut records: Vec<OperationRecord> = Vec::with_capacity(raw.len());
    for operation in raw {
        let path = normalize_path(&operation.path);
        if !path_included(&path, config) {
            continue;
        }
        let Some(method) = HttpMethod::parse(operation.method.trim().to_uppercase().as_str())
        else {
            continue;
        };
        if !config.include_http_methods.is_empty()
            && !config.include_http_methods.contains(method.as_str())
        {
            continue;
        }
        let operation_id = resolve_operation_id(operation.operation_id.as_deref(), method, &path);
        let tool_name =
            allocator.allocate(&to_tool_name(&operation_id, &config.tool_name_prefix));
        let parameters = convert_parameters(operation.parameters);
        let risky = policy.is_risky(method, &path, &operation.tags);
        records.push(OperationRecord {
            tool_name,
            operation_id,
            method,
            path,
            description: operation.description,
            tags: operation.tags,
            parameters,
            request_body_required: operation.request_body_required,
            request_body_schema: operation.request_body_schema,
            risky,
        });
    }
    records
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures a leading slash on the path template.
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Applies the include and exclude glob filters.
fn path_included(path: &str, config: &BridgeConfig) -> bool {
    let included = config
        .include_path_patterns
        .iter()
        .any(|include| pattern::matches(include, path));
    if !included {
        return false;
    }
    !config
        .exclude_path_patterns
        .iter()
        .any(|exclude| pattern::matches(exclude, path))
}

/// Resolves the operation identity, generating one from the shape if absent.
fn resolve_operation_id(declared: Option<&str>, method: HttpMethod, path: &str) -> String {
    if let Some(declared) = declared
        && !declared.trim().is_empty()
    {
        return declared.trim().to_string();
    }
    let mut derived = String::new();
    for character in path.chars() {
        match character {
            '{' | '}' => {}
            ch if ch.is_ascii_alphanumeric() => derived.push(ch),
            _ => {
                if !derived.ends_with('_') {
                    derived.push('_');
                }
            }
        }
    }
    let derived = derived.trim_matches('_');
    if derived.is_empty() {
        format!("{}_root", method.as_str().to_lowercase())
    } else {
        format!("{}_{derived}", method.as_str().to_lowercase())
    }
}

/// Converts raw parameters, dropping ones with unknown locations.
fn convert_parameters(raw: Vec<RawParameter>) -> Vec<ParameterRecord> {
    raw.into_iter()
        .filter_map(|parameter| {
            let location = match parameter.location.trim().to_lowercase().as_str() {
                "path" => ParameterLocation::Path,
                "query" => ParameterLocation::Query,
                "header" => ParameterLocation::Header,
                "cookie" => ParameterLocation::Cookie,
                _ => return None,
            };
            Some(ParameterRecord {
                name: parameter.name,
                location,
                required: parameter.required,
                schema: parameter.schema,
            })
        })
        .collect()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
