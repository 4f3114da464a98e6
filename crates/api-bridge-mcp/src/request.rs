// crates/api-bridge-mcp/src/request.rs
// ============================================================================
// Module: Request Building
// Description: URL, query, header, and body resolution for invocations.
// Purpose: Turn an operation plus arguments into one upstream request.
// Dependencies: api-bridge-config, api-bridge-core, percent-encoding,
//               serde_json
// ============================================================================

//! ## Overview
//! Resolves an operation template against caller arguments: path parameters
//! substitute as percent-encoded segments, query parameters expand with
//! repeated keys for arrays, headers layer from configured defaults through
//! declared parameters to caller overrides, and forwarded credentials apply
//! last without clobbering explicit values. All resolution failures surface
//! before any network call.
//! Security posture: argument values land in a URL sent upstream; path
//! values are segment-encoded so they cannot splice new segments; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use api_bridge_config::ExecutionConfig;
use api_bridge_core::BridgeError;
use api_bridge_core::InvocationArguments;
use api_bridge_core::OperationRecord;
use api_bridge_core::ParameterLocation;
use api_bridge_core::arguments::KEY_BODY;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;
use serde_json::Value;

use crate::context::CallerContext;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Characters escaped inside one path segment: everything except unreserved.
const PATH_SEGMENT: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Header name carrying caller credentials.
const HEADER_AUTHORIZATION: &str = "Authorization";

/// Header name carrying caller session cookies.
const HEADER_COOKIE: &str = "Cookie";

// ============================================================================
// SECTION: Base URL
// ============================================================================

/// Resolves the upstream base URL for the current invocation.
///
/// A configured base URL wins with trailing slashes trimmed; otherwise the
/// bridge targets the local loopback on the embedder's port.
#[must_use]
pub fn resolve_base_url(execution: &ExecutionConfig, local_port: u16) -> String {
    let configured = execution.base_url.trim();
    if configured.is_empty() {
        format!("http://127.0.0.1:{local_port}")
    } else {
        configured.trim_end_matches('/').to_string()
    }
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Substitutes `{name}` placeholders with percent-encoded argument values.
///
/// A placeholder without an argument value errors only when the operation
/// declares it as a required path parameter; an optional absent one stays in
/// the path as a literal placeholder.
///
/// # Errors
///
/// Returns [`BridgeError::MissingPathParameter`] when a required placeholder
/// has no argument value.
pub fn resolve_path(
    operation: &OperationRecord,
    arguments: &InvocationArguments,
) -> Result<String, BridgeError> {
    let template = &operation.path;
    let mut resolved = String::with_capacity(template.len());
    let mut rest = template.as_str();
    while let Some(open) = rest.find('{') {
        resolved.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        let Some(close) = after_open.find('}') else {
            resolved.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let name = &after_open[..close];
        match arguments.get_str(name) {
            Some(value) => resolved.extend(utf8_percent_encode(&value, PATH_SEGMENT)),
            None if path_parameter_required(operation, name) => {
                return Err(BridgeError::MissingPathParameter(name.to_string()));
            }
            None => {
                resolved.push('{');
                resolved.push_str(name);
                resolved.push('}');
            }
        }
        rest = &after_open[close + 1..];
    }
    resolved.push_str(rest);
    if resolved.starts_with('/') {
        Ok(resolved)
    } else {
        Ok(format!("/{resolved}"))
    }
}

// ============================================================================
// SECTION: Query Resolution
// ============================================================================

/// Collects query parameters, expanding arrays into repeated keys.
///
/// Nulls and empty arrays are omitted; scalars coerce to their text form.
#[must_use]
pub fn build_query(
    operation: &OperationRecord,
    arguments: &InvocationArguments,
) -> Vec<(String, String)> {
    let mut query: Vec<(String, String)> = Vec::new();
    for parameter in &operation.parameters {
        if parameter.location != ParameterLocation::Query {
            continue;
        }
        match arguments.get(&parameter.name) {
            Some(Value::Array(items)) => {
                for item in items {
                    if let Some(text) = scalar_text(item) {
                        query.push((parameter.name.clone(), text));
                    }
                }
            }
            Some(value) => {
                if let Some(text) = scalar_text(value) {
                    query.push((parameter.name.clone(), text));
                }
            }
            None => {}
        }
    }
    query
}

// ============================================================================
// SECTION: Header Resolution
// ============================================================================

/// Layers request headers from defaults, parameters, overrides, and context.
///
/// Later layers replace earlier values for the same name. Forwarded caller
/// credentials apply last and only when enabled and not already set.
#[must_use]
pub fn build_headers(
    execution: &ExecutionConfig,
    operation: &OperationRecord,
    arguments: &InvocationArguments,
    context: &CallerContext,
) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = Vec::new();
    for (name, value) in &execution.default_headers {
        set_header(&mut headers, name, value.clone());
    }
    for parameter in &operation.parameters {
        if parameter.location == ParameterLocation::Header
            && let Some(value) = arguments.get_str(&parameter.name)
        {
            set_header(&mut headers, &parameter.name, value);
        }
    }
    for (name, value) in arguments.header_map() {
        set_header(&mut headers, &name, value);
    }
    if execution.forward_incoming_authorization
        && let Some(authorization) = context.authorization.as_ref()
        && !has_header(&headers, HEADER_AUTHORIZATION)
    {
        headers.push((HEADER_AUTHORIZATION.to_string(), authorization.clone()));
    }
    if execution.forward_incoming_cookie
        && let Some(cookie) = context.cookie.as_ref()
        && !has_header(&headers, HEADER_COOKIE)
    {
        headers.push((HEADER_COOKIE.to_string(), cookie.clone()));
    }
    headers
}

// ============================================================================
// SECTION: Body Resolution
// ============================================================================

/// Resolves the request body from the `body` argument.
///
/// Operations that declare no request body ignore a supplied `body` argument
/// entirely.
///
/// # Errors
///
/// Returns [`BridgeError::MissingRequestBody`] when the operation declares a
/// required body and the caller supplied none.
pub fn resolve_body(
    operation: &OperationRecord,
    arguments: &InvocationArguments,
) -> Result<Option<Value>, BridgeError> {
    if operation.request_body_schema.is_none() && !operation.request_body_required {
        return Ok(None);
    }
    match arguments.get(KEY_BODY) {
        Some(Value::Null) | None => {
            if operation.request_body_required {
                return Err(BridgeError::MissingRequestBody(operation.tool_name.clone()));
            }
            Ok(None)
        }
        Some(value) => Ok(Some(value.clone())),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Replaces or appends a header by case-insensitive name.
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    if let Some(existing) = headers
        .iter_mut()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
    {
        existing.1 = value;
    } else {
        headers.push((name.to_string(), value));
    }
}

/// Returns true when a header with the given name is already set.
fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(existing, _)| existing.eq_ignore_ascii_case(name))
}

/// Returns true when the operation declares `name` as a required path
/// parameter.
fn path_parameter_required(operation: &OperationRecord, name: &str) -> bool {
    operation.parameters.iter().any(|parameter| {
        parameter.location == ParameterLocation::Path
            && parameter.name == name
            && parameter.required
    })
}

/// Renders a scalar JSON value as query-parameter text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
