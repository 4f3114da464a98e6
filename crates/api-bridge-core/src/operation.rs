// crates/api-bridge-core/src/operation.rs
// ============================================================================
// Module: Operation Model
// Description: Immutable records describing one bridged API operation.
// Purpose: Provide the canonical data the whole pipeline operates on.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! An [`OperationRecord`] captures one method+path endpoint of the bridged
//! API together with its parameters, optional request body schema, and the
//! risky classification computed once at ingestion. Records are immutable;
//! every registry generation owns its own set.
//! Security posture: record contents originate from an interface document
//! and are treated as untrusted text; see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: HTTP Method
// ============================================================================

/// HTTP method of a bridged operation.
///
/// # Invariants
/// - Variants are stable for audit labeling and serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET.
    Get,
    /// HTTP HEAD.
    Head,
    /// HTTP POST.
    Post,
    /// HTTP PUT.
    Put,
    /// HTTP PATCH.
    Patch,
    /// HTTP DELETE.
    Delete,
    /// HTTP OPTIONS.
    Options,
    /// HTTP TRACE.
    Trace,
}

impl HttpMethod {
    /// Returns the canonical uppercase method token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
        }
    }

    /// Parses a canonical uppercase method token.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(Self::Get),
            "HEAD" => Some(Self::Head),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            "OPTIONS" => Some(Self::Options),
            "TRACE" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Returns true for methods without observable side effects.
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options)
    }

    /// Returns true for methods that are idempotent by HTTP semantics.
    #[must_use]
    pub const fn is_idempotent(self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Put | Self::Delete | Self::Options)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Parameters
// ============================================================================

/// Location of an operation parameter.
///
/// # Invariants
/// - Variants are stable for serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Substituted into a `{name}` path placeholder.
    Path,
    /// Appended to the request query string.
    Query,
    /// Set as a request header.
    Header,
    /// Carried in the request cookie header.
    Cookie,
}

/// One declared parameter of a bridged operation.
///
/// # Invariants
/// - `schema`, when present, is the raw structural type description from the
///   interface document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    /// Parameter name as declared by the interface document.
    pub name: String,
    /// Where the parameter is carried on the wire.
    pub location: ParameterLocation,
    /// Whether the caller must supply a value.
    pub required: bool,
    /// Structural type description, when the document provides one.
    pub schema: Option<Value>,
}

// ============================================================================
// SECTION: Operation Record
// ============================================================================

/// Immutable description of one bridged API operation.
///
/// # Invariants
/// - `tool_name` is unique within one registry generation.
/// - `{name}` placeholders in `path` correspond 1:1 to parameters with
///   [`ParameterLocation::Path`].
/// - `risky` is computed once at ingestion and never re-derived per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationRecord {
    /// Derived tool name, normalized and deduplicated.
    pub tool_name: String,
    /// Operation identifier from the interface document (or generated).
    pub operation_id: String,
    /// HTTP method of the operation.
    pub method: HttpMethod,
    /// Path template, possibly containing `{name}` placeholders.
    pub path: String,
    /// Human-readable operation description; may be empty.
    pub description: String,
    /// Ordered operation tags.
    pub tags: Vec<String>,
    /// Ordered declared parameters.
    pub parameters: Vec<ParameterRecord>,
    /// Whether the request body is required.
    pub request_body_required: bool,
    /// Structural request body schema, when declared.
    pub request_body_schema: Option<Value>,
    /// Risky classification computed at ingestion.
    pub risky: bool,
}
