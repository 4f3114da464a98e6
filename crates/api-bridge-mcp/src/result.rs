// crates/api-bridge-mcp/src/result.rs
// ============================================================================
// Module: Tool Results
// Description: Protocol-facing result shape for tool invocations.
// Purpose: Carry text and structured content with an error flag.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The invocation result returned to tool-serving hosts. Every outcome,
//! including gate rejections and transport failures, is rendered as a result
//! value so callers never see a transport-level error for an application
//! failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Result of one tool invocation.
///
/// # Invariants
/// - `is_error` is true for every gate rejection and execution failure.
/// - `structured_content` is present only when the payload parsed as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// True when the invocation failed.
    pub is_error: bool,
    /// Human-readable result text.
    pub text: String,
    /// Structured form of the result payload, when available.
    pub structured_content: Option<Value>,
}

impl ToolResult {
    /// Creates a successful result.
    #[must_use]
    pub const fn success(text: String, structured_content: Option<Value>) -> Self {
        Self {
            is_error: false,
            text,
            structured_content,
        }
    }

    /// Creates an error result with the given message.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            text: message.into(),
            structured_content: None,
        }
    }
}
