// crates/api-bridge-mcp/src/context.rs
// ============================================================================
// Module: Caller Context
// Description: Per-invocation metadata supplied by the embedding host.
// Purpose: Carry forwardable incoming headers as explicit values.
// Dependencies: none
// ============================================================================

//! ## Overview
//! The embedding host hands the bridge an explicit per-invocation context
//! instead of the bridge reaching into any request-scoped machinery. Only
//! headers the bridge may forward appear here, and forwarding still requires
//! the matching configuration switch.
//! Security posture: context values are caller credentials; they are only
//! attached to upstream requests when forwarding is enabled and never logged;
//! see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Types
// ============================================================================

/// Per-invocation caller metadata.
///
/// # Invariants
/// - Fields are `None` when the incoming request carried no such header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    /// Incoming `Authorization` header value, when present.
    pub authorization: Option<String>,
    /// Incoming `Cookie` header value, when present.
    pub cookie: Option<String>,
}

impl CallerContext {
    /// Creates an empty context with no forwardable headers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            authorization: None,
            cookie: None,
        }
    }
}
