// crates/api-bridge-core/src/error.rs
// ============================================================================
// Module: Bridge Errors
// Description: Error taxonomy for request resolution and execution.
// Purpose: Provide typed failures that degrade to invocation error results.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every [`BridgeError`] is caught at the adapter boundary and turned into a
//! well-formed invocation error result; none of these variants ever escapes
//! to the embedding process as a panic or abort.
//! Security posture: error messages name the offending field but never echo
//! argument values; see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Error Type
// ============================================================================

/// Errors raised while resolving or executing one invocation.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A required path parameter had no argument value.
    #[error("Missing required path parameter: {0}")]
    MissingPathParameter(String),
    /// The operation declares a required request body none was supplied for.
    #[error("body is required for {0}")]
    MissingRequestBody(String),
    /// The resolved target URL was not a valid absolute URL.
    #[error("invalid target url: {0}")]
    InvalidTargetUrl(String),
    /// The outbound HTTP call failed at the transport level.
    #[error("http request failed: {0}")]
    Http(String),
}
