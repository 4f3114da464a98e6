// crates/api-bridge-core/src/lib.rs
// ============================================================================
// Module: API Bridge Core
// Description: Core bridge pipeline components for exposing an HTTP API as tools.
// Purpose: Provide schema conversion, relevance selection, response shaping, and policy.
// Dependencies: api-bridge-config, jsonpath_lib, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate holds the side-effect-free heart of API Bridge: the operation
//! model, tool-name derivation, operation-to-tool schema conversion, the
//! relevance-ranking tool selector, the response optimizer, and the security
//! policy gate. Orchestration and HTTP execution live in `api-bridge-mcp`.
//! Security posture: operation descriptions and invocation arguments are
//! untrusted input; see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod arguments;
pub mod convert;
pub mod error;
pub mod naming;
pub mod operation;
pub mod optimize;
pub mod pattern;
pub mod policy;
pub mod select;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use arguments::InvocationArguments;
pub use convert::SchemaConverter;
pub use convert::ToolAnnotations;
pub use convert::ToolDefinition;
pub use error::BridgeError;
pub use naming::ToolNameAllocator;
pub use naming::to_tool_name;
pub use operation::HttpMethod;
pub use operation::OperationRecord;
pub use operation::ParameterLocation;
pub use operation::ParameterRecord;
pub use optimize::Optimized;
pub use optimize::ResponseOptimizer;
pub use policy::AuditEvent;
pub use policy::AuditPhase;
pub use policy::AuditSink;
pub use policy::MemoryAuditSink;
pub use policy::NoopAuditSink;
pub use policy::RoleProvider;
pub use policy::SecurityPolicy;
pub use policy::StaticRoleProvider;
pub use select::ScoredCandidate;
pub use select::ToolSelector;
