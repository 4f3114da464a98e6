// crates/api-bridge-mcp/src/lib.rs
// ============================================================================
// Module: API Bridge MCP
// Description: MCP-facing adapter over the API bridge core.
// Purpose: Expose ingested API operations as MCP tools and route calls.
// Dependencies: api-bridge-config, api-bridge-core, reqwest, serde_json
// ============================================================================

//! ## Overview
//! Binds the bridge core to a tool-serving host: ingests operation data into
//! named tools, publishes versioned registry snapshots, and routes tool
//! invocations through the security gate, the HTTP executor, and the response
//! optimizer. All tools are thin wrappers over
//! [`api_bridge_core::SecurityPolicy`] gated HTTP calls.
//! Security posture: tool arguments and upstream responses are untrusted;
//! risky operations require explicit confirmation; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod adapter;
pub mod context;
pub mod executor;
pub mod ingest;
pub mod invocation_id;
pub mod registry;
pub mod request;
pub mod result;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use adapter::BridgeAdapter;
pub use adapter::RegistrationSummary;
pub use context::CallerContext;
pub use executor::ExecutedResponse;
pub use executor::HttpExecutor;
pub use ingest::OperationSource;
pub use ingest::RawOperation;
pub use ingest::RawParameter;
pub use ingest::ingest_operations;
pub use invocation_id::InvocationIdGenerator;
pub use registry::RegistrySnapshot;
pub use registry::ToolRegistry;
pub use result::ToolResult;
