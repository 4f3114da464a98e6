// crates/api-bridge-config/src/lib.rs
// ============================================================================
// Module: API Bridge Configuration
// Description: Immutable configuration model for the bridge pipeline.
// Purpose: Provide one validated configuration value per concern.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! This crate defines the configuration surface for API Bridge. Each concern
//! (execution, smart context, response shaping, security) is an immutable
//! value type constructed once at startup and passed by reference into the
//! components that consume it. Loading is strict and fail-closed: oversized
//! files, non-UTF-8 content, unknown keys, and out-of-range values are all
//! rejected before any component sees the configuration.
//! Security posture: configuration files are operator-controlled but still
//! validated defensively; see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod error;
mod loader;
mod model;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::ConfigError;
pub use model::BridgeConfig;
pub use model::ExecutionConfig;
pub use model::ResponseConfig;
pub use model::SecurityConfig;
pub use model::SmartContextConfig;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
