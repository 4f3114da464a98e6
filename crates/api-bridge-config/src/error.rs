// crates/api-bridge-config/src/error.rs
// ============================================================================
// Module: Configuration Errors
// Description: Error taxonomy for configuration loading and validation.
// Purpose: Provide stable, human-readable failure reasons for config input.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Configuration failures are surfaced as [`ConfigError`] values. Every load
//! or validation problem maps to one variant with a message an operator can
//! act on; nothing in this crate panics on bad input.
//! Security posture: error messages never echo file contents; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Error Type
// ============================================================================

/// Errors raised while loading or validating bridge configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file path failed a safety guard before any read.
    #[error("config path rejected: {0}")]
    Path(String),
    /// The config file could not be read from disk.
    #[error("config file read failed: {0}")]
    Io(String),
    /// The config file content failed an input guard (size or encoding).
    #[error("config file rejected: {0}")]
    Content(String),
    /// The config document failed TOML deserialization.
    #[error("config parse failed: {0}")]
    Parse(String),
    /// A configuration value is outside its allowed range.
    #[error("config validation failed: {0}")]
    Validation(String),
}
