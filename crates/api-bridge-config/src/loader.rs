// crates/api-bridge-config/src/loader.rs
// ============================================================================
// Module: Configuration Loader
// Description: Fail-closed loading of bridge configuration from TOML files.
// Purpose: Guard file input before parsing and validate after parsing.
// Dependencies: toml
// ============================================================================

//! ## Overview
//! The loader applies input guards before any parse: path length, path
//! component length, file size, and UTF-8 encoding. The parsed document is
//! then validated so that every [`BridgeConfig`] handed to components is
//! known-good.
//! Security posture: config files are read from operator-controlled paths
//! but still bounded and validated; see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::model::BridgeConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted config path length, in bytes.
const MAX_PATH_LENGTH: usize = 4_096;
/// Maximum accepted path component length, in bytes.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum accepted config file size, in bytes.
const MAX_FILE_SIZE: usize = 1_048_576;

// ============================================================================
// SECTION: Loading
// ============================================================================

impl BridgeConfig {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the path fails a guard, the file cannot
    /// be read, the content is oversized or not UTF-8, the document fails to
    /// parse, or a value is out of range.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        guard_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_FILE_SIZE {
            return Err(ConfigError::Content("config file exceeds size limit".to_string()));
        }
        let text = String::from_utf8(bytes)
            .map_err(|_| ConfigError::Content("config file must be utf-8".to_string()))?;
        Self::from_toml_str(&text)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::Validation`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Applies path guards before any filesystem access.
fn guard_path(path: &Path) -> Result<(), ConfigError> {
    let raw = path.as_os_str();
    if raw.len() > MAX_PATH_LENGTH {
        return Err(ConfigError::Path("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Path("config path component too long".to_string()));
        }
    }
    Ok(())
}
