// crates/api-bridge-config/src/model.rs
// ============================================================================
// Module: Configuration Model
// Description: Immutable configuration value types for each bridge concern.
// Purpose: Provide typed, defaulted, validated configuration sections.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! One value type per concern: [`ExecutionConfig`] for outbound HTTP calls,
//! [`SmartContextConfig`] for the gateway meta-tools, [`ResponseConfig`] for
//! response shaping, and [`SecurityConfig`] for the policy gate. The root
//! [`BridgeConfig`] owns all four plus the ingestion filters. Values are
//! never mutated after construction; components hold shared references.
//! Security posture: defaults fail toward the safe side (confirmation
//! required, audit enabled); see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

// ============================================================================
// SECTION: Root Configuration
// ============================================================================

/// Root configuration for the bridge pipeline.
///
/// # Invariants
/// - Immutable after construction; components receive shared references.
/// - `validate` has been applied to any instance produced by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Master switch for the bridge; a disabled bridge registers nothing.
    pub enabled: bool,
    /// Prefix prepended verbatim to every derived tool name.
    pub tool_name_prefix: String,
    /// Glob patterns a path must match to be ingested.
    pub include_path_patterns: Vec<String>,
    /// Glob patterns that exclude a path from ingestion.
    pub exclude_path_patterns: Vec<String>,
    /// HTTP method allowlist for ingestion; empty means all methods.
    pub include_http_methods: BTreeSet<String>,
    /// Outbound HTTP execution settings.
    pub execution: ExecutionConfig,
    /// Gateway meta-tool settings.
    pub smart_context: SmartContextConfig,
    /// Response shaping settings.
    pub response: ResponseConfig,
    /// Security policy settings.
    pub security: SecurityConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tool_name_prefix: "api_".to_string(),
            include_path_patterns: vec!["/**".to_string()],
            exclude_path_patterns: vec![
                "/v3/api-docs/**".to_string(),
                "/swagger-ui/**".to_string(),
                "/swagger-ui.html".to_string(),
                "/mcp/**".to_string(),
                "/sse/**".to_string(),
                "/error".to_string(),
                "/actuator/**".to_string(),
            ],
            include_http_methods: ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            execution: ExecutionConfig::default(),
            smart_context: SmartContextConfig::default(),
            response: ResponseConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Validates every section and the ingestion filters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for the first out-of-range or
    /// malformed value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_patterns("include_path_patterns", &self.include_path_patterns)?;
        validate_patterns("exclude_path_patterns", &self.exclude_path_patterns)?;
        for method in &self.include_http_methods {
            validate_method_name("include_http_methods", method)?;
        }
        self.execution.validate()?;
        self.smart_context.validate()?;
        self.response.validate()?;
        self.security.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Execution Configuration
// ============================================================================

/// Outbound HTTP execution settings.
///
/// # Invariants
/// - `connect_timeout_ms` and `read_timeout_ms` are non-zero.
/// - An empty `base_url` means "derive from the local listening port".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Explicit base URL for outbound calls; empty derives from local port.
    pub base_url: String,
    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Read timeout in milliseconds, covering the full response.
    pub read_timeout_ms: u64,
    /// Forward the caller's Authorization header when not otherwise set.
    pub forward_incoming_authorization: bool,
    /// Forward the caller's Cookie header when not otherwise set.
    pub forward_incoming_cookie: bool,
    /// Headers applied to every outbound request before per-call headers.
    pub default_headers: BTreeMap<String, String>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            connect_timeout_ms: 3_000,
            read_timeout_ms: 30_000,
            forward_incoming_authorization: true,
            forward_incoming_cookie: false,
            default_headers: BTreeMap::new(),
        }
    }
}

impl ExecutionConfig {
    /// Validates timeout ranges and default header names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for zero timeouts or blank header
    /// names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connect_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "execution.connect_timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.read_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "execution.read_timeout_ms must be greater than zero".to_string(),
            ));
        }
        for name in self.default_headers.keys() {
            if name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "execution.default_headers contains a blank header name".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Smart Context Configuration
// ============================================================================

/// Gateway meta-tool settings (discover / invoke-by-intent).
///
/// # Invariants
/// - `min_score` stays within `[0.0, 1.0]`.
/// - `default_top_k` is non-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmartContextConfig {
    /// Enables the relevance selector and gateway surface.
    pub enabled: bool,
    /// Registers the two gateway meta-tools when enabled.
    pub gateway_tool_enabled: bool,
    /// Registers only the gateway meta-tools, hiding per-operation tools.
    pub gateway_only: bool,
    /// Default number of candidates returned by discovery.
    pub default_top_k: usize,
    /// Minimum relevance score required for invoke-by-intent delegation.
    pub min_score: f64,
}

impl Default for SmartContextConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gateway_tool_enabled: true,
            gateway_only: false,
            default_top_k: 8,
            min_score: 0.08,
        }
    }
}

impl SmartContextConfig {
    /// Validates top-K and score ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for zero top-K or a score outside
    /// `[0.0, 1.0]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_top_k == 0 {
            return Err(ConfigError::Validation(
                "smart_context.default_top_k must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(ConfigError::Validation(
                "smart_context.min_score must be within [0.0, 1.0]".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Response Configuration
// ============================================================================

/// Response shaping settings for the optimizer.
///
/// # Invariants
/// - All size and depth limits are non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResponseConfig {
    /// Hard cap on returned text length, in characters.
    pub max_chars: usize,
    /// Raw body length at which summarization turns on automatically.
    pub summary_threshold_chars: usize,
    /// Maximum nesting depth retained by summarization.
    pub max_depth: usize,
    /// Maximum object entries retained per level by summarization.
    pub max_object_entries: usize,
    /// Maximum leading array items retained per level by summarization.
    pub max_array_items: usize,
    /// Maximum string length retained by summarization.
    pub truncate_strings_at: usize,
    /// Exposes the `_projection` argument on every tool.
    pub projection_argument_enabled: bool,
    /// Summarizes every response regardless of size.
    pub summarize_by_default: bool,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            max_chars: 8_000,
            summary_threshold_chars: 4_000,
            max_depth: 4,
            max_object_entries: 20,
            max_array_items: 20,
            truncate_strings_at: 1_024,
            projection_argument_enabled: true,
            summarize_by_default: false,
        }
    }
}

impl ResponseConfig {
    /// Validates that every limit is non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first zero limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits: [(&str, usize); 6] = [
            ("response.max_chars", self.max_chars),
            ("response.summary_threshold_chars", self.summary_threshold_chars),
            ("response.max_depth", self.max_depth),
            ("response.max_object_entries", self.max_object_entries),
            ("response.max_array_items", self.max_array_items),
            ("response.truncate_strings_at", self.truncate_strings_at),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(ConfigError::Validation(format!(
                    "{name} must be greater than zero"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Security Configuration
// ============================================================================

/// Security policy settings for the bridge gate.
///
/// # Invariants
/// - `confirmation_token` is non-empty whenever confirmation is required.
/// - Method names in `risky_http_methods` are canonical uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityConfig {
    /// Emits audit events for every invocation start and end.
    pub audit_log_enabled: bool,
    /// Exposes risky operations as tools at all.
    pub expose_risky_tools: bool,
    /// Requires the confirmation token before executing risky operations.
    pub require_confirmation_for_risky_operations: bool,
    /// Token the caller must echo exactly in `_confirm`.
    pub confirmation_token: String,
    /// HTTP methods classified as risky.
    pub risky_http_methods: BTreeSet<String>,
    /// Glob patterns marking paths as risky.
    pub risky_path_patterns: Vec<String>,
    /// Glob patterns blocking paths entirely.
    pub blocked_path_patterns: Vec<String>,
    /// Glob patterns requiring a role check even for non-risky operations.
    pub role_protected_path_patterns: Vec<String>,
    /// Roles of which the caller must hold at least one when role-gated.
    pub required_any_role: BTreeSet<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            audit_log_enabled: true,
            expose_risky_tools: true,
            require_confirmation_for_risky_operations: true,
            confirmation_token: "CONFIRM".to_string(),
            risky_http_methods: ["POST", "PUT", "PATCH", "DELETE"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            risky_path_patterns: Vec::new(),
            blocked_path_patterns: Vec::new(),
            role_protected_path_patterns: Vec::new(),
            required_any_role: BTreeSet::new(),
        }
    }
}

impl SecurityConfig {
    /// Validates the confirmation token, method names, and glob patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an empty token while
    /// confirmation is required, a non-canonical method name, or a blank
    /// pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.require_confirmation_for_risky_operations && self.confirmation_token.is_empty() {
            return Err(ConfigError::Validation(
                "security.confirmation_token must not be empty while confirmation is required"
                    .to_string(),
            ));
        }
        for method in &self.risky_http_methods {
            validate_method_name("security.risky_http_methods", method)?;
        }
        validate_patterns("security.risky_path_patterns", &self.risky_path_patterns)?;
        validate_patterns("security.blocked_path_patterns", &self.blocked_path_patterns)?;
        validate_patterns(
            "security.role_protected_path_patterns",
            &self.role_protected_path_patterns,
        )?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Rejects blank glob patterns in the named list.
fn validate_patterns(field: &str, patterns: &[String]) -> Result<(), ConfigError> {
    for pattern in patterns {
        if pattern.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{field} contains a blank pattern")));
        }
    }
    Ok(())
}

/// Rejects method names that are not canonical uppercase HTTP method tokens.
fn validate_method_name(field: &str, method: &str) -> Result<(), ConfigError> {
    let canonical = method
        .chars()
        .all(|ch| ch.is_ascii_uppercase());
    if method.is_empty() || !canonical {
        return Err(ConfigError::Validation(format!(
            "{field} contains a non-canonical method name: {method}"
        )));
    }
    Ok(())
}
