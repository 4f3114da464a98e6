// crates/api-bridge-core/src/policy.rs
// ============================================================================
// Module: Security Policy
// Description: Risk classification, exposure gating, and execution checks.
// Purpose: Gate risky and blocked operations before any network call.
// Dependencies: api-bridge-config, crate::arguments, crate::operation,
//               crate::pattern
// ============================================================================

//! ## Overview
//! Classifies operations as risky or blocked from configuration, decides
//! which operations are exposed as tools, and validates each invocation
//! before execution: blocked paths are rejected outright, risky operations
//! require an exact confirmation token, and role-gated operations require a
//! caller role intersection. Audit events for invocation start and end flow
//! through a pluggable sink so deployments can attach their own audit log
//! without redesign.
//!
//! Security posture: all gate inputs (paths, tags, arguments, roles) are
//! untrusted; checks fail closed and audit emission never alters control
//! flow; see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;

use api_bridge_config::SecurityConfig;

use crate::arguments::InvocationArguments;
use crate::arguments::KEY_CONFIRM;
use crate::operation::HttpMethod;
use crate::operation::OperationRecord;
use crate::pattern;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Tag substrings that classify an operation as risky.
const RISKY_TAG_KEYWORDS: &[&str] = &["delete", "payment", "admin"];

// ============================================================================
// SECTION: Roles
// ============================================================================

/// Source of the invoking caller's roles.
pub trait RoleProvider: Send + Sync {
    /// Returns the roles held by the current caller.
    fn current_roles(&self) -> BTreeSet<String>;
}

/// Role provider backed by a fixed role set.
///
/// # Invariants
/// - The role set never changes after construction.
#[derive(Debug, Clone, Default)]
pub struct StaticRoleProvider {
    /// Roles reported for every caller.
    roles: BTreeSet<String>,
}

impl StaticRoleProvider {
    /// Creates a provider reporting the given roles.
    #[must_use]
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl RoleProvider for StaticRoleProvider {
    fn current_roles(&self) -> BTreeSet<String> {
        self.roles.clone()
    }
}

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Lifecycle phase of an audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditPhase {
    /// Invocation accepted and about to execute.
    Start,
    /// Invocation finished, successfully or not.
    End,
}

/// Audit event payload for one invocation phase.
///
/// # Invariants
/// - `success` and `status` are `None` for start events.
/// - Argument values are never captured, only key names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Lifecycle phase.
    pub phase: AuditPhase,
    /// Server-issued invocation identifier.
    pub invocation_id: String,
    /// Tool name of the invoked operation.
    pub tool_name: String,
    /// HTTP method of the operation.
    pub method: HttpMethod,
    /// Path template of the operation.
    pub path: String,
    /// Risk classification of the operation.
    pub risky: bool,
    /// Names of the argument keys supplied by the caller.
    pub argument_keys: Vec<String>,
    /// Whether the invocation succeeded (end events only).
    pub success: Option<bool>,
    /// Upstream HTTP status (end events only).
    pub status: Option<u16>,
}

/// Audit sink for invocation lifecycle events.
pub trait AuditSink: Send + Sync {
    /// Records one audit event.
    fn record(&self, event: AuditEvent);
}

/// No-op audit sink.
///
/// # Invariants
/// - Events are intentionally discarded.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: AuditEvent) {}
}

/// In-memory audit sink for tests and embedding hosts.
///
/// # Invariants
/// - Events are kept in arrival order.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Security gate for operation exposure and execution.
///
/// # Invariants
/// - An absent role provider yields an empty role set, never an error.
/// - Audit emission never changes the gate's decision.
#[derive(Clone)]
pub struct SecurityPolicy {
    /// Security configuration snapshot.
    config: Arc<SecurityConfig>,
    /// Source of caller roles, when wired.
    roles: Option<Arc<dyn RoleProvider>>,
    /// Destination for audit events.
    audit: Arc<dyn AuditSink>,
}

impl std::fmt::Debug for SecurityPolicy {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("SecurityPolicy")
            .field("config", &self.config)
            .field("has_role_provider", &self.roles.is_some())
            .finish_non_exhaustive()
    }
}

impl SecurityPolicy {
    /// Creates a policy over the given configuration, roles, and sink.
    #[must_use]
    pub fn new(
        config: Arc<SecurityConfig>,
        roles: Option<Arc<dyn RoleProvider>>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            config,
            roles,
            audit,
        }
    }

    /// Classifies an operation shape as risky.
    ///
    /// Risk is the union of the risky method set, risky path globs, and tags
    /// containing a risky keyword, compared case-insensitively.
    #[must_use]
    pub fn is_risky(&self, method: HttpMethod, path: &str, tags: &[String]) -> bool {
        if self.config.risky_http_methods.contains(method.as_str()) {
            return true;
        }
        if self
            .config
            .risky_path_patterns
            .iter()
            .any(|risky| pattern::matches(risky, path))
        {
            return true;
        }
        tags.iter().any(|tag| {
            let lowered = tag.to_lowercase();
            RISKY_TAG_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
        })
    }

    /// Returns true when the operation's path matches a blocked glob.
    #[must_use]
    pub fn is_blocked(&self, operation: &OperationRecord) -> bool {
        self.config
            .blocked_path_patterns
            .iter()
            .any(|blocked| pattern::matches(blocked, &operation.path))
    }

    /// Decides whether the operation is exposed as a tool at all.
    #[must_use]
    pub fn should_expose(&self, operation: &OperationRecord) -> bool {
        if self.is_blocked(operation) {
            return false;
        }
        !operation.risky || self.config.expose_risky_tools
    }

    /// Validates one invocation, returning a rejection reason when denied.
    ///
    /// Checks run in order: blocked path, confirmation token for risky
    /// operations, then role gate. The first failing check wins.
    #[must_use]
    pub fn validate_execution(
        &self,
        operation: &OperationRecord,
        arguments: &InvocationArguments,
    ) -> Option<String> {
        if self.is_blocked(operation) {
            return Some(format!("Blocked operation: {}", operation.path));
        }
        if operation.risky
            && self.config.require_confirmation_for_risky_operations
            && arguments.get_str(KEY_CONFIRM).as_deref() != Some(self.config.confirmation_token.as_str())
        {
            return Some(format!(
                "Confirmation is required. Provide _confirm=\"{}\"",
                self.config.confirmation_token
            ));
        }
        if self.requires_role(operation) {
            let held = self
                .roles
                .as_ref()
                .map_or_else(BTreeSet::new, |provider| provider.current_roles());
            let satisfied = self
                .config
                .required_any_role
                .iter()
                .any(|required| held.contains(required));
            if !satisfied {
                let wanted: Vec<&str> =
                    self.config.required_any_role.iter().map(String::as_str).collect();
                return Some(format!("Forbidden: required role(s) {}", wanted.join(", ")));
            }
        }
        None
    }

    /// Emits an audit event for an accepted invocation start.
    pub fn audit_start(
        &self,
        operation: &OperationRecord,
        invocation_id: &str,
        argument_keys: Vec<String>,
    ) {
        if !self.config.audit_log_enabled {
            return;
        }
        self.audit.record(AuditEvent {
            phase: AuditPhase::Start,
            invocation_id: invocation_id.to_string(),
            tool_name: operation.tool_name.clone(),
            method: operation.method,
            path: operation.path.clone(),
            risky: operation.risky,
            argument_keys,
            success: None,
            status: None,
        });
    }

    /// Emits an audit event for a finished invocation.
    pub fn audit_end(
        &self,
        operation: &OperationRecord,
        invocation_id: &str,
        success: bool,
        status: u16,
    ) {
        if !self.config.audit_log_enabled {
            return;
        }
        self.audit.record(AuditEvent {
            phase: AuditPhase::End,
            invocation_id: invocation_id.to_string(),
            tool_name: operation.tool_name.clone(),
            method: operation.method,
            path: operation.path.clone(),
            risky: operation.risky,
            argument_keys: Vec::new(),
            success: Some(success),
            status: Some(status),
        });
    }

    /// Returns true when the role gate applies to this operation.
    fn requires_role(&self, operation: &OperationRecord) -> bool {
        if self.config.required_any_role.is_empty() {
            return false;
        }
        operation.risky
            || self
                .config
                .role_protected_path_patterns
                .iter()
                .any(|protected| pattern::matches(protected, &operation.path))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
