// crates/api-bridge-core/src/naming.rs
// ============================================================================
// Module: Tool Naming
// Description: Normalization and deduplication for derived tool names.
// Purpose: Provide deterministic, collision-free tool names per generation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Tool names are derived from operation identifiers by collapsing every run
//! of characters outside `[A-Za-z0-9_]` into a single underscore, trimming
//! underscores at the edges, and lowercasing, with the configured prefix
//! prepended verbatim afterwards. Collisions within one generation are
//! resolved with numeric suffixes (`name`, `name_2`, `name_3`, ...).
//! Security posture: raw identifiers come from an untrusted interface
//! document and must never escape normalization; see
//! `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fallback base name when normalization consumes the whole identifier.
const FALLBACK_BASE_NAME: &str = "tool";

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Derives a tool name from a raw identifier and a verbatim prefix.
///
/// Normalization is idempotent: feeding an already-normalized name back in
/// (without re-prefixing) yields the same name.
#[must_use]
pub fn to_tool_name(raw: &str, prefix: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut pending_underscore = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if ch == '_' {
                pending_underscore = true;
                continue;
            }
            if pending_underscore && !normalized.is_empty() {
                normalized.push('_');
            }
            pending_underscore = false;
            normalized.push(ch.to_ascii_lowercase());
        } else {
            pending_underscore = true;
        }
    }
    if normalized.is_empty() {
        normalized.push_str(FALLBACK_BASE_NAME);
    }
    let mut name = String::with_capacity(prefix.len() + normalized.len());
    name.push_str(prefix);
    name.push_str(&normalized);
    name
}

// ============================================================================
// SECTION: Deduplication
// ============================================================================

/// Allocates unique tool names within one registry generation.
///
/// # Invariants
/// - Every returned name is distinct from all earlier returns.
/// - Collisions resolve as `name_2`, `name_3`, ... in allocation order.
#[derive(Debug, Default)]
pub struct ToolNameAllocator {
    /// Names handed out so far in this generation.
    reserved: BTreeSet<String>,
}

impl ToolNameAllocator {
    /// Creates an empty allocator for a new generation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a unique name for the given base, suffixing on collision.
    pub fn allocate(&mut self, base: &str) -> String {
        if self.reserved.insert(base.to_string()) {
            return base.to_string();
        }
        let mut suffix: u32 = 2;
        loop {
            let candidate = format!("{base}_{suffix}");
            if self.reserved.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Returns true when the name has already been handed out.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.reserved.contains(name)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
