// crates/api-bridge-mcp/src/registry.rs
// ============================================================================
// Module: Tool Registry
// Description: Versioned snapshots of the published tool set.
// Purpose: Give readers a consistent tool view across refreshes.
// Dependencies: api-bridge-core
// ============================================================================

//! ## Overview
//! The registry holds one immutable snapshot of the published tools at a
//! time. Refreshes build the next snapshot completely off to the side and
//! swap it in under a short write lock; readers clone the snapshot handle
//! and keep a consistent view for as long as they hold it. Nothing is
//! persisted; a restart begins at an empty generation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::RwLock;

use api_bridge_core::OperationRecord;
use api_bridge_core::ToolDefinition;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Immutable view of one published tool generation.
///
/// # Invariants
/// - `definitions` lists meta-tools first, then operations in registration
///   order.
/// - Every operation tool name in `definitions` resolves through
///   `operations_by_tool`.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    /// Monotonic generation number, starting at zero for the empty set.
    pub generation: u64,
    /// Invocable operations keyed by tool name.
    pub operations_by_tool: BTreeMap<String, Arc<OperationRecord>>,
    /// Tool definitions in listing order.
    pub definitions: Vec<ToolDefinition>,
}

/// Versioned registry of published tools.
///
/// # Invariants
/// - Snapshots are immutable once published.
/// - Generations only move forward.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    /// Currently published snapshot.
    current: RwLock<Arc<RegistrySnapshot>>,
}

// ============================================================================
// SECTION: Registry
// ============================================================================

impl ToolRegistry {
    /// Creates a registry holding the empty generation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.current
            .read()
            .map_or_else(|_| Arc::new(RegistrySnapshot::default()), |guard| Arc::clone(&guard))
    }

    /// Publishes the next generation and returns its number.
    pub fn publish(
        &self,
        operations_by_tool: BTreeMap<String, Arc<OperationRecord>>,
        definitions: Vec<ToolDefinition>,
    ) -> u64 {
        let Ok(mut guard) = self.current.write() else {
            return self.snapshot().generation;
        };
        let generation = guard.generation.wrapping_add(1);
        *guard = Arc::new(RegistrySnapshot {
            generation,
            operations_by_tool,
            definitions,
        });
        generation
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
