// crates/api-bridge-mcp/src/invocation_id.rs
// ============================================================================
// Module: Invocation Identifiers
// Description: Generation of per-invocation correlation identifiers.
// Purpose: Give every tool invocation a stable id for audit pairing.
// Dependencies: rand
// ============================================================================

//! ## Overview
//! Issues process-unique invocation identifiers from a boot-scoped random
//! seed plus a monotonic counter. Start and end audit events for one
//! invocation carry the same identifier so audit consumers can pair them
//! without shared state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use rand::RngCore;
use rand::rngs::OsRng;

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Boot-scoped invocation identifier generator.
///
/// # Invariants
/// - Issued identifiers are unique within the process lifetime.
#[derive(Debug)]
pub struct InvocationIdGenerator {
    /// Boot-scoped random identifier for entropy.
    boot_id: u64,
    /// Monotonic counter for identifiers issued in this process.
    counter: AtomicU64,
}

impl Default for InvocationIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl InvocationIdGenerator {
    /// Creates a generator seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        let mut bytes = [0u8; 8];
        OsRng.fill_bytes(&mut bytes);
        Self {
            boot_id: u64::from_be_bytes(bytes),
            counter: AtomicU64::new(1),
        }
    }

    /// Issues the next invocation identifier.
    #[must_use]
    pub fn issue(&self) -> String {
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("inv-{:016x}-{sequence:08x}", self.boot_id)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
