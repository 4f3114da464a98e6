// crates/api-bridge-core/src/pattern/tests.rs
// ============================================================================
// Module: Path Pattern Matching Unit Tests
// Description: Unit tests for ANT-style glob matching.
// Purpose: Validate segment, wildcard, and multi-segment behavior.
// Dependencies: api-bridge-core
// ============================================================================

//! ## Overview
//! Exercises exact segments, `?`/`*` within a segment, and `**` across
//! segments, including the empty-path and trailing-pattern edge cases.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::matches;

// ============================================================================
// SECTION: Exact and Single-Segment Tests
// ============================================================================

#[test]
fn exact_paths_match_themselves() {
    assert!(matches("/users", "/users"));
    assert!(!matches("/users", "/orders"));
    assert!(!matches("/users", "/users/42"));
}

#[test]
fn question_mark_matches_one_character() {
    assert!(matches("/user?", "/users"));
    assert!(!matches("/user?", "/user"));
    assert!(!matches("/user?", "/userss"));
}

#[test]
fn star_matches_within_a_segment_only() {
    assert!(matches("/users/*", "/users/42"));
    assert!(matches("/u*s", "/users"));
    assert!(!matches("/users/*", "/users/42/orders"));
}

// ============================================================================
// SECTION: Multi-Segment Tests
// ============================================================================

#[test]
fn double_star_matches_across_segments() {
    assert!(matches("/**", "/anything/at/all"));
    assert!(matches("/admin/**", "/admin"));
    assert!(matches("/admin/**", "/admin/users/42"));
    assert!(!matches("/admin/**", "/public/admin"));
}

#[test]
fn double_star_in_the_middle_bridges_segments() {
    assert!(matches("/api/**/delete", "/api/v1/users/delete"));
    assert!(matches("/api/**/delete", "/api/delete"));
    assert!(!matches("/api/**/delete", "/api/v1/users"));
}

#[test]
fn empty_path_matches_only_empty_or_double_star_patterns() {
    assert!(matches("/**", "/"));
    assert!(matches("", "/"));
    assert!(!matches("/users", "/"));
}
