// crates/api-bridge-core/src/pattern.rs
// ============================================================================
// Module: Path Pattern Matching
// Description: ANT-style glob matching for request path patterns.
// Purpose: Back the security policy and ingestion filters with one matcher.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Patterns use the ANT conventions: `?` matches one character within a
//! segment, `*` matches any run of characters within a segment, and `**`
//! matches zero or more whole segments. Matching is pure and recursive over
//! the segment lists; there is no compilation step and no pattern state.
//! Security posture: patterns are operator-configured, paths are untrusted;
//! see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Matching
// ============================================================================

/// Returns true when the path matches the ANT-style pattern.
#[must_use]
pub fn matches(pattern: &str, path: &str) -> bool {
    let pattern_segments: Vec<&str> = split_segments(pattern);
    let path_segments: Vec<&str> = split_segments(path);
    match_segments(&pattern_segments, &path_segments)
}

/// Splits a slash-delimited value into its non-empty segments.
fn split_segments(value: &str) -> Vec<&str> {
    value.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Matches pattern segments against path segments recursively.
fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"**", rest)) => {
            // `**` consumes zero or more whole segments.
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((head, rest)) => match path.split_first() {
            Some((segment, remaining)) => {
                match_segment(head, segment) && match_segments(rest, remaining)
            }
            None => false,
        },
    }
}

/// Matches one pattern segment against one path segment.
fn match_segment(pattern: &str, segment: &str) -> bool {
    let pattern_chars: Vec<char> = pattern.chars().collect();
    let segment_chars: Vec<char> = segment.chars().collect();
    match_chars(&pattern_chars, &segment_chars)
}

/// Matches segment characters with `*` and `?` wildcards recursively.
fn match_chars(pattern: &[char], segment: &[char]) -> bool {
    match pattern.split_first() {
        None => segment.is_empty(),
        Some(('*', rest)) => (0..=segment.len()).any(|skip| match_chars(rest, &segment[skip..])),
        Some(('?', rest)) => match segment.split_first() {
            Some((_, remaining)) => match_chars(rest, remaining),
            None => false,
        },
        Some((ch, rest)) => match segment.split_first() {
            Some((other, remaining)) => ch == other && match_chars(rest, remaining),
            None => false,
        },
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
