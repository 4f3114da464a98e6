// crates/api-bridge-core/src/select.rs
// ============================================================================
// Module: Tool Selection
// Description: Lexical relevance scoring over registered tool candidates.
// Purpose: Rank tools against a natural-language intent for gateway routing.
// Dependencies: std, crate::operation
// ============================================================================

//! ## Overview
//! Maintains an indexed candidate set derived from registered operations and
//! ranks candidates against a free-text query. Scoring is purely lexical:
//! token overlap measured against both the query and the candidate, plus a
//! flat bonus when the whole query appears verbatim in the candidate's search
//! text. The candidate set swaps atomically so concurrent selection never
//! observes a partially rebuilt index.
//!
//! Security posture: queries are untrusted free text; they are tokenized and
//! compared, never interpreted; see `Docs/security/threat_model.md`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::RwLock;

use crate::operation::OperationRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Weight of token overlap measured against the query token count.
const QUERY_COVERAGE_WEIGHT: f64 = 0.65;

/// Weight of token overlap measured against the candidate token count.
const CANDIDATE_COVERAGE_WEIGHT: f64 = 0.20;

/// Flat bonus when the trimmed query is a substring of the search text.
const SUBSTRING_BONUS: f64 = 0.45;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One indexed tool candidate.
///
/// # Invariants
/// - `search_text` is fully lowercased.
/// - `tokens` holds unique tokens in first-seen order.
#[derive(Debug, Clone)]
struct Candidate {
    /// Tool name the candidate resolves to.
    tool_name: String,
    /// Lowercased concatenation of the candidate's descriptive fields.
    search_text: String,
    /// Unique lowercased tokens of the search text.
    tokens: Vec<String>,
}

/// A candidate paired with its relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// Tool name of the matched candidate.
    pub tool_name: String,
    /// Lexical relevance score, strictly positive.
    pub score: f64,
}

/// Ranks registered tools against free-text queries.
///
/// # Invariants
/// - The candidate set is replaced wholesale; readers see either the old or
///   the new index, never a mix.
#[derive(Debug, Default)]
pub struct ToolSelector {
    /// Current candidate index.
    candidates: RwLock<Arc<Vec<Candidate>>>,
}

// ============================================================================
// SECTION: Selector
// ============================================================================

impl ToolSelector {
    /// Creates an empty selector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the candidate index from the given operations.
    pub fn replace(&self, operations: &[OperationRecord]) {
        let built: Vec<Candidate> = operations.iter().map(Candidate::from_operation).collect();
        if let Ok(mut guard) = self.candidates.write() {
            *guard = Arc::new(built);
        }
    }

    /// Ranks candidates against `query` and returns the top results.
    ///
    /// An empty or whitespace-only query yields no results. A query that
    /// tokenizes to nothing, such as bare punctuation, still competes for
    /// the substring bonus. Only candidates with a strictly positive score
    /// are returned, sorted by descending score with registration order
    /// breaking ties. At least one result is returned when any candidate
    /// scores, even if `top_k` is zero.
    #[must_use]
    pub fn select(&self, query: &str, top_k: usize) -> Vec<ScoredCandidate> {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return Vec::new();
        }
        let query_tokens = tokenize(&normalized);

        let snapshot = match self.candidates.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(_) => return Vec::new(),
        };

        let mut scored: Vec<ScoredCandidate> = snapshot
            .iter()
            .filter_map(|candidate| {
                let score = candidate.score(&normalized, &query_tokens);
                (score > 0.0).then(|| ScoredCandidate {
                    tool_name: candidate.tool_name.clone(),
                    score,
                })
            })
            .collect();
        scored.sort_by(|left, right| {
            right.score.partial_cmp(&left.score).unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k.max(1));
        scored
    }
}

impl Candidate {
    /// Builds the indexed form of one operation.
    fn from_operation(operation: &OperationRecord) -> Self {
        let mut search_text = String::new();
        for field in [
            operation.tool_name.as_str(),
            operation.operation_id.as_str(),
            operation.method.as_str(),
            operation.path.as_str(),
            operation.description.as_str(),
        ] {
            search_text.push_str(field);
            search_text.push(' ');
        }
        for tag in &operation.tags {
            search_text.push_str(tag);
            search_text.push(' ');
        }
        let search_text = search_text.to_lowercase();
        let tokens = tokenize(&search_text);
        Self {
            tool_name: operation.tool_name.clone(),
            search_text,
            tokens,
        }
    }

    /// Scores this candidate against a normalized query.
    fn score(&self, normalized_query: &str, query_tokens: &[String]) -> f64 {
        if self.tokens.is_empty() {
            return 0.0;
        }
        let mut score = 0.0;
        if !query_tokens.is_empty() {
            #[allow(
                clippy::cast_precision_loss,
                reason = "Token counts are far below the f64 integer range."
            )]
            let overlap = query_tokens
                .iter()
                .filter(|token| self.tokens.contains(token))
                .count() as f64;

            #[allow(
                clippy::cast_precision_loss,
                reason = "Token counts are far below the f64 integer range."
            )]
            let coverage = QUERY_COVERAGE_WEIGHT * overlap / query_tokens.len() as f64
                + CANDIDATE_COVERAGE_WEIGHT * overlap / self.tokens.len() as f64;
            score += coverage;
        }
        if self.search_text.contains(normalized_query) {
            score += SUBSTRING_BONUS;
        }
        score
    }
}

// ============================================================================
// SECTION: Tokenization
// ============================================================================

/// Splits lowercased text into unique tokens in first-seen order.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for raw in text.split(|character: char| !character.is_ascii_alphanumeric()) {
        if raw.is_empty() {
            continue;
        }
        if !tokens.iter().any(|existing| existing == raw) {
            tokens.push(raw.to_string());
        }
    }
    tokens
}

// ============================================================================
// SECTION: Tests
// ============================================================================
