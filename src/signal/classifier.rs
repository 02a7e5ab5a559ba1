//! Cheap pre-filter deciding whether an inbound message is worth parsing.
//!
//! The channel carries ordinary chatter alongside signals; rejection here is
//! silent and never an error.

use tracing::trace;

use crate::models::symbol;

use super::parser::PHRASE_TABLE;

/// Heuristic gate: line 0 names a known instrument AND some line carries a
/// known order phrase. The two scans run independently; both must pass.
pub fn looks_like_signal(raw: &str) -> bool {
    let lines: Vec<&str> = raw.lines().collect();

    let has_symbol = lines
        .first()
        .and_then(|line| symbol::find_in_line(line))
        .is_some();

    let has_order_phrase = lines.iter().any(|line| {
        let lowered = line.to_lowercase();
        PHRASE_TABLE.iter().any(|(phrase, _)| lowered.contains(phrase))
    });

    trace!(has_symbol, has_order_phrase, "classified inbound message");
    has_symbol && has_order_phrase
}
