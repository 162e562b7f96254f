//! History gate: classifies a submitted `history_position` against the
//! highest persisted position for the match.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDecision {
    /// Submitted position is exactly `expected`; resolve it.
    Next,
    /// Submitted position is below `expected`; already resolved.
    Duplicate,
    /// Submitted position is above `expected`; client must resend from here.
    Resend { start: u32 },
}

/// `highest` is the highest persisted `history_position` for the match, or
/// `None` if no steps have been persisted yet (expected becomes 0).
pub fn classify(highest: Option<u32>, submitted: u32) -> HistoryDecision {
    let expected = highest.map_or(0, |h| h + 1);
    let decision = if submitted == expected {
        HistoryDecision::Next
    } else if submitted < expected {
        HistoryDecision::Duplicate
    } else {
        HistoryDecision::Resend { start: expected }
    };
    tracing::debug!(submitted, expected, ?decision, "history gate");
    decision
}
