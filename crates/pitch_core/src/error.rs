//! Error types for the match simulation core.
//!
//! `MatchError` covers the error-kind table below: `StoreFailure` and
//! `ProgrammerError` abort resolution before any mutation and propagate as
//! `Err`; `AuthorityMismatch`, `HistoryDuplicate`, and `HistoryGap` are
//! classified by `authority`/`history` before the resolver ever runs, so
//! `api::submit_step` turns them into a structured `StepResponse` rather
//! than propagating them. Dice-driven action failures are not errors at
//! all — they are `success: false` results embedded in a step's `result`
//! payload.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("submitter is not authorised to act for the current side")]
    AuthorityMismatch,

    #[error("step at this history position has already been resolved")]
    HistoryDuplicate,

    #[error("missing history: expected next position {start}")]
    HistoryGap { start: u32 },

    #[error("step preconditions not satisfied: {0}")]
    InvalidStep(String),

    #[error("store operation failed: {0}")]
    StoreFailure(String),

    #[error("internal invariant violated: {0}")]
    ProgrammerError(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MatchError>;
