//! Error types for route planning.

use thiserror::Error;

/// Planning error type.
#[derive(Error, Debug)]
pub enum PlanError {
    /// Grid construction failed (empty or mismatched dimensions).
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// Malformed request input (endpoints outside the grid).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The coarse search failed at every margin up to the maximum.
    #[error("no path found at any margin up to {max_margin}")]
    SearchExhausted {
        /// The largest margin that was tried.
        max_margin: i32,
    },

    /// The refinement frontier emptied before reaching the goal.
    #[error("refinement frontier exhausted before reaching the goal")]
    RefinementExhausted,
}

/// Planning result alias.
pub type Result<T> = std::result::Result<T, PlanError>;
