//! Goal error types.

use thiserror::Error;

/// Goal-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalError {
    /// Target cannot be negative.
    #[error("Goal target cannot be negative")]
    NegativeTarget,

    /// Target exceeds the column precision.
    #[error("Goal target is too large")]
    TargetTooLarge,
}
