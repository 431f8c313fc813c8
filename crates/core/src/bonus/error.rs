//! Bonus error types.

use thiserror::Error;

/// Bonus-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BonusError {
    /// Mission name is blank.
    #[error("Mission name is required")]
    EmptyName,

    /// Mission name exceeds the column length.
    #[error("Mission name must be at most {0} characters")]
    NameTooLong(usize),

    /// Amount cannot be negative.
    #[error("Bonus amount cannot be negative")]
    NegativeAmount,

    /// Payout channel is not one of the custody houses.
    #[error("Invalid payout channel '{0}': expected 'XP' or 'MB'")]
    InvalidChannel(String),
}
