//! Cross-sell error types.

use thiserror::Error;

/// Cross-sell related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrossSellError {
    /// Field value outside `"" | "Presented" | "Booked"`.
    #[error("Invalid status '{value}' for {product}: expected '', 'Presented' or 'Booked'")]
    InvalidStatus {
        /// Product column name.
        product: String,
        /// Rejected value.
        value: String,
    },

    /// Field name is not one of the tracked products.
    #[error("Unknown cross-sell product: {0}")]
    UnknownProduct(String),
}
