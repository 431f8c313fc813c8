//! Helpers for BRL amounts held as `Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to centavos, half away from zero.
#[must_use]
pub fn round_brl(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
