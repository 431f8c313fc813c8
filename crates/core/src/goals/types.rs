//! Goal data types.

use assessoria_shared::{AdvisorId, YearMonth};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::GoalError;

/// Largest target that fits `NUMERIC(14,2)`.
const MAX_TARGET: Decimal = Decimal::from_parts(276_447_231, 23_283, 0, false, 2);

/// Revenue target for one advisor and month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyGoal {
    /// Advisor that owns the goal.
    pub user_id: AdvisorId,
    /// Reference month.
    pub month: YearMonth,
    /// Revenue target in BRL.
    pub target: Decimal,
}

/// Validates a goal target before it is stored.
pub fn validate_target(target: Decimal) -> Result<Decimal, GoalError> {
    if target.is_sign_negative() && !target.is_zero() {
        return Err(GoalError::NegativeTarget);
    }
    if target > MAX_TARGET {
        return Err(GoalError::TargetTooLarge);
    }
    Ok(target.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_max_target_matches_column_precision() {
        assert_eq!(MAX_TARGET, dec!(999999999999.99));
    }

    #[test]
    fn test_validate_target() {
        assert_eq!(validate_target(dec!(50000)).unwrap(), dec!(50000));
        assert_eq!(validate_target(dec!(0)).unwrap(), dec!(0));
        assert_eq!(validate_target(dec!(10.555)).unwrap(), dec!(10.56));
        assert_eq!(validate_target(dec!(-1)), Err(GoalError::NegativeTarget));
        assert_eq!(
            validate_target(dec!(1000000000000)),
            Err(GoalError::TargetTooLarge)
        );
    }
}
