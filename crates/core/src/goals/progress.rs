//! Progress of achieved revenue against a monthly goal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Progress classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Target reached.
    Achieved,
    /// Ahead of or at linear pace for the elapsed days.
    OnTrack,
    /// Below linear pace.
    Behind,
}

/// Achieved revenue versus the month's target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Target.
    pub target: Decimal,
    /// Revenue achieved so far.
    pub achieved: Decimal,
    /// Amount still missing (never negative).
    pub remaining: Decimal,
    /// Achieved share of the target, in percent (2 dp).
    pub percent_achieved: Decimal,
    /// Classification against linear pacing.
    pub status: GoalStatus,
}

impl GoalProgress {
    /// Computes progress for a finished month.
    #[must_use]
    pub fn compute(target: Decimal, achieved: Decimal) -> Self {
        Self::compute_at(target, achieved, 1, 1)
    }

    /// Computes progress `day` days into a month of `days_in_month` days.
    ///
    /// The expected amount by `day` is `target * day / days_in_month`. A zero
    /// target counts as achieved.
    #[must_use]
    pub fn compute_at(target: Decimal, achieved: Decimal, day: u32, days_in_month: u32) -> Self {
        let remaining = (target - achieved).max(Decimal::ZERO);
        let percent_achieved = if target.is_zero() {
            Decimal::ZERO
        } else {
            (achieved * Decimal::ONE_HUNDRED / target).round_dp(2)
        };

        let days = days_in_month.max(1);
        let day = day.clamp(1, days);
        let expected = target * Decimal::from(day) / Decimal::from(days);

        let status = if achieved >= target {
            GoalStatus::Achieved
        } else if achieved >= expected {
            GoalStatus::OnTrack
        } else {
            GoalStatus::Behind
        };

        Self {
            target,
            achieved,
            remaining,
            percent_achieved,
            status,
        }
    }
}
