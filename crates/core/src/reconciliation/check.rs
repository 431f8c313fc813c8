//! Comparison of the paginated accumulation against a direct aggregate.

use assessoria_shared::YearMonth;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Outcome of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    /// Every comparison matched.
    Pass,
    /// At least one comparison differed by the tolerance or more.
    Fail,
}

/// Total and row count produced by one retrieval method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MethodTotals {
    /// Summed amount.
    pub total: Decimal,
    /// Rows summed.
    pub records: u64,
}

/// Result of comparing both methods (and optionally a known figure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// Month checked, when the check is monthly.
    pub month: Option<YearMonth>,
    /// Unpaginated aggregate.
    pub direct_total: Decimal,
    /// Paginated accumulation.
    pub paginated_total: Decimal,
    /// Rows seen by the aggregate.
    pub direct_records: u64,
    /// Rows seen by pagination.
    pub paginated_records: u64,
    /// `|direct - paginated|`.
    pub method_difference: Decimal,
    /// `difference < tolerance`.
    pub methods_match: bool,
    /// Both methods saw the same number of rows.
    pub records_match: bool,
    /// Known correct figure, if given.
    pub expected_total: Option<Decimal>,
    /// `|direct - expected|`, zero if no expected figure.
    pub expected_difference: Decimal,
    /// `expected_difference < tolerance`, true if no expected figure.
    pub expected_match: bool,
    /// Tolerance used.
    pub tolerance: Decimal,
    /// Overall outcome.
    pub status: CheckStatus,
}

impl ReconciliationReport {
    /// True if the check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

/// Cross-check between retrieval methods.
#[derive(Debug, Clone, Copy)]
pub struct ReconciliationCheck;

impl ReconciliationCheck {
    /// Evaluates both totals against each other and against `expected`.
    ///
    /// A comparison matches when the absolute difference is strictly below
    /// `tolerance`. Row counts must also agree so that an omission and a
    /// duplicate of the same amount cannot cancel out.
    #[must_use]
    pub fn evaluate(
        direct: MethodTotals,
        paginated: MethodTotals,
        expected: Option<Decimal>,
        tolerance: Decimal,
    ) -> ReconciliationReport {
        let method_difference = (direct.total - paginated.total).abs();
        let methods_match = method_difference < tolerance;
        let records_match = direct.records == paginated.records;

        let expected_difference = expected.map_or(Decimal::ZERO, |e| (direct.total - e).abs());
        let expected_match = expected.is_none() || expected_difference < tolerance;

        let status = if methods_match && records_match && expected_match {
            CheckStatus::Pass
        } else {
            CheckStatus::Fail
        };

        ReconciliationReport {
            month: None,
            direct_total: direct.total,
            paginated_total: paginated.total,
            direct_records: direct.records,
            paginated_records: paginated.records,
            method_difference,
            methods_match,
            records_match,
            expected_total: expected,
            expected_difference,
            expected_match,
            tolerance,
            status,
        }
    }

    /// Same as `evaluate`, tagged with the month checked.
    #[must_use]
    pub fn evaluate_month(
        month: YearMonth,
        direct: MethodTotals,
        paginated: MethodTotals,
        expected: Option<Decimal>,
        tolerance: Decimal,
    ) -> ReconciliationReport {
        ReconciliationReport {
            month: Some(month),
            ..Self::evaluate(direct, paginated, expected, tolerance)
        }
    }
}

/// Counts over a year of monthly checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    /// Months that passed.
    pub passed: u32,
    /// Months that failed.
    pub failed: u32,
    /// Months whose check could not run.
    pub errors: u32,
}

impl YearSummary {
    /// Tallies monthly outcomes. `None` means the check could not run.
    #[must_use]
    pub fn tally<'a, I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a ReconciliationReport>>,
    {
        outcomes
            .into_iter()
            .fold(Self::default(), |mut acc, outcome| {
                match outcome {
                    Some(r) if r.passed() => acc.passed += 1,
                    Some(_) => acc.failed += 1,
                    None => acc.errors += 1,
                }
                acc
            })
    }
}
