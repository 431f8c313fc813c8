//! Alert types and the in-memory alert log.

use std::collections::VecDeque;

use assessoria_shared::AdvisorId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reconciliation::ReconciliationReport;

/// Component name for revenue reconciliation checks.
pub const COMPONENT_REVENUE_CHECK: &str = "revenue_check";
/// Component name for the monitor loop itself.
pub const COMPONENT_MONITOR: &str = "monitor";

/// Alert severity, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Routine event.
    Info,
    /// Needs attention eventually.
    Warning,
    /// A check failed.
    Error,
    /// A check could not run or data was cut short. Page an operator.
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        })
    }
}

/// An alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// When the alert was raised.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub severity: Severity,
    /// Raising component.
    pub component: String,
    /// Human-readable message.
    pub message: String,
    /// Structured details.
    pub details: serde_json::Value,
    /// Advisor concerned, if any.
    pub user_id: Option<AdvisorId>,
}

impl Alert {
    /// Creates an alert stamped with the current time.
    #[must_use]
    pub fn new(severity: Severity, component: &str, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            component: component.to_string(),
            message: message.into(),
            details: serde_json::Value::Null,
            user_id: None,
        }
    }

    /// Attaches structured details.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Attaches the advisor concerned.
    #[must_use]
    pub const fn for_user(mut self, user_id: AdvisorId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Alert for a completed reconciliation: `Info` on pass, `Error` on fail.
    #[must_use]
    pub fn from_report(user_id: AdvisorId, report: &ReconciliationReport) -> Self {
        let month = report
            .month
            .map_or_else(|| "period".to_string(), |m| m.to_string());
        let (severity, message) = if report.passed() {
            (Severity::Info, format!("Revenue consistent for {month}"))
        } else {
            (Severity::Error, format!("Revenue inconsistency detected in {month}"))
        };

        Self::new(severity, COMPONENT_REVENUE_CHECK, message)
            .for_user(user_id)
            .with_details(serde_json::json!({
                "month": month,
                "direct_total": report.direct_total,
                "paginated_total": report.paginated_total,
                "difference": report.method_difference,
                "direct_records": report.direct_records,
                "paginated_records": report.paginated_records,
            }))
    }

    /// Alert for a check that could not complete.
    #[must_use]
    pub fn check_failed(user_id: AdvisorId, month: &str, error: &str) -> Self {
        Self::new(
            Severity::Critical,
            COMPONENT_REVENUE_CHECK,
            format!("Could not check revenue for {month}: {error}"),
        )
        .for_user(user_id)
        .with_details(serde_json::json!({ "month": month, "error": error }))
    }
}

/// Bounded, in-memory alert history.
#[derive(Debug, Clone)]
pub struct AlertLog {
    alerts: VecDeque<Alert>,
    capacity: usize,
    total: u64,
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::with_capacity(1000)
    }
}

impl AlertLog {
    /// Keeps at most `capacity` alerts, dropping the oldest.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            alerts: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            total: 0,
        }
    }

    /// Appends an alert.
    pub fn push(&mut self, alert: Alert) {
        if self.alerts.len() == self.capacity {
            self.alerts.pop_front();
        }
        self.alerts.push_back(alert);
        self.total += 1;
    }

    /// Alerts ever pushed, including dropped ones.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Alerts currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// True if no alert is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    /// Newest-first alerts matching the filters, at most `limit`.
    #[must_use]
    pub fn query(
        &self,
        severity: Option<Severity>,
        component: Option<&str>,
        limit: usize,
    ) -> Vec<Alert> {
        self.alerts
            .iter()
            .rev()
            .filter(|a| severity.is_none_or(|s| a.severity == s))
            .filter(|a| component.is_none_or(|c| a.component == c))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Alerts raised at or after `since`.
    pub fn since(&self, since: DateTime<Utc>) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(move |a| a.timestamp >= since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciliation::{MethodTotals, ReconciliationCheck};
    use assessoria_shared::YearMonth;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_query_filters_newest_first() {
        let mut log = AlertLog::default();
        log.push(Alert::new(Severity::Info, COMPONENT_MONITOR, "one"));
        log.push(Alert::new(Severity::Error, COMPONENT_REVENUE_CHECK, "two"));
        log.push(Alert::new(Severity::Error, COMPONENT_REVENUE_CHECK, "three"));

        let errors = log.query(Some(Severity::Error), None, 10);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "three");

        let monitor = log.query(None, Some(COMPONENT_MONITOR), 10);
        assert_eq!(monitor.len(), 1);

        assert_eq!(log.query(None, None, 1).len(), 1);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut log = AlertLog::with_capacity(2);
        for i in 0..3 {
            log.push(Alert::new(Severity::Info, COMPONENT_MONITOR, format!("{i}")));
        }
        assert_eq!(log.len(), 2);
        assert_eq!(log.total(), 3);
        assert_eq!(log.query(None, None, 10)[1].message, "1");
    }

    #[test]
    fn test_from_report_classification() {
        let user = AdvisorId::new();
        let month = YearMonth::new(2025, 2).unwrap();
        let good = MethodTotals {
            total: dec!(32881.30),
            records: 598,
        };
        let short = MethodTotals {
            total: dec!(30000),
            records: 500,
        };

        let pass = ReconciliationCheck::evaluate_month(month, good, good, None, Decimal::ONE);
        let fail = ReconciliationCheck::evaluate_month(month, good, short, None, Decimal::ONE);

        let info = Alert::from_report(user, &pass);
        assert_eq!(info.severity, Severity::Info);
        assert_eq!(info.user_id, Some(user));

        let error = Alert::from_report(user, &fail);
        assert_eq!(error.severity, Severity::Error);
        assert_eq!(error.details["month"], "2025-02");

        let critical = Alert::check_failed(user, "2025-02", "timeout");
        assert_eq!(critical.severity, Severity::Critical);
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical > Severity::Error);
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }
}
