//! Health report over the last 24 hours of alerts.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::alert::{Alert, AlertLog, COMPONENT_REVENUE_CHECK, Severity};

/// Errors tolerated in 24h before the status is degraded.
const DEGRADED_ERROR_THRESHOLD: usize = 5;
/// Alerts in 24h considered a high volume.
const HIGH_VOLUME_THRESHOLD: usize = 20;

/// Overall health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    /// No errors.
    Healthy,
    /// A few errors.
    Warning,
    /// More than five errors.
    Degraded,
    /// At least one critical alert.
    Critical,
}

/// Health summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    /// When the report was built.
    pub timestamp: DateTime<Utc>,
    /// Overall status.
    pub status: HealthStatus,
    /// Whether the background monitor is running.
    pub monitoring_active: bool,
    /// Alerts ever raised.
    pub total_alerts: u64,
    /// Alerts in the last 24h.
    pub alerts_24h: usize,
    /// Count per severity in the last 24h.
    pub severity_breakdown: BTreeMap<Severity, usize>,
    /// Count per component in the last 24h.
    pub component_breakdown: BTreeMap<String, usize>,
    /// Suggested actions.
    pub recommendations: Vec<String>,
}

impl HealthReport {
    /// Builds the report as of `now`.
    #[must_use]
    pub fn build(log: &AlertLog, now: DateTime<Utc>, monitoring_active: bool) -> Self {
        let recent: Vec<&Alert> = log.since(now - Duration::hours(24)).collect();

        let mut severity_breakdown = BTreeMap::new();
        let mut component_breakdown = BTreeMap::new();
        for alert in &recent {
            *severity_breakdown.entry(alert.severity).or_insert(0) += 1;
            *component_breakdown.entry(alert.component.clone()).or_insert(0) += 1;
        }

        let critical = severity_breakdown.get(&Severity::Critical).copied().unwrap_or(0);
        let errors = severity_breakdown.get(&Severity::Error).copied().unwrap_or(0);
        let status = if critical > 0 {
            HealthStatus::Critical
        } else if errors > DEGRADED_ERROR_THRESHOLD {
            HealthStatus::Degraded
        } else if errors > 0 {
            HealthStatus::Warning
        } else {
            HealthStatus::Healthy
        };

        Self {
            timestamp: now,
            status,
            monitoring_active,
            total_alerts: log.total(),
            alerts_24h: recent.len(),
            severity_breakdown,
            component_breakdown,
            recommendations: recommendations(&recent),
        }
    }
}

fn recommendations(recent: &[&Alert]) -> Vec<String> {
    let mut out = Vec::new();

    if recent
        .iter()
        .any(|a| a.component == COMPONENT_REVENUE_CHECK && a.severity >= Severity::Error)
    {
        out.push("Revenue totals disagree between retrieval methods: review pagination".to_string());
    }
    if recent.len() > HIGH_VOLUME_THRESHOLD {
        out.push("High alert volume: investigate the root cause".to_string());
    }
    if out.is_empty() {
        out.push("System operating normally".to_string());
    }
    out
}
