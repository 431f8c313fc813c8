//! Background reconciliation monitor.
//!
//! Every round checks the current and the previous month of each
//! configured advisor, outside any caller's session, and files one alert
//! per check. Critical alerts are also logged for the on-call operator.
//! Nothing is repaired automatically.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use assessoria_core::monitoring::{Alert, AlertLog, COMPONENT_MONITOR, Severity};
use assessoria_core::reconciliation::PaginationOptions;
use assessoria_db::{RevenueRepository, RlsConnection};
use assessoria_shared::config::MonitorConfig;
use assessoria_shared::{AdvisorId, AppResult, YearMonth};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::AppState;

/// Appends `alert` to the log, logging critical ones for paging.
pub async fn record_alert(log: &RwLock<AlertLog>, alert: Alert) {
    match alert.severity {
        Severity::Critical => tracing::error!(
            page_operator = true,
            component = %alert.component,
            user_id = ?alert.user_id,
            details = %alert.details,
            "{}", alert.message
        ),
        Severity::Error => tracing::error!(
            component = %alert.component,
            user_id = ?alert.user_id,
            "{}", alert.message
        ),
        Severity::Warning => tracing::warn!(component = %alert.component, "{}", alert.message),
        Severity::Info => tracing::info!(component = %alert.component, "{}", alert.message),
    }
    log.write().await.push(alert);
}

/// Periodic revenue checks for a fixed set of advisors.
pub struct ReconciliationMonitor {
    db: Arc<DatabaseConnection>,
    alerts: Arc<RwLock<AlertLog>>,
    active: Arc<AtomicBool>,
    advisors: Vec<AdvisorId>,
    interval: Duration,
    tolerance: Decimal,
    options: PaginationOptions,
}

impl ReconciliationMonitor {
    /// Creates a monitor sharing the state's pool and alert log.
    #[must_use]
    pub fn new(state: &AppState, config: &MonitorConfig) -> Self {
        Self {
            db: Arc::clone(&state.db),
            alerts: Arc::clone(&state.alerts),
            active: Arc::clone(&state.monitoring_active),
            advisors: config
                .advisor_ids
                .iter()
                .copied()
                .map(AdvisorId::from_uuid)
                .collect(),
            interval: Duration::from_secs(config.interval_minutes.max(1) * 60),
            tolerance: state.reconciliation.tolerance,
            options: state.pagination(),
        }
    }

    /// Months checked in a round started at `today`.
    #[must_use]
    pub fn months_to_check(today: YearMonth) -> [YearMonth; 2] {
        [today, today.previous()]
    }

    /// Runs rounds until `shutdown` flips to `true` or its sender is dropped.
    pub fn spawn(self, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.active.store(true, Ordering::Relaxed);
            tracing::info!(
                advisors = self.advisors.len(),
                interval_secs = self.interval.as_secs(),
                "reconciliation monitor started"
            );
            record_alert(
                &self.alerts,
                Alert::new(Severity::Info, COMPONENT_MONITOR, "Monitoring started"),
            )
            .await;

            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.run_once().await;
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }

            self.active.store(false, Ordering::Relaxed);
            record_alert(
                &self.alerts,
                Alert::new(Severity::Info, COMPONENT_MONITOR, "Monitoring stopped"),
            )
            .await;
            tracing::info!("reconciliation monitor stopped");
        })
    }

    /// Checks every advisor once and returns the alerts raised.
    pub async fn run_once(&self) -> Vec<Alert> {
        let today = YearMonth::from_date(Utc::now().date_naive());
        let mut raised = Vec::new();

        for &advisor in &self.advisors {
            for month in Self::months_to_check(today) {
                let alert = match self.check(advisor, month).await {
                    Ok(report) => Alert::from_report(advisor, &report),
                    Err(err) => Alert::check_failed(advisor, &month.to_string(), &err.to_string()),
                };
                record_alert(&self.alerts, alert.clone()).await;
                raised.push(alert);
            }
        }

        tracing::debug!(alerts = raised.len(), "monitor round finished");
        raised
    }

    async fn check(
        &self,
        advisor: AdvisorId,
        month: YearMonth,
    ) -> AppResult<assessoria_core::reconciliation::ReconciliationReport> {
        let rls = RlsConnection::service(&self.db)
            .await
            .map_err(assessoria_db::db_error)?;
        let report = RevenueRepository::new(rls.transaction())
            .reconcile_month(advisor, month, None, self.tolerance, self.options)
            .await;
        rls.rollback().await.map_err(assessoria_db::db_error)?;
        report
    }
}
