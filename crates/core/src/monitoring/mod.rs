//! Alerts raised by reconciliation checks and the health report over them.

pub mod alert;
pub mod health;

pub use alert::{Alert, AlertLog, COMPONENT_MONITOR, COMPONENT_REVENUE_CHECK, Severity};
pub use health::{HealthReport, HealthStatus};
