//! Revenue aggregation and the advisor revenue formula.

pub mod advisor;
pub mod aggregate;
pub mod family;
pub mod types;

#[cfg(test)]
mod tests;

pub use advisor::{AdvisorRevenue, OFFICE_SHARE, advisor_revenue, weighted_pass_through};
pub use aggregate::{
    ModelRevenue, MonthlyRevenue, monthly_series, revenue_by_client, revenue_by_model,
};
pub use family::{extract_code_digits, is_admin_family, normalize_label};
pub use types::{ClientModel, ClientPosition, RevenueRow};
