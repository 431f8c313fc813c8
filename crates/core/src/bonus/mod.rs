//! Bonus missions and their payable amounts.

pub mod error;
pub mod payout;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::BonusError;
pub use payout::{BonusSummary, RETENTION_FACTOR, monthly_payable_total, payable_amount};
pub use types::{BonusMission, CreateMissionInput, PayoutChannel, TaxTreatment, UpdateMissionInput};
