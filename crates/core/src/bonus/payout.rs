//! Payable amount calculations.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{BonusMission, PayoutChannel, TaxTreatment};

/// Share of a gross bonus that reaches the advisor.
pub const RETENTION_FACTOR: Decimal = Decimal::from_parts(8, 0, 0, false, 1);

/// Amount the advisor receives for one bonus.
///
/// Not rounded; totals keep every decimal place of the stored amount.
#[must_use]
pub fn payable_amount(amount: Decimal, treatment: TaxTreatment) -> Decimal {
    match treatment {
        TaxTreatment::Net => amount,
        TaxTreatment::Gross => amount * RETENTION_FACTOR,
    }
}

/// Sum of payable amounts over active missions.
#[must_use]
pub fn monthly_payable_total(missions: &[BonusMission]) -> Decimal {
    missions
        .iter()
        .filter(|m| m.active)
        .map(|m| payable_amount(m.amount, m.tax_treatment))
        .sum()
}

/// Monthly bonus totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusSummary {
    /// Missions counted (active only).
    pub active_missions: usize,
    /// Inactive missions ignored.
    pub inactive_missions: usize,
    /// Sum of informed amounts of active missions.
    pub informed_total: Decimal,
    /// Sum of payable amounts of active missions.
    pub payable_total: Decimal,
    /// Payable total per channel.
    pub payable_by_channel: BTreeMap<PayoutChannel, Decimal>,
}

impl BonusSummary {
    /// Summarizes a month of missions.
    #[must_use]
    pub fn from_missions(missions: &[BonusMission]) -> Self {
        let mut payable_by_channel = BTreeMap::new();
        let mut informed_total = Decimal::ZERO;

        for mission in missions.iter().filter(|m| m.active) {
            informed_total += mission.amount;
            *payable_by_channel
                .entry(mission.channel)
                .or_insert(Decimal::ZERO) += payable_amount(mission.amount, mission.tax_treatment);
        }

        let active_missions = missions.iter().filter(|m| m.active).count();
        Self {
            active_missions,
            inactive_missions: missions.len() - active_missions,
            informed_total,
            payable_total: monthly_payable_total(missions),
            payable_by_channel,
        }
    }
}
