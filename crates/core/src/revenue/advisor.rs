//! Advisor revenue from office revenue and the client book.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use assessoria_shared::types::money::round_brl;

use super::types::ClientPosition;

/// Share of office revenue distributed to advisors.
pub const OFFICE_SHARE: Decimal = Decimal::from_parts(80, 0, 0, false, 2);

/// Breakdown of an advisor's monthly revenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorRevenue {
    /// Office revenue the formula starts from.
    pub office_revenue: Decimal,
    /// NET-weighted pass-through as a fraction, if any client has NET > 0.
    pub weighted_pass_through: Option<Decimal>,
    /// `office_revenue * OFFICE_SHARE * weighted_pass_through`.
    pub from_office: Decimal,
    /// Payable bonus of active missions, zero when `from_office` is.
    pub bonus: Decimal,
    /// `from_office + bonus`.
    pub total: Decimal,
}

/// `Σ(net · pass_through / 100) / Σ(net)` over clients with NET > 0.
#[must_use]
pub fn weighted_pass_through(clients: &[ClientPosition]) -> Option<Decimal> {
    let (weighted, total) = clients
        .iter()
        .filter(|c| c.net_total > Decimal::ZERO)
        .fold((Decimal::ZERO, Decimal::ZERO), |(w, t), c| {
            (
                w + c.net_total * c.pass_through / Decimal::ONE_HUNDRED,
                t + c.net_total,
            )
        });

    if total.is_zero() {
        None
    } else {
        Some(weighted / total)
    }
}

/// Computes advisor revenue.
///
/// Everything is zero, bonus included, when office revenue is not positive
/// or the weighted pass-through is missing or zero. Otherwise the bonus is
/// added to the office part.
#[must_use]
pub fn advisor_revenue(
    office_revenue: Decimal,
    clients: &[ClientPosition],
    bonus: Decimal,
) -> AdvisorRevenue {
    let weighted = weighted_pass_through(clients);
    let (from_office, bonus) = match weighted {
        Some(w) if office_revenue > Decimal::ZERO && w > Decimal::ZERO => {
            (round_brl(office_revenue * OFFICE_SHARE * w), bonus)
        }
        _ => (Decimal::ZERO, Decimal::ZERO),
    };

    AdvisorRevenue {
        office_revenue,
        weighted_pass_through: weighted,
        from_office,
        bonus,
        total: from_office + bonus,
    }
}
