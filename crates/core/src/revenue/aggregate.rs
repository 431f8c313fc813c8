//! Monthly, per-client and per-model revenue aggregation.

use std::collections::{BTreeMap, HashMap};

use assessoria_shared::YearMonth;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::family::{extract_code_digits, is_admin_family};
use super::types::{ClientModel, ClientPosition, RevenueRow};

/// Revenue totals for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// Month.
    pub month: YearMonth,
    /// Office commission over every row.
    pub office_total: Decimal,
    /// Advisor net value over non-administrative rows.
    pub advisor_total: Decimal,
    /// Rows counted.
    pub rows: u64,
}

impl MonthlyRevenue {
    fn empty(month: YearMonth) -> Self {
        Self {
            month,
            office_total: Decimal::ZERO,
            advisor_total: Decimal::ZERO,
            rows: 0,
        }
    }

    fn add(&mut self, row: &RevenueRow) {
        self.office_total += row.office_commission;
        if !row.family.as_deref().is_some_and(is_admin_family) {
            self.advisor_total += row.net_value;
        }
        self.rows += 1;
    }
}

/// Twelve months of `year`, zero-filled where there are no rows.
///
/// Rows outside `year` are ignored.
#[must_use]
pub fn monthly_series(rows: &[RevenueRow], year: i32) -> Vec<MonthlyRevenue> {
    let mut series: Vec<MonthlyRevenue> = YearMonth::months_of_year(year)
        .into_iter()
        .map(MonthlyRevenue::empty)
        .collect();

    for row in rows.iter().filter(|r| r.month.year() == year) {
        if let Some(slot) = series.get_mut(row.month.month() as usize - 1) {
            slot.add(row);
        }
    }
    series
}

/// Office commission per canonical client code.
///
/// Rows without digits in their code are grouped under `""`.
#[must_use]
pub fn revenue_by_client(rows: &[RevenueRow]) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();
    for row in rows {
        let code = extract_code_digits(row.client_code.as_deref().unwrap_or_default());
        *totals.entry(code).or_insert(Decimal::ZERO) += row.office_commission;
    }
    totals
}

/// Office and advisor revenue for one model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRevenue {
    /// Office commission.
    pub office: Decimal,
    /// Advisor net value.
    pub advisor: Decimal,
}

/// Revenue per month and client model.
///
/// Client codes map to the client's model through either custody code. Rows
/// whose code matches no client count as `Tradicional`.
#[must_use]
pub fn revenue_by_model(
    rows: &[RevenueRow],
    clients: &[ClientPosition],
) -> BTreeMap<YearMonth, BTreeMap<ClientModel, ModelRevenue>> {
    let mut code_to_model: HashMap<String, ClientModel> = HashMap::new();
    for client in clients {
        for code in [&client.code_xp, &client.code_mb].into_iter().flatten() {
            let digits = extract_code_digits(code);
            if !digits.is_empty() {
                code_to_model.insert(digits, client.model);
            }
        }
    }

    let mut result: BTreeMap<YearMonth, BTreeMap<ClientModel, ModelRevenue>> = BTreeMap::new();
    for row in rows {
        let digits = extract_code_digits(row.client_code.as_deref().unwrap_or_default());
        let model = code_to_model.get(&digits).copied().unwrap_or_default();
        let entry = result
            .entry(row.month)
            .or_default()
            .entry(model)
            .or_default();
        entry.office += row.office_commission;
        entry.advisor += row.net_value;
    }
    result
}
