//! Adoption summary across a book of clients.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{CrossSellProduct, CrossSellStatus, ProductStatus};

/// Counts for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAdoption {
    /// Product.
    pub product: CrossSellProduct,
    /// Display label.
    pub label: String,
    /// Clients with the product booked.
    pub booked: u64,
    /// Clients with the product presented but not booked.
    pub presented: u64,
    /// Clients not yet offered the product.
    pub blank: u64,
    /// Booked share of all clients, in percent (2 dp).
    pub booked_rate: Decimal,
}

/// Adoption summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdoptionSummary {
    /// Clients counted.
    pub total_clients: u64,
    /// Clients with at least one booked product.
    pub clients_with_booking: u64,
    /// Per product breakdown.
    pub products: Vec<ProductAdoption>,
}

impl AdoptionSummary {
    /// Builds the summary from every client's statuses.
    ///
    /// `total_clients` may exceed the record count: clients without a
    /// cross-sell row count as blank everywhere.
    #[must_use]
    pub fn from_records(records: &[CrossSellStatus], total_clients: u64) -> Self {
        let total = total_clients.max(records.len() as u64);

        let products = CrossSellProduct::ALL
            .into_iter()
            .map(|product| {
                let booked = count(records, product, ProductStatus::Booked);
                let presented = count(records, product, ProductStatus::Presented);
                ProductAdoption {
                    product,
                    label: product.label().to_string(),
                    booked,
                    presented,
                    blank: total - booked - presented,
                    booked_rate: percent(booked, total),
                }
            })
            .collect();

        Self {
            total_clients: total,
            clients_with_booking: records.iter().filter(|r| r.any_booked()).count() as u64,
            products,
        }
    }
}

fn count(records: &[CrossSellStatus], product: CrossSellProduct, status: ProductStatus) -> u64 {
    records.iter().filter(|r| r.get(product) == status).count() as u64
}

fn percent(part: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(total)).round_dp(2)
}
