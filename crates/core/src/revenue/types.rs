//! Revenue data types.

use std::str::FromStr;

use assessoria_shared::{ClientId, YearMonth};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::family::normalize_label;

/// Service model a client is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientModel {
    /// Commission-based brokerage.
    #[default]
    Tradicional,
    /// Asset management.
    Asset,
    /// Fee-based advisory.
    FeeBased,
    /// Fee-based advisory without equities.
    FeeBasedSemRv,
}

impl ClientModel {
    /// Every model, in display order.
    pub const ALL: [Self; 4] = [
        Self::Tradicional,
        Self::Asset,
        Self::FeeBased,
        Self::FeeBasedSemRv,
    ];

    /// Stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tradicional => "TRADICIONAL",
            Self::Asset => "ASSET",
            Self::FeeBased => "FEE_BASED",
            Self::FeeBasedSemRv => "FEE_BASED_SEM_RV",
        }
    }

    /// Parses a stored value leniently. Unknown or blank means `Tradicional`.
    #[must_use]
    pub fn parse_lenient(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for ClientModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_label(s).replace(' ', "_").as_str() {
            "tradicional" => Ok(Self::Tradicional),
            "asset" => Ok(Self::Asset),
            "fee_based" => Ok(Self::FeeBased),
            "fee_based_sem_rv" => Ok(Self::FeeBasedSemRv),
            _ => Err(format!("unknown client model '{s}'")),
        }
    }
}

impl std::fmt::Display for ClientModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client as seen by the revenue and insight calculations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPosition {
    /// Client ID.
    pub id: ClientId,
    /// Client name.
    pub name: String,
    /// Account code at the main custody house.
    pub code_xp: Option<String>,
    /// Account code at the second custody house.
    pub code_mb: Option<String>,
    /// Service model.
    pub model: ClientModel,
    /// Advisor pass-through percentage (e.g. 35 or 50).
    pub pass_through: Decimal,
    /// Total assets under custody.
    pub net_total: Decimal,
}

/// One revenue line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueRow {
    /// Unique, monotonic row ID.
    pub id: i64,
    /// Reference month.
    pub month: YearMonth,
    /// Client account code as imported.
    pub client_code: Option<String>,
    /// Product family.
    pub family: Option<String>,
    /// Commission credited to the office.
    pub office_commission: Decimal,
    /// Net value attributed to the advisor.
    pub net_value: Decimal,
}
