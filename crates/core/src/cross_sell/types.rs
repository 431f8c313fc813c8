//! Cross-sell data types.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CrossSellError;

/// A product tracked for cross-sell. Each maps to one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossSellProduct {
    /// Fee-based advisory.
    FeeBased,
    /// Financial planning.
    FinancialPlanning,
    /// Account at the second custody house.
    Mb,
    /// Offshore investments.
    Offshore,
    /// Structured products.
    ProdutoEstruturado,
    /// Asset management.
    Asset,
    /// Life insurance.
    SeguroVida,
    /// Consortium.
    Consorcio,
    /// Wealth services.
    Wealth,
}

impl CrossSellProduct {
    /// Every product, in column order.
    pub const ALL: [Self; 9] = [
        Self::FeeBased,
        Self::FinancialPlanning,
        Self::Mb,
        Self::Offshore,
        Self::ProdutoEstruturado,
        Self::Asset,
        Self::SeguroVida,
        Self::Consorcio,
        Self::Wealth,
    ];

    /// Database column name.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::FeeBased => "fee_based",
            Self::FinancialPlanning => "financial_planning",
            Self::Mb => "mb",
            Self::Offshore => "offshore",
            Self::ProdutoEstruturado => "produto_estruturado",
            Self::Asset => "asset",
            Self::SeguroVida => "seguro_vida",
            Self::Consorcio => "consorcio",
            Self::Wealth => "wealth",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FeeBased => "Fee Based",
            Self::FinancialPlanning => "Financial Planning",
            Self::Mb => "MB",
            Self::Offshore => "Offshore",
            Self::ProdutoEstruturado => "Produto Estruturado",
            Self::Asset => "Asset",
            Self::SeguroVida => "Seguro de Vida",
            Self::Consorcio => "Consórcio",
            Self::Wealth => "Wealth",
        }
    }

    /// Looks up a product by column name.
    #[must_use]
    pub fn from_column(column: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.column() == column)
    }
}

impl std::fmt::Display for CrossSellProduct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// Adoption status of one product for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProductStatus {
    /// Not yet offered.
    #[default]
    Blank,
    /// Offered to the client.
    Presented,
    /// Bought by the client.
    Booked,
}

impl ProductStatus {
    /// Stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blank => "",
            Self::Presented => "Presented",
            Self::Booked => "Booked",
        }
    }

    /// Parses a stored value for `product`, naming the product on failure.
    pub fn parse_for(product: CrossSellProduct, value: &str) -> Result<Self, CrossSellError> {
        value.parse().map_err(|_| CrossSellError::InvalidStatus {
            product: product.column().to_string(),
            value: value.to_string(),
        })
    }
}

/// Accepts `""`, `Presented` and `Booked`, case-sensitive, after stripping
/// surrounding whitespace.
impl FromStr for ProductStatus {
    type Err = CrossSellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Self::Blank),
            "Presented" => Ok(Self::Presented),
            "Booked" => Ok(Self::Booked),
            other => Err(CrossSellError::InvalidStatus {
                product: String::new(),
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ProductStatus {
    type Error = CrossSellError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ProductStatus> for String {
    fn from(value: ProductStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Statuses of every product for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CrossSellStatus {
    /// Fee-based advisory.
    #[serde(default)]
    pub fee_based: ProductStatus,
    /// Financial planning.
    #[serde(default)]
    pub financial_planning: ProductStatus,
    /// Second custody house.
    #[serde(default)]
    pub mb: ProductStatus,
    /// Offshore.
    #[serde(default)]
    pub offshore: ProductStatus,
    /// Structured products.
    #[serde(default)]
    pub produto_estruturado: ProductStatus,
    /// Asset management.
    #[serde(default)]
    pub asset: ProductStatus,
    /// Life insurance.
    #[serde(default)]
    pub seguro_vida: ProductStatus,
    /// Consortium.
    #[serde(default)]
    pub consorcio: ProductStatus,
    /// Wealth.
    #[serde(default)]
    pub wealth: ProductStatus,
}

impl CrossSellStatus {
    /// Status of `product`.
    #[must_use]
    pub const fn get(&self, product: CrossSellProduct) -> ProductStatus {
        match product {
            CrossSellProduct::FeeBased => self.fee_based,
            CrossSellProduct::FinancialPlanning => self.financial_planning,
            CrossSellProduct::Mb => self.mb,
            CrossSellProduct::Offshore => self.offshore,
            CrossSellProduct::ProdutoEstruturado => self.produto_estruturado,
            CrossSellProduct::Asset => self.asset,
            CrossSellProduct::SeguroVida => self.seguro_vida,
            CrossSellProduct::Consorcio => self.consorcio,
            CrossSellProduct::Wealth => self.wealth,
        }
    }

    /// Sets the status of `product`.
    pub fn set(&mut self, product: CrossSellProduct, status: ProductStatus) {
        let slot = match product {
            CrossSellProduct::FeeBased => &mut self.fee_based,
            CrossSellProduct::FinancialPlanning => &mut self.financial_planning,
            CrossSellProduct::Mb => &mut self.mb,
            CrossSellProduct::Offshore => &mut self.offshore,
            CrossSellProduct::ProdutoEstruturado => &mut self.produto_estruturado,
            CrossSellProduct::Asset => &mut self.asset,
            CrossSellProduct::SeguroVida => &mut self.seguro_vida,
            CrossSellProduct::Consorcio => &mut self.consorcio,
            CrossSellProduct::Wealth => &mut self.wealth,
        };
        *slot = status;
    }

    /// Applies a partial `column -> value` map.
    ///
    /// Every entry is validated first. On error nothing is changed.
    pub fn apply_updates(
        &mut self,
        updates: &BTreeMap<String, String>,
    ) -> Result<(), CrossSellError> {
        let parsed = updates
            .iter()
            .map(|(column, value)| {
                let product = CrossSellProduct::from_column(column)
                    .ok_or_else(|| CrossSellError::UnknownProduct(column.clone()))?;
                Ok((product, ProductStatus::parse_for(product, value)?))
            })
            .collect::<Result<Vec<_>, CrossSellError>>()?;

        for (product, status) in parsed {
            self.set(product, status);
        }
        Ok(())
    }

    /// Iterates `(product, status)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (CrossSellProduct, ProductStatus)> + '_ {
        CrossSellProduct::ALL.into_iter().map(|p| (p, self.get(p)))
    }

    /// True if any product was presented or booked.
    #[must_use]
    pub fn any_offered(&self) -> bool {
        self.iter().any(|(_, s)| s != ProductStatus::Blank)
    }

    /// True if any product was booked.
    #[must_use]
    pub fn any_booked(&self) -> bool {
        self.iter().any(|(_, s)| s == ProductStatus::Booked)
    }

    /// True if at least one product is presented and none is booked.
    #[must_use]
    pub fn presented_without_booking(&self) -> bool {
        !self.any_booked() && self.iter().any(|(_, s)| s == ProductStatus::Presented)
    }
}
