//! Bonus data types.

use std::str::FromStr;

use assessoria_shared::{AdvisorId, YearMonth};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BonusError;

/// Maximum mission name length (matches the column).
pub const MAX_NAME_LEN: usize = 200;

/// Custody house that pays the bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PayoutChannel {
    /// XP Investimentos.
    #[serde(rename = "XP")]
    Xp,
    /// Second custody house.
    #[serde(rename = "MB")]
    Mb,
}

impl PayoutChannel {
    /// Stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Xp => "XP",
            Self::Mb => "MB",
        }
    }
}

impl FromStr for PayoutChannel {
    type Err = BonusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "XP" => Ok(Self::Xp),
            "MB" => Ok(Self::Mb),
            _ => Err(BonusError::InvalidChannel(s.to_string())),
        }
    }
}

impl std::fmt::Display for PayoutChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a bonus amount already excludes the retained share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxTreatment {
    /// Amount is already what the advisor receives.
    Net,
    /// Amount is before retention.
    Gross,
}

impl TaxTreatment {
    /// Maps the stored `liquido_assessor` flag.
    #[must_use]
    pub const fn from_net_flag(is_net: bool) -> Self {
        if is_net { Self::Net } else { Self::Gross }
    }

    /// Stored `liquido_assessor` flag.
    #[must_use]
    pub const fn is_net(self) -> bool {
        matches!(self, Self::Net)
    }
}

/// A bonus mission for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusMission {
    /// Mission ID.
    pub id: i32,
    /// Owning advisor.
    pub user_id: AdvisorId,
    /// Reference month.
    pub month: YearMonth,
    /// Mission name.
    pub name: String,
    /// Bonus amount as informed by the custody house.
    pub amount: Decimal,
    /// Paying custody house.
    pub channel: PayoutChannel,
    /// Net or gross amount.
    pub tax_treatment: TaxTreatment,
    /// Inactive missions are kept but not paid.
    pub active: bool,
}

/// Input for creating a mission.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMissionInput {
    /// Reference month.
    pub month: YearMonth,
    /// Mission name.
    pub name: String,
    /// Bonus amount.
    pub amount: Decimal,
    /// Paying custody house.
    pub channel: PayoutChannel,
    /// True if the amount is already net.
    #[serde(default)]
    pub is_net: bool,
    /// Defaults to active.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CreateMissionInput {
    /// Validates and normalizes the input.
    pub fn validate(mut self) -> Result<Self, BonusError> {
        self.name = validate_name(&self.name)?;
        self.amount = validate_amount(self.amount)?;
        Ok(self)
    }
}

/// Partial update of a mission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMissionInput {
    /// New name.
    pub name: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New channel.
    pub channel: Option<PayoutChannel>,
    /// New net flag.
    pub is_net: Option<bool>,
    /// New active flag.
    pub active: Option<bool>,
}

impl UpdateMissionInput {
    /// Validates and normalizes the provided fields.
    pub fn validate(mut self) -> Result<Self, BonusError> {
        if let Some(name) = &self.name {
            self.name = Some(validate_name(name)?);
        }
        if let Some(amount) = self.amount {
            self.amount = Some(validate_amount(amount)?);
        }
        Ok(self)
    }

    /// True if nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.channel.is_none()
            && self.is_net.is_none()
            && self.active.is_none()
    }
}

fn validate_name(name: &str) -> Result<String, BonusError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BonusError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(BonusError::NameTooLong(MAX_NAME_LEN));
    }
    Ok(name.to_string())
}

fn validate_amount(amount: Decimal) -> Result<Decimal, BonusError> {
    if amount < Decimal::ZERO {
        return Err(BonusError::NegativeAmount);
    }
    Ok(amount.round_dp(2))
}
