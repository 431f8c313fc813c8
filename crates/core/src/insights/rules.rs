//! Insight rules evaluated per client.

use assessoria_shared::ClientId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::quadrant::{Quadrant, QuadrantThresholds};
use crate::cross_sell::{CrossSellProduct, CrossSellStatus, ProductStatus};
use crate::revenue::ClientModel;

/// Inputs the rules need for one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSnapshot {
    /// Client ID.
    pub client_id: ClientId,
    /// Client name.
    pub name: String,
    /// Service model.
    pub model: ClientModel,
    /// Total NET.
    pub net_total: Decimal,
    /// Year-to-date office revenue.
    pub ytd_revenue: Decimal,
    /// Cross-sell statuses (all blank if the client has no record).
    pub cross_sell: CrossSellStatus,
}

/// Which rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// High NET and nothing offered yet.
    UntappedHighNet,
    /// Products presented but none booked.
    StalledPresentation,
    /// Commission client with high NET and fee-based never offered.
    FeeBasedCandidate,
    /// High NET producing below-median revenue.
    LowRevenueHighNet,
}

/// How urgent an insight is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightSeverity {
    /// Worth a look.
    Low,
    /// Should be acted on this month.
    Medium,
    /// Highest-value opportunity.
    High,
}

/// A fired rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Client the insight is about.
    pub client_id: ClientId,
    /// Rule.
    pub kind: InsightKind,
    /// Urgency.
    pub severity: InsightSeverity,
    /// Human-readable message.
    pub message: String,
    /// Quadrant of the client.
    pub quadrant: Quadrant,
}

/// Evaluates every rule for one client.
#[must_use]
pub fn evaluate(client: &ClientSnapshot, thresholds: &QuadrantThresholds) -> Vec<Insight> {
    let quadrant = thresholds.classify(client.ytd_revenue, client.net_total);
    let high_net = thresholds.is_high_net(client.net_total);
    let make = |kind, severity, message: String| Insight {
        client_id: client.client_id,
        kind,
        severity,
        message,
        quadrant,
    };

    let mut insights = Vec::new();

    if high_net && !client.cross_sell.any_offered() {
        insights.push(make(
            InsightKind::UntappedHighNet,
            InsightSeverity::High,
            format!("{} has above-median NET and no product presented", client.name),
        ));
    }

    if client.cross_sell.presented_without_booking() {
        insights.push(make(
            InsightKind::StalledPresentation,
            InsightSeverity::Medium,
            format!("{} was presented products but booked none", client.name),
        ));
    }

    if client.model == ClientModel::Tradicional
        && high_net
        && client.cross_sell.get(CrossSellProduct::FeeBased) == ProductStatus::Blank
    {
        insights.push(make(
            InsightKind::FeeBasedCandidate,
            InsightSeverity::Medium,
            format!("{} is a fee-based candidate", client.name),
        ));
    }

    if quadrant == Quadrant::Q3 && client.net_total > Decimal::ZERO {
        insights.push(make(
            InsightKind::LowRevenueHighNet,
            InsightSeverity::Low,
            format!("{} produces below-median revenue for its NET", client.name),
        ));
    }

    insights
}

/// Evaluates a whole book, most severe first.
#[must_use]
pub fn evaluate_book(clients: &[ClientSnapshot]) -> (QuadrantThresholds, Vec<Insight>) {
    let pairs: Vec<(Decimal, Decimal)> = clients
        .iter()
        .map(|c| (c.ytd_revenue, c.net_total))
        .collect();
    let thresholds = QuadrantThresholds::from_pairs(&pairs);

    let mut insights: Vec<Insight> = clients
        .iter()
        .flat_map(|c| evaluate(c, &thresholds))
        .collect();
    insights.sort_by(|a, b| b.severity.cmp(&a.severity));

    (thresholds, insights)
}
