//! Revenue vs. NET quadrant classification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position of a client relative to the book medians.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Revenue and NET at or above median.
    Q1,
    /// Revenue at or above median, NET below.
    Q2,
    /// Revenue below median, NET at or above.
    Q3,
    /// Both below median.
    Q4,
}

/// Median of a sample. Even-sized samples average the two middle values.
#[must_use]
pub fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / Decimal::TWO)
    } else {
        Some(sorted[mid])
    }
}

/// Median revenue and NET of a book, over positive values only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadrantThresholds {
    /// Median YTD revenue.
    pub revenue: Decimal,
    /// Median NET.
    pub net: Decimal,
}

impl QuadrantThresholds {
    /// Computes thresholds from `(revenue, net)` pairs.
    ///
    /// A dimension without positive values has a zero threshold.
    #[must_use]
    pub fn from_pairs(pairs: &[(Decimal, Decimal)]) -> Self {
        let positive = |f: fn(&(Decimal, Decimal)) -> Decimal| -> Vec<Decimal> {
            pairs
                .iter()
                .map(f)
                .filter(|v| *v > Decimal::ZERO)
                .collect()
        };
        Self {
            revenue: median(&positive(|p| p.0)).unwrap_or_default(),
            net: median(&positive(|p| p.1)).unwrap_or_default(),
        }
    }

    /// Classifies one client.
    #[must_use]
    pub fn classify(&self, revenue: Decimal, net: Decimal) -> Quadrant {
        match (revenue >= self.revenue, net >= self.net) {
            (true, true) => Quadrant::Q1,
            (true, false) => Quadrant::Q2,
            (false, true) => Quadrant::Q3,
            (false, false) => Quadrant::Q4,
        }
    }

    /// True if `net` is at or above the NET median.
    #[must_use]
    pub fn is_high_net(&self, net: Decimal) -> bool {
        net >= self.net && net > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[dec!(3), dec!(1), dec!(2)]), Some(dec!(2)));
        assert_eq!(median(&[dec!(4), dec!(1), dec!(2), dec!(3)]), Some(dec!(2.5)));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_thresholds_ignore_non_positive() {
        let pairs = [
            (dec!(0), dec!(100)),
            (dec!(10), dec!(0)),
            (dec!(30), dec!(300)),
            (dec!(-5), dec!(200)),
        ];
        let t = QuadrantThresholds::from_pairs(&pairs);
        assert_eq!(t.revenue, dec!(20));
        assert_eq!(t.net, dec!(200));
    }

    #[test]
    fn test_classify() {
        let t = QuadrantThresholds {
            revenue: dec!(100),
            net: dec!(1000),
        };
        assert_eq!(t.classify(dec!(100), dec!(1000)), Quadrant::Q1);
        assert_eq!(t.classify(dec!(150), dec!(10)), Quadrant::Q2);
        assert_eq!(t.classify(dec!(10), dec!(5000)), Quadrant::Q3);
        assert_eq!(t.classify(dec!(0), dec!(0)), Quadrant::Q4);
    }
}
