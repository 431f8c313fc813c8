//! Client quadrants and opportunity insights.

pub mod quadrant;
pub mod rules;

pub use quadrant::{Quadrant, QuadrantThresholds, median};
pub use rules::{ClientSnapshot, Insight, InsightKind, InsightSeverity, evaluate, evaluate_book};
