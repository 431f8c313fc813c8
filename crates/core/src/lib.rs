//! Core business logic for Assessoria.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `cross_sell` - Per-client product adoption statuses
//! - `goals` - Monthly revenue targets and progress
//! - `bonus` - Bonus mission payouts
//! - `revenue` - Revenue aggregation and the advisor revenue formula
//! - `insights` - Client quadrants and opportunity rules
//! - `reconciliation` - Keyset pagination and paginated vs. direct cross-checks
//! - `monitoring` - Alerts and health reporting for reconciliation

pub mod bonus;
pub mod cross_sell;
pub mod goals;
pub mod insights;
pub mod monitoring;
pub mod reconciliation;
pub mod revenue;
