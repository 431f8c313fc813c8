//! Repository abstractions for data access.
//!
//! Repositories borrow any `ConnectionTrait`, normally the transaction of an
//! [`RlsConnection`](crate::rls::RlsConnection), so their queries run under
//! the caller's row-level security context. They still filter by owner
//! explicitly.

pub mod bonus;
pub mod client;
pub mod cross_sell;
pub mod goal;
pub mod profile;
pub mod revenue;

pub use bonus::BonusRepository;
pub use client::ClientRepository;
pub use cross_sell::{ClientCrossSell, CrossSellRepository};
pub use goal::GoalRepository;
pub use profile::{ProfileRepository, UpdateProfileInput};
pub use revenue::{RevenueFilter, RevenuePages, RevenueRepository, RevenueSeries, ensure_consistent};
