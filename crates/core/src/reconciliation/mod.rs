//! Paginated retrieval with a unique key and cross-checks against direct
//! aggregates.
//!
//! Pages are cut with keyset pagination on a strictly increasing unique
//! key. `collect_pages` refuses any source whose keys repeat or go
//! backwards, and `ReconciliationCheck` compares the paginated
//! accumulation with a single unpaginated aggregate.

pub mod check;
pub mod error;
pub mod pagination;


pub use check::{CheckStatus, MethodTotals, ReconciliationCheck, ReconciliationReport, YearSummary};
pub use error::PaginationError;
pub use pagination::{PageSource, Paginated, PaginationOptions, collect_pages};
