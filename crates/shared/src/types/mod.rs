//! Common types used across the application.

pub mod id;
pub mod money;
pub mod month;
pub mod pagination;

pub use id::*;
pub use money::round_brl;
pub use month::{MonthParseError, YearMonth};
pub use pagination::{PageMeta, PageRequest, PageResponse};
