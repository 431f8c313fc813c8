//! Pagination error types.

use thiserror::Error;

/// Errors raised while collecting pages.
#[derive(Debug, Error)]
pub enum PaginationError<E> {
    /// The source failed to produce a page.
    #[error("page source failed: {0}")]
    Source(E),

    /// A key did not strictly increase, so the order is not total and unique.
    #[error("unstable ordering on page {page}: key {current} follows {previous}")]
    UnstableOrdering {
        /// 1-based page number.
        page: u32,
        /// Key of the previous row.
        previous: String,
        /// Offending key.
        current: String,
    },

    /// Page size or page limit is zero.
    #[error("page size and page limit must be positive")]
    InvalidOptions,
}
