//! Keyset pagination over a unique, strictly ordered key.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::PaginationError;

/// A result set that can be read one page at a time.
///
/// Implementations must return rows with `key(row) > after`, ordered by the
/// key ascending, at most `limit` rows.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Row type.
    type Row: Send;
    /// Pagination key. Must be unique within the filter.
    type Key: Ord + Clone + std::fmt::Debug + Send + Sync;
    /// Source error.
    type Error: Send;

    /// Fetches the page after `after` (the first page if `None`).
    async fn fetch_page(
        &self,
        after: Option<Self::Key>,
        limit: u64,
    ) -> Result<Vec<Self::Row>, Self::Error>;

    /// Key of a row.
    fn key(&self, row: &Self::Row) -> Self::Key;
}

/// Page size and safety limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationOptions {
    /// Rows per page.
    pub page_size: u64,
    /// Maximum pages before giving up with `truncated = true`.
    pub max_pages: u32,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_size: 1000,
            max_pages: 100,
        }
    }
}

/// Rows collected across pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<R> {
    /// Every row, in key order.
    pub rows: Vec<R>,
    /// Pages requested.
    pub pages: u32,
    /// True if `max_pages` was hit while pages were still full.
    pub truncated: bool,
}

/// Reads every page of `source`.
///
/// Stops on an empty or short page. Every key must be strictly greater
/// than the one before it, across page boundaries too.
pub async fn collect_pages<S>(
    source: &S,
    options: PaginationOptions,
) -> Result<Paginated<S::Row>, PaginationError<S::Error>>
where
    S: PageSource + ?Sized,
{
    if options.page_size == 0 || options.max_pages == 0 {
        return Err(PaginationError::InvalidOptions);
    }

    let mut rows = Vec::new();
    let mut last_key: Option<S::Key> = None;
    let mut pages = 0u32;
    let mut truncated = false;

    loop {
        if pages >= options.max_pages {
            // A full last page only means truncation if another row follows.
            let more = source
                .fetch_page(last_key.clone(), 1)
                .await
                .map_err(PaginationError::Source)?;
            if more.is_empty() {
                break;
            }
            truncated = true;
            tracing::warn!(
                pages,
                page_size = options.page_size,
                rows = rows.len(),
                "pagination stopped at page limit"
            );
            break;
        }

        let page = source
            .fetch_page(last_key.clone(), options.page_size)
            .await
            .map_err(PaginationError::Source)?;
        pages += 1;
        let len = page.len() as u64;

        for row in &page {
            let key = source.key(row);
            if let Some(previous) = &last_key
                && key <= *previous
            {
                return Err(PaginationError::UnstableOrdering {
                    page: pages,
                    previous: format!("{previous:?}"),
                    current: format!("{key:?}"),
                });
            }
            last_key = Some(key);
        }
        rows.extend(page);

        tracing::debug!(page = pages, rows = len, total = rows.len(), "page fetched");

        if len < options.page_size {
            break;
        }
    }

    Ok(Paginated {
        rows,
        pages,
        truncated,
    })
}
