//! Pagination for list queries.
//!
//! All list queries are paginated by default and return results in creation
//! order.

use serde::{Deserialize, Serialize};

/// Default page size when the caller gives none.
pub const DEFAULT_LIMIT: u32 = 50;

/// Hard upper bound on a page size.
pub const MAX_LIMIT: u32 = 1000;

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Maximum number of items to return.
    pub limit: u32,
    /// Offset for pagination (0-based).
    pub offset: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }

    /// Largest page allowed; used by internal callers that want everything.
    pub fn max() -> Self {
        Self::new(Some(MAX_LIMIT), None)
    }
}

/// One page of a list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of items matching the filter (across all pages).
    pub total: u64,
    /// Pagination parameters used.
    pub pagination: Pagination,
    /// Whether there are more items after this page.
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Cut a page out of the full, ordered match list.
    pub fn from_matches(matches: Vec<T>, pagination: Pagination) -> Self {
        let total = matches.len() as u64;
        let offset = pagination.offset as usize;
        let limit = pagination.limit as usize;

        let items: Vec<T> = matches.into_iter().skip(offset).take(limit).collect();
        let has_more = (offset as u64).saturating_add(items.len() as u64) < total;

        Self {
            items,
            total,
            pagination,
            has_more,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            pagination: self.pagination,
            has_more: self.has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_capped() {
        assert_eq!(Pagination::new(Some(5_000), None).limit, MAX_LIMIT);
        assert_eq!(Pagination::new(None, None), Pagination::default());
    }

    #[test]
    fn pages_report_total_and_has_more() {
        let page = Page::from_matches((1..=5).collect(), Pagination::new(Some(2), Some(1)));
        assert_eq!(page.items, vec![2, 3]);
        assert_eq!(page.total, 5);
        assert!(page.has_more);

        let last = Page::from_matches((1..=5).collect(), Pagination::new(Some(2), Some(4)));
        assert_eq!(last.items, vec![5]);
        assert!(!last.has_more);
    }

    #[test]
    fn offset_past_the_end_is_empty() {
        let page = Page::from_matches(vec!['a', 'b'], Pagination::new(Some(10), Some(7)));
        assert!(page.items.is_empty());
        assert_eq!(page.total, 2);
        assert!(!page.has_more);
    }
}
