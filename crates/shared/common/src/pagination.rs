//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// One page of results (DRY - reusable for all list responses).
///
/// Page numbers are 0-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    /// True when a page after this one holds data.
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, page: u64, per_page: u64, total: u64) -> Self {
        let total_pages = if per_page > 0 {
            total.div_ceil(per_page)
        } else {
            0
        };

        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }

    /// Convert the content while keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        let page: Paginated<u8> = Paginated::new(vec![], 0, 5, 11);
        assert_eq!(page.meta.total_pages, 3);
        assert!(page.meta.has_next());
    }

    #[test]
    fn last_page_has_no_next() {
        let page: Paginated<u8> = Paginated::new(vec![1], 2, 5, 11);
        assert!(!page.meta.has_next());
    }

    #[test]
    fn zero_page_size_yields_zero_pages() {
        let page: Paginated<u8> = Paginated::new(vec![], 0, 0, 4);
        assert_eq!(page.meta.total_pages, 0);
    }

    #[test]
    fn map_keeps_meta() {
        let page = Paginated::new(vec![1, 2], 0, 2, 4).map(|n| n * 10);
        assert_eq!(page.data, vec![10, 20]);
        assert_eq!(page.meta.total, 4);
    }

    #[test]
    fn serializes_data_with_meta() {
        let page = Paginated::new(vec!["a"], 1, 1, 3);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["data"][0], "a");
        assert_eq!(json["meta"]["total_pages"], 3);
    }
}
