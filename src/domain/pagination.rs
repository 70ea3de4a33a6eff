//! Pagination helpers shared by every admin list view
//!
//! Pages are 1-indexed on the wire; SeaORM paginators are 0-indexed.

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// SQLite binds OFFSET as a signed 64-bit integer
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Sanitized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u64,
    pub limit: u64,
}

impl PageParams {
    /// Clamp user-supplied values: limit in [1, MAX_PAGE_SIZE], page >= 1 and
    /// small enough that the row offset fits in an i64
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let max_page = MAX_OFFSET / limit;
        Self {
            page: page.unwrap_or(1).clamp(1, max_page),
            limit,
        }
    }

    /// Zero-based page index for `Paginator::fetch_page`
    pub fn index(&self) -> u64 {
        self.page - 1
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results with the metadata the dashboard tables need
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, params: PageParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            limit: params.limit,
            total_pages: total.div_ceil(params.limit),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = PageParams::new(None, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(p.index(), 0);
    }

    #[test]
    fn test_clamps_out_of_range_values() {
        let p = PageParams::new(Some(0), Some(10_000));
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, MAX_PAGE_SIZE);

        let p = PageParams::new(Some(3), Some(0));
        assert_eq!(p.limit, 1);
        assert_eq!(p.index(), 2);
    }

    #[test]
    fn test_huge_page_keeps_offset_in_range() {
        let p = PageParams::new(Some(u64::MAX), Some(20));
        assert!(p.index().checked_mul(p.limit).is_some());
        assert!(p.index() * p.limit <= i64::MAX as u64);

        let p = PageParams::new(Some(u64::MAX), Some(MAX_PAGE_SIZE));
        assert!(p.index() * p.limit <= i64::MAX as u64);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Paginated::new(vec![1, 2], 45, PageParams::new(Some(3), Some(20)));
        assert_eq!(page.total_pages, 3);

        let empty: Paginated<i32> = Paginated::new(vec![], 0, PageParams::default());
        assert_eq!(empty.total_pages, 0);
    }
}
