//! Pagination

use std::ops::Range;

/// Rows per page used by the dashboard tables.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page cursor over a derived view with a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    index: usize,
    size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// Create a cursor on the first page. A zero size is treated as one.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Pagination {
            index: 0,
            size: size.max(1),
        }
    }

    /// Current zero-based page index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Rows per page.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of pages for `total` rows; an empty view still has one page.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.size).max(1)
    }

    /// Move to a page, clamped to the last page.
    pub fn go_to(&mut self, index: usize, total: usize) {
        self.index = index.min(self.page_count(total).saturating_sub(1));
    }

    /// Move to the next page if there is one.
    pub fn next(&mut self, total: usize) {
        self.go_to(self.index.saturating_add(1), total);
    }

    /// Move to the previous page if there is one.
    pub fn previous(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    /// Re-clamp after the view shrank.
    pub fn clamp(&mut self, total: usize) {
        self.go_to(self.index, total);
    }

    /// Row range of the current page within `total` rows.
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = self.index.saturating_mul(self.size).min(total);
        let end = start.saturating_add(self.size).min(total);

        start..end
    }

    /// The rows of the current page.
    pub fn slice<'v, T>(&self, view: &'v [T]) -> &'v [T] {
        view.get(self.range(view.len())).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        let pagination = Pagination::new(10);

        assert_eq!(pagination.page_count(0), 1);
        assert_eq!(pagination.page_count(10), 1);
        assert_eq!(pagination.page_count(11), 2);
    }

    #[test]
    fn slice_returns_current_page() {
        let rows: Vec<u32> = (0..25).collect();
        let mut pagination = Pagination::new(10);

        pagination.go_to(2, rows.len());

        assert_eq!(pagination.slice(&rows), &[20, 21, 22, 23, 24]);
    }

    #[test]
    fn go_to_clamps_to_last_page() {
        let mut pagination = Pagination::new(10);

        pagination.go_to(9, 25);

        assert_eq!(pagination.index(), 2);
    }

    #[test]
    fn next_and_previous_stay_in_bounds() {
        let mut pagination = Pagination::new(10);

        pagination.previous();
        assert_eq!(pagination.index(), 0);

        pagination.next(15);
        pagination.next(15);
        assert_eq!(pagination.index(), 1);
    }

    #[test]
    fn clamp_after_view_shrinks() {
        let rows: Vec<u32> = (0..3).collect();
        let mut pagination = Pagination::new(2);

        pagination.go_to(1, 30);
        pagination.clamp(rows.len());

        assert_eq!(pagination.index(), 1);
        assert_eq!(pagination.slice(&rows), &[2]);

        pagination.clamp(0);

        assert_eq!(pagination.index(), 0);
        assert!(pagination.slice::<u32>(&[]).is_empty());
    }

    #[test]
    fn zero_size_is_one() {
        assert_eq!(Pagination::new(0).size(), 1);
    }
}
