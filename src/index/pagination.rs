// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

/// One page of hydrated search results.
///
/// `total_count` is what the engine reported as matching across all pages.
/// It can exceed what hydration produced when index entries are stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    pub items: Vec<R>,
    pub total_count: u64,
    /// 1-based
    pub current_page: u32,
    pub page_size: u32,
}

impl<R> Page<R> {
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    #[must_use]
    pub fn has_next_page(&self) -> bool {
        u64::from(self.current_page) < self.total_pages()
    }

    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn into_items(self) -> Vec<R> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(total_count: u64, current_page: u32, page_size: u32) -> Page<u8> {
        Page { items: vec![], total_count, current_page, page_size }
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(page(10, 1, 2).total_pages(), 5);
        assert_eq!(page(11, 1, 2).total_pages(), 6);
        assert_eq!(page(0, 1, 20).total_pages(), 0);
    }

    #[test]
    fn test_navigation() {
        let first = page(10, 1, 2);
        assert!(first.has_next_page());
        assert!(!first.has_previous_page());

        let last = page(10, 5, 2);
        assert!(!last.has_next_page());
        assert!(last.has_previous_page());
    }
}
