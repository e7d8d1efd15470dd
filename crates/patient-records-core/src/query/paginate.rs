//! Fixed-size paging.

use serde::{Deserialize, Serialize};

/// Records per page when no configuration overrides it.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of pages needed for `count` items; 0 when there are none.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

/// Slice out 1-based page `page_number`.
///
/// Returns `[(n-1)*size, n*size)` clipped to the input; pages past the end
/// are empty. Page 0 is read as page 1.
pub fn paginate<T>(items: &[T], page_size: usize, page_number: usize) -> &[T] {
    let page_number = page_number.max(1);
    let start = (page_number - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Position within the paged result, for rendering navigation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageInfo {
    pub page: usize,
    pub total_pages: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageInfo {
    pub fn new(page: usize, total_pages: usize) -> Self {
        let page = page.max(1);
        Self {
            page,
            total_pages,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }

    /// "Page N of M", or "No records" when there is nothing to page.
    pub fn label(&self) -> String {
        if self.total_pages == 0 {
            "No records".to_string()
        } else {
            format!("Page {} of {}", self.page, self.total_pages)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(25, 0), 0);
    }

    #[test]
    fn test_last_partial_page() {
        let items: Vec<usize> = (0..25).collect();
        assert_eq!(paginate(&items, 10, 3), &items[20..25]);
        assert_eq!(paginate(&items, 10, 3).len(), 5);
    }

    #[test]
    fn test_out_of_range_pages() {
        let items: Vec<usize> = (0..25).collect();
        assert!(paginate(&items, 10, 4).is_empty());
        assert_eq!(paginate(&items, 10, 0), &items[0..10]);
        assert!(paginate(&items, 0, 1).is_empty());
        assert!(paginate::<usize>(&[], 10, 1).is_empty());
    }

    #[test]
    fn test_page_info() {
        let info = PageInfo::new(1, 3);
        assert!(!info.has_previous);
        assert!(info.has_next);
        assert_eq!(info.label(), "Page 1 of 3");

        let info = PageInfo::new(3, 3);
        assert!(info.has_previous);
        assert!(!info.has_next);

        let empty = PageInfo::new(1, 0);
        assert!(!empty.has_previous && !empty.has_next);
        assert_eq!(empty.label(), "No records");
    }
}
