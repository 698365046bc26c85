//! Paged result window.

/// One page of an ordered record collection plus the size of the whole
/// collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    /// Zero-based page index requested by the caller.
    pub page_index: u32,
    pub page_size: u32,
    /// Number of records across all pages.
    pub total_count: u64,
}

impl<T> PagedList<T> {
    /// Number of pages needed to cover `total_count`. Zero when the page
    /// size is zero.
    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.page_index) + 1 < self.page_count()
    }

    pub fn is_first_page(&self) -> bool {
        self.page_index == 0
    }

    pub fn is_last_page(&self) -> bool {
        u64::from(self.page_index) + 1 >= self.page_count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for PagedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
