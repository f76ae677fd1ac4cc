use std::ops::Range;

/// Number of pages needed for `count` items. Zero items means zero pages.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Page cursor over a list whose length the caller owns.
///
/// Every mutation takes the current item count and leaves
/// `current < max(total_pages, 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
    current: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total_pages(&self, count: usize) -> usize {
        total_pages(count, self.page_size)
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Pull the cursor back onto the last valid page
    pub fn clamp(&mut self, count: usize) {
        let last = self.total_pages(count).max(1) - 1;
        self.current = self.current.min(last);
    }

    /// Advance one page. No-op on the last page.
    pub fn next(&mut self, count: usize) -> bool {
        if self.current + 1 < self.total_pages(count) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. No-op on the first page.
    pub fn prev(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Change the page size and re-clamp in one step
    pub fn set_page_size(&mut self, page_size: usize, count: usize) -> bool {
        let page_size = page_size.max(1);
        if page_size == self.page_size {
            return false;
        }
        self.page_size = page_size;
        self.clamp(count);
        true
    }

    /// Index range of the current page within a list of `count` items
    pub fn range(&self, count: usize) -> Range<usize> {
        let start = (self.current * self.page_size).min(count);
        let end = (start + self.page_size).min(count);
        start..end
    }
}
