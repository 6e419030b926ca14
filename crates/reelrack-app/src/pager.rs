// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::ops::Range;

pub const CUSTOMER_PAGE_SIZE: usize = 40;

/// Fixed-size pagination over an ordered list. Pages are 1-based;
/// out-of-range navigation is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    page: usize,
    count: usize,
}

impl Pager {
    pub const fn new(page_size: usize) -> Self {
        Self {
            page_size,
            page: 1,
            count: 0,
        }
    }

    /// Replaces the underlying list length and resets to page 1.
    pub fn reset(&mut self, count: usize) {
        self.count = count;
        self.page = 1;
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub const fn count(&self) -> usize {
        self.count
    }

    pub const fn total_pages(&self) -> usize {
        self.count.div_ceil(self.page_size)
    }

    /// Returns true when the page actually changed.
    pub fn change_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() {
            return false;
        }
        self.page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.change_page(self.page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.page > 1 && self.change_page(self.page - 1)
    }

    pub fn visible_range(&self) -> Range<usize> {
        let start = (self.page - 1).saturating_mul(self.page_size).min(self.count);
        let end = (start + self.page_size).min(self.count);
        start..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.visible_range()]
    }
}
