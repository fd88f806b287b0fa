use anyhow::{bail, Result};
use std::ops::Range;

pub const DEFAULT_PAGE_SIZE: usize = 24;

/// Fixed-size windows over a sequence. Out-of-range page numbers are pinned to the
/// last full (or partial, for short sources) page instead of producing an empty slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
}

impl Default for Pager {
    fn default() -> Self { Self { page_size: DEFAULT_PAGE_SIZE } }
}

impl Pager {
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            bail!("page size must be at least 1");
        }
        Ok(Self { page_size })
    }

    pub fn page_size(&self) -> usize { self.page_size }

    /// Window `[start, end)` of page `page` over a source of `len` items.
    /// Always satisfies `start <= end <= len`.
    pub fn window(&self, len: usize, page: usize) -> Range<usize> {
        let last_start = len.saturating_sub(self.page_size);
        let start = page.saturating_mul(self.page_size).min(last_start);
        let end = start.saturating_add(self.page_size).min(len);
        start..end
    }

    pub fn page<'a, T>(&self, source: &'a [T], page: usize) -> &'a [T] {
        &source[self.window(source.len(), page)]
    }
}
