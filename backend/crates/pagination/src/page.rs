//! Page envelopes.

use serde::{Deserialize, Serialize};

use crate::PageRequest;

/// One slice of a larger result set together with the total element count.
///
/// An unpaged result reports `page_index = 0` and `page_size` equal to the
/// number of returned elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    content: Vec<T>,
    total_elements: u64,
    page_index: u32,
    page_size: u32,
}

impl<T> Page<T> {
    /// Wrap `content` fetched for `request` with the given total.
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let (page_index, page_size) = match request.window() {
            Some(window) => (window.index(), window.size()),
            None => (0, u32::try_from(content.len()).unwrap_or(u32::MAX)),
        };
        Self {
            content,
            total_elements,
            page_index,
            page_size,
        }
    }

    /// Elements on this page.
    pub fn content(&self) -> &[T] {
        &self.content
    }

    /// Consume the page, returning its elements.
    pub fn into_content(self) -> Vec<T> {
        self.content
    }

    /// Total number of matching elements across all pages.
    pub const fn total_elements(&self) -> u64 {
        self.total_elements
    }

    /// Zero-based index of this page.
    pub const fn page_index(&self) -> u32 {
        self.page_index
    }

    /// Requested page size.
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of pages needed to cover `total_elements`.
    ///
    /// A page with size zero (an empty unpaged result) counts as a single page.
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 1;
        }
        self.total_elements.div_ceil(u64::from(self.page_size))
    }

    /// True when no page follows this one.
    pub fn is_last(&self) -> bool {
        u64::from(self.page_index) + 1 >= self.total_pages()
    }

    /// Transform the elements, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }
}
