//! Page requests.

use std::num::NonZeroU32;

use crate::{PaginationError, Sort};

/// A bounded page window: which page, how large, and in which order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageWindow {
    index: u32,
    size: NonZeroU32,
    sort: Sort,
}

impl PageWindow {
    /// Zero-based page index.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Maximum number of elements on the page.
    pub const fn size(&self) -> u32 {
        self.size.get()
    }

    /// Requested ordering.
    pub const fn sort(&self) -> &Sort {
        &self.sort
    }

    /// Number of elements to skip: `index * size`.
    pub fn offset(&self) -> u64 {
        u64::from(self.index) * u64::from(self.size.get())
    }
}

/// Pagination input for listing queries.
///
/// An [`PageRequest::Unpaged`] request returns the complete result set and
/// never applies offset, limit or ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PageRequest {
    /// Return every matching element.
    #[default]
    Unpaged,
    /// Return one window of the matching elements.
    Paged(PageWindow),
}

impl PageRequest {
    /// Build a paged request.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when `size` is zero.
    pub fn paged(index: u32, size: u32, sort: Sort) -> Result<Self, PaginationError> {
        let size = NonZeroU32::new(size).ok_or(PaginationError::ZeroPageSize)?;
        Ok(Self::Paged(PageWindow { index, size, sort }))
    }

    /// Build an unpaged request.
    pub const fn unpaged() -> Self {
        Self::Unpaged
    }

    /// True for [`PageRequest::Paged`].
    pub const fn is_paged(&self) -> bool {
        matches!(self, Self::Paged(_))
    }

    /// The page window, when paged.
    pub const fn window(&self) -> Option<&PageWindow> {
        match self {
            Self::Paged(window) => Some(window),
            Self::Unpaged => None,
        }
    }

    /// Number of elements to skip; zero when unpaged.
    pub fn offset(&self) -> u64 {
        self.window().map_or(0, PageWindow::offset)
    }

    /// Total element count that can be derived from the fetched content alone.
    ///
    /// Mirrors the usual "skip the count query" shortcut: the total is known
    /// when the request is unpaged, when the first page is not full, or when
    /// a later page is non-empty but not full. Otherwise the caller must run
    /// a count query.
    ///
    /// ```
    /// use pagination::{PageRequest, Sort};
    ///
    /// let first = PageRequest::paged(0, 10, Sort::unsorted()).expect("valid");
    /// assert_eq!(first.known_total(4), Some(4));
    /// assert_eq!(first.known_total(10), None);
    ///
    /// let third = PageRequest::paged(2, 10, Sort::unsorted()).expect("valid");
    /// assert_eq!(third.known_total(3), Some(23));
    /// assert_eq!(third.known_total(0), None);
    /// ```
    pub fn known_total(&self, content_len: usize) -> Option<u64> {
        let len = u64::try_from(content_len).ok()?;
        let Self::Paged(window) = self else {
            return Some(len);
        };
        let size = u64::from(window.size());
        if len >= size {
            return None;
        }
        if window.offset() == 0 {
            return Some(len);
        }
        if len > 0 {
            return Some(window.offset() + len);
        }
        None
    }
}
