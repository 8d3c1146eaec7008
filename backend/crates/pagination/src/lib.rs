//! Offset pagination primitives for account listings.
//!
//! A [`PageRequest`] is either unpaged (return everything) or a paged window
//! described by a zero-based page index, a non-zero page size and an ordered
//! [`Sort`]. Adapters return results wrapped in a [`Page`], which carries the
//! total number of matching elements next to the requested slice.
//!
//! ```
//! use pagination::{Direction, Page, PageRequest, Sort, SortOrder};
//!
//! let sort = Sort::by(vec![SortOrder::new("nickname", Direction::Asc)]);
//! let request = PageRequest::paged(1, 10, sort).expect("valid page request");
//! assert_eq!(request.offset(), 10);
//!
//! let page = Page::new(vec!["k", "l"], &request, 12);
//! assert_eq!(page.total_pages(), 2);
//! assert!(page.is_last());
//! ```

mod error;
mod page;
mod request;
mod sort;

pub use error::PaginationError;
pub use page::Page;
pub use request::{PageRequest, PageWindow};
pub use sort::{Direction, Sort, SortOrder};
