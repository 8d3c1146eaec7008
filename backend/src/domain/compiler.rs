//! Compiles an [`AccountFilter`](super::AccountFilter) into conditions.
//!
//! Both compilers are pure: the same filter always yields the same
//! conditions in the same order, and absent filter fields yield nothing.

mod predicates;
mod search;

pub use self::predicates::{compile_exact_predicates, compile_predicates};
pub use self::search::{SEARCH_FIELDS, compile_search, normalize_search_text};
