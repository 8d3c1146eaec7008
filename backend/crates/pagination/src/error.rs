//! Validation errors for pagination input.

use thiserror::Error;

/// Errors raised while constructing page requests or sort orders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// A paged request must ask for at least one element per page.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
    /// A sort expression could not be parsed.
    #[error("invalid sort expression `{expression}`: {reason}")]
    InvalidSort {
        /// The offending fragment.
        expression: String,
        /// Why the fragment was rejected.
        reason: &'static str,
    },
}

impl PaginationError {
    pub(crate) fn invalid_sort(expression: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidSort {
            expression: expression.into(),
            reason,
        }
    }
}
