//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Account, AccountFilter};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Repository connection could not be established or was lost.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// The request cannot be expressed as a query: unknown sort
        /// property, ill-typed condition, or invalid pagination.
        InvalidArgument { message: String } => "invalid account query: {message}",
    }
}

impl AccountPersistenceError {
    /// True for the store-failure kinds (`Connection`, `Query`).
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Query { .. })
    }
}

/// Filtered reads and whole-aggregate writes over accounts.
///
/// Reads evaluate the filter over `accounts LEFT JOIN contacts LEFT JOIN
/// phone_numbers` and return each matching account once, with all of its
/// contacts. Empty results are not errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Every account matching the exact predicates of `filter` (including
    /// contact emails), unordered and unpaged. Search text is ignored.
    async fn find_by_filter(
        &self,
        filter: &AccountFilter,
    ) -> Result<Vec<Account>, AccountPersistenceError>;

    /// One page of accounts matching the predicates and search text of
    /// `filter`, with the total number of matching accounts.
    ///
    /// Content and total are read separately; a concurrent writer can make
    /// them disagree.
    async fn find_page_by_filter(
        &self,
        filter: &AccountFilter,
        page: &PageRequest,
    ) -> Result<Page<Account>, AccountPersistenceError>;

    /// Insert or replace an account together with its contacts and phone
    /// numbers.
    async fn save(&self, account: &Account) -> Result<(), AccountPersistenceError>;

    /// Whether an account with `nickname` exists, ignoring case.
    async fn exists_by_nickname(&self, nickname: &str) -> Result<bool, AccountPersistenceError>;
}
