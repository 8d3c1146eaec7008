//! Driving port for account lookups.
//!
//! Driving adapters (the `query-accounts` binary) use this port to read
//! accounts without importing outbound persistence concerns.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Account, AccountFilter, Error};

/// Domain use-case port for listing and finding accounts.
#[async_trait]
pub trait AccountsQuery: Send + Sync {
    /// All accounts matching the exact fields of `filter`.
    async fn list_accounts(&self, filter: &AccountFilter) -> Result<Vec<Account>, Error>;

    /// One page of accounts matching `filter`, search text included.
    async fn page_accounts(
        &self,
        filter: &AccountFilter,
        page: &PageRequest,
    ) -> Result<Page<Account>, Error>;

    /// The account owning a contact with `email`.
    async fn find_by_email(&self, email: &str) -> Result<Account, Error>;

    /// The account with `nickname`, ignoring case.
    async fn find_by_nickname(&self, nickname: &str) -> Result<Account, Error>;
}
