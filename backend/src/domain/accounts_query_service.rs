//! Account lookups on top of an [`AccountRepository`].

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::debug;

use super::ports::{AccountPersistenceError, AccountRepository, AccountsQuery};
use super::{Account, AccountFilter, Error};

/// [`AccountsQuery`] implementation delegating to a repository.
#[derive(Debug, Clone)]
pub struct AccountsQueryService<R> {
    repository: R,
}

impl<R> AccountsQueryService<R> {
    /// Create the service.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

fn map_persistence_error(error: AccountPersistenceError) -> Error {
    match error {
        AccountPersistenceError::InvalidArgument { message } => Error::invalid_request(message),
        AccountPersistenceError::Connection { message } => Error::service_unavailable(message),
        AccountPersistenceError::Query { message } => Error::internal(message),
    }
}

impl<R: AccountRepository> AccountsQueryService<R> {
    async fn find_single(&self, filter: AccountFilter, what: &str) -> Result<Account, Error> {
        self.repository
            .find_by_filter(&filter)
            .await
            .map_err(map_persistence_error)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("account not found by {what}")))
    }
}

#[async_trait]
impl<R: AccountRepository> AccountsQuery for AccountsQueryService<R> {
    async fn list_accounts(&self, filter: &AccountFilter) -> Result<Vec<Account>, Error> {
        let accounts = self
            .repository
            .find_by_filter(filter)
            .await
            .map_err(map_persistence_error)?;
        debug!(count = accounts.len(), "listed accounts");
        Ok(accounts)
    }

    async fn page_accounts(
        &self,
        filter: &AccountFilter,
        page: &PageRequest,
    ) -> Result<Page<Account>, Error> {
        let page = self
            .repository
            .find_page_by_filter(filter, page)
            .await
            .map_err(map_persistence_error)?;
        debug!(
            page_index = page.page_index(),
            content = page.content().len(),
            total = page.total_elements(),
            "paged accounts"
        );
        Ok(page)
    }

    async fn find_by_email(&self, email: &str) -> Result<Account, Error> {
        self.find_single(AccountFilter::builder().email(email).build(), "email")
            .await
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Account, Error> {
        self.find_single(AccountFilter::builder().nickname(nickname).build(), "nickname")
            .await
    }
}
