//! In-memory account repository.
//!
//! Evaluates the same conditions the Diesel adapter lowers, against the
//! left-join rows of each stored account, so callers and tests can run the
//! whole query path without a database. Content and total are computed in
//! two phases, like the SQL adapter; [`InMemoryAccountRepository::with_interleaved_writer`]
//! injects a write between them. Text sort keys compare by code point, so
//! page order agrees with PostgreSQL only under the `C` collation.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use tracing::debug;

use crate::domain::compiler::{compile_exact_predicates, compile_predicates, compile_search};
use crate::domain::condition::Condition;
use crate::domain::condition::eval::account_matches;
use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::sort::{compare_accounts, resolve_sort};
use crate::domain::{Account, AccountFilter};

type Writer = Arc<dyn Fn(&mut Vec<Account>) + Send + Sync>;

/// Account store held in process memory.
#[derive(Clone, Default)]
pub struct InMemoryAccountRepository {
    accounts: Arc<Mutex<Vec<Account>>>,
    interleaved_writer: Option<Writer>,
}

impl InMemoryAccountRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `accounts`, later entries replacing earlier ones
    /// with the same id.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let mut stored: Vec<Account> = Vec::new();
        for account in accounts {
            upsert(&mut stored, account);
        }
        Self {
            accounts: Arc::new(Mutex::new(stored)),
            interleaved_writer: None,
        }
    }

    /// Run `writer` against the store after each page's content is read and
    /// before its total is counted.
    pub fn with_interleaved_writer(
        mut self,
        writer: impl Fn(&mut Vec<Account>) + Send + Sync + 'static,
    ) -> Self {
        self.interleaved_writer = Some(Arc::new(writer));
        self
    }

    /// Snapshot of every stored account in insertion order.
    pub fn accounts(&self) -> Result<Vec<Account>, AccountPersistenceError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Account>>, AccountPersistenceError> {
        self.accounts
            .lock()
            .map_err(|_| AccountPersistenceError::connection("in-memory store poisoned"))
    }
}

fn upsert(accounts: &mut Vec<Account>, account: Account) {
    match accounts.iter_mut().find(|stored| stored.id() == account.id()) {
        Some(stored) => *stored = account,
        None => accounts.push(account),
    }
}

fn matching(
    accounts: &[Account],
    conditions: &[Condition],
) -> Result<Vec<Account>, AccountPersistenceError> {
    let mut found = Vec::new();
    for account in accounts {
        let is_match = account_matches(conditions, account)
            .map_err(|err| AccountPersistenceError::invalid_argument(err.to_string()))?;
        if is_match {
            found.push(account.clone());
        }
    }
    Ok(found)
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_filter(
        &self,
        filter: &AccountFilter,
    ) -> Result<Vec<Account>, AccountPersistenceError> {
        let conditions = compile_exact_predicates(filter);
        matching(&self.lock()?, &conditions)
    }

    async fn find_page_by_filter(
        &self,
        filter: &AccountFilter,
        page: &PageRequest,
    ) -> Result<Page<Account>, AccountPersistenceError> {
        let mut conditions = compile_predicates(filter);
        conditions.extend(compile_search(filter.search_text()));

        let content = {
            let accounts = self.lock()?;
            let mut found = matching(&accounts, &conditions)?;
            if let Some(window) = page.window() {
                let orders = resolve_sort(window.sort()).map_err(|err| {
                    AccountPersistenceError::invalid_argument(err.to_string())
                })?;
                found.sort_by(|left, right| compare_accounts(&orders, left, right));
                let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
                let size = usize::try_from(window.size()).unwrap_or(usize::MAX);
                found = found.into_iter().skip(offset).take(size).collect();
            }
            found
        };

        if let Some(writer) = &self.interleaved_writer {
            let mut accounts = self.lock()?;
            writer(&mut *accounts);
        }

        let total = match page.known_total(content.len()) {
            Some(total) => total,
            None => {
                let count = matching(&self.lock()?, &conditions)?.len();
                u64::try_from(count).unwrap_or(u64::MAX)
            }
        };
        debug!(
            conditions = conditions.len(),
            accounts = content.len(),
            total,
            "in-memory account page query finished"
        );
        Ok(Page::new(content, page, total))
    }

    async fn save(&self, account: &Account) -> Result<(), AccountPersistenceError> {
        upsert(&mut *self.lock()?, account.clone());
        Ok(())
    }

    async fn exists_by_nickname(&self, nickname: &str) -> Result<bool, AccountPersistenceError> {
        let wanted = nickname.to_lowercase();
        Ok(self
            .lock()?
            .iter()
            .any(|account| account.nickname().as_str().to_lowercase() == wanted))
    }
}
