//! PostgreSQL-backed account repository.
//!
//! Reads run in two phases. The content query selects the distinct account
//! rows matching the lowered conditions over the account graph, ordered and
//! paged; the fetch query then loads those accounts with every contact and
//! phone number, so a filter on one contact never hides the others. The
//! total comes from a separate `COUNT(DISTINCT account_id)` over the same
//! conditions.

use std::time::Instant;

use async_trait::async_trait;
use diesel::dsl;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::{Direction, Page, PageRequest};
use tracing::debug;
use uuid::Uuid;

use crate::domain::compiler::{compile_exact_predicates, compile_predicates, compile_search};
use crate::domain::condition::{Condition, ConditionError};
use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::sort::{AccountSortKey, UnknownSortProperty, resolve_sort};
use crate::domain::{Account, AccountFilter};

use super::account_graph::{
    BoxedCondition, account_graph, lower_conditions, nickname_ignoring_case,
};
use super::account_rows::{JoinedRow, fold_joined_rows, rows_from_account};
use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AccountRow, ContactRow, PhoneNumberRow};
use super::pool::DbPool;
use super::schema::{accounts, contacts, phone_numbers};

/// Diesel-backed implementation of [`AccountRepository`].
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a repository over the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use backend::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
    /// let repository = DieselAccountRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn invalid_condition(error: ConditionError) -> AccountPersistenceError {
    AccountPersistenceError::invalid_argument(error.to_string())
}

fn invalid_sort(error: UnknownSortProperty) -> AccountPersistenceError {
    AccountPersistenceError::invalid_argument(error.to_string())
}

fn lowered(conditions: &[Condition]) -> Result<Option<BoxedCondition>, AccountPersistenceError> {
    lower_conditions(conditions).map_err(invalid_condition)
}

macro_rules! order_by {
    ($query:expr, $column:expr, $direction:expr) => {
        match $direction {
            Direction::Asc => $query.then_order_by($column.asc()),
            Direction::Desc => $query.then_order_by($column.desc()),
        }
    };
}

/// Ids of the accounts matching `conditions`, in page order.
async fn matching_ids(
    conn: &mut AsyncPgConnection,
    conditions: &[Condition],
    page: &PageRequest,
) -> Result<Vec<Uuid>, AccountPersistenceError> {
    let mut query = account_graph!()
        .select(AccountRow::as_select())
        .distinct()
        .into_boxed();
    if let Some(predicate) = lowered(conditions)? {
        query = query.filter(predicate);
    }

    if let Some(window) = page.window() {
        let orders = resolve_sort(window.sort()).map_err(invalid_sort)?;
        for (key, direction) in orders {
            query = match key {
                AccountSortKey::AccountId => order_by!(query, accounts::account_id, direction),
                AccountSortKey::Nickname => order_by!(query, accounts::nick_name, direction),
                AccountSortKey::FirstName => order_by!(query, accounts::first_name, direction),
                AccountSortKey::LastName => order_by!(query, accounts::last_name, direction),
                AccountSortKey::BirthDate => order_by!(query, accounts::birth_date, direction),
                AccountSortKey::Status => order_by!(query, accounts::status, direction),
                AccountSortKey::Mode => order_by!(query, accounts::mode, direction),
                AccountSortKey::ModeAt => order_by!(query, accounts::mode_at, direction),
                AccountSortKey::CreatedAt => order_by!(query, accounts::created_at, direction),
            };
        }
        let offset = i64::try_from(window.offset()).map_err(|_| {
            AccountPersistenceError::invalid_argument(format!(
                "page offset {} exceeds the supported range",
                window.offset()
            ))
        })?;
        query = query
            .then_order_by(accounts::account_id.asc())
            .offset(offset)
            .limit(i64::from(window.size()));
    }

    let rows = query
        .load::<AccountRow>(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok(rows.into_iter().map(|row| row.account_id).collect())
}

/// Accounts with every contact and phone number, in the order of `ids`.
async fn fetch_accounts(
    conn: &mut AsyncPgConnection,
    ids: &[Uuid],
) -> Result<Vec<Account>, AccountPersistenceError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = account_graph!()
        .filter(accounts::account_id.eq_any(ids))
        .select((
            AccountRow::as_select(),
            Option::<ContactRow>::as_select(),
            Option::<PhoneNumberRow>::as_select(),
        ))
        .load::<JoinedRow>(conn)
        .await
        .map_err(map_diesel_error)?;
    fold_joined_rows(rows, ids)
}

/// Number of distinct accounts matching `conditions`.
async fn count_matching(
    conn: &mut AsyncPgConnection,
    conditions: &[Condition],
) -> Result<u64, AccountPersistenceError> {
    let mut query = account_graph!()
        .select(dsl::count_distinct(accounts::account_id))
        .into_boxed();
    if let Some(predicate) = lowered(conditions)? {
        query = query.filter(predicate);
    }
    let total = query
        .get_result::<i64>(conn)
        .await
        .map_err(map_diesel_error)?;
    u64::try_from(total)
        .map_err(|_| AccountPersistenceError::query(format!("negative account count {total}")))
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn find_by_filter(
        &self,
        filter: &AccountFilter,
    ) -> Result<Vec<Account>, AccountPersistenceError> {
        let conditions = compile_exact_predicates(filter);
        let started = Instant::now();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids = matching_ids(&mut conn, &conditions, &PageRequest::unpaged()).await?;
        let accounts = fetch_accounts(&mut conn, &ids).await?;
        debug!(
            conditions = conditions.len(),
            accounts = accounts.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "account filter query finished"
        );
        Ok(accounts)
    }

    async fn find_page_by_filter(
        &self,
        filter: &AccountFilter,
        page: &PageRequest,
    ) -> Result<Page<Account>, AccountPersistenceError> {
        let mut conditions = compile_predicates(filter);
        conditions.extend(compile_search(filter.search_text()));
        let started = Instant::now();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids = matching_ids(&mut conn, &conditions, page).await?;
        let accounts = fetch_accounts(&mut conn, &ids).await?;
        let total = match page.known_total(ids.len()) {
            Some(total) => total,
            None => count_matching(&mut conn, &conditions).await?,
        };
        debug!(
            conditions = conditions.len(),
            accounts = accounts.len(),
            total,
            elapsed_ms = started.elapsed().as_millis(),
            "account page query finished"
        );
        Ok(Page::new(accounts, page, total))
    }

    async fn save(&self, account: &Account) -> Result<(), AccountPersistenceError> {
        let rows = rows_from_account(account)?;
        let account_id = rows.account.account_id;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(accounts::table)
                    .values(&rows.account)
                    .on_conflict(accounts::account_id)
                    .do_update()
                    .set(&rows.account)
                    .execute(conn)
                    .await?;

                let previous_phones: Vec<Uuid> = contacts::table
                    .filter(contacts::account_id.eq(account_id))
                    .select(contacts::phone_number_id)
                    .load::<Option<Uuid>>(conn)
                    .await?
                    .into_iter()
                    .flatten()
                    .collect();

                diesel::delete(contacts::table.filter(contacts::account_id.eq(account_id)))
                    .execute(conn)
                    .await?;
                if !previous_phones.is_empty() {
                    diesel::delete(
                        phone_numbers::table
                            .filter(phone_numbers::phone_number_id.eq_any(&previous_phones)),
                    )
                    .execute(conn)
                    .await?;
                }

                if !rows.phone_numbers.is_empty() {
                    diesel::insert_into(phone_numbers::table)
                        .values(&rows.phone_numbers)
                        .execute(conn)
                        .await?;
                }
                if !rows.contacts.is_empty() {
                    diesel::insert_into(contacts::table)
                        .values(&rows.contacts)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        debug!(account_id = %account_id, "account saved");
        Ok(())
    }

    async fn exists_by_nickname(&self, nickname: &str) -> Result<bool, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(dsl::exists(
            accounts::table.filter(nickname_ignoring_case(nickname)),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }
}
