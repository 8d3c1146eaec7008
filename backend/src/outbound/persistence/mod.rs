//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! The account repository lowers domain conditions into Diesel expressions
//! over `accounts LEFT JOIN contacts LEFT JOIN phone_numbers`, with async
//! support through `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: the repository only translates between Diesel rows
//!   and domain types; filter compilation lives in the domain.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: pool and Diesel failures map to
//!   `AccountPersistenceError`.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
//! let repository = DieselAccountRepository::new(pool);
//! ```

mod account_graph;
mod account_rows;
mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use migrations::{MIGRATIONS, run_migrations};
pub use pool::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE, DbPool, PoolConfig, PoolError,
};
