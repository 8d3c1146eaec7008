//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL-backed account repository using Diesel ORM
//! - **memory**: process-local account repository evaluating the same
//!   conditions without a database
//!
//! Adapters are thin translators between domain types and their storage
//! representation. Filter compilation stays in the domain.

pub mod memory;
pub mod persistence;
