//! Domain primitives, compilers and ports.
//!
//! Purpose: define the account aggregate, the filter a caller builds, the
//! store-independent condition model the filter compiles to, and the ports
//! adapters implement. Nothing here imports `outbound`.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - Account (alias to `account::Account`): account with its contacts.
//! - AccountFilter (alias to `filter::AccountFilter`): optional criteria.
//! - compiler: filter to condition compilation.
//! - condition: condition model and in-memory evaluation.

pub mod account;
pub mod accounts_query_service;
pub mod compiler;
pub mod condition;
pub mod error;
pub mod filter;
pub mod ports;
pub mod sort;

pub use self::account::{
    Account, AccountId, AccountParts, AccountStatus, AccountValidationError, ActivationCode,
    Avatar, Contact, ContactId, EmailAddress, Gender, Mode, Nickname, PhoneNumber, PhoneNumberId,
};
pub use self::accounts_query_service::AccountsQueryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::filter::{AccountFilter, AccountFilterBuilder};
pub use self::sort::{AccountSortKey, UnknownSortProperty};
