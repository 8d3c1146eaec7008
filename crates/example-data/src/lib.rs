//! Deterministic example account data generation for demonstration purposes.
//!
//! The generator produces believable, reproducible accounts (nickname, names,
//! status, mode, one main contact with a phone number) from a numeric seed.
//! It is independent of backend domain types to avoid circular dependencies;
//! the backend converts [`ExampleAccountSeed`] values into its own aggregates.
//!
//! # Example
//!
//! ```
//! use example_data::generate_example_accounts;
//!
//! let accounts = generate_example_accounts(42, 3).expect("generation succeeds");
//! assert_eq!(accounts.len(), 3);
//! assert_eq!(accounts, generate_example_accounts(42, 3).expect("generation succeeds"));
//! ```

mod error;
mod generator;
mod seed;

pub use error::GenerationError;
pub use generator::{NICKNAME_MAX, NICKNAME_MIN, generate_example_accounts};
pub use seed::{ContactSeed, ExampleAccountSeed, GenderSeed, ModeSeed, PhoneSeed, StatusSeed};
