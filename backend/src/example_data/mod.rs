//! Startup wiring for example account seeding.

mod accounts;
mod config;
mod startup;

pub use accounts::account_from_seed;
pub use config::ExampleDataSettings;
pub use startup::{SeedingSummary, StartupSeedingError, seed_example_accounts_on_startup};
