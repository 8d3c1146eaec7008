//! Account filter engine.
//!
//! Compiles optional account filters into conditions over
//! `accounts → contacts → phone_numbers` and executes them as paginated
//! content and count queries through an [`AccountRepository`] adapter.
//!
//! [`AccountRepository`]: domain::ports::AccountRepository

pub mod config;
pub mod domain;
#[cfg(feature = "example-data")]
pub mod example_data;
pub mod outbound;
