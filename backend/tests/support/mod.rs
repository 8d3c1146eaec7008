//! Shared helpers for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`;
//! each suite pulls these in with `mod support;` and uses what it needs.
#![allow(dead_code)]

pub mod accounts;
pub mod cluster;
