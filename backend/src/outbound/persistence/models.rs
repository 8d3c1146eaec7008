//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{accounts, contacts, phone_numbers};

/// Row read from and written to the accounts table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(primary_key(account_id))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AccountRow {
    pub account_id: Uuid,
    pub nick_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<DateTime<Utc>>,
    pub gender: Option<String>,
    pub avatar: Option<serde_json::Value>,
    pub activation_code: String,
    pub status: String,
    pub mode: String,
    pub mode_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Row read from and written to the contacts table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContactRow {
    pub contact_id: Uuid,
    pub account_id: Uuid,
    pub email: String,
    pub main: bool,
    pub phone_number_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Row read from and written to the phone_numbers table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = phone_numbers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PhoneNumberRow {
    pub phone_number_id: Uuid,
    pub national: Option<i64>,
    pub international: Option<String>,
    pub country_code: Option<i32>,
    pub region_code: Option<String>,
}
