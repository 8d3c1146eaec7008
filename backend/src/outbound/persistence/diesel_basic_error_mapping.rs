//! Mapping of pool and Diesel failures into account persistence errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::AccountPersistenceError;

use super::pool::PoolError;

/// Pool failures mean no usable connection: always `Connection`.
pub(crate) fn map_pool_error(error: PoolError) -> AccountPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AccountPersistenceError::connection(message)
        }
    }
}

/// Diesel failures: a closed connection is `Connection`, everything else is
/// `Query`. Driver messages are logged at debug level, not returned.
pub(crate) fn map_diesel_error(error: DieselError) -> AccountPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AccountPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            let constraint = info.constraint_name().unwrap_or("unique constraint");
            AccountPersistenceError::query(format!("duplicate value violates {constraint}"))
        }
        DieselError::NotFound => AccountPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => AccountPersistenceError::query("database query error"),
        DieselError::DeserializationError(_) | DieselError::SerializationError(_) => {
            AccountPersistenceError::query("database value conversion error")
        }
        _ => AccountPersistenceError::query("database error"),
    }
}
