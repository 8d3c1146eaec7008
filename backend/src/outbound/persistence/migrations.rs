//! Embedded schema migrations.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::AccountPersistenceError;

/// Migrations under `backend/migrations`, compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration to the database at `database_url`.
///
/// Uses a blocking connection; call it from `spawn_blocking` inside async
/// code.
///
/// # Errors
///
/// Returns `Connection` when the database cannot be reached and `Query`
/// when a migration fails.
pub fn run_migrations(database_url: &str) -> Result<(), AccountPersistenceError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| AccountPersistenceError::connection(err.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| AccountPersistenceError::query(format!("migration: {err}")))?;
    info!(applied = applied.len(), "schema migrations applied");
    Ok(())
}
