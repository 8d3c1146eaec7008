//! PostgreSQL provisioning for Diesel integration tests.
//!
//! Each test gets a freshly migrated, empty database. When
//! `ACCOUNTS_TEST_DATABASE_URL` is set, that database is used and tests
//! serialise on a process-wide lock; otherwise every test boots a private
//! embedded cluster through `pg-embed-setup-unpriv`.
//!
//! Setup failures panic so a broken cluster never passes silently. Set
//! `SKIP_TEST_CLUSTER=1` to turn them into a `SKIP-TEST-CLUSTER` marker
//! instead.

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use diesel::{Connection, PgConnection, RunQueryDsl};
use pg_embedded_setup_unpriv::TestCluster;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Environment variable naming an external test database.
pub const TEST_DATABASE_URL_ENV: &str = "ACCOUNTS_TEST_DATABASE_URL";

const BOOTSTRAP_RETRIES: u32 = 3;
const BOOTSTRAP_RETRY_DELAY: Duration = Duration::from_millis(500);

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
static EXTERNAL_DATABASE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// True when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes` (any case).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Print a skip marker and return `None` when skipping is enabled, panic
/// otherwise.
pub fn handle_cluster_setup_failure<T>(reason: impl Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

enum Backing {
    Embedded(TestCluster),
    External(MutexGuard<'static, ()>),
}

/// A migrated, empty database plus the runtime tests drive it with.
///
/// Fields drop in order: the pool closes before the cluster stops.
pub struct TestDatabase {
    pub pool: DbPool,
    pub runtime: Runtime,
    pub url: String,
    _backing: Backing,
}

/// Provision a database for one test.
pub fn test_database() -> Result<TestDatabase, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let (url, backing) = match external_database_url() {
        Some(url) => {
            let guard = EXTERNAL_DATABASE_LOCK
                .get_or_init(|| Mutex::new(()))
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            (url, Backing::External(guard))
        }
        None => {
            let cluster = embedded_cluster()?;
            let url = cluster.connection().database_url("postgres");
            (url, Backing::Embedded(cluster))
        }
    };

    reset_schema(&url)?;
    let config = PoolConfig::new(url.as_str())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestDatabase {
        pool,
        runtime,
        url,
        _backing: backing,
    })
}

fn external_database_url() -> Option<String> {
    std::env::var(TEST_DATABASE_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
}

fn reset_schema(url: &str) -> Result<(), String> {
    run_migrations(url).map_err(|err| format!("migrations: {err}"))?;
    let mut conn = PgConnection::establish(url).map_err(|err| format!("connect: {err}"))?;
    diesel::sql_query("TRUNCATE accounts, contacts, phone_numbers CASCADE")
        .execute(&mut conn)
        .map_err(|err| format!("truncate: {err}"))?;
    Ok(())
}

fn pg_embed_dir() -> PathBuf {
    std::env::var_os("CARGO_TARGET_DIR").map_or_else(
        || {
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("target")
                .join("pg-embed")
        },
        |target| PathBuf::from(target).join("pg-embed"),
    )
}

/// Install binaries under a shared directory and keep each cluster's data
/// apart.
fn workspace_dirs() -> Result<(String, String), std::io::Error> {
    let base = pg_embed_dir();
    let runtime_dir = base.join("install");
    let data_dir = base.join(format!("data-{}-{}", std::process::id(), Uuid::new_v4()));
    std::fs::create_dir_all(&runtime_dir)?;
    std::fs::create_dir_all(&data_dir)?;
    Ok((
        runtime_dir.to_string_lossy().into_owned(),
        data_dir.to_string_lossy().into_owned(),
    ))
}

fn is_transient(error: &str) -> bool {
    let error = error.to_lowercase();
    [
        "error decoding response body",
        "connection reset",
        "connection refused",
        "timed out",
        "timeout",
        "temporarily unavailable",
        "dns error",
    ]
    .iter()
    .any(|pattern| error.contains(pattern))
}

/// Boot an embedded cluster, retrying transient download failures.
///
/// `PG_RUNTIME_DIR` and `PG_DATA_DIR` are left alone when both are set;
/// otherwise both point into the cargo target directory for the duration of
/// the bootstrap.
fn embedded_cluster() -> Result<TestCluster, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    let needs_dirs =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    let _env = if needs_dirs {
        let (runtime_dir, data_dir) = workspace_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime_dir)),
            ("PG_DATA_DIR", Some(data_dir)),
        ]))
    } else {
        None
    };

    let mut attempt = 0;
    loop {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => {
                let error = format!("{err:?}");
                if attempt >= BOOTSTRAP_RETRIES || !is_transient(&error) {
                    return Err(error);
                }
                attempt += 1;
                eprintln!("pg-embed: transient error, retry {attempt}/{BOOTSTRAP_RETRIES}: {error}");
                std::thread::sleep(BOOTSTRAP_RETRY_DELAY * attempt);
            }
        }
    }
}
