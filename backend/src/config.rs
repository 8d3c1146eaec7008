//! Database settings loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE, PoolConfig,
};

/// Connection settings for the account store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNTS")]
pub struct AccountsSettings {
    /// PostgreSQL connection URL; without it only the in-memory store is
    /// available.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
    /// Idle connections kept open.
    pub pool_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout_secs: Option<u64>,
}

impl AccountsSettings {
    /// Pool configuration for the configured database, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use backend::config::AccountsSettings;
    ///
    /// let settings = AccountsSettings {
    ///     database_url: Some("postgres://localhost/accounts".to_owned()),
    ///     pool_max_size: Some(4),
    ///     pool_min_idle: None,
    ///     connection_timeout_secs: None,
    /// };
    /// let config = settings.pool_config().expect("database configured");
    /// assert_eq!(config.max_size(), 4);
    /// ```
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let database_url = self.database_url.as_deref()?.trim();
        if database_url.is_empty() {
            return None;
        }
        let timeout = self
            .connection_timeout_secs
            .map_or(DEFAULT_CONNECTION_TIMEOUT, Duration::from_secs);
        Some(
            PoolConfig::new(database_url)
                .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_MAX_SIZE))
                .with_min_idle(Some(self.pool_min_idle.unwrap_or(DEFAULT_MIN_IDLE)))
                .with_connection_timeout(timeout),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for database configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> AccountsSettings {
        AccountsSettings::load_from_iter([OsString::from("backend")]).expect("config should load")
    }

    #[rstest]
    fn missing_database_url_yields_no_pool() {
        let _guard = lock_env([
            ("ACCOUNTS_DATABASE_URL", None::<String>),
            ("ACCOUNTS_POOL_MAX_SIZE", None::<String>),
            ("ACCOUNTS_POOL_MIN_IDLE", None::<String>),
            ("ACCOUNTS_CONNECTION_TIMEOUT_SECS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.database_url.is_none());
        assert!(settings.pool_config().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "ACCOUNTS_DATABASE_URL",
                Some("postgres://db.internal/accounts".to_owned()),
            ),
            ("ACCOUNTS_POOL_MAX_SIZE", Some("3".to_owned())),
            ("ACCOUNTS_POOL_MIN_IDLE", Some("1".to_owned())),
            ("ACCOUNTS_CONNECTION_TIMEOUT_SECS", Some("5".to_owned())),
        ]);

        let config = load_from_empty_args()
            .pool_config()
            .expect("database configured");
        assert_eq!(config.database_url(), "postgres://db.internal/accounts");
        assert_eq!(config.max_size(), 3);
        assert_eq!(config.min_idle(), Some(1));
        assert_eq!(config.connection_timeout(), Duration::from_secs(5));
    }

    #[rstest]
    fn defaults_fill_unset_pool_values() {
        let settings = AccountsSettings {
            database_url: Some("postgres://localhost/accounts".to_owned()),
            pool_max_size: None,
            pool_min_idle: None,
            connection_timeout_secs: None,
        };

        let config = settings.pool_config().expect("database configured");
        assert_eq!(config.max_size(), DEFAULT_MAX_SIZE);
        assert_eq!(config.min_idle(), Some(DEFAULT_MIN_IDLE));
        assert_eq!(config.connection_timeout(), DEFAULT_CONNECTION_TIMEOUT);
    }

    #[rstest]
    fn blank_database_url_yields_no_pool() {
        let settings = AccountsSettings {
            database_url: Some("   ".to_owned()),
            pool_max_size: None,
            pool_min_idle: None,
            connection_timeout_secs: None,
        };
        assert!(settings.pool_config().is_none());
    }
}
