//! Startup seeding orchestration.

use example_data::{GenerationError, generate_example_accounts};
use mockable::Clock;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::AccountValidationError;
use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::example_data::accounts::account_from_seed;
use crate::example_data::config::ExampleDataSettings;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// The generator could not produce the requested accounts.
    #[error("example account generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// A generated seed did not form a valid account.
    #[error("generated account is invalid: {0}")]
    InvalidSeed(#[from] AccountValidationError),
    /// The repository rejected a lookup or write.
    #[error("example account persistence failed: {0}")]
    Persistence(#[from] AccountPersistenceError),
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedingSummary {
    /// Accounts written.
    pub saved: usize,
    /// Generated accounts whose nickname was already taken.
    pub skipped: usize,
}

/// Generate and store example accounts when enabled.
///
/// Accounts whose nickname already exists (ignoring case) are skipped, so
/// repeated runs with the same seed are idempotent.
///
/// # Examples
///
/// ```rust,no_run
/// use backend::example_data::{ExampleDataSettings, seed_example_accounts_on_startup};
/// use backend::outbound::memory::InMemoryAccountRepository;
/// use mockable::DefaultClock;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = ExampleDataSettings {
///     enabled: true,
///     seed: Some(7),
///     count: Some(10),
/// };
/// let repository = InMemoryAccountRepository::new();
/// let summary = seed_example_accounts_on_startup(&settings, &repository, &DefaultClock).await?;
/// assert!(summary.is_some());
/// # Ok(())
/// # }
/// ```
pub async fn seed_example_accounts_on_startup(
    settings: &ExampleDataSettings,
    repository: &dyn AccountRepository,
    clock: &dyn Clock,
) -> Result<Option<SeedingSummary>, StartupSeedingError> {
    if !settings.enabled {
        info!(reason = "disabled", "example data seeding skipped");
        return Ok(None);
    }

    let seed = settings.seed();
    let seeds = generate_example_accounts(seed, settings.count())?;
    let now = clock.utc();
    let mut summary = SeedingSummary {
        saved: 0,
        skipped: 0,
    };
    for generated in &seeds {
        let account = account_from_seed(generated, now)?;
        if repository
            .exists_by_nickname(account.nickname().as_str())
            .await?
        {
            warn!(
                nickname = account.nickname().as_str(),
                "example account nickname already taken; skipping"
            );
            summary.skipped += 1;
            continue;
        }
        repository.save(&account).await?;
        summary.saved += 1;
    }

    info!(
        seed,
        saved = summary.saved,
        skipped = summary.skipped,
        "example data seeding applied"
    );
    Ok(Some(summary))
}
