//! Query accounts with an optional filter and print the page as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;

use backend::config::AccountsSettings;
use backend::domain::ports::{AccountRepository, AccountsQuery};
use backend::domain::{AccountFilter, AccountId, AccountStatus, AccountsQueryService, Mode};
use backend::outbound::memory::InMemoryAccountRepository;
use backend::outbound::persistence::{DbPool, DieselAccountRepository, run_migrations};
use chrono::{DateTime, Utc};
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use pagination::{PageRequest, Sort};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_PAGE_SIZE: u32 = 20;

/// `query-accounts` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "query-accounts",
    about = "Filter, search and page accounts from the configured store",
    version
)]
struct CliArgs {
    /// Account id; repeat for several.
    #[arg(long = "id", value_name = "uuid")]
    ids: Vec<AccountId>,
    /// Nickname, matched ignoring case; repeat for several.
    #[arg(long = "nickname", value_name = "nickname")]
    nicknames: Vec<String>,
    /// Presence mode (`online`, `offline`); repeat for several.
    #[arg(long = "mode", value_name = "mode")]
    modes: Vec<Mode>,
    /// Account status; repeat for several.
    #[arg(long = "status", value_name = "status")]
    statuses: Vec<AccountStatus>,
    /// Activation code; repeat for several.
    #[arg(long = "activation-code", value_name = "code")]
    activation_codes: Vec<String>,
    /// Contact email; only used when listing without paging or search.
    #[arg(
        long = "email",
        value_name = "email",
        conflicts_with_all = ["search", "page", "size", "sort"]
    )]
    emails: Vec<String>,
    /// Earliest mode change, RFC 3339.
    #[arg(long = "mode-at-from", value_name = "timestamp")]
    mode_at_from: Option<DateTime<Utc>>,
    /// Latest mode change, RFC 3339.
    #[arg(long = "mode-at-to", value_name = "timestamp")]
    mode_at_to: Option<DateTime<Utc>>,
    /// Free text searched across names, codes, emails and phone numbers.
    #[arg(long = "search", value_name = "text")]
    search: Option<String>,
    /// Zero-based page index.
    #[arg(long = "page", value_name = "index")]
    page: Option<u32>,
    /// Page size.
    #[arg(long = "size", value_name = "count")]
    size: Option<u32>,
    /// Sort as `property[,asc|desc];...`.
    #[arg(long = "sort", value_name = "sort", value_parser = Sort::parse)]
    sort: Option<Sort>,
    /// Apply pending schema migrations before querying.
    #[arg(long = "migrate")]
    migrate: bool,
}

impl CliArgs {
    fn filter(&self) -> AccountFilter {
        let mut builder = AccountFilter::builder()
            .ids(self.ids.iter().copied())
            .nicknames(self.nicknames.iter().cloned())
            .modes(self.modes.iter().copied())
            .statuses(self.statuses.iter().copied())
            .activation_codes(self.activation_codes.iter().cloned())
            .emails(self.emails.iter().cloned());
        if let Some(from) = self.mode_at_from {
            builder = builder.mode_at_from(from);
        }
        if let Some(to) = self.mode_at_to {
            builder = builder.mode_at_to(to);
        }
        if let Some(text) = &self.search {
            builder = builder.search_text(text.clone());
        }
        builder.build()
    }

    /// Paged when any of `--page`, `--size` or `--sort` is given. Search
    /// text alone selects the search path without a page window.
    fn page_request(&self) -> Result<Option<PageRequest>> {
        if self.page.is_none() && self.size.is_none() && self.sort.is_none() {
            return Ok(self.search.as_ref().map(|_| PageRequest::unpaged()));
        }
        let request = PageRequest::paged(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
            self.sort.clone().unwrap_or_default(),
        )
        .wrap_err("invalid page request")?;
        Ok(Some(request))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = AccountsSettings::load_from_iter([OsString::from("query-accounts")])
        .wrap_err("load account settings")?;

    match settings.pool_config() {
        Some(config) => {
            if args.migrate {
                let url = config.database_url().to_owned();
                tokio::task::spawn_blocking(move || run_migrations(&url))
                    .await
                    .wrap_err("migration task panicked")??;
            }
            let pool = DbPool::new(config).await.wrap_err("create database pool")?;
            run(DieselAccountRepository::new(pool), &args).await
        }
        None => {
            if args.migrate {
                return Err(eyre!("--migrate requires ACCOUNTS_DATABASE_URL"));
            }
            info!("ACCOUNTS_DATABASE_URL not set; using the in-memory store");
            run(InMemoryAccountRepository::new(), &args).await
        }
    }
}

async fn run<R: AccountRepository>(repository: R, args: &CliArgs) -> Result<()> {
    seed(&repository).await?;
    let output = render(&AccountsQueryService::new(repository), args).await?;
    println!("{output}");
    Ok(())
}

async fn render<Q: AccountsQuery>(service: &Q, args: &CliArgs) -> Result<String> {
    let filter = args.filter();
    let output = match args.page_request()? {
        Some(page) => serde_json::to_string_pretty(&service.page_accounts(&filter, &page).await?)?,
        None => serde_json::to_string_pretty(&service.list_accounts(&filter).await?)?,
    };
    Ok(output)
}

#[cfg(feature = "example-data")]
async fn seed(repository: &dyn AccountRepository) -> Result<()> {
    use backend::example_data::{ExampleDataSettings, seed_example_accounts_on_startup};
    use mockable::DefaultClock;

    let settings = ExampleDataSettings::load_from_iter([OsString::from("query-accounts")])
        .wrap_err("load example data settings")?;
    seed_example_accounts_on_startup(&settings, repository, &DefaultClock).await?;
    Ok(())
}

#[cfg(not(feature = "example-data"))]
async fn seed(_repository: &dyn AccountRepository) -> Result<()> {
    Ok(())
}
