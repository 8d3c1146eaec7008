//! Integration tests for `DieselAccountRepository` against PostgreSQL.
//!
//! Every test provisions its own migrated database through
//! `support::cluster` (an embedded cluster, or `ACCOUNTS_TEST_DATABASE_URL`
//! when set) and drives the async repository on the context's runtime.

use backend::domain::ports::{AccountPersistenceError, AccountRepository};
use backend::domain::{Account, AccountFilter, AccountStatus, Mode};
use backend::outbound::persistence::DieselAccountRepository;
use pagination::{Direction, PageRequest, Sort, SortOrder};
use rstest::{fixture, rstest};

mod support;

use support::accounts::{account, at, t0};
use support::cluster::{TestDatabase, handle_cluster_setup_failure, test_database};

fn fixtures() -> Vec<Account> {
    vec![
        account(1, "mara7")
            .names("Anna Maria", "Levi")
            .status(AccountStatus::Active)
            .mode(Mode::Online, t0())
            .contact_with_phone("mara@example.test", 501_234_567)
            .contact_with_phone("mara.work@corp.test", 527_654_321)
            .contact_with_phone("m7@example.test", 531_112_233)
            .build(),
        account(2, "boris1")
            .names("Boris", "Katz")
            .status(AccountStatus::Unconfirmed)
            .mode(Mode::Offline, at(10))
            .contact("boris@example.test")
            .build(),
        account(3, "Quill")
            .status(AccountStatus::Active)
            .mode(Mode::Online, at(20))
            .build(),
    ]
}

struct TestContext {
    repository: DieselAccountRepository,
    database: TestDatabase,
}

impl TestContext {
    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.database.runtime.block_on(future)
    }
}

fn setup_context(seed: bool) -> Result<TestContext, String> {
    let database = test_database()?;
    let repository = DieselAccountRepository::new(database.pool.clone());
    if seed {
        for account in fixtures() {
            database
                .runtime
                .block_on(repository.save(&account))
                .map_err(|err| format!("seed {}: {err}", account.nickname().as_str()))?;
        }
    }
    Ok(TestContext {
        repository,
        database,
    })
}

#[fixture]
fn seeded() -> Option<TestContext> {
    match setup_context(true) {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[fixture]
fn empty() -> Option<TestContext> {
    match setup_context(false) {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn nicknames(accounts: &[Account]) -> Vec<&str> {
    accounts
        .iter()
        .map(|account| account.nickname().as_str())
        .collect()
}

#[rstest]
fn saved_accounts_round_trip_with_contacts(seeded: Option<TestContext>) {
    let Some(context) = seeded else {
        eprintln!("SKIP-TEST-CLUSTER: saved_accounts_round_trip_with_contacts skipped");
        return;
    };

    let found = context
        .block_on(
            context
                .repository
                .find_by_filter(&AccountFilter::builder().nickname("MARA7").build()),
        )
        .expect("query succeeds");

    assert_eq!(found.len(), 1);
    assert_eq!(found[0], fixtures().remove(0));
}

#[rstest]
fn account_with_three_contacts_is_counted_once(seeded: Option<TestContext>) {
    let Some(context) = seeded else {
        eprintln!("SKIP-TEST-CLUSTER: account_with_three_contacts_is_counted_once skipped");
        return;
    };
    let filter = AccountFilter::builder().search_text("example.test").build();
    let request = PageRequest::paged(0, 1, Sort::unsorted()).expect("valid page");

    let page = context
        .block_on(context.repository.find_page_by_filter(&filter, &request))
        .expect("query succeeds");

    assert_eq!(nicknames(page.content()), vec!["mara7"]);
    assert_eq!(page.content()[0].contacts().len(), 3);
    assert_eq!(page.total_elements(), 2);
}

#[rstest]
fn accounts_without_contacts_match_account_predicates(seeded: Option<TestContext>) {
    let Some(context) = seeded else {
        eprintln!("SKIP-TEST-CLUSTER: accounts_without_contacts_match_account_predicates skipped");
        return;
    };
    let filter = AccountFilter::builder().mode(Mode::Online).build();
    let sort = Sort::by(vec![SortOrder::new("modeAt", Direction::Desc)]);
    let request = PageRequest::paged(0, 10, sort).expect("valid page");

    let page = context
        .block_on(context.repository.find_page_by_filter(&filter, &request))
        .expect("query succeeds");

    assert_eq!(nicknames(page.content()), vec!["Quill", "mara7"]);
    assert_eq!(page.total_elements(), 2);
}

#[rstest]
#[case("52765", vec!["mara7"])]
#[case("972", vec!["mara7"])]
#[case("KATZ", vec!["boris1"])]
#[case("anna  maria", vec!["mara7"])]
#[case("anna   maria", vec![])]
fn search_matches_like_the_in_memory_store(
    seeded: Option<TestContext>,
    #[case] text: &str,
    #[case] expected: Vec<&str>,
) {
    let Some(context) = seeded else {
        eprintln!("SKIP-TEST-CLUSTER: search_matches_like_the_in_memory_store skipped");
        return;
    };
    let filter = AccountFilter::builder().search_text(text).build();
    let request = PageRequest::paged(0, 10, Sort::unsorted()).expect("valid page");

    let page = context
        .block_on(context.repository.find_page_by_filter(&filter, &request))
        .expect("query succeeds");

    assert_eq!(nicknames(page.content()), expected);
}

#[rstest]
fn search_total_is_counted_on_full_pages(seeded: Option<TestContext>) {
    let Some(context) = seeded else {
        eprintln!("SKIP-TEST-CLUSTER: search_total_is_counted_on_full_pages skipped");
        return;
    };
    let filter = AccountFilter::builder().search_text("EXAMPLE.TEST").build();
    let sort = Sort::by(vec![SortOrder::new("modeAt", Direction::Asc)]);

    let mut seen = Vec::new();
    for index in 0..2 {
        let request = PageRequest::paged(index, 1, sort.clone()).expect("valid page");
        let page = context
            .block_on(context.repository.find_page_by_filter(&filter, &request))
            .expect("query succeeds");
        assert_eq!(page.total_elements(), 2);
        seen.extend(page.into_content());
    }

    assert_eq!(nicknames(&seen), vec!["mara7", "boris1"]);
}

#[rstest]
fn mode_at_window_selects_the_exact_instant(seeded: Option<TestContext>) {
    let Some(context) = seeded else {
        eprintln!("SKIP-TEST-CLUSTER: mode_at_window_selects_the_exact_instant skipped");
        return;
    };
    let filter = AccountFilter::builder()
        .status(AccountStatus::Active)
        .mode_at_from(t0())
        .mode_at_to(t0())
        .build();
    let request = PageRequest::paged(0, 10, Sort::unsorted()).expect("valid page");

    let page = context
        .block_on(context.repository.find_page_by_filter(&filter, &request))
        .expect("query succeeds");

    assert_eq!(nicknames(page.content()), vec!["mara7"]);
    assert_eq!(page.total_elements(), 1);
}

#[rstest]
fn pages_sum_to_the_total(seeded: Option<TestContext>) {
    let Some(context) = seeded else {
        eprintln!("SKIP-TEST-CLUSTER: pages_sum_to_the_total skipped");
        return;
    };
    let sort = Sort::by(vec![SortOrder::new("modeAt", Direction::Asc)]);

    let mut seen = Vec::new();
    for index in 0..2 {
        let request = PageRequest::paged(index, 2, sort.clone()).expect("valid page");
        let page = context
            .block_on(
                context
                    .repository
                    .find_page_by_filter(&AccountFilter::default(), &request),
            )
            .expect("query succeeds");
        assert_eq!(page.total_elements(), 3);
        seen.extend(page.into_content());
    }

    assert_eq!(nicknames(&seen), vec!["mara7", "boris1", "Quill"]);
}

#[rstest]
fn save_replaces_contacts_and_phones(seeded: Option<TestContext>) {
    let Some(context) = seeded else {
        eprintln!("SKIP-TEST-CLUSTER: save_replaces_contacts_and_phones skipped");
        return;
    };
    let replacement = account(1, "mara7")
        .status(AccountStatus::Suspended)
        .mode(Mode::Offline, at(60))
        .contact("mara.new@example.test")
        .build();

    context
        .block_on(context.repository.save(&replacement))
        .expect("save succeeds");
    let found = context
        .block_on(
            context
                .repository
                .find_by_filter(&AccountFilter::builder().email("mara.new@example.test").build()),
        )
        .expect("query succeeds");
    let stale = context
        .block_on(
            context
                .repository
                .find_by_filter(&AccountFilter::builder().email("mara@example.test").build()),
        )
        .expect("query succeeds");

    assert_eq!(found, vec![replacement]);
    assert!(stale.is_empty());
}

#[rstest]
fn nickname_existence_ignores_case(seeded: Option<TestContext>) {
    let Some(context) = seeded else {
        eprintln!("SKIP-TEST-CLUSTER: nickname_existence_ignores_case skipped");
        return;
    };

    let upper = context.block_on(context.repository.exists_by_nickname("QUILL"));
    let prefix = context.block_on(context.repository.exists_by_nickname("quil"));

    assert!(upper.expect("lookup"));
    assert!(!prefix.expect("lookup"));
}

#[rstest]
fn unknown_sort_property_is_rejected_before_querying(empty: Option<TestContext>) {
    let Some(context) = empty else {
        eprintln!("SKIP-TEST-CLUSTER: unknown_sort_property_is_rejected_before_querying skipped");
        return;
    };
    let request = PageRequest::paged(
        0,
        10,
        Sort::by(vec![SortOrder::new("shoeSize", Direction::Asc)]),
    )
    .expect("valid page");

    let error = context
        .block_on(
            context
                .repository
                .find_page_by_filter(&AccountFilter::default(), &request),
        )
        .expect_err("sort rejected");

    assert!(matches!(error, AccountPersistenceError::InvalidArgument { .. }));
}
