//! Deterministic account generation from a numeric seed.
//!
//! The same seed value always produces identical output.

use std::collections::HashSet;

use fake::Fake;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;
use rand::distr::Alphanumeric;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::error::GenerationError;
use crate::seed::{
    ContactSeed, ExampleAccountSeed, GenderSeed, ModeSeed, PhoneSeed, StatusSeed,
};

/// Shortest generated nickname.
pub const NICKNAME_MIN: usize = 4;
/// Longest generated nickname.
pub const NICKNAME_MAX: usize = 8;

/// Maximum number of attempts to generate an unused nickname.
const MAX_NICKNAME_ATTEMPTS: usize = 100;

/// Window for generated creation timestamps: three days.
const CREATED_WINDOW_SECONDS: i64 = 3 * 24 * 60 * 60;

const COUNTRY_CODE: i32 = 972;
const REGION_CODE: &str = "IL";
const NATIONAL_MIN: i64 = 100_000_000;
const NATIONAL_MAX: i64 = 999_999_999;
const EMAIL_DOMAIN: &str = "example.test";

/// Generates `count` example accounts from `seed`.
///
/// Every account has:
///
/// - Deterministic UUIDs for the account, its contact and phone number
/// - An alphanumeric nickname of 4–8 characters, unique ignoring case
/// - Random status, mode and gender
/// - One main contact `<nickname>@example.test` with an Israeli phone number
/// - A creation time within the last three days
///
/// # Errors
///
/// Returns [`GenerationError::NicknameGenerationFailed`] if an unused
/// nickname cannot be found after repeated attempts.
pub fn generate_example_accounts(
    seed: u64,
    count: usize,
) -> Result<Vec<ExampleAccountSeed>, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut taken = HashSet::with_capacity(count);
    let mut accounts = Vec::with_capacity(count);

    for _ in 0..count {
        let nickname = generate_nickname(&mut rng, &mut taken)?;
        accounts.push(generate_single_account(&mut rng, nickname));
    }

    Ok(accounts)
}

fn generate_single_account(rng: &mut ChaCha8Rng, nickname: String) -> ExampleAccountSeed {
    let id = Uuid::from_u128(rng.random());
    let first_name: String = FirstName(EN).fake_with_rng(rng);
    let last_name: String = LastName(EN).fake_with_rng(rng);
    let gender = pick(rng, &GenderSeed::ALL, GenderSeed::Male);
    let status = pick(rng, &StatusSeed::ALL, StatusSeed::Unconfirmed);
    let mode = pick(rng, &ModeSeed::ALL, ModeSeed::Offline);
    let activation_code = format!("{:032x}", rng.random::<u128>());
    let created_seconds_ago = rng.random_range(0..CREATED_WINDOW_SECONDS);

    let national = rng.random_range(NATIONAL_MIN..=NATIONAL_MAX);
    let phone = PhoneSeed {
        id: Uuid::from_u128(rng.random()),
        national,
        international: format!("+{COUNTRY_CODE} {national}"),
        country_code: COUNTRY_CODE,
        region_code: REGION_CODE.to_owned(),
    };
    let contact = ContactSeed {
        id: Uuid::from_u128(rng.random()),
        email: format!("{}@{EMAIL_DOMAIN}", nickname.to_lowercase()),
        main: true,
        phone,
    };

    ExampleAccountSeed {
        id,
        nickname,
        first_name,
        last_name,
        gender,
        status,
        mode,
        activation_code,
        created_seconds_ago,
        contact,
    }
}

fn generate_nickname(
    rng: &mut ChaCha8Rng,
    taken: &mut HashSet<String>,
) -> Result<String, GenerationError> {
    for _ in 0..MAX_NICKNAME_ATTEMPTS {
        let length = rng.random_range(NICKNAME_MIN..=NICKNAME_MAX);
        let candidate: String = (0..length)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();

        if taken.insert(candidate.to_lowercase()) {
            return Ok(candidate);
        }
    }

    Err(GenerationError::NicknameGenerationFailed {
        max_attempts: MAX_NICKNAME_ATTEMPTS,
    })
}

fn pick<T: Copy>(rng: &mut ChaCha8Rng, values: &[T], fallback: T) -> T {
    values.choose(rng).copied().unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn accounts() -> Vec<ExampleAccountSeed> {
        generate_example_accounts(42, 40).expect("generation should succeed")
    }

    #[rstest]
    fn generates_requested_count(accounts: Vec<ExampleAccountSeed>) {
        assert_eq!(accounts.len(), 40);
    }

    #[rstest]
    fn generation_is_deterministic(accounts: Vec<ExampleAccountSeed>) {
        let again = generate_example_accounts(42, 40).expect("generation should succeed");
        assert_eq!(accounts, again);
    }

    #[rstest]
    fn different_seeds_produce_different_accounts(accounts: Vec<ExampleAccountSeed>) {
        let other = generate_example_accounts(7, 40).expect("generation should succeed");
        assert_ne!(accounts.first().map(|a| a.id), other.first().map(|a| a.id));
    }

    #[rstest]
    fn nicknames_are_alphanumeric_and_bounded(accounts: Vec<ExampleAccountSeed>) {
        for account in &accounts {
            let length = account.nickname.chars().count();
            assert!(
                (NICKNAME_MIN..=NICKNAME_MAX).contains(&length),
                "bad nickname length: {account:?}"
            );
            assert!(account.nickname.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[rstest]
    fn nicknames_are_unique_ignoring_case(accounts: Vec<ExampleAccountSeed>) {
        let unique: HashSet<_> = accounts
            .iter()
            .map(|account| account.nickname.to_lowercase())
            .collect();
        assert_eq!(unique.len(), accounts.len());
    }

    #[rstest]
    fn contact_is_main_and_derived_from_nickname(accounts: Vec<ExampleAccountSeed>) {
        for account in &accounts {
            assert!(account.contact.main);
            assert_eq!(
                account.contact.email,
                format!("{}@{EMAIL_DOMAIN}", account.nickname.to_lowercase())
            );
        }
    }

    #[rstest]
    fn phone_numbers_are_israeli(accounts: Vec<ExampleAccountSeed>) {
        for account in &accounts {
            let phone = &account.contact.phone;
            assert_eq!(phone.country_code, COUNTRY_CODE);
            assert_eq!(phone.region_code, REGION_CODE);
            assert!((NATIONAL_MIN..=NATIONAL_MAX).contains(&phone.national));
            assert_eq!(phone.international, format!("+972 {}", phone.national));
        }
    }

    #[rstest]
    fn activation_codes_are_32_hex_chars(accounts: Vec<ExampleAccountSeed>) {
        for account in &accounts {
            assert_eq!(account.activation_code.len(), 32);
            assert!(
                account
                    .activation_code
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
            );
        }
    }

    #[rstest]
    fn creation_offsets_stay_within_three_days(accounts: Vec<ExampleAccountSeed>) {
        assert!(
            accounts
                .iter()
                .all(|account| (0..CREATED_WINDOW_SECONDS).contains(&account.created_seconds_ago))
        );
    }

    #[test]
    fn zero_count_yields_no_accounts() {
        let accounts = generate_example_accounts(1, 0).expect("generation should succeed");
        assert!(accounts.is_empty());
    }
}
