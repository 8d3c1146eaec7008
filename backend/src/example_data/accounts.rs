//! Conversion of generated seeds into account aggregates.

use chrono::{DateTime, Duration, Utc};
use example_data::{ExampleAccountSeed, GenderSeed, ModeSeed, StatusSeed};

use crate::domain::{
    Account, AccountId, AccountParts, AccountStatus, AccountValidationError, ActivationCode,
    Contact, ContactId, EmailAddress, Gender, Mode, Nickname, PhoneNumber, PhoneNumberId,
};

fn status(seed: StatusSeed) -> AccountStatus {
    match seed {
        StatusSeed::Unconfirmed => AccountStatus::Unconfirmed,
        StatusSeed::Active => AccountStatus::Active,
        StatusSeed::Suspended => AccountStatus::Suspended,
        StatusSeed::Deleted => AccountStatus::Deleted,
    }
}

fn mode(seed: ModeSeed) -> Mode {
    match seed {
        ModeSeed::Online => Mode::Online,
        ModeSeed::Offline => Mode::Offline,
    }
}

fn gender(seed: GenderSeed) -> Gender {
    match seed {
        GenderSeed::Male => Gender::Male,
        GenderSeed::Female => Gender::Female,
    }
}

/// Build an account from a generated seed, dating it relative to `now`.
///
/// The mode is stamped at creation time and the single contact is created
/// together with the account.
///
/// # Errors
///
/// Returns [`AccountValidationError`] when the seed carries an empty
/// nickname, a malformed activation code or an invalid email.
pub fn account_from_seed(
    seed: &ExampleAccountSeed,
    now: DateTime<Utc>,
) -> Result<Account, AccountValidationError> {
    let created_at = now - Duration::seconds(seed.created_seconds_ago);
    let phone = &seed.contact.phone;
    let contact = Contact::new(
        ContactId::from_uuid(seed.contact.id),
        EmailAddress::new(seed.contact.email.as_str())?,
        seed.contact.main,
        created_at,
        Some(PhoneNumber {
            id: PhoneNumberId::from_uuid(phone.id),
            national: Some(phone.national),
            international: Some(phone.international.clone()),
            country_code: Some(phone.country_code),
            region_code: Some(phone.region_code.clone()),
        }),
    );

    Ok(Account::from_parts(AccountParts {
        id: AccountId::from_uuid(seed.id),
        nickname: Nickname::new(seed.nickname.as_str())?,
        first_name: Some(seed.first_name.clone()),
        last_name: Some(seed.last_name.clone()),
        birth_date: None,
        gender: Some(gender(seed.gender)),
        avatar: None,
        activation_code: ActivationCode::new(seed.activation_code.as_str())?,
        status: status(seed.status),
        mode: mode(seed.mode),
        mode_at: created_at,
        created_at,
        contacts: vec![contact],
    }))
}
