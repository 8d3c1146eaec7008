//! Conversion between account aggregates and Diesel rows.
//!
//! A fetch-join returns one `(account, contact?, phone?)` tuple per contact;
//! [`fold_joined_rows`] collapses those tuples back into one aggregate per
//! account id, keeping the order in which ids first appear.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::ports::AccountPersistenceError;
use crate::domain::{
    Account, AccountId, AccountParts, AccountStatus, ActivationCode, Avatar, Contact, ContactId,
    EmailAddress, Gender, Mode, Nickname, PhoneNumber, PhoneNumberId,
};

use super::models::{AccountRow, ContactRow, PhoneNumberRow};

/// One row of the fetch-join.
pub(crate) type JoinedRow = (AccountRow, Option<ContactRow>, Option<PhoneNumberRow>);

fn corrupt(column: &str, detail: impl std::fmt::Display) -> AccountPersistenceError {
    AccountPersistenceError::query(format!("invalid stored value in {column}: {detail}"))
}

fn phone_from_row(row: PhoneNumberRow) -> PhoneNumber {
    PhoneNumber {
        id: PhoneNumberId::from_uuid(row.phone_number_id),
        national: row.national,
        international: row.international,
        country_code: row.country_code,
        region_code: row.region_code,
    }
}

fn contact_from_row(
    row: ContactRow,
    phone: Option<PhoneNumberRow>,
) -> Result<Contact, AccountPersistenceError> {
    let email = EmailAddress::new(row.email).map_err(|err| corrupt("contacts.email", err))?;
    Ok(Contact::new(
        ContactId::from_uuid(row.contact_id),
        email,
        row.main,
        row.created_at,
        phone.map(phone_from_row),
    ))
}

fn account_from_row(row: AccountRow) -> Result<Account, AccountPersistenceError> {
    let gender = row
        .gender
        .as_deref()
        .map(str::parse::<Gender>)
        .transpose()
        .map_err(|err| corrupt("accounts.gender", err))?;
    let avatar = row
        .avatar
        .map(serde_json::from_value::<Avatar>)
        .transpose()
        .map_err(|err| corrupt("accounts.avatar", err))?;

    Ok(Account::from_parts(AccountParts {
        id: AccountId::from_uuid(row.account_id),
        nickname: Nickname::new(row.nick_name).map_err(|err| corrupt("accounts.nick_name", err))?,
        first_name: row.first_name,
        last_name: row.last_name,
        birth_date: row.birth_date,
        gender,
        avatar,
        activation_code: ActivationCode::new(row.activation_code)
            .map_err(|err| corrupt("accounts.activation_code", err))?,
        status: row
            .status
            .parse::<AccountStatus>()
            .map_err(|err| corrupt("accounts.status", err))?,
        mode: row
            .mode
            .parse::<Mode>()
            .map_err(|err| corrupt("accounts.mode", err))?,
        mode_at: row.mode_at,
        created_at: row.created_at,
        contacts: Vec::new(),
    }))
}

/// Collapse fetch-join rows into aggregates, one per account id, ordered by
/// `order`. Ids in `order` without rows are skipped.
pub(crate) fn fold_joined_rows(
    rows: Vec<JoinedRow>,
    order: &[Uuid],
) -> Result<Vec<Account>, AccountPersistenceError> {
    let mut accounts: HashMap<Uuid, (AccountRow, Vec<Contact>)> = HashMap::new();
    for (account, contact, phone) in rows {
        let entry = accounts
            .entry(account.account_id)
            .or_insert_with(|| (account, Vec::new()));
        if let Some(contact) = contact {
            if entry.1.iter().all(|seen| *seen.id().as_uuid() != contact.contact_id) {
                entry.1.push(contact_from_row(contact, phone)?);
            }
        }
    }

    order
        .iter()
        .filter_map(|id| accounts.remove(id))
        .map(|(row, mut contacts)| {
            contacts.sort_by_key(|contact| (contact.created_at(), contact.id()));
            let account = account_from_row(row)?;
            Ok(contacts
                .into_iter()
                .fold(account, |account, contact| account.with_contact(contact)))
        })
        .collect()
}

/// Rows needed to store one aggregate.
pub(crate) struct AccountRows {
    pub account: AccountRow,
    pub phone_numbers: Vec<PhoneNumberRow>,
    pub contacts: Vec<ContactRow>,
}

/// Split an aggregate into its rows.
pub(crate) fn rows_from_account(account: &Account) -> Result<AccountRows, AccountPersistenceError> {
    let avatar = account
        .avatar()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|err| AccountPersistenceError::query(format!("serialise avatar: {err}")))?;
    let account_id = *account.id().as_uuid();

    let row = AccountRow {
        account_id,
        nick_name: account.nickname().as_str().to_owned(),
        first_name: account.first_name().map(str::to_owned),
        last_name: account.last_name().map(str::to_owned),
        birth_date: account.birth_date(),
        gender: account.gender().map(|gender| gender.as_str().to_owned()),
        avatar,
        activation_code: account.activation_code().as_str().to_owned(),
        status: account.status().as_str().to_owned(),
        mode: account.mode().as_str().to_owned(),
        mode_at: account.mode_at(),
        created_at: account.created_at(),
    };

    let mut phone_numbers = Vec::new();
    let mut contacts = Vec::with_capacity(account.contacts().len());
    for contact in account.contacts() {
        let phone_number_id = contact.phone_number().map(|phone| {
            phone_numbers.push(PhoneNumberRow {
                phone_number_id: *phone.id.as_uuid(),
                national: phone.national,
                international: phone.international.clone(),
                country_code: phone.country_code,
                region_code: phone.region_code.clone(),
            });
            *phone.id.as_uuid()
        });
        contacts.push(ContactRow {
            contact_id: *contact.id().as_uuid(),
            account_id,
            email: contact.email().as_str().to_owned(),
            main: contact.is_main(),
            phone_number_id,
            created_at: contact.created_at(),
        });
    }

    Ok(AccountRows {
        account: row,
        phone_numbers,
        contacts,
    })
}
