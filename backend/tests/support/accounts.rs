//! Builders for account fixtures.

use backend::domain::{
    Account, AccountId, AccountParts, AccountStatus, ActivationCode, Contact, ContactId,
    EmailAddress, Mode, Nickname, PhoneNumber, PhoneNumberId,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

/// Fixed reference instant; `at(n)` is `n` minutes after it.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 2, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// `minutes` after [`t0`].
pub fn at(minutes: i64) -> DateTime<Utc> {
    t0() + Duration::minutes(minutes)
}

/// Fluent builder for a stored account.
pub struct AccountBuilder {
    parts: AccountParts,
    contact_seq: u128,
}

/// Start building an account with a deterministic id and activation code.
pub fn account(id: u128, nickname: &str) -> AccountBuilder {
    AccountBuilder {
        parts: AccountParts {
            id: AccountId::from_uuid(Uuid::from_u128(id)),
            nickname: Nickname::new(nickname).expect("valid nickname"),
            first_name: None,
            last_name: None,
            birth_date: None,
            gender: None,
            avatar: None,
            activation_code: ActivationCode::new(format!("{id:032x}")).expect("valid code"),
            status: AccountStatus::Active,
            mode: Mode::Offline,
            mode_at: t0(),
            created_at: t0(),
            contacts: Vec::new(),
        },
        contact_seq: 0,
    }
}

impl AccountBuilder {
    pub fn status(mut self, status: AccountStatus) -> Self {
        self.parts.status = status;
        self
    }

    pub fn mode(mut self, mode: Mode, mode_at: DateTime<Utc>) -> Self {
        self.parts.mode = mode;
        self.parts.mode_at = mode_at;
        self
    }

    pub fn names(mut self, first: &str, last: &str) -> Self {
        self.parts.first_name = Some(first.to_owned());
        self.parts.last_name = Some(last.to_owned());
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.parts.created_at = created_at;
        self
    }

    /// Add a contact; the first one added is flagged main.
    pub fn contact(self, email: &str) -> Self {
        self.push_contact(email, None)
    }

    /// Add a contact with an Israeli phone number.
    pub fn contact_with_phone(self, email: &str, national: i64) -> Self {
        self.push_contact(
            email,
            Some((national, format!("+972 {national}"), 972, "IL")),
        )
    }

    fn push_contact(mut self, email: &str, phone: Option<(i64, String, i32, &str)>) -> Self {
        self.contact_seq += 1;
        let account_bits = self.parts.id.as_uuid().as_u128();
        let contact_id = Uuid::from_u128((account_bits << 16) | self.contact_seq);
        let phone = phone.map(|(national, international, country_code, region)| PhoneNumber {
            id: PhoneNumberId::from_uuid(Uuid::from_u128(
                (account_bits << 16) | (self.contact_seq << 8),
            )),
            national: Some(national),
            international: Some(international),
            country_code: Some(country_code),
            region_code: Some(region.to_owned()),
        });
        let offset = i64::try_from(self.contact_seq).expect("few contacts");
        self.parts.contacts.push(Contact::new(
            ContactId::from_uuid(contact_id),
            EmailAddress::new(email).expect("valid email"),
            self.contact_seq == 1,
            self.parts.created_at + Duration::seconds(offset),
            phone,
        ));
        self
    }

    pub fn build(self) -> Account {
        Account::from_parts(self.parts)
    }
}
