//! Account aggregate: an account with its contacts and phone numbers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod contact;
mod status;

pub use self::contact::{
    Contact, ContactId, EmailAddress, PhoneNumber, PhoneNumberId,
};
pub use self::status::{AccountStatus, Gender, Mode, ParseAccountEnumError};

/// Validation errors returned by account value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// Identifier text is not a UUID.
    #[error("account id must be a valid UUID")]
    InvalidId,
    /// Nickname is empty or whitespace only.
    #[error("nickname must not be empty")]
    EmptyNickname,
    /// Activation code is not 32 lowercase hexadecimal characters.
    #[error("activation code must be 32 lowercase hexadecimal characters")]
    InvalidActivationCode,
    /// Email address has no `local@domain.tld` shape.
    #[error("invalid email address: {email:?}")]
    InvalidEmail {
        /// Offending input.
        email: String,
    },
}

/// Stable account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AccountId {
    type Err = AccountValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| AccountValidationError::InvalidId)
    }
}

/// Public handle of an account.
///
/// Stored as entered; uniqueness and lookups compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nickname(String);

impl Nickname {
    /// Validate and construct a nickname.
    pub fn new(nickname: impl Into<String>) -> Result<Self, AccountValidationError> {
        let nickname = nickname.into();
        if nickname.trim().is_empty() {
            return Err(AccountValidationError::EmptyNickname);
        }
        Ok(Self(nickname))
    }

    /// Borrow the nickname as entered.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Nickname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Nickname> for String {
    fn from(value: Nickname) -> Self {
        value.0
    }
}

impl TryFrom<String> for Nickname {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Length of an activation code.
pub const ACTIVATION_CODE_LEN: usize = 32;

/// Single-use activation code issued when the account is created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActivationCode(String);

impl ActivationCode {
    /// Issue a fresh random code.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Validate and wrap an existing code.
    pub fn new(code: impl Into<String>) -> Result<Self, AccountValidationError> {
        let code = code.into();
        let well_formed = code.len() == ACTIVATION_CODE_LEN
            && code
                .bytes()
                .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte));
        if !well_formed {
            return Err(AccountValidationError::InvalidActivationCode);
        }
        Ok(Self(code))
    }

    /// Borrow the code.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ActivationCode> for String {
    fn from(value: ActivationCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for ActivationCode {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Profile picture reference, stored as a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    /// Location of the image.
    pub url: String,
}

/// Every stored attribute of an account, used by adapters to rehydrate one.
#[derive(Debug, Clone)]
pub struct AccountParts {
    /// Identifier.
    pub id: AccountId,
    /// Nickname.
    pub nickname: Nickname,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Date of birth.
    pub birth_date: Option<DateTime<Utc>>,
    /// Gender.
    pub gender: Option<Gender>,
    /// Avatar.
    pub avatar: Option<Avatar>,
    /// Activation code.
    pub activation_code: ActivationCode,
    /// Lifecycle state.
    pub status: AccountStatus,
    /// Presence mode.
    pub mode: Mode,
    /// When `mode` last changed.
    pub mode_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Owned contacts.
    pub contacts: Vec<Contact>,
}

/// An account with its contacts.
///
/// `mode_at` always records the moment `mode` was last set; the only way to
/// change the mode is [`Account::set_mode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    id: AccountId,
    nickname: Nickname,
    first_name: Option<String>,
    last_name: Option<String>,
    birth_date: Option<DateTime<Utc>>,
    gender: Option<Gender>,
    avatar: Option<Avatar>,
    activation_code: ActivationCode,
    status: AccountStatus,
    mode: Mode,
    mode_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    contacts: Vec<Contact>,
}

impl Account {
    /// Register a new account: unconfirmed, offline, with a fresh activation
    /// code and both timestamps taken from `clock`.
    pub fn register(nickname: Nickname, clock: &dyn Clock) -> Self {
        let now = clock.utc();
        Self {
            id: AccountId::random(),
            nickname,
            first_name: None,
            last_name: None,
            birth_date: None,
            gender: None,
            avatar: None,
            activation_code: ActivationCode::generate(),
            status: AccountStatus::default(),
            mode: Mode::default(),
            mode_at: now,
            created_at: now,
            contacts: Vec::new(),
        }
    }

    /// Rehydrate an account from stored attributes.
    pub fn from_parts(parts: AccountParts) -> Self {
        let AccountParts {
            id,
            nickname,
            first_name,
            last_name,
            birth_date,
            gender,
            avatar,
            activation_code,
            status,
            mode,
            mode_at,
            created_at,
            contacts,
        } = parts;
        Self {
            id,
            nickname,
            first_name,
            last_name,
            birth_date,
            gender,
            avatar,
            activation_code,
            status,
            mode,
            mode_at,
            created_at,
            contacts,
        }
    }

    /// Set given and family names.
    pub fn with_names(mut self, first_name: Option<String>, last_name: Option<String>) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    /// Set the date of birth.
    pub fn with_birth_date(mut self, birth_date: Option<DateTime<Utc>>) -> Self {
        self.birth_date = birth_date;
        self
    }

    /// Set the gender.
    pub fn with_gender(mut self, gender: Option<Gender>) -> Self {
        self.gender = gender;
        self
    }

    /// Set the avatar.
    pub fn with_avatar(mut self, avatar: Option<Avatar>) -> Self {
        self.avatar = avatar;
        self
    }

    /// Set the lifecycle state.
    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.status = status;
        self
    }

    /// Override the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Attach a contact.
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contacts.push(contact);
        self
    }

    /// Change the presence mode, stamping `mode_at` from `clock`.
    pub fn set_mode(&mut self, mode: Mode, clock: &dyn Clock) {
        self.mode = mode;
        self.mode_at = clock.utc();
    }

    /// Identifier.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// Nickname.
    pub fn nickname(&self) -> &Nickname {
        &self.nickname
    }

    /// Given name.
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Family name.
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Date of birth.
    pub fn birth_date(&self) -> Option<DateTime<Utc>> {
        self.birth_date
    }

    /// Gender.
    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    /// Avatar.
    pub fn avatar(&self) -> Option<&Avatar> {
        self.avatar.as_ref()
    }

    /// Activation code.
    pub fn activation_code(&self) -> &ActivationCode {
        &self.activation_code
    }

    /// Lifecycle state.
    pub fn status(&self) -> AccountStatus {
        self.status
    }

    /// Presence mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// When the mode last changed.
    pub fn mode_at(&self) -> DateTime<Utc> {
        self.mode_at
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Owned contacts, in insertion order.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// First contact flagged as main.
    pub fn primary_contact(&self) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.is_main())
    }

    /// Contact used for notifications: the primary contact, or the oldest
    /// contact when none is flagged main.
    pub fn notification_contact(&self) -> Option<&Contact> {
        self.primary_contact()
            .or_else(|| self.contacts.iter().min_by_key(|contact| contact.created_at()))
    }
}
