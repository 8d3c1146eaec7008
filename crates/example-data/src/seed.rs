//! Plain seed records produced by the generator.

use uuid::Uuid;

/// Account status drawn for a generated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusSeed {
    /// Registered but not yet confirmed.
    Unconfirmed,
    /// Confirmed and usable.
    Active,
    /// Temporarily blocked.
    Suspended,
    /// Soft-deleted.
    Deleted,
}

impl StatusSeed {
    /// Every status, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Unconfirmed,
        Self::Active,
        Self::Suspended,
        Self::Deleted,
    ];
}

/// Presence mode drawn for a generated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeSeed {
    /// Currently connected.
    Online,
    /// Not connected.
    Offline,
}

impl ModeSeed {
    /// Every mode, in declaration order.
    pub const ALL: [Self; 2] = [Self::Online, Self::Offline];
}

/// Gender drawn for a generated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenderSeed {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl GenderSeed {
    /// Every gender, in declaration order.
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];
}

/// Phone number attached to a generated contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneSeed {
    /// Phone number identifier.
    pub id: Uuid,
    /// National significant number.
    pub national: i64,
    /// International representation, e.g. `+972 501234567`.
    pub international: String,
    /// Country calling code.
    pub country_code: i32,
    /// ISO region code.
    pub region_code: String,
}

/// Contact attached to a generated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSeed {
    /// Contact identifier.
    pub id: Uuid,
    /// Contact email derived from the nickname.
    pub email: String,
    /// Whether this is the account's main contact.
    pub main: bool,
    /// Phone number of the contact.
    pub phone: PhoneSeed,
}

/// A generated account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleAccountSeed {
    /// Account identifier.
    pub id: Uuid,
    /// Alphanumeric nickname, unique (case-insensitively) within one batch.
    pub nickname: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Gender.
    pub gender: GenderSeed,
    /// Account status.
    pub status: StatusSeed,
    /// Presence mode.
    pub mode: ModeSeed,
    /// 32 lowercase hexadecimal characters.
    pub activation_code: String,
    /// How many seconds before "now" the account was created.
    pub created_seconds_ago: i64,
    /// The account's single main contact.
    pub contact: ContactSeed,
}
