//! Store-independent filter conditions over the account graph.
//!
//! A condition names a [`Field`] of `accounts`, `contacts` or
//! `phone_numbers` and constrains it. A slice of conditions is an implicit
//! conjunction; an empty slice matches everything. Adapters either lower
//! conditions into their query language or evaluate them in memory with
//! [`eval`].

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::account::{AccountStatus, Mode};

pub mod eval;

/// Table a field is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// The account row itself.
    Account,
    /// A joined contact row; absent for accounts without contacts.
    Contact,
    /// A joined phone number row; absent for contacts without a phone.
    PhoneNumber,
}

/// Shape of the values a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// UUID identifiers.
    Uuid,
    /// Free text.
    Text,
    /// [`Mode`] stored as text.
    Mode,
    /// [`AccountStatus`] stored as text.
    Status,
    /// UTC timestamps.
    Timestamp,
    /// Integers; only searchable through their text rendering.
    Integer,
}

/// Filterable field of the account graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    AccountId,
    Nickname,
    FirstName,
    LastName,
    Mode,
    ModeAt,
    Status,
    ActivationCode,
    ContactEmail,
    PhoneNational,
    PhoneInternational,
    PhoneCountryCode,
    PhoneRegionCode,
}

impl Field {
    /// Table the field lives on.
    pub const fn table(self) -> Table {
        match self {
            Self::AccountId
            | Self::Nickname
            | Self::FirstName
            | Self::LastName
            | Self::Mode
            | Self::ModeAt
            | Self::Status
            | Self::ActivationCode => Table::Account,
            Self::ContactEmail => Table::Contact,
            Self::PhoneNational
            | Self::PhoneInternational
            | Self::PhoneCountryCode
            | Self::PhoneRegionCode => Table::PhoneNumber,
        }
    }

    /// Kind of value stored in the field.
    pub const fn kind(self) -> FieldKind {
        match self {
            Self::AccountId => FieldKind::Uuid,
            Self::Nickname
            | Self::FirstName
            | Self::LastName
            | Self::ActivationCode
            | Self::ContactEmail
            | Self::PhoneInternational
            | Self::PhoneRegionCode => FieldKind::Text,
            Self::Mode => FieldKind::Mode,
            Self::Status => FieldKind::Status,
            Self::ModeAt => FieldKind::Timestamp,
            Self::PhoneNational | Self::PhoneCountryCode => FieldKind::Integer,
        }
    }

    /// Column name in the relational schema.
    pub const fn column(self) -> &'static str {
        match self {
            Self::AccountId => "account_id",
            Self::Nickname => "nick_name",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Mode => "mode",
            Self::ModeAt => "mode_at",
            Self::Status => "status",
            Self::ActivationCode => "activation_code",
            Self::ContactEmail => "email",
            Self::PhoneNational => "national",
            Self::PhoneInternational => "international",
            Self::PhoneCountryCode => "country_code",
            Self::PhoneRegionCode => "region_code",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        matches!(
            (self.kind(), value),
            (FieldKind::Uuid, Value::Uuid(_))
                | (FieldKind::Text, Value::Text(_))
                | (FieldKind::Mode, Value::Mode(_))
                | (FieldKind::Status, Value::Status(_))
                | (FieldKind::Timestamp, Value::Timestamp(_))
        )
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = match self.table() {
            Table::Account => "accounts",
            Table::Contact => "contacts",
            Table::PhoneNumber => "phone_numbers",
        };
        write!(f, "{table}.{}", self.column())
    }
}

/// Literal compared against a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Uuid(Uuid),
    Text(String),
    Mode(Mode),
    Status(AccountStatus),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Text form used when the value is compared against stored text:
    /// enums render as their lowercase names.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Mode(mode) => Some(mode.as_str()),
            Self::Status(status) => Some(status.as_str()),
            Self::Uuid(_) | Self::Timestamp(_) => None,
        }
    }

    /// UUID payload.
    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            Self::Uuid(id) => Some(*id),
            _ => None,
        }
    }

    /// Timestamp payload.
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(at) => Some(*at),
            _ => None,
        }
    }
}

/// Case handling for text equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Case {
    /// Compare exactly.
    #[default]
    Sensitive,
    /// Lower-case both sides before comparing.
    Insensitive,
}

/// Inclusive range bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    /// `field >= value`.
    AtLeast(Value),
    /// `field <= value`.
    AtMost(Value),
}

impl Bound {
    /// Bound value.
    pub fn value(&self) -> &Value {
        match self {
            Self::AtLeast(value) | Self::AtMost(value) => value,
        }
    }
}

/// A single constraint on the account graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `field = value`.
    Equals {
        field: Field,
        value: Value,
        case: Case,
    },
    /// `field IN (values)`; an empty set matches nothing.
    InSet {
        field: Field,
        values: Vec<Value>,
        case: Case,
    },
    /// Inclusive range on an ordered field.
    Range { field: Field, bound: Bound },
    /// Case-insensitive SQL `LIKE` against the field's text rendering.
    Like { field: Field, pattern: String },
    /// Disjunction; an empty list matches nothing.
    Or(Vec<Condition>),
}

/// Errors raised when a condition does not fit its field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    /// The operation or value kind cannot be applied to the field.
    #[error("`{operation}` cannot be applied to {field} ({kind:?})")]
    TypeMismatch {
        /// Field the condition names.
        field: Field,
        /// Kind of the field.
        kind: FieldKind,
        /// Operation that was attempted.
        operation: &'static str,
    },
}

impl ConditionError {
    pub(crate) fn type_mismatch(field: Field, operation: &'static str) -> Self {
        Self::TypeMismatch {
            field,
            kind: field.kind(),
            operation,
        }
    }
}

impl Condition {
    /// Case-sensitive set membership.
    pub fn in_set(field: Field, values: impl IntoIterator<Item = Value>) -> Self {
        Self::InSet {
            field,
            values: values.into_iter().collect(),
            case: Case::Sensitive,
        }
    }

    /// Check that every value fits its field and every operation is
    /// supported by the field's kind.
    pub fn validate(&self) -> Result<(), ConditionError> {
        match self {
            Self::Equals { field, value, case } => {
                validate_values(*field, std::slice::from_ref(value), *case, "equals")
            }
            Self::InSet {
                field,
                values,
                case,
            } => validate_values(*field, values, *case, "in_set"),
            Self::Range { field, bound } => {
                if field.kind() == FieldKind::Timestamp && field.accepts(bound.value()) {
                    Ok(())
                } else {
                    Err(ConditionError::type_mismatch(*field, "range"))
                }
            }
            Self::Like { field, .. } => match field.kind() {
                FieldKind::Text | FieldKind::Integer => Ok(()),
                _ => Err(ConditionError::type_mismatch(*field, "like")),
            },
            Self::Or(children) => children.iter().try_for_each(Self::validate),
        }
    }
}

fn validate_values(
    field: Field,
    values: &[Value],
    case: Case,
    operation: &'static str,
) -> Result<(), ConditionError> {
    if case == Case::Insensitive && field.kind() != FieldKind::Text {
        return Err(ConditionError::type_mismatch(field, "ignore_case"));
    }
    if values.iter().all(|value| field.accepts(value)) {
        Ok(())
    } else {
        Err(ConditionError::type_mismatch(field, operation))
    }
}

#[cfg(test)]
mod tests;
