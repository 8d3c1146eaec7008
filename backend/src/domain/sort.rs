//! Sort keys accepted by paged account queries.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use pagination::{Direction, Sort};

use super::account::Account;

/// Account property a page can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountSortKey {
    AccountId,
    Nickname,
    FirstName,
    LastName,
    BirthDate,
    Status,
    Mode,
    ModeAt,
    CreatedAt,
}

/// Error returned for a sort property that names no sortable column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort property: {property:?}")]
pub struct UnknownSortProperty {
    /// Property as requested.
    pub property: String,
}

impl FromStr for AccountSortKey {
    type Err = UnknownSortProperty;

    /// Accepts camelCase property names and snake_case column names.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "id" | "accountId" | "account_id" => Ok(Self::AccountId),
            "nickname" | "nickName" | "nick_name" => Ok(Self::Nickname),
            "firstName" | "first_name" => Ok(Self::FirstName),
            "lastName" | "last_name" => Ok(Self::LastName),
            "birthDate" | "birth_date" => Ok(Self::BirthDate),
            "status" => Ok(Self::Status),
            "mode" => Ok(Self::Mode),
            "modeAt" | "mode_at" => Ok(Self::ModeAt),
            "createdAt" | "created_at" => Ok(Self::CreatedAt),
            _ => Err(UnknownSortProperty {
                property: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for AccountSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AccountId => "accountId",
            Self::Nickname => "nickname",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::BirthDate => "birthDate",
            Self::Status => "status",
            Self::Mode => "mode",
            Self::ModeAt => "modeAt",
            Self::CreatedAt => "createdAt",
        })
    }
}

impl AccountSortKey {
    /// Compare two accounts in ascending order.
    ///
    /// Missing values sort after present ones, as PostgreSQL does for
    /// ascending order; [`Direction::Desc`] reverses the whole ordering.
    /// Text compares by code point, which matches PostgreSQL only under the
    /// `C` collation: `"Quill"` sorts before `"boris1"` here but after it
    /// under `en_US.UTF-8`.
    pub fn compare(self, left: &Account, right: &Account) -> Ordering {
        match self {
            Self::AccountId => left.id().cmp(&right.id()),
            Self::Nickname => left.nickname().as_str().cmp(right.nickname().as_str()),
            Self::FirstName => nulls_last(left.first_name(), right.first_name()),
            Self::LastName => nulls_last(left.last_name(), right.last_name()),
            Self::BirthDate => nulls_last(left.birth_date(), right.birth_date()),
            Self::Status => left.status().as_str().cmp(right.status().as_str()),
            Self::Mode => left.mode().as_str().cmp(right.mode().as_str()),
            Self::ModeAt => left.mode_at().cmp(&right.mode_at()),
            Self::CreatedAt => left.created_at().cmp(&right.created_at()),
        }
    }
}

fn nulls_last<T: Ord>(left: Option<T>, right: Option<T>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Resolve every order of `sort` into a typed key.
///
/// # Errors
///
/// Returns [`UnknownSortProperty`] for the first property that names no
/// sortable column.
pub fn resolve_sort(sort: &Sort) -> Result<Vec<(AccountSortKey, Direction)>, UnknownSortProperty> {
    sort.iter()
        .map(|order| {
            order
                .property()
                .parse::<AccountSortKey>()
                .map(|key| (key, order.direction()))
        })
        .collect()
}

/// Compare two accounts by resolved sort orders, breaking ties by id.
pub fn compare_accounts(
    orders: &[(AccountSortKey, Direction)],
    left: &Account,
    right: &Account,
) -> Ordering {
    orders
        .iter()
        .map(|(key, direction)| {
            let ordering = key.compare(left, right);
            match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| left.id().cmp(&right.id()))
}
