//! In-memory evaluation of conditions against joined account rows.
//!
//! Evaluation follows SQL semantics for the subset the condition model
//! uses: a comparison against a missing (NULL) cell is never true, `LIKE`
//! honours `%`, `_` and the `\` escape, and rows are produced the way a
//! `LEFT JOIN` would produce them.

use crate::domain::account::{Account, Contact, PhoneNumber};

use super::{Bound, Case, Condition, ConditionError, Field, Value};

/// One row of `accounts LEFT JOIN contacts LEFT JOIN phone_numbers`.
#[derive(Debug, Clone, Copy)]
pub struct JoinedRow<'a> {
    /// Account columns.
    pub account: &'a Account,
    /// Contact columns, `None` when the account has no contacts.
    pub contact: Option<&'a Contact>,
    /// Phone columns, `None` when the contact has no phone number.
    pub phone: Option<&'a PhoneNumber>,
}

/// Expand an account into its left-join rows: one per contact, or a single
/// row with empty contact and phone columns.
pub fn joined_rows(account: &Account) -> Vec<JoinedRow<'_>> {
    if account.contacts().is_empty() {
        return vec![JoinedRow {
            account,
            contact: None,
            phone: None,
        }];
    }
    account
        .contacts()
        .iter()
        .map(|contact| JoinedRow {
            account,
            contact: Some(contact),
            phone: contact.phone_number(),
        })
        .collect()
}

/// Evaluate the conjunction of `conditions` against `row`.
///
/// # Errors
///
/// Returns [`ConditionError`] when a condition does not fit its field.
pub fn matches_all(conditions: &[Condition], row: &JoinedRow<'_>) -> Result<bool, ConditionError> {
    for condition in conditions {
        if !matches(condition, row)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// True when any joined row of `account` satisfies every condition.
///
/// # Errors
///
/// Returns [`ConditionError`] when a condition does not fit its field.
pub fn account_matches(conditions: &[Condition], account: &Account) -> Result<bool, ConditionError> {
    for row in joined_rows(account) {
        if matches_all(conditions, &row)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Evaluate one condition against `row`.
///
/// # Errors
///
/// Returns [`ConditionError`] when the condition does not fit its field.
pub fn matches(condition: &Condition, row: &JoinedRow<'_>) -> Result<bool, ConditionError> {
    condition.validate()?;
    Ok(eval(condition, row))
}

fn eval(condition: &Condition, row: &JoinedRow<'_>) -> bool {
    match condition {
        Condition::Equals { field, value, case } => {
            let cell = cell(*field, row);
            equals(&cell, value, *case)
        }
        Condition::InSet {
            field,
            values,
            case,
        } => {
            let cell = cell(*field, row);
            values.iter().any(|value| equals(&cell, value, *case))
        }
        Condition::Range { field, bound } => match (cell(*field, row), bound) {
            (Cell::Value(Value::Timestamp(at)), Bound::AtLeast(Value::Timestamp(from))) => {
                at >= *from
            }
            (Cell::Value(Value::Timestamp(at)), Bound::AtMost(Value::Timestamp(to))) => at <= *to,
            _ => false,
        },
        Condition::Like { field, pattern } => cell(*field, row)
            .render()
            .is_some_and(|text| like(&pattern.to_lowercase(), &text.to_lowercase())),
        Condition::Or(children) => children.iter().any(|child| eval(child, row)),
    }
}

enum Cell {
    Null,
    Value(Value),
    Integer(i64),
}

impl Cell {
    fn text(value: Option<&str>) -> Self {
        value.map_or(Self::Null, |text| Self::Value(Value::Text(text.to_owned())))
    }

    fn render(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Integer(number) => Some(number.to_string()),
            Self::Value(value) => value.as_text().map(str::to_owned),
        }
    }
}

fn cell(field: Field, row: &JoinedRow<'_>) -> Cell {
    let account = row.account;
    match field {
        Field::AccountId => Cell::Value(Value::Uuid(*account.id().as_uuid())),
        Field::Nickname => Cell::text(Some(account.nickname().as_str())),
        Field::FirstName => Cell::text(account.first_name()),
        Field::LastName => Cell::text(account.last_name()),
        Field::Mode => Cell::Value(Value::Mode(account.mode())),
        Field::ModeAt => Cell::Value(Value::Timestamp(account.mode_at())),
        Field::Status => Cell::Value(Value::Status(account.status())),
        Field::ActivationCode => Cell::text(Some(account.activation_code().as_str())),
        Field::ContactEmail => Cell::text(row.contact.map(|contact| contact.email().as_str())),
        Field::PhoneNational => row
            .phone
            .and_then(|phone| phone.national)
            .map_or(Cell::Null, Cell::Integer),
        Field::PhoneInternational => {
            Cell::text(row.phone.and_then(|phone| phone.international.as_deref()))
        }
        Field::PhoneCountryCode => row
            .phone
            .and_then(|phone| phone.country_code)
            .map_or(Cell::Null, |code| Cell::Integer(i64::from(code))),
        Field::PhoneRegionCode => {
            Cell::text(row.phone.and_then(|phone| phone.region_code.as_deref()))
        }
    }
}

fn equals(cell: &Cell, value: &Value, case: Case) -> bool {
    let Cell::Value(stored) = cell else {
        return false;
    };
    match (case, stored.as_text(), value.as_text()) {
        (Case::Insensitive, Some(stored), Some(wanted)) => {
            stored.to_lowercase() == wanted.to_lowercase()
        }
        _ => stored == value,
    }
}

/// SQL `LIKE` match: `%` matches any run, `_` any single character and `\`
/// escapes the next character. The whole of `text` must match.
///
/// # Examples
/// ```
/// use backend::domain::condition::eval::like;
///
/// assert!(like("%ara%", "mara7"));
/// assert!(like("m_ra7", "mara7"));
/// assert!(!like("ara", "mara7"));
/// assert!(like(r"100\%", "100%"));
/// ```
pub fn like(pattern: &str, text: &str) -> bool {
    let pattern = tokenize(pattern);
    let text: Vec<char> = text.chars().collect();

    // Greedy matcher with single-point backtracking on the last `%`.
    let (mut p, mut t) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some(Token::AnyRun) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(Token::AnyOne) => {
                p += 1;
                t += 1;
            }
            Some(Token::Literal(c)) if text.get(t) == Some(c) => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((star, resume)) => {
                    p = star + 1;
                    t = resume + 1;
                    backtrack = Some((star, resume + 1));
                }
                None => return false,
            },
        }
    }
    pattern
        .get(p..)
        .is_none_or(|rest| rest.iter().all(|token| *token == Token::AnyRun))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    AnyRun,
    AnyOne,
    Literal(char),
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => Token::AnyRun,
            '_' => Token::AnyOne,
            // A trailing escape matches a literal backslash.
            '\\' => Token::Literal(chars.next().unwrap_or('\\')),
            other => Token::Literal(other),
        });
    }
    tokens
}
