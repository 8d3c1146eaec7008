//! Equality, set and range predicates.

use crate::domain::condition::{Bound, Case, Condition, Field, Value};
use crate::domain::filter::AccountFilter;

/// Compile the structured filter fields, in a stable order: ids,
/// nicknames (ignoring case), modes, `mode_at` lower then upper bound,
/// statuses, activation codes.
///
/// An all-absent filter compiles to an empty list, which matches every
/// account.
pub fn compile_predicates(filter: &AccountFilter) -> Vec<Condition> {
    let mut conditions = Vec::new();

    if !filter.ids().is_empty() {
        conditions.push(Condition::in_set(
            Field::AccountId,
            filter.ids().iter().map(|id| Value::Uuid(*id.as_uuid())),
        ));
    }

    if !filter.nicknames().is_empty() {
        conditions.push(Condition::InSet {
            field: Field::Nickname,
            values: filter
                .nicknames()
                .iter()
                .map(|nickname| Value::Text(nickname.to_lowercase()))
                .collect(),
            case: Case::Insensitive,
        });
    }

    if !filter.modes().is_empty() {
        conditions.push(Condition::in_set(
            Field::Mode,
            filter.modes().iter().copied().map(Value::Mode),
        ));
    }

    if let Some(from) = filter.mode_at_from() {
        conditions.push(Condition::Range {
            field: Field::ModeAt,
            bound: Bound::AtLeast(Value::Timestamp(from)),
        });
    }

    if let Some(to) = filter.mode_at_to() {
        conditions.push(Condition::Range {
            field: Field::ModeAt,
            bound: Bound::AtMost(Value::Timestamp(to)),
        });
    }

    if !filter.statuses().is_empty() {
        conditions.push(Condition::in_set(
            Field::Status,
            filter.statuses().iter().copied().map(Value::Status),
        ));
    }

    if !filter.activation_codes().is_empty() {
        conditions.push(Condition::in_set(
            Field::ActivationCode,
            filter.activation_codes().iter().cloned().map(Value::Text),
        ));
    }

    conditions
}

/// [`compile_predicates`] followed by an exact contact-email predicate.
///
/// Used by the unpaged lookup path, which never applies search text.
pub fn compile_exact_predicates(filter: &AccountFilter) -> Vec<Condition> {
    let mut conditions = compile_predicates(filter);
    if !filter.emails().is_empty() {
        conditions.push(Condition::in_set(
            Field::ContactEmail,
            filter.emails().iter().cloned().map(Value::Text),
        ));
    }
    conditions
}
