//! Lowering of domain conditions into Diesel expressions over the account
//! graph `accounts LEFT JOIN contacts LEFT JOIN phone_numbers`.
//!
//! Every lowered condition has SQL type `Nullable<Bool>`: columns from the
//! outer-joined tables are nullable, and account columns are wrapped with
//! `.nullable()` so all conditions share one boxed type.

use chrono::{DateTime, Utc};
use diesel::dsl;
use diesel::expression::BoxableExpression;
use diesel::helper_types::LeftJoinQuerySource;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool, Integer, Nullable, Text};
use uuid::Uuid;

use crate::domain::condition::{Bound, Case, Condition, ConditionError, Field, Value};

use super::schema::{accounts, contacts, phone_numbers};

diesel::define_sql_function! {
    /// SQL `lower(text)`.
    fn lower(x: Nullable<Text>) -> Nullable<Text>;
}

diesel::define_sql_function! {
    /// Function-style cast `text(bigint)`.
    #[sql_name = "text"]
    fn bigint_text(x: Nullable<BigInt>) -> Nullable<Text>;
}

diesel::define_sql_function! {
    /// Function-style cast `text(integer)`.
    #[sql_name = "text"]
    fn integer_text(x: Nullable<Integer>) -> Nullable<Text>;
}

/// `ON` clause joining a contact to its phone number.
pub(crate) type PhoneJoinOn =
    dsl::Eq<contacts::phone_number_id, dsl::Nullable<phone_numbers::phone_number_id>>;

/// Query source of [`account_graph!`].
pub(crate) type AccountGraph = LeftJoinQuerySource<
    LeftJoinQuerySource<accounts::table, contacts::table>,
    phone_numbers::table,
    PhoneJoinOn,
>;

/// A lowered condition, usable in `WHERE` over [`AccountGraph`].
pub(crate) type BoxedCondition =
    Box<dyn BoxableExpression<AccountGraph, Pg, SqlType = Nullable<Bool>>>;

/// A condition over the accounts table alone.
pub(crate) type BoxedAccountCondition =
    Box<dyn BoxableExpression<accounts::table, Pg, SqlType = Nullable<Bool>>>;

/// `lower(nick_name) = lower(nickname)`.
pub(crate) fn nickname_ignoring_case(nickname: &str) -> BoxedAccountCondition {
    Box::new(lower(accounts::nick_name.nullable()).eq(nickname.to_lowercase()))
}

/// `accounts LEFT JOIN contacts LEFT JOIN phone_numbers`.
macro_rules! account_graph {
    () => {
        $crate::outbound::persistence::schema::accounts::table
            .left_join($crate::outbound::persistence::schema::contacts::table)
            .left_join(
                $crate::outbound::persistence::schema::phone_numbers::table.on(
                    $crate::outbound::persistence::schema::contacts::phone_number_id.eq(
                        $crate::outbound::persistence::schema::phone_numbers::phone_number_id
                            .nullable(),
                    ),
                ),
            )
    };
}

pub(crate) use account_graph;

/// Lower a condition list into one conjunction; `None` for an empty list.
///
/// # Errors
///
/// Returns [`ConditionError`] for the first ill-typed condition.
pub(crate) fn lower_conditions(
    conditions: &[Condition],
) -> Result<Option<BoxedCondition>, ConditionError> {
    let mut combined: Option<BoxedCondition> = None;
    for condition in conditions {
        let next = lower_condition(condition)?;
        combined = Some(match combined {
            None => next,
            Some(previous) => Box::new(previous.and(next)),
        });
    }
    Ok(combined)
}

fn lower_condition(condition: &Condition) -> Result<BoxedCondition, ConditionError> {
    condition.validate()?;
    match condition {
        Condition::Equals { field, value, case } => lower_leaf(*field, Operand::Eq(value), *case),
        Condition::InSet {
            field,
            values,
            case,
        } => lower_leaf(*field, Operand::In(values), *case),
        Condition::Range { field, bound } => {
            let operand = match bound {
                Bound::AtLeast(value) => Operand::AtLeast(value),
                Bound::AtMost(value) => Operand::AtMost(value),
            };
            lower_leaf(*field, operand, Case::Sensitive)
        }
        Condition::Like { field, pattern } => {
            lower_leaf(*field, Operand::Like(pattern), Case::Insensitive)
        }
        Condition::Or(children) => {
            let mut combined: Option<BoxedCondition> = None;
            for child in children {
                let next = lower_condition(child)?;
                combined = Some(match combined {
                    None => next,
                    Some(previous) => Box::new(previous.or(next)),
                });
            }
            // An empty disjunction matches nothing.
            Ok(combined.unwrap_or_else(|| {
                Box::new(
                    accounts::account_id
                        .nullable()
                        .eq_any(Vec::<Uuid>::new()),
                )
            }))
        }
    }
}

#[derive(Clone, Copy)]
enum Operand<'a> {
    Eq(&'a Value),
    In(&'a [Value]),
    AtLeast(&'a Value),
    AtMost(&'a Value),
    Like(&'a str),
}

impl Operand<'_> {
    const fn name(self) -> &'static str {
        match self {
            Self::Eq(_) => "equals",
            Self::In(_) => "in_set",
            Self::AtLeast(_) | Self::AtMost(_) => "range",
            Self::Like(_) => "like",
        }
    }
}

enum TextOp {
    Eq(String),
    In(Vec<String>),
    Like(String),
}

fn text_of(field: Field, operation: &'static str, value: &Value, case: Case) -> Result<String, ConditionError> {
    let text = value
        .as_text()
        .ok_or_else(|| ConditionError::type_mismatch(field, operation))?;
    Ok(match case {
        Case::Sensitive => text.to_owned(),
        Case::Insensitive => text.to_lowercase(),
    })
}

fn text_op(field: Field, operand: Operand<'_>, case: Case) -> Result<TextOp, ConditionError> {
    let operation = operand.name();
    match operand {
        Operand::Eq(value) => Ok(TextOp::Eq(text_of(field, operation, value, case)?)),
        Operand::In(values) => values
            .iter()
            .map(|value| text_of(field, operation, value, case))
            .collect::<Result<Vec<_>, _>>()
            .map(TextOp::In),
        Operand::Like(pattern) => Ok(TextOp::Like(pattern.to_lowercase())),
        Operand::AtLeast(_) | Operand::AtMost(_) => {
            Err(ConditionError::type_mismatch(field, operation))
        }
    }
}

fn uuid_of(field: Field, operation: &'static str, value: &Value) -> Result<Uuid, ConditionError> {
    value
        .as_uuid()
        .ok_or_else(|| ConditionError::type_mismatch(field, operation))
}

fn timestamp_of(
    field: Field,
    operation: &'static str,
    value: &Value,
) -> Result<DateTime<Utc>, ConditionError> {
    value
        .as_timestamp()
        .ok_or_else(|| ConditionError::type_mismatch(field, operation))
}

macro_rules! text_predicate {
    ($column:expr, $op:expr, $case:expr) => {{
        let column = $column.nullable();
        let lowered: BoxedCondition = match ($op, $case) {
            (TextOp::Eq(value), Case::Sensitive) => Box::new(column.eq(value)),
            (TextOp::Eq(value), Case::Insensitive) => Box::new(lower(column).eq(value)),
            (TextOp::In(values), Case::Sensitive) => Box::new(column.eq_any(values)),
            (TextOp::In(values), Case::Insensitive) => Box::new(lower(column).eq_any(values)),
            (TextOp::Like(pattern), _) => Box::new(lower(column).like(pattern)),
        };
        lowered
    }};
}

fn lower_leaf(
    field: Field,
    operand: Operand<'_>,
    case: Case,
) -> Result<BoxedCondition, ConditionError> {
    let operation = operand.name();
    let lowered: BoxedCondition = match field {
        Field::AccountId => {
            let column = accounts::account_id.nullable();
            match operand {
                Operand::Eq(value) => Box::new(column.eq(uuid_of(field, operation, value)?)),
                Operand::In(values) => Box::new(
                    column.eq_any(
                        values
                            .iter()
                            .map(|value| uuid_of(field, operation, value))
                            .collect::<Result<Vec<_>, _>>()?,
                    ),
                ),
                _ => return Err(ConditionError::type_mismatch(field, operation)),
            }
        }
        Field::ModeAt => {
            let column = accounts::mode_at.nullable();
            match operand {
                Operand::Eq(value) => Box::new(column.eq(timestamp_of(field, operation, value)?)),
                Operand::In(values) => Box::new(
                    column.eq_any(
                        values
                            .iter()
                            .map(|value| timestamp_of(field, operation, value))
                            .collect::<Result<Vec<_>, _>>()?,
                    ),
                ),
                Operand::AtLeast(value) => {
                    Box::new(column.ge(timestamp_of(field, operation, value)?))
                }
                Operand::AtMost(value) => {
                    Box::new(column.le(timestamp_of(field, operation, value)?))
                }
                Operand::Like(_) => return Err(ConditionError::type_mismatch(field, operation)),
            }
        }
        Field::PhoneNational | Field::PhoneCountryCode => {
            let Operand::Like(pattern) = operand else {
                return Err(ConditionError::type_mismatch(field, operation));
            };
            let pattern = pattern.to_lowercase();
            if field == Field::PhoneNational {
                Box::new(bigint_text(phone_numbers::national.nullable()).like(pattern))
            } else {
                Box::new(integer_text(phone_numbers::country_code.nullable()).like(pattern))
            }
        }
        Field::Nickname => text_predicate!(accounts::nick_name, text_op(field, operand, case)?, case),
        Field::FirstName => {
            text_predicate!(accounts::first_name, text_op(field, operand, case)?, case)
        }
        Field::LastName => {
            text_predicate!(accounts::last_name, text_op(field, operand, case)?, case)
        }
        Field::Mode => text_predicate!(accounts::mode, text_op(field, operand, case)?, case),
        Field::Status => text_predicate!(accounts::status, text_op(field, operand, case)?, case),
        Field::ActivationCode => {
            text_predicate!(accounts::activation_code, text_op(field, operand, case)?, case)
        }
        Field::ContactEmail => {
            text_predicate!(contacts::email, text_op(field, operand, case)?, case)
        }
        Field::PhoneInternational => {
            text_predicate!(phone_numbers::international, text_op(field, operand, case)?, case)
        }
        Field::PhoneRegionCode => {
            text_predicate!(phone_numbers::region_code, text_op(field, operand, case)?, case)
        }
    };
    Ok(lowered)
}
