//! Tests for condition validation and in-memory evaluation.

use chrono::{Duration, TimeZone, Utc};
use rstest::{fixture, rstest};
use uuid::Uuid;

use super::eval::{JoinedRow, account_matches, joined_rows, like, matches_all};
use super::*;
use crate::domain::account::{
    AccountId, AccountParts, ActivationCode, Contact, ContactId, EmailAddress, Nickname,
    PhoneNumber, PhoneNumberId,
};
use crate::domain::Account;

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn phone(national: i64) -> PhoneNumber {
    PhoneNumber {
        id: PhoneNumberId::from_uuid(Uuid::from_u128(national as u128)),
        national: Some(national),
        international: Some(format!("+972 {national}")),
        country_code: Some(972),
        region_code: Some("IL".to_owned()),
    }
}

fn contact(email: &str, phone_number: Option<PhoneNumber>) -> Contact {
    Contact::new(
        ContactId::random(),
        EmailAddress::new(email).expect("valid email"),
        true,
        at(0),
        phone_number,
    )
}

fn account(nickname: &str, contacts: Vec<Contact>) -> Account {
    Account::from_parts(AccountParts {
        id: AccountId::from_uuid(Uuid::from_u128(7)),
        nickname: Nickname::new(nickname).expect("nickname"),
        first_name: Some("Mara".to_owned()),
        last_name: None,
        birth_date: None,
        gender: None,
        avatar: None,
        activation_code: ActivationCode::new("0123456789abcdef0123456789abcdef")
            .expect("activation code"),
        status: AccountStatus::Active,
        mode: Mode::Online,
        mode_at: at(12),
        created_at: at(0),
        contacts,
    })
}

#[fixture]
fn mara() -> Account {
    account(
        "Mara7",
        vec![
            contact("mara@example.test", Some(phone(501_234_567))),
            contact("work@example.test", None),
        ],
    )
}

fn like_condition(field: Field, pattern: &str) -> Condition {
    Condition::Like {
        field,
        pattern: pattern.to_owned(),
    }
}

#[rstest]
#[case("%ara%", "mara7", true)]
#[case("mara7", "mara7", true)]
#[case("mara", "mara7", false)]
#[case("m_ra_", "mara7", true)]
#[case("%", "", true)]
#[case("_", "", false)]
#[case("%a%a%", "mara7", true)]
#[case("%a%a%a%", "mara7", false)]
#[case(r"50\%", "50%", true)]
#[case(r"50\%", "500", false)]
#[case(r"a\_b", "a_b", true)]
#[case(r"a\_b", "axb", false)]
#[case("% %", "two  spaces", true)]
#[case("mara7%%", "mara7", true)]
#[case("mara7_", "mara7", false)]
#[case("mara7x", "mara7", false)]
#[case("", "mara7", false)]
fn like_follows_sql_semantics(#[case] pattern: &str, #[case] text: &str, #[case] expected: bool) {
    assert_eq!(like(pattern, text), expected);
}

#[rstest]
fn account_without_contacts_yields_one_row() {
    let lonely = account("solo", Vec::new());
    let rows = joined_rows(&lonely);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].contact.is_none());
    assert!(rows[0].phone.is_none());
}

#[rstest]
fn account_with_contacts_yields_row_per_contact(mara: Account) {
    let rows = joined_rows(&mara);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].phone.is_some());
    assert!(rows[1].phone.is_none());
}

#[rstest]
fn empty_condition_list_matches(mara: Account) {
    assert_eq!(account_matches(&[], &mara), Ok(true));
}

#[rstest]
fn nickname_in_set_ignores_case_when_asked(mara: Account) {
    let insensitive = Condition::InSet {
        field: Field::Nickname,
        values: vec![Value::Text("mara7".to_owned())],
        case: Case::Insensitive,
    };
    let sensitive = Condition::in_set(Field::Nickname, [Value::Text("mara7".to_owned())]);

    assert_eq!(account_matches(&[insensitive], &mara), Ok(true));
    assert_eq!(account_matches(&[sensitive], &mara), Ok(false));
}

#[rstest]
fn range_bounds_are_inclusive(mara: Account) {
    let from = Condition::Range {
        field: Field::ModeAt,
        bound: Bound::AtLeast(Value::Timestamp(at(12))),
    };
    let to = Condition::Range {
        field: Field::ModeAt,
        bound: Bound::AtMost(Value::Timestamp(at(12))),
    };
    let after = Condition::Range {
        field: Field::ModeAt,
        bound: Bound::AtLeast(Value::Timestamp(at(12) + Duration::seconds(1))),
    };

    assert_eq!(account_matches(&[from, to], &mara), Ok(true));
    assert_eq!(account_matches(&[after], &mara), Ok(false));
}

#[rstest]
fn enum_fields_compare_by_variant(mara: Account) {
    let online = Condition::in_set(Field::Mode, [Value::Mode(Mode::Online)]);
    let suspended = Condition::in_set(Field::Status, [Value::Status(AccountStatus::Suspended)]);

    assert_eq!(account_matches(&[online.clone()], &mara), Ok(true));
    assert_eq!(account_matches(&[online, suspended], &mara), Ok(false));
}

#[rstest]
fn like_renders_integers_as_text(mara: Account) {
    let national = like_condition(Field::PhoneNational, "%1234%");
    let country = like_condition(Field::PhoneCountryCode, "%97%");

    assert_eq!(account_matches(&[national], &mara), Ok(true));
    assert_eq!(account_matches(&[country], &mara), Ok(true));
}

#[rstest]
fn like_is_case_insensitive(mara: Account) {
    assert_eq!(
        account_matches(&[like_condition(Field::Nickname, "%MARA%")], &mara),
        Ok(true)
    );
}

#[rstest]
fn null_cells_never_match(mara: Account) {
    let last_name = like_condition(Field::LastName, "%");
    assert_eq!(account_matches(&[last_name], &mara), Ok(false));
}

#[rstest]
fn conjunction_is_evaluated_per_joined_row(mara: Account) {
    // The work contact has no phone, so no single row carries both.
    let conditions = [
        Condition::in_set(
            Field::ContactEmail,
            [Value::Text("work@example.test".to_owned())],
        ),
        like_condition(Field::PhoneRegionCode, "il"),
    ];
    assert_eq!(account_matches(&conditions, &mara), Ok(false));

    let rows = joined_rows(&mara);
    let with_phone: &JoinedRow<'_> = &rows[0];
    assert_eq!(
        matches_all(&[like_condition(Field::PhoneRegionCode, "il")], with_phone),
        Ok(true)
    );
}

#[rstest]
fn or_matches_when_any_child_matches(mara: Account) {
    let either = Condition::Or(vec![
        like_condition(Field::LastName, "%nobody%"),
        like_condition(Field::ContactEmail, "%work%"),
    ]);
    assert_eq!(account_matches(&[either], &mara), Ok(true));
    assert_eq!(account_matches(&[Condition::Or(Vec::new())], &mara), Ok(false));
}

#[rstest]
#[case(Condition::Equals { field: Field::ModeAt, value: Value::Text("x".to_owned()), case: Case::Sensitive }, "equals")]
#[case(Condition::in_set(Field::Mode, [Value::Status(AccountStatus::Active)]), "in_set")]
#[case(Condition::Range { field: Field::Nickname, bound: Bound::AtLeast(Value::Text("a".to_owned())) }, "range")]
#[case(Condition::Like { field: Field::ModeAt, pattern: "%1%".to_owned() }, "like")]
#[case(Condition::InSet { field: Field::Mode, values: vec![Value::Mode(Mode::Online)], case: Case::Insensitive }, "ignore_case")]
#[case(Condition::in_set(Field::PhoneNational, [Value::Text("1".to_owned())]), "in_set")]
fn ill_typed_conditions_are_rejected(#[case] condition: Condition, #[case] operation: &str) {
    let err = condition.validate().expect_err("condition must be rejected");
    let ConditionError::TypeMismatch { operation: got, .. } = err;
    assert_eq!(got, operation);
}

#[rstest]
fn validation_descends_into_or() {
    let nested = Condition::Or(vec![like_condition(Field::Status, "%a%")]);
    assert!(nested.validate().is_err());
}

#[rstest]
fn evaluation_reports_type_mismatch(mara: Account) {
    let bad = like_condition(Field::AccountId, "%");
    assert!(account_matches(&[bad], &mara).is_err());
}

#[rstest]
fn field_display_names_table_and_column() {
    assert_eq!(Field::PhoneNational.to_string(), "phone_numbers.national");
    assert_eq!(Field::Nickname.to_string(), "accounts.nick_name");
}
