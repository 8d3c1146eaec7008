//! Free-text search predicate.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::condition::{Condition, Field};

/// Fields a search token is matched against, in order.
pub const SEARCH_FIELDS: [Field; 8] = [
    Field::Nickname,
    Field::FirstName,
    Field::LastName,
    Field::ContactEmail,
    Field::PhoneNational,
    Field::PhoneInternational,
    Field::PhoneCountryCode,
    Field::PhoneRegionCode,
];

static DOUBLE_WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

fn double_whitespace_regex() -> &'static Regex {
    DOUBLE_WHITESPACE_RE.get_or_init(|| {
        // Exactly two whitespace characters; runs are replaced pairwise.
        Regex::new(r"[ \t\n\x0B\x0C\r]{2}")
            .unwrap_or_else(|error| panic!("whitespace regex failed to compile: {error}"))
    })
}

/// Turn raw search text into a `LIKE` token.
///
/// Blank or absent text yields `None`. Otherwise the text is lower-cased,
/// every non-overlapping pair of whitespace characters (scanning left to
/// right) becomes one space, and the result is wrapped in `%`. Leading and
/// trailing whitespace is kept.
///
/// # Examples
/// ```
/// use backend::domain::compiler::normalize_search_text;
///
/// assert_eq!(normalize_search_text(Some("Mara  Levi")).as_deref(), Some("%mara levi%"));
/// assert_eq!(normalize_search_text(Some("a   b")).as_deref(), Some("%a  b%"));
/// assert_eq!(normalize_search_text(Some("   ")), None);
/// ```
pub fn normalize_search_text(text: Option<&str>) -> Option<String> {
    let text = text.filter(|text| !text.trim().is_empty())?;
    let lowered = text.to_lowercase();
    let collapsed = double_whitespace_regex().replace_all(&lowered, " ");
    Some(format!("%{collapsed}%"))
}

/// Compile search text into one disjunction of `LIKE` conditions over
/// [`SEARCH_FIELDS`]; `None` when the text is blank or absent.
pub fn compile_search(text: Option<&str>) -> Option<Condition> {
    let token = normalize_search_text(text)?;
    Some(Condition::Or(
        SEARCH_FIELDS
            .iter()
            .map(|field| Condition::Like {
                field: *field,
                pattern: token.clone(),
            })
            .collect(),
    ))
}
