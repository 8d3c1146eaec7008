//! Account filter: the optional criteria a caller can combine.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::account::{AccountId, AccountStatus, Mode};

/// Immutable, partially populated account filter.
///
/// Empty sets and `None` fields place no constraint on the result. The
/// default filter matches every account.
///
/// # Examples
/// ```
/// use backend::domain::{AccountFilter, Mode};
///
/// let filter = AccountFilter::builder()
///     .nickname("Mara7")
///     .mode(Mode::Online)
///     .build();
/// assert!(filter.modes().contains(&Mode::Online));
/// assert!(!filter.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    ids: BTreeSet<AccountId>,
    nicknames: BTreeSet<String>,
    modes: BTreeSet<Mode>,
    mode_at_from: Option<DateTime<Utc>>,
    mode_at_to: Option<DateTime<Utc>>,
    statuses: BTreeSet<AccountStatus>,
    activation_codes: BTreeSet<String>,
    search_text: Option<String>,
    emails: BTreeSet<String>,
}

impl AccountFilter {
    /// Start building a filter.
    pub fn builder() -> AccountFilterBuilder {
        AccountFilterBuilder::default()
    }

    /// Account ids to match.
    pub fn ids(&self) -> &BTreeSet<AccountId> {
        &self.ids
    }

    /// Nicknames to match, ignoring case.
    pub fn nicknames(&self) -> &BTreeSet<String> {
        &self.nicknames
    }

    /// Modes to match.
    pub fn modes(&self) -> &BTreeSet<Mode> {
        &self.modes
    }

    /// Inclusive lower bound on `mode_at`.
    pub fn mode_at_from(&self) -> Option<DateTime<Utc>> {
        self.mode_at_from
    }

    /// Inclusive upper bound on `mode_at`.
    pub fn mode_at_to(&self) -> Option<DateTime<Utc>> {
        self.mode_at_to
    }

    /// Statuses to match.
    pub fn statuses(&self) -> &BTreeSet<AccountStatus> {
        &self.statuses
    }

    /// Activation codes to match exactly.
    pub fn activation_codes(&self) -> &BTreeSet<String> {
        &self.activation_codes
    }

    /// Free-text search over names, emails and phone numbers.
    pub fn search_text(&self) -> Option<&str> {
        self.search_text.as_deref()
    }

    /// Contact emails to match exactly.
    pub fn emails(&self) -> &BTreeSet<String> {
        &self.emails
    }

    /// True when no field constrains the result.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Builder for [`AccountFilter`].
#[derive(Debug, Clone, Default)]
pub struct AccountFilterBuilder {
    filter: AccountFilter,
}

impl AccountFilterBuilder {
    /// Add an account id.
    pub fn id(mut self, id: AccountId) -> Self {
        self.filter.ids.insert(id);
        self
    }

    /// Add several account ids.
    pub fn ids(mut self, ids: impl IntoIterator<Item = AccountId>) -> Self {
        self.filter.ids.extend(ids);
        self
    }

    /// Add a nickname.
    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.filter.nicknames.insert(nickname.into());
        self
    }

    /// Add several nicknames.
    pub fn nicknames<S: Into<String>>(mut self, nicknames: impl IntoIterator<Item = S>) -> Self {
        self.filter
            .nicknames
            .extend(nicknames.into_iter().map(Into::into));
        self
    }

    /// Add a mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.filter.modes.insert(mode);
        self
    }

    /// Add several modes.
    pub fn modes(mut self, modes: impl IntoIterator<Item = Mode>) -> Self {
        self.filter.modes.extend(modes);
        self
    }

    /// Set the inclusive lower bound on `mode_at`.
    pub fn mode_at_from(mut self, from: DateTime<Utc>) -> Self {
        self.filter.mode_at_from = Some(from);
        self
    }

    /// Set the inclusive upper bound on `mode_at`.
    pub fn mode_at_to(mut self, to: DateTime<Utc>) -> Self {
        self.filter.mode_at_to = Some(to);
        self
    }

    /// Add a status.
    pub fn status(mut self, status: AccountStatus) -> Self {
        self.filter.statuses.insert(status);
        self
    }

    /// Add several statuses.
    pub fn statuses(mut self, statuses: impl IntoIterator<Item = AccountStatus>) -> Self {
        self.filter.statuses.extend(statuses);
        self
    }

    /// Add an activation code.
    pub fn activation_code(mut self, code: impl Into<String>) -> Self {
        self.filter.activation_codes.insert(code.into());
        self
    }

    /// Add several activation codes.
    pub fn activation_codes<S: Into<String>>(mut self, codes: impl IntoIterator<Item = S>) -> Self {
        self.filter
            .activation_codes
            .extend(codes.into_iter().map(Into::into));
        self
    }

    /// Set the free-text search.
    pub fn search_text(mut self, text: impl Into<String>) -> Self {
        self.filter.search_text = Some(text.into());
        self
    }

    /// Add a contact email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.filter.emails.insert(email.into());
        self
    }

    /// Add several contact emails.
    pub fn emails<S: Into<String>>(mut self, emails: impl IntoIterator<Item = S>) -> Self {
        self.filter.emails.extend(emails.into_iter().map(Into::into));
        self
    }

    /// Finish building.
    pub fn build(self) -> AccountFilter {
        self.filter
    }
}
