//! Account enumerations persisted as lowercase text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an account enumeration from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseAccountEnumError {
    kind: &'static str,
    value: String,
}

impl ParseAccountEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

macro_rules! text_enum {
    (
        $(#[$outer:meta])*
        $name:ident ($kind:literal) {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Lowercase text stored in the database.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseAccountEnumError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value.to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ParseAccountEnumError::new($kind, value)),
                }
            }
        }
    };
}

text_enum! {
    /// Lifecycle state of an account.
    AccountStatus ("account status") {
        /// Registered, activation pending.
        Unconfirmed => "unconfirmed",
        /// Activated.
        Active => "active",
        /// Blocked by an operator.
        Suspended => "suspended",
        /// Soft-deleted.
        Deleted => "deleted",
    }
}

impl Default for AccountStatus {
    fn default() -> Self {
        Self::Unconfirmed
    }
}

text_enum! {
    /// Presence mode of an account.
    Mode ("mode") {
        /// Not connected.
        Offline => "offline",
        /// Connected.
        Online => "online",
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::Offline
    }
}

text_enum! {
    /// Gender recorded on an account profile.
    Gender ("gender") {
        /// Male.
        Male => "male",
        /// Female.
        Female => "female",
    }
}
