//! Ordered sort specifications.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PaginationError;

/// Sort direction for a single property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for Direction {
    type Err = PaginationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(PaginationError::invalid_sort(
                value,
                "direction must be `asc` or `desc`",
            )),
        }
    }
}

/// One `(property, direction)` pair of a [`Sort`].
///
/// The property is an opaque name; adapters decide which names they accept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOrder {
    property: String,
    direction: Direction,
}

impl SortOrder {
    /// Create a sort order for `property`.
    pub fn new(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }

    /// Property name to sort by.
    pub fn property(&self) -> &str {
        self.property.as_str()
    }

    /// Direction to sort in.
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

/// Ordered list of sort orders; earlier entries take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sort {
    orders: Vec<SortOrder>,
}

impl Sort {
    /// An empty sort, meaning "natural order".
    pub const fn unsorted() -> Self {
        Self { orders: Vec::new() }
    }

    /// Build a sort from explicit orders.
    pub const fn by(orders: Vec<SortOrder>) -> Self {
        Self { orders }
    }

    /// Parse `property[,direction]` fragments separated by `;`.
    ///
    /// The direction defaults to ascending. Blank input yields an unsorted
    /// value.
    ///
    /// ```
    /// use pagination::{Direction, Sort};
    ///
    /// let sort = Sort::parse("nickname;modeAt,desc").expect("valid sort");
    /// let orders: Vec<_> = sort.iter().map(|o| (o.property(), o.direction())).collect();
    /// assert_eq!(orders, vec![("nickname", Direction::Asc), ("modeAt", Direction::Desc)]);
    /// ```
    pub fn parse(expression: &str) -> Result<Self, PaginationError> {
        let mut orders = Vec::new();
        for fragment in expression.split(';') {
            if fragment.trim().is_empty() {
                continue;
            }
            let mut parts = fragment.split(',');
            let property = parts.next().map(str::trim).unwrap_or_default();
            if property.is_empty() {
                return Err(PaginationError::invalid_sort(
                    fragment,
                    "property name must not be empty",
                ));
            }
            let direction = match parts.next() {
                Some(direction) => direction.parse()?,
                None => Direction::Asc,
            };
            if parts.next().is_some() {
                return Err(PaginationError::invalid_sort(
                    fragment,
                    "expected `property[,direction]`",
                ));
            }
            orders.push(SortOrder::new(property, direction));
        }
        Ok(Self { orders })
    }

    /// True when at least one order is present.
    pub fn is_sorted(&self) -> bool {
        !self.orders.is_empty()
    }

    /// Iterate over the orders in precedence order.
    pub fn iter(&self) -> std::slice::Iter<'_, SortOrder> {
        self.orders.iter()
    }
}

impl<'a> IntoIterator for &'a Sort {
    type Item = &'a SortOrder;
    type IntoIter = std::slice::Iter<'a, SortOrder>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
