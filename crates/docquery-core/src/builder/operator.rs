//! Comparison operators and sort directions.

use std::fmt;

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `IN`
    In,
}

impl Operation {
    /// Returns the operator text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "=",
            Self::NotEqual => "<>",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::In => "IN",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of an ORDER BY entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// `ASC`
    #[default]
    Asc,
    /// `DESC`
    Desc,
}

impl SortOrder {
    /// Parses a direction, ignoring case.
    ///
    /// Anything other than `asc` or `desc` yields [`SortOrder::Asc`].
    #[must_use]
    pub fn parse_lenient(direction: &str) -> Self {
        if direction.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            if !direction.eq_ignore_ascii_case("asc") {
                tracing::trace!(direction, "unrecognized sort direction, using ASC");
            }
            Self::Asc
        }
    }

    /// Returns the keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl From<&str> for SortOrder {
    fn from(direction: &str) -> Self {
        Self::parse_lenient(direction)
    }
}

impl From<Option<&str>> for SortOrder {
    fn from(direction: Option<&str>) -> Self {
        direction.map_or(Self::Asc, Self::parse_lenient)
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
