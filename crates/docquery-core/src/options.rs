//! Builder configuration.

use serde::Deserialize;

/// Default alias qualifying every column reference.
pub const DEFAULT_TABLE_ALIAS: &str = "C";

/// Default limit on nested FROM-subqueries.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Options shared by a builder, its FROM-subquery and its WHERE groups.
///
/// Deserializes from any serde format; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// Alias of the queried collection (`C` in `SELECT * FROM C`).
    pub table_alias: String,
    /// Deepest allowed FROM-subquery nesting. `0` forbids subqueries.
    pub max_depth: usize,
}

impl QueryOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the table alias.
    #[must_use]
    pub fn table_alias(mut self, alias: impl Into<String>) -> Self {
        self.table_alias = alias.into();
        self
    }

    /// Sets the subquery nesting limit.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            table_alias: String::from(DEFAULT_TABLE_ALIAS),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
