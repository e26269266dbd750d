//! Error types for query building.

use thiserror::Error;

/// Errors raised while registering clauses or compiling a query.
///
/// Registration errors (`AsteriskNotAllowed`, `AliasInRawFunction`,
/// `EmptyWhereGroup`) are returned by the call that received the bad
/// argument. The remaining variants come from [`build`](crate::QueryBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// `*` was passed to a clause that needs a named column.
    #[error("cannot use asterisk (*) in {clause} clause")]
    AsteriskNotAllowed {
        /// The builder method that rejected the argument.
        clause: &'static str,
    },

    /// A raw function already carries its own `as` alias.
    #[error("alias \"as\" must be given through the alias argument of select_raw_function_as")]
    AliasInRawFunction,

    /// A WHERE group callback registered no predicates.
    #[error("where group registered no predicates")]
    EmptyWhereGroup,

    /// Plain column selection combined with a count selection.
    #[error("select cannot be combined with select_count")]
    CountWithColumns,

    /// Distinct selection combined with a count selection.
    #[error(
        "select_distinct cannot be combined with select_count, use select with group_by instead"
    )]
    CountWithDistinct,

    /// Plain selection combined with distinct selection.
    #[error(
        "select cannot be combined with select_distinct, use one of them or call distinct to make the whole selection distinct"
    )]
    SelectWithDistinct,

    /// GROUP BY columns do not match the selected columns in order.
    #[error("every group_by column must be selected, in the same order (grouped: {grouped:?}, selected: {selected:?})")]
    GroupByMismatch {
        /// Registered GROUP BY columns.
        grouped: Vec<String>,
        /// Selected columns with their aliases stripped.
        selected: Vec<String>,
    },

    /// FROM-subqueries are nested deeper than the configured limit.
    #[error("subquery nesting exceeds the limit of {limit} levels")]
    NestingTooDeep {
        /// The configured `max_depth`.
        limit: usize,
    },
}

/// Result type alias for query building.
pub type Result<T> = std::result::Result<T, QueryError>;
