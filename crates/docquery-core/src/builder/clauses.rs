//! Clause buffers and selection-mode flags of a builder.

use crate::options::QueryOptions;

use super::query::QueryBuilder;

/// The FROM target of a builder.
#[derive(Debug, Clone)]
pub enum Source {
    /// The collection itself, referenced by the table alias.
    Collection,
    /// A nested query compiled before its parent.
    Subquery(Box<QueryBuilder>),
}

/// The three WHERE buffers, emitted in this fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicateSet {
    pub(crate) conditions: Vec<String>,
    pub(crate) nulls: Vec<String>,
    pub(crate) not_nulls: Vec<String>,
}

/// A predicate fragment tagged with the buffer it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// A comparison, IN-list, LIKE or group fragment.
    Condition(String),
    /// An `= null` check.
    IsNull(String),
    /// A `<> null` check.
    IsNotNull(String),
}

impl PredicateSet {
    pub(crate) fn push(&mut self, predicate: Predicate) {
        match predicate {
            Predicate::Condition(sql) => self.conditions.push(sql),
            Predicate::IsNull(sql) => self.nulls.push(sql),
            Predicate::IsNotNull(sql) => self.not_nulls.push(sql),
        }
    }

    /// Returns true if no predicate was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.nulls.is_empty() && self.not_nulls.is_empty()
    }

    /// Iterates conditions, then null checks, then not-null checks.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.conditions
            .iter()
            .chain(&self.nulls)
            .chain(&self.not_nulls)
            .map(String::as_str)
    }

    /// Joins every predicate with ` {joiner} `.
    #[must_use]
    pub fn join(&self, joiner: &str) -> String {
        let separator = format!(" {joiner} ");
        self.iter().collect::<Vec<_>>().join(&separator)
    }
}

/// Accumulated state of one builder.
#[derive(Debug, Clone)]
pub struct Clauses {
    pub(crate) options: QueryOptions,
    pub(crate) columns: Vec<String>,
    pub(crate) sums: Vec<String>,
    pub(crate) maxes: Vec<String>,
    pub(crate) raw_functions: Vec<String>,
    pub(crate) counts: Vec<String>,
    pub(crate) predicates: PredicateSet,
    pub(crate) group_by: Vec<String>,
    pub(crate) order_by: Vec<String>,
    pub(crate) select_default: bool,
    pub(crate) select_distinct: bool,
    pub(crate) select_count: bool,
    pub(crate) select_row_count: bool,
    pub(crate) paging: bool,
    pub(crate) skip: u64,
    pub(crate) take: u64,
    pub(crate) source: Source,
}

impl Clauses {
    pub(crate) fn new(options: QueryOptions) -> Self {
        Self {
            options,
            columns: vec![],
            sums: vec![],
            maxes: vec![],
            raw_functions: vec![],
            counts: vec![],
            predicates: PredicateSet::default(),
            group_by: vec![],
            order_by: vec![],
            select_default: false,
            select_distinct: false,
            select_count: false,
            select_row_count: false,
            paging: false,
            skip: 0,
            take: 10,
            source: Source::Collection,
        }
    }

    pub(crate) fn alias(&self) -> &str {
        &self.options.table_alias
    }

    /// `{alias}.{column}`.
    pub(crate) fn qualify(&self, column: &str) -> String {
        format!("{}.{column}", self.alias())
    }

    /// Like `qualify`, but `*` stays bare.
    pub(crate) fn qualify_select(&self, column: &str) -> String {
        if column == "*" {
            String::from("*")
        } else {
            self.qualify(column)
        }
    }

    /// Whether default selection applies once no mode was chosen explicitly.
    pub(crate) const fn effective_select_default(&self) -> bool {
        self.select_default || !self.select_distinct
    }

    /// Projection list in its fixed order: columns, sums, maxes, raw functions.
    pub(crate) fn projection(&self) -> Vec<&str> {
        self.columns
            .iter()
            .chain(&self.sums)
            .chain(&self.maxes)
            .chain(&self.raw_functions)
            .map(String::as_str)
            .collect()
    }
}
