//! String-based query builder.

use crate::error::{QueryError, Result};
use crate::options::QueryOptions;

use super::clauses::{Clauses, Predicate, Source};
use super::compile::{compile, COUNT_ALIAS};
use super::filter::Filter;
use super::operator::SortOrder;

/// A query builder taking column names as strings.
///
/// Calls accumulate clauses; [`build`](Self::build) validates them and
/// renders the query text. Columns are qualified with the table alias
/// (`C` unless configured otherwise). WHERE predicates come from the
/// [`Filter`] trait.
///
/// ```rust
/// use docquery_core::{Filter, QueryBuilder};
///
/// let sql = QueryBuilder::new()
///     .select(&["email", "firstName"])
///     .where_is("educationLevel", "S3")
///     .order_by("firstName", "asc")
///     .skip(10)
///     .take(10)
///     .build()
///     .unwrap();
///
/// assert_eq!(
///     sql,
///     "SELECT C.email,C.firstName FROM C\n\
///      WHERE C.educationLevel = 'S3'\n\
///      ORDER BY C.firstName ASC\n\
///      OFFSET 10 LIMIT 10\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    clauses: Clauses,
}

impl QueryBuilder {
    /// Creates a builder with the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(QueryOptions::default())
    }

    /// Creates a builder with the given options.
    #[must_use]
    pub fn with_options(options: QueryOptions) -> Self {
        Self {
            clauses: Clauses::new(options),
        }
    }

    /// Creates a builder qualifying columns with `alias`.
    #[must_use]
    pub fn with_alias(alias: impl Into<String>) -> Self {
        Self::with_options(QueryOptions::default().table_alias(alias))
    }

    /// Returns the table alias.
    #[must_use]
    pub fn table_alias(&self) -> &str {
        self.clauses.alias()
    }

    /// Returns true once a count selection was registered.
    #[must_use]
    pub const fn is_select_count(&self) -> bool {
        self.clauses.select_count
    }

    pub(crate) const fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    // Selection

    /// Makes the whole selection distinct.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.clauses.select_default = false;
        self.clauses.select_distinct = true;
        self
    }

    /// Selects columns. `*` is kept as is.
    #[must_use]
    pub fn select(mut self, columns: &[&str]) -> Self {
        self.clauses.select_default = true;
        for column in columns {
            let column = self.clauses.qualify_select(column);
            self.clauses.columns.push(column);
        }
        self
    }

    /// Selects a column under another name.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`] if `column` is `*`.
    pub fn select_as(mut self, column: &str, alias: &str) -> Result<Self> {
        reject_asterisk("select_as", &[column])?;
        self.clauses.select_default = true;
        let column = format!("{} AS {alias}", self.clauses.qualify(column));
        self.clauses.columns.push(column);
        Ok(self)
    }

    /// Counts the matching documents as `COUNT(1) _COUNT`.
    #[must_use]
    pub fn select_count(mut self) -> Self {
        self.clauses.select_count = true;
        self.clauses.counts.push(format!("COUNT(1) {COUNT_ALIAS}"));
        self
    }

    /// Counts the documents where `column` is defined.
    ///
    /// A blank column counts every document.
    #[must_use]
    pub fn select_count_of(mut self, column: &str) -> Self {
        if column.trim().is_empty() {
            return self.select_count();
        }
        self.clauses.select_count = true;
        let count = format!("COUNT({}) {COUNT_ALIAS}", self.clauses.qualify(column));
        self.clauses.counts.push(count);
        self
    }

    /// Wraps the final query so it returns its row count.
    #[must_use]
    pub const fn select_row_count(mut self) -> Self {
        self.clauses.select_row_count = true;
        self
    }

    /// Selects distinct values of columns. `*` is kept as is.
    #[must_use]
    pub fn select_distinct(mut self, columns: &[&str]) -> Self {
        self.clauses.select_distinct = true;
        for column in columns {
            let column = self.clauses.qualify_select(column);
            self.clauses.columns.push(column);
        }
        self
    }

    /// Sums columns holding numbers stored as strings.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`] if any column is `*`.
    pub fn select_sum_number_string(self, columns: &[&str]) -> Result<Self> {
        reject_asterisk("select_sum_number_string", columns)?;
        Ok(self.push_aggregates(columns, Aggregate::Sum, |q| {
            format!("SUM(StringToNumber({q}))")
        }))
    }

    /// Sums numeric columns.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`] if any column is `*`.
    pub fn select_sum(self, columns: &[&str]) -> Result<Self> {
        reject_asterisk("select_sum", columns)?;
        Ok(self.push_aggregates(columns, Aggregate::Sum, |q| format!("SUM({q})")))
    }

    /// Selects the maximum of columns.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`] if any column is `*`.
    pub fn select_max(self, columns: &[&str]) -> Result<Self> {
        reject_asterisk("select_max", columns)?;
        Ok(self.push_aggregates(columns, Aggregate::Max, |q| format!("MAX({q})")))
    }

    /// Selects the last `num` characters of columns.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`] if any column is `*`.
    pub fn select_right(self, num: u32, columns: &[&str]) -> Result<Self> {
        reject_asterisk("select_right", columns)?;
        Ok(self.push_aggregates(columns, Aggregate::Max, |q| format!("RIGHT({q}, {num})")))
    }

    /// Selects the first `num` characters of columns.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`] if any column is `*`.
    pub fn select_left(self, num: u32, columns: &[&str]) -> Result<Self> {
        reject_asterisk("select_left", columns)?;
        Ok(self.push_aggregates(columns, Aggregate::Max, |q| format!("LEFT({q}, {num})")))
    }

    /// Selects the first `num_left` characters of the last `num_right`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`] if any column is `*`.
    pub fn select_right_left(self, num_right: u32, num_left: u32, columns: &[&str]) -> Result<Self> {
        reject_asterisk("select_right_left", columns)?;
        Ok(self.push_aggregates(columns, Aggregate::Max, |q| {
            format!("LEFT(RIGHT({q}, {num_right}), {num_left})")
        }))
    }

    /// Selects a raw expression, e.g. `sum(iif(C.score = 1, 1, 0))`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`] if `raw_function` is `*`
    /// and [`QueryError::AliasInRawFunction`] if it already contains ` as `.
    pub fn select_raw_function_as(mut self, raw_function: &str, alias: &str) -> Result<Self> {
        reject_asterisk("select_raw_function_as", &[raw_function])?;
        if raw_function.to_ascii_lowercase().contains(" as ") {
            tracing::trace!(raw_function, "rejected raw function with inline alias");
            return Err(QueryError::AliasInRawFunction);
        }
        self.clauses.select_default = true;
        self.clauses
            .raw_functions
            .push(format!("{raw_function} as {alias}"));
        Ok(self)
    }

    fn push_aggregates<F>(mut self, columns: &[&str], target: Aggregate, render: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        self.clauses.select_default = true;
        for column in columns {
            let qualified = self.clauses.qualify(column);
            let expr = format!("{} as {column}", render(&qualified));
            match target {
                Aggregate::Sum => self.clauses.sums.push(expr),
                Aggregate::Max => self.clauses.maxes.push(expr),
            }
        }
        self
    }

    // Grouping, ordering, paging

    /// Groups by columns. Every grouped column must also be selected, in
    /// the same order, or [`build`](Self::build) fails.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`] if any column is `*`.
    pub fn group_by(mut self, columns: &[&str]) -> Result<Self> {
        reject_asterisk("group_by", columns)?;
        for column in columns {
            let column = self.clauses.qualify(column);
            self.clauses.group_by.push(column);
        }
        Ok(self)
    }

    /// Orders by a column. Accepts a [`SortOrder`] or a direction string;
    /// unrecognized strings sort ascending.
    #[must_use]
    pub fn order_by(mut self, column: &str, order: impl Into<SortOrder>) -> Self {
        let order: SortOrder = order.into();
        let entry = format!("{} {order}", self.clauses.qualify(column));
        self.clauses.order_by.push(entry);
        self
    }

    /// Skips `skip` documents. Enables paging.
    #[must_use]
    pub const fn skip(mut self, skip: u64) -> Self {
        self.clauses.paging = true;
        self.clauses.skip = skip;
        self
    }

    /// Returns at most `take` documents. Enables paging.
    #[must_use]
    pub const fn take(mut self, take: u64) -> Self {
        self.clauses.paging = true;
        self.clauses.take = take;
        self
    }

    // Nesting

    /// Queries from a nested query instead of the collection.
    ///
    /// `build` receives a fresh builder with the same options. A later call
    /// replaces the previous subquery.
    ///
    /// # Errors
    ///
    /// Returns whatever error `build` returns.
    pub fn from_subquery<F>(mut self, build: F) -> Result<Self>
    where
        F: FnOnce(Self) -> Result<Self>,
    {
        let child = build(Self::with_options(self.clauses.options.clone()))?;
        self.clauses.source = Source::Subquery(Box::new(child));
        Ok(self)
    }

    /// Validates the registered clauses and renders the query.
    ///
    /// # Errors
    ///
    /// Returns a selection-mode error ([`QueryError::CountWithColumns`],
    /// [`QueryError::CountWithDistinct`], [`QueryError::SelectWithDistinct`]),
    /// [`QueryError::GroupByMismatch`], or [`QueryError::NestingTooDeep`].
    pub fn build(&self) -> Result<String> {
        compile(&self.clauses, 0)
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for QueryBuilder {
    fn options(&self) -> &QueryOptions {
        &self.clauses.options
    }

    fn push_predicate(mut self, predicate: Predicate) -> Self {
        self.clauses.predicates.push(predicate);
        self
    }
}

#[derive(Clone, Copy)]
enum Aggregate {
    Sum,
    Max,
}

fn reject_asterisk(clause: &'static str, columns: &[&str]) -> Result<()> {
    if columns.contains(&"*") {
        tracing::trace!(clause, "rejected asterisk");
        return Err(QueryError::AsteriskNotAllowed { clause });
    }
    Ok(())
}
