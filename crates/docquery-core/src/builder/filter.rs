//! WHERE predicate registration shared by builders and groups.

use crate::error::{QueryError, Result};
use crate::options::QueryOptions;
use crate::value::{escape_str, ToQueryValue};

use super::clauses::{Predicate, PredicateSet};
use super::operator::Operation;

/// Predicate methods over string column names.
///
/// Implemented by [`QueryBuilder`](super::QueryBuilder) and [`WhereGroup`].
/// Every column is qualified with the table alias; values are rendered by
/// [`QueryValue::to_literal`](crate::value::QueryValue::to_literal).
pub trait Filter: Sized {
    /// Options of the owning query.
    fn options(&self) -> &QueryOptions;

    /// Appends a rendered predicate to its buffer.
    #[must_use]
    fn push_predicate(self, predicate: Predicate) -> Self;

    /// `{column} {op} {value}`.
    #[must_use]
    fn where_op<V: ToQueryValue>(self, column: &str, op: Operation, value: V) -> Self {
        let sql = format!(
            "{} {op} {}",
            qualify(self.options(), column),
            value.to_query_value().to_literal()
        );
        self.push_predicate(Predicate::Condition(sql))
    }

    /// `{column} = {value}`.
    #[must_use]
    fn where_is<V: ToQueryValue>(self, column: &str, value: V) -> Self {
        self.where_op(column, Operation::Equal, value)
    }

    /// `{column} <> {value}`.
    #[must_use]
    fn where_is_not<V: ToQueryValue>(self, column: &str, value: V) -> Self {
        self.where_op(column, Operation::NotEqual, value)
    }

    /// Case-insensitive text comparison.
    #[must_use]
    fn where_ignore_case(self, column: &str, op: Operation, value: &str) -> Self {
        let sql = format!(
            "LOWER({}) {op} '{}'",
            qualify(self.options(), column),
            escape_str(&value.to_lowercase())
        );
        self.push_predicate(Predicate::Condition(sql))
    }

    /// Case-insensitive equality.
    #[must_use]
    fn where_ignore_case_is(self, column: &str, value: &str) -> Self {
        self.where_ignore_case(column, Operation::Equal, value)
    }

    /// Compares the last `num` characters of a column.
    #[must_use]
    fn where_right(self, num: u32, column: &str, op: Operation, value: &str) -> Self {
        let sql = format!(
            "RIGHT({}, {num}) {op} '{}'",
            qualify(self.options(), column),
            escape_str(value)
        );
        self.push_predicate(Predicate::Condition(sql))
    }

    /// Equality on the last `num` characters of a column.
    #[must_use]
    fn where_right_is(self, num: u32, column: &str, value: &str) -> Self {
        self.where_right(num, column, Operation::Equal, value)
    }

    /// Compares the first `num_left` characters of the last `num_right`.
    #[must_use]
    fn where_right_left(
        self,
        num_right: u32,
        num_left: u32,
        column: &str,
        op: Operation,
        value: &str,
    ) -> Self {
        let sql = format!(
            "LEFT(RIGHT({}, {num_right}), {num_left}) {op} '{}'",
            qualify(self.options(), column),
            escape_str(value)
        );
        self.push_predicate(Predicate::Condition(sql))
    }

    /// Equality form of [`where_right_left`](Self::where_right_left).
    #[must_use]
    fn where_right_left_is(self, num_right: u32, num_left: u32, column: &str, value: &str) -> Self {
        self.where_right_left(num_right, num_left, column, Operation::Equal, value)
    }

    /// `{column} = null`.
    #[must_use]
    fn where_null(self, column: &str) -> Self {
        let sql = format!(
            "{} {} null",
            qualify(self.options(), column),
            Operation::Equal
        );
        self.push_predicate(Predicate::IsNull(sql))
    }

    /// `{column} <> null`.
    #[must_use]
    fn where_not_null(self, column: &str) -> Self {
        let sql = format!(
            "{} {} null",
            qualify(self.options(), column),
            Operation::NotEqual
        );
        self.push_predicate(Predicate::IsNotNull(sql))
    }

    /// Case-insensitive substring match.
    #[must_use]
    fn where_contains(self, column: &str, value: &str) -> Self {
        let sql = like(self.options(), column, "LIKE", value);
        self.push_predicate(Predicate::Condition(sql))
    }

    /// Case-insensitive substring exclusion.
    #[must_use]
    fn where_not_contains(self, column: &str, value: &str) -> Self {
        let sql = like(self.options(), column, "NOT LIKE", value);
        self.push_predicate(Predicate::Condition(sql))
    }

    /// `{column} IN (...)`.
    #[must_use]
    fn where_in<I>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToQueryValue,
    {
        let sql = in_list(self.options(), column, "IN", values);
        self.push_predicate(Predicate::Condition(sql))
    }

    /// `{column} NOT IN (...)`.
    #[must_use]
    fn where_not_in<I>(self, column: &str, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToQueryValue,
    {
        let sql = in_list(self.options(), column, "NOT IN", values);
        self.push_predicate(Predicate::Condition(sql))
    }

    /// Adds a parenthesized group of predicates joined with `joiner`.
    ///
    /// `build` receives an empty [`WhereGroup`]; everything it registers,
    /// null checks included, ends up inside the parentheses.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyWhereGroup`] if `build` registers nothing.
    fn where_group<F>(self, joiner: &str, build: F) -> Result<Self>
    where
        F: FnOnce(WhereGroup) -> WhereGroup,
    {
        let group = build(WhereGroup::new(self.options().clone()));
        let sql = group.into_condition(joiner)?;
        Ok(self.push_predicate(Predicate::Condition(sql)))
    }
}

fn qualify(options: &QueryOptions, column: &str) -> String {
    format!("{}.{column}", options.table_alias)
}

fn like(options: &QueryOptions, column: &str, keyword: &str, value: &str) -> String {
    format!(
        "lower({}) {keyword} '%{}%'",
        qualify(options, column),
        escape_str(value).to_lowercase()
    )
}

fn in_list<I>(options: &QueryOptions, column: &str, keyword: &str, values: I) -> String
where
    I: IntoIterator,
    I::Item: ToQueryValue,
{
    let literals: Vec<String> = values
        .into_iter()
        .map(|v| v.to_query_value().to_literal())
        .collect();
    format!(
        "{} {keyword} ({})",
        qualify(options, column),
        literals.join(",")
    )
}

/// Collects predicates for one parenthesized WHERE group.
///
/// A group only holds predicates; it is consumed when the enclosing
/// `where_group` call returns.
#[derive(Debug, Clone)]
pub struct WhereGroup {
    options: QueryOptions,
    predicates: PredicateSet,
}

impl WhereGroup {
    pub(crate) fn new(options: QueryOptions) -> Self {
        Self {
            options,
            predicates: PredicateSet::default(),
        }
    }

    /// Returns the predicates registered so far.
    #[must_use]
    pub const fn predicates(&self) -> &PredicateSet {
        &self.predicates
    }

    fn into_condition(self, joiner: &str) -> Result<String> {
        if self.predicates.is_empty() {
            tracing::trace!(joiner, "rejected empty where group");
            return Err(QueryError::EmptyWhereGroup);
        }
        Ok(format!("({})", self.predicates.join(joiner)))
    }
}

impl Filter for WhereGroup {
    fn options(&self) -> &QueryOptions {
        &self.options
    }

    fn push_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> WhereGroup {
        WhereGroup::new(QueryOptions::new())
    }

    fn conditions(group: &WhereGroup) -> Vec<&str> {
        group.predicates().iter().collect()
    }

    #[test]
    fn test_where_op_values() {
        let g = group()
            .where_op("age", Operation::GreaterThanOrEqual, 18)
            .where_is("active", true)
            .where_is_not("name", "Bob");
        assert_eq!(
            conditions(&g),
            vec!["C.age >= 18", "C.active = true", "C.name <> 'Bob'"]
        );
    }

    #[test]
    fn test_where_ignore_case() {
        let g = group().where_ignore_case_is("name", "O'Neil");
        assert_eq!(conditions(&g), vec![r"LOWER(C.name) = 'o\'neil'"]);
    }

    #[test]
    fn test_where_right_and_left() {
        let g = group()
            .where_right_is(4, "code", "2024")
            .where_right_left(6, 2, "code", Operation::NotEqual, "AB");
        assert_eq!(
            conditions(&g),
            vec![
                "RIGHT(C.code, 4) = '2024'",
                "LEFT(RIGHT(C.code, 6), 2) <> 'AB'"
            ]
        );
    }

    #[test]
    fn test_where_contains() {
        let g = group()
            .where_contains("name", "JoHn")
            .where_not_contains("name", "It's");
        assert_eq!(
            conditions(&g),
            vec![
                "lower(C.name) LIKE '%john%'",
                r"lower(C.name) NOT LIKE '%it\'s%'"
            ]
        );
    }

    #[test]
    fn test_where_in_text_escapes_each_value() {
        let g = group().where_in("tag", ["a", "b'c", r"d\e"]);
        assert_eq!(conditions(&g), vec![r"C.tag IN ('a','b\'c','d\\e')"]);
    }

    #[test]
    fn test_where_non_finite_float() {
        let g = group()
            .where_is("a", f64::NAN)
            .where_is("b", f64::INFINITY);
        assert_eq!(conditions(&g), vec!["C.a = null", "C.b = null"]);
    }

    #[test]
    fn test_where_in_integers() {
        let g = group().where_not_in("id", vec![1, 2, 3]);
        assert_eq!(conditions(&g), vec!["C.id NOT IN (1,2,3)"]);
    }

    #[test]
    fn test_null_checks() {
        let g = group().where_not_null("a").where_null("b");
        assert_eq!(conditions(&g), vec!["C.b = null", "C.a <> null"]);
    }

    #[test]
    fn test_nested_group() {
        let g = group()
            .where_is("a", 1)
            .where_group("AND", |g| g.where_is("b", 2).where_is("c", 3))
            .unwrap();
        assert_eq!(conditions(&g), vec!["C.a = 1", "(C.b = 2 AND C.c = 3)"]);
    }

    #[test]
    fn test_empty_group_rejected() {
        let err = group().where_group("OR", |g| g).unwrap_err();
        assert_eq!(err, QueryError::EmptyWhereGroup);
    }

    #[test]
    fn test_group_keeps_null_checks() {
        let sql = group()
            .where_null("x")
            .where_is("y", 1)
            .into_condition("OR")
            .unwrap();
        assert_eq!(sql, "(C.y = 1 OR C.x = null)");
    }
}
