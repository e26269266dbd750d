//! Typed query builder using schema traits.
//!
//! Column arguments are field marker types generated by
//! `#[derive(Document)]`, so only fields of the queried document compile and
//! renamed fields resolve to their stored column names.

use std::fmt;
use std::marker::PhantomData;

use crate::error::Result;
use crate::options::QueryOptions;
use crate::schema::{Document, Field, Selectable};
use crate::value::ToQueryValue;

use super::filter::{Filter, WhereGroup};
use super::operator::{Operation, SortOrder};
use super::query::QueryBuilder;

/// Predicate methods over typed fields of `D`.
///
/// Mirrors [`Filter`] with field markers in place of column strings.
pub trait FieldFilter<D: Document>: Sized {
    /// The string-based predicate target this type wraps.
    type Inner: Filter;

    /// Applies `f` to the wrapped target.
    #[must_use]
    fn map_filter<F>(self, f: F) -> Self
    where
        F: FnOnce(Self::Inner) -> Self::Inner;

    /// Applies a fallible `f` to the wrapped target.
    ///
    /// # Errors
    ///
    /// Returns the error of `f`.
    fn try_map_filter<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(Self::Inner) -> Result<Self::Inner>;

    /// `{field} {op} {value}`.
    #[must_use]
    fn where_op<C, V>(self, _field: C, op: Operation, value: V) -> Self
    where
        C: Field<Document = D>,
        V: ToQueryValue,
    {
        self.map_filter(|inner| inner.where_op(C::NAME, op, value))
    }

    /// `{field} = {value}`.
    #[must_use]
    fn where_is<C, V>(self, field: C, value: V) -> Self
    where
        C: Field<Document = D>,
        V: ToQueryValue,
    {
        self.where_op(field, Operation::Equal, value)
    }

    /// `{field} <> {value}`.
    #[must_use]
    fn where_is_not<C, V>(self, field: C, value: V) -> Self
    where
        C: Field<Document = D>,
        V: ToQueryValue,
    {
        self.where_op(field, Operation::NotEqual, value)
    }

    /// Case-insensitive text comparison.
    #[must_use]
    fn where_ignore_case<C: Field<Document = D>>(self, _field: C, op: Operation, value: &str) -> Self {
        self.map_filter(|inner| inner.where_ignore_case(C::NAME, op, value))
    }

    /// Case-insensitive equality.
    #[must_use]
    fn where_ignore_case_is<C: Field<Document = D>>(self, field: C, value: &str) -> Self {
        self.where_ignore_case(field, Operation::Equal, value)
    }

    /// Compares the last `num` characters of a field.
    #[must_use]
    fn where_right<C: Field<Document = D>>(
        self,
        num: u32,
        _field: C,
        op: Operation,
        value: &str,
    ) -> Self {
        self.map_filter(|inner| inner.where_right(num, C::NAME, op, value))
    }

    /// Equality on the last `num` characters of a field.
    #[must_use]
    fn where_right_is<C: Field<Document = D>>(self, num: u32, field: C, value: &str) -> Self {
        self.where_right(num, field, Operation::Equal, value)
    }

    /// Compares the first `num_left` characters of the last `num_right`.
    #[must_use]
    fn where_right_left<C: Field<Document = D>>(
        self,
        num_right: u32,
        num_left: u32,
        _field: C,
        op: Operation,
        value: &str,
    ) -> Self {
        self.map_filter(|inner| inner.where_right_left(num_right, num_left, C::NAME, op, value))
    }

    /// Equality form of [`where_right_left`](Self::where_right_left).
    #[must_use]
    fn where_right_left_is<C: Field<Document = D>>(
        self,
        num_right: u32,
        num_left: u32,
        field: C,
        value: &str,
    ) -> Self {
        self.where_right_left(num_right, num_left, field, Operation::Equal, value)
    }

    /// `{field} = null`.
    #[must_use]
    fn where_null<C: Field<Document = D>>(self, _field: C) -> Self {
        self.map_filter(|inner| inner.where_null(C::NAME))
    }

    /// `{field} <> null`.
    #[must_use]
    fn where_not_null<C: Field<Document = D>>(self, _field: C) -> Self {
        self.map_filter(|inner| inner.where_not_null(C::NAME))
    }

    /// Case-insensitive substring match.
    #[must_use]
    fn where_contains<C: Field<Document = D>>(self, _field: C, value: &str) -> Self {
        self.map_filter(|inner| inner.where_contains(C::NAME, value))
    }

    /// Case-insensitive substring exclusion.
    #[must_use]
    fn where_not_contains<C: Field<Document = D>>(self, _field: C, value: &str) -> Self {
        self.map_filter(|inner| inner.where_not_contains(C::NAME, value))
    }

    /// `{field} IN (...)`.
    #[must_use]
    fn where_in<C, I>(self, _field: C, values: I) -> Self
    where
        C: Field<Document = D>,
        I: IntoIterator,
        I::Item: ToQueryValue,
    {
        self.map_filter(|inner| inner.where_in(C::NAME, values))
    }

    /// `{field} NOT IN (...)`.
    #[must_use]
    fn where_not_in<C, I>(self, _field: C, values: I) -> Self
    where
        C: Field<Document = D>,
        I: IntoIterator,
        I::Item: ToQueryValue,
    {
        self.map_filter(|inner| inner.where_not_in(C::NAME, values))
    }

    /// Adds a parenthesized group of typed predicates joined with `joiner`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyWhereGroup`](crate::QueryError::EmptyWhereGroup)
    /// if `build` registers nothing.
    fn where_group<F>(self, joiner: &str, build: F) -> Result<Self>
    where
        F: FnOnce(TypedWhereGroup<D>) -> TypedWhereGroup<D>,
    {
        self.try_map_filter(|inner| {
            inner.where_group(joiner, |group| {
                build(TypedWhereGroup {
                    inner: group,
                    _document: PhantomData,
                })
                .inner
            })
        })
    }
}

/// A query builder over the fields of document `D`.
///
/// ```rust,ignore
/// let sql = TypedQuery::<Person>::new()
///     .select((Person::email(), Person::first_name()))
///     .where_is(Person::education_level(), "S3")
///     .order_by(Person::first_name(), SortOrder::Asc)
///     .build()?;
/// ```
pub struct TypedQuery<D: Document> {
    inner: QueryBuilder,
    _document: PhantomData<fn() -> D>,
}

impl<D: Document> TypedQuery<D> {
    /// Creates a typed builder with the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(QueryOptions::default())
    }

    /// Creates a typed builder with the given options.
    #[must_use]
    pub fn with_options(options: QueryOptions) -> Self {
        Self::from_untyped(QueryBuilder::with_options(options))
    }

    const fn from_untyped(inner: QueryBuilder) -> Self {
        Self {
            inner,
            _document: PhantomData,
        }
    }

    /// Returns the string-based builder holding the clauses.
    #[must_use]
    pub fn into_untyped(self) -> QueryBuilder {
        self.inner
    }

    /// Returns the table alias.
    #[must_use]
    pub fn table_alias(&self) -> &str {
        self.inner.table_alias()
    }

    /// Returns true once a count selection was registered.
    #[must_use]
    pub const fn is_select_count(&self) -> bool {
        self.inner.is_select_count()
    }

    fn map(self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        Self::from_untyped(f(self.inner))
    }

    fn try_map(self, f: impl FnOnce(QueryBuilder) -> Result<QueryBuilder>) -> Result<Self> {
        f(self.inner).map(Self::from_untyped)
    }

    /// Makes the whole selection distinct.
    #[must_use]
    pub fn distinct(self) -> Self {
        self.map(QueryBuilder::distinct)
    }

    /// Selects one field or a tuple of fields.
    #[must_use]
    pub fn select<S: Selectable<D>>(self, _fields: S) -> Self {
        self.map(|q| q.select(S::column_names()))
    }

    /// Selects fields by their Rust names, resolving renamed columns.
    #[must_use]
    pub fn select_named(self, fields: &[&str]) -> Self {
        let columns: Vec<&str> = fields.iter().map(|f| D::resolve(f)).collect();
        self.map(|q| q.select(&columns))
    }

    /// Selects a field under another name.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`](crate::QueryError::AsteriskNotAllowed)
    /// if the column is `*`.
    pub fn select_as<C: Field<Document = D>>(self, _field: C, alias: &str) -> Result<Self> {
        self.try_map(|q| q.select_as(C::NAME, alias))
    }

    /// Selects a field under the column name of a field of another document.
    ///
    /// # Errors
    ///
    /// Same as [`select_as`](Self::select_as).
    pub fn select_as_field<C, O>(self, _field: C, _output: O) -> Result<Self>
    where
        C: Field<Document = D>,
        O: Field,
    {
        self.try_map(|q| q.select_as(C::NAME, O::NAME))
    }

    /// Counts the matching documents.
    #[must_use]
    pub fn select_count(self) -> Self {
        self.map(QueryBuilder::select_count)
    }

    /// Counts the documents where `field` is defined.
    #[must_use]
    pub fn select_count_of<C: Field<Document = D>>(self, _field: C) -> Self {
        self.map(|q| q.select_count_of(C::NAME))
    }

    /// Wraps the final query so it returns its row count.
    #[must_use]
    pub fn select_row_count(self) -> Self {
        self.map(QueryBuilder::select_row_count)
    }

    /// Selects distinct values of one field or a tuple of fields.
    #[must_use]
    pub fn select_distinct<S: Selectable<D>>(self, _fields: S) -> Self {
        self.map(|q| q.select_distinct(S::column_names()))
    }

    /// Sums fields holding numbers stored as strings.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`](crate::QueryError::AsteriskNotAllowed)
    /// if a column is `*`.
    pub fn select_sum_number_string<S: Selectable<D>>(self, _fields: S) -> Result<Self> {
        self.try_map(|q| q.select_sum_number_string(S::column_names()))
    }

    /// Sums one field or a tuple of fields.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`](crate::QueryError::AsteriskNotAllowed)
    /// if a column is `*`.
    pub fn select_sum<S: Selectable<D>>(self, _fields: S) -> Result<Self> {
        self.try_map(|q| q.select_sum(S::column_names()))
    }

    /// Selects the maximum of one field or a tuple of fields.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`](crate::QueryError::AsteriskNotAllowed)
    /// if a column is `*`.
    pub fn select_max<S: Selectable<D>>(self, _fields: S) -> Result<Self> {
        self.try_map(|q| q.select_max(S::column_names()))
    }

    /// Selects the last `num` characters of fields.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`](crate::QueryError::AsteriskNotAllowed)
    /// if a column is `*`.
    pub fn select_right<S: Selectable<D>>(self, num: u32, _fields: S) -> Result<Self> {
        self.try_map(|q| q.select_right(num, S::column_names()))
    }

    /// Selects the first `num` characters of fields.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`](crate::QueryError::AsteriskNotAllowed)
    /// if a column is `*`.
    pub fn select_left<S: Selectable<D>>(self, num: u32, _fields: S) -> Result<Self> {
        self.try_map(|q| q.select_left(num, S::column_names()))
    }

    /// Selects the first `num_left` characters of the last `num_right`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`](crate::QueryError::AsteriskNotAllowed)
    /// if a column is `*`.
    pub fn select_right_left<S: Selectable<D>>(
        self,
        num_right: u32,
        num_left: u32,
        _fields: S,
    ) -> Result<Self> {
        self.try_map(|q| q.select_right_left(num_right, num_left, S::column_names()))
    }

    /// Selects a raw expression under `alias`.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::select_raw_function_as`].
    pub fn select_raw_function_as(self, raw_function: &str, alias: &str) -> Result<Self> {
        self.try_map(|q| q.select_raw_function_as(raw_function, alias))
    }

    /// Selects a raw expression under the column name of `output`.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::select_raw_function_as`].
    pub fn select_raw_function_as_field<O: Field>(self, raw_function: &str, _output: O) -> Result<Self> {
        self.try_map(|q| q.select_raw_function_as(raw_function, O::NAME))
    }

    /// Groups by one field or a tuple of fields.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::AsteriskNotAllowed`](crate::QueryError::AsteriskNotAllowed)
    /// if a column is `*`.
    pub fn group_by<S: Selectable<D>>(self, _fields: S) -> Result<Self> {
        self.try_map(|q| q.group_by(S::column_names()))
    }

    /// Groups by fields given by their Rust names.
    ///
    /// # Errors
    ///
    /// Same as [`group_by`](Self::group_by).
    pub fn group_by_named(self, fields: &[&str]) -> Result<Self> {
        let columns: Vec<&str> = fields.iter().map(|f| D::resolve(f)).collect();
        self.try_map(|q| q.group_by(&columns))
    }

    /// Orders by a field.
    #[must_use]
    pub fn order_by<C: Field<Document = D>>(self, _field: C, order: impl Into<SortOrder>) -> Self {
        let order: SortOrder = order.into();
        self.map(|q| q.order_by(C::NAME, order))
    }

    /// Skips `skip` documents. Enables paging.
    #[must_use]
    pub fn skip(self, skip: u64) -> Self {
        self.map(|q| q.skip(skip))
    }

    /// Returns at most `take` documents. Enables paging.
    #[must_use]
    pub fn take(self, take: u64) -> Self {
        self.map(|q| q.take(take))
    }

    /// Queries from a nested typed query over the same document.
    ///
    /// # Errors
    ///
    /// Returns whatever error `build` returns.
    pub fn from_subquery<F>(self, build: F) -> Result<Self>
    where
        F: FnOnce(Self) -> Result<Self>,
    {
        self.try_map(|q| {
            q.from_subquery(|child| build(Self::from_untyped(child)).map(Self::into_untyped))
        })
    }

    /// Validates the registered clauses and renders the query.
    ///
    /// # Errors
    ///
    /// See [`QueryBuilder::build`].
    pub fn build(&self) -> Result<String> {
        self.inner.build()
    }
}

impl<D: Document> Clone for TypedQuery<D> {
    fn clone(&self) -> Self {
        Self::from_untyped(self.inner.clone())
    }
}

impl<D: Document> fmt::Debug for TypedQuery<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedQuery")
            .field("document", &std::any::type_name::<D>())
            .field("inner", &self.inner)
            .finish()
    }
}

impl<D: Document> Default for TypedQuery<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Document> FieldFilter<D> for TypedQuery<D> {
    type Inner = QueryBuilder;

    fn map_filter<F>(self, f: F) -> Self
    where
        F: FnOnce(QueryBuilder) -> QueryBuilder,
    {
        self.map(f)
    }

    fn try_map_filter<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(QueryBuilder) -> Result<QueryBuilder>,
    {
        self.try_map(f)
    }
}

/// Collects typed predicates for one parenthesized WHERE group.
pub struct TypedWhereGroup<D: Document> {
    inner: WhereGroup,
    _document: PhantomData<fn() -> D>,
}

impl<D: Document> FieldFilter<D> for TypedWhereGroup<D> {
    type Inner = WhereGroup;

    fn map_filter<F>(self, f: F) -> Self
    where
        F: FnOnce(WhereGroup) -> WhereGroup,
    {
        Self {
            inner: f(self.inner),
            _document: PhantomData,
        }
    }

    fn try_map_filter<F>(self, f: F) -> Result<Self>
    where
        F: FnOnce(WhereGroup) -> Result<WhereGroup>,
    {
        Ok(Self {
            inner: f(self.inner)?,
            _document: PhantomData,
        })
    }
}
