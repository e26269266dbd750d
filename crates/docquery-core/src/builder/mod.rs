//! Query builders.
//!
//! Builder calls accumulate clause fragments; `build` validates the selection
//! modes and renders one query string.
//!
//! # Example
//!
//! ```rust
//! use docquery_core::builder::{Filter, QueryBuilder, SortOrder};
//!
//! let sql = QueryBuilder::new()
//!     .select(&["email"])
//!     .where_group("OR", |g| g.where_is("role", "admin").where_null("role"))
//!     .unwrap()
//!     .order_by("email", SortOrder::Desc)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT C.email FROM C\nWHERE (C.role = 'admin' OR C.role = null)\nORDER BY C.email DESC\n"
//! );
//! ```

mod clauses;
mod compile;
mod filter;
mod operator;
mod query;
pub mod typed;
mod validate;

pub use clauses::{Predicate, PredicateSet, Source};
pub use compile::COUNT_ALIAS;
pub use filter::{Filter, WhereGroup};
pub use operator::{Operation, SortOrder};
pub use query::QueryBuilder;
pub use typed::{FieldFilter, TypedQuery, TypedWhereGroup};
