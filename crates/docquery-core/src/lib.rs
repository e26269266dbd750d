//! # docquery-core
//!
//! A chainable builder for SQL-like document query dialects such as the one
//! used by Azure Cosmos DB.
//!
//! This crate provides:
//! - A string-based builder ([`QueryBuilder`]) and a typed builder
//!   ([`TypedQuery`]) sharing the same clause model
//! - Validation of selection modes before rendering
//! - FROM-subqueries and parenthesized WHERE groups
//! - Field → column resolution through `#[derive(Document)]` from
//!   `docquery-derive`
//!
//! ## Building a query
//!
//! ```rust
//! use docquery_core::{Filter, QueryBuilder};
//!
//! let sql = QueryBuilder::new()
//!     .select(&["email", "firstName", "dob"])
//!     .where_is("educationLevel", "S3")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT C.email,C.firstName,C.dob FROM C\nWHERE C.educationLevel = 'S3'\n"
//! );
//! ```
//!
//! ## Escaping
//!
//! Values are inlined. Text literals escape backslashes and single quotes:
//!
//! ```rust
//! use docquery_core::{Filter, QueryBuilder};
//!
//! let sql = QueryBuilder::new()
//!     .where_in("name", ["O'Brien", "Smith"])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(sql, "SELECT * FROM C\nWHERE C.name IN ('O\\'Brien','Smith')\n");
//! ```

pub mod builder;
pub mod error;
pub mod options;
pub mod schema;
pub mod value;

pub use builder::{
    FieldFilter, Filter, Operation, QueryBuilder, SortOrder, TypedQuery, COUNT_ALIAS,
};
pub use error::{QueryError, Result};
pub use options::QueryOptions;
pub use schema::{Document, Field, FieldMapping, Selectable};
pub use value::{QueryValue, ToQueryValue};
