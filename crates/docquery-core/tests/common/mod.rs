#![allow(dead_code)]

use chrono::NaiveDateTime;
use docquery_core::TypedQuery;
use docquery_derive::Document;
use serde::{Deserialize, Serialize};

/// Person documents as stored in the collection.
#[derive(Debug, Clone, Document)]
#[document(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    #[column(name = "dob")]
    pub date_of_birth: Option<NaiveDateTime>,
    pub email: Option<String>,
    pub education_level: Option<String>,
}

/// Order lines keyed by serde attributes only.
#[derive(Debug, Clone, Serialize, Deserialize, Document)]
#[serde(rename_all = "PascalCase")]
pub struct OrderLine {
    #[serde(rename = "id")]
    pub order_id: String,
    pub product_code: String,
    pub amount: String,
    pub quantity: i64,
    #[serde(skip)]
    pub cached_total: Option<f64>,
}

pub fn people() -> TypedQuery<Person> {
    TypedQuery::new()
}

/// Asserts `sql` equals `expected` line by line for a readable diff.
pub fn assert_sql(sql: &str, expected: &str) {
    assert_eq!(
        sql.lines().collect::<Vec<_>>(),
        expected.lines().collect::<Vec<_>>(),
        "\n  Got:      {sql:?}\n  Expected: {expected:?}"
    );
    assert_eq!(sql, expected);
}
