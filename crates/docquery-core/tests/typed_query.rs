//! Typed builder behavior over derived documents.

mod common;

use common::{assert_sql, people, OrderLine, Person};
use docquery_core::{
    FieldFilter, Filter, Operation, QueryBuilder, QueryError, QueryOptions, Result, SortOrder,
    TypedQuery,
};

#[test]
fn test_select_named_resolves_columns() {
    let sql = people()
        .select_named(&["first_name", "date_of_birth", "nickname"])
        .build()
        .unwrap();
    assert_sql(&sql, "SELECT C.firstName,C.dob,C.nickname FROM C\n");
}

#[test]
fn test_group_by_named_matches_typed_select() -> Result<()> {
    let sql = people()
        .select((Person::first_name(), Person::education_level()))
        .group_by_named(&["first_name", "education_level"])?
        .build()?;
    assert_sql(
        &sql,
        "SELECT C.firstName,C.educationLevel FROM C\nGROUP BY C.firstName,C.educationLevel\n",
    );
    Ok(())
}

#[test]
fn test_group_by_must_follow_selection_order() {
    let err = people()
        .select((Person::first_name(), Person::email()))
        .group_by((Person::email(), Person::first_name()))
        .unwrap()
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        QueryError::GroupByMismatch {
            grouped: vec![String::from("C.email"), String::from("C.firstName")],
            selected: vec![String::from("C.firstName"), String::from("C.email")],
        }
    );
}

#[test]
fn test_select_as_keeps_group_by_valid() -> Result<()> {
    let sql = people()
        .select_as(Person::education_level(), "level")?
        .group_by(Person::education_level())?
        .build()?;
    assert_sql(
        &sql,
        "SELECT C.educationLevel AS level FROM C\nGROUP BY C.educationLevel\n",
    );
    Ok(())
}

#[test]
fn test_select_as_field_uses_target_column() -> Result<()> {
    let sql = people()
        .select_as_field(Person::id(), OrderLine::order_id())?
        .build()?;
    assert_sql(&sql, "SELECT C.id AS id FROM C\n");
    Ok(())
}

#[test]
fn test_typed_aggregates() -> Result<()> {
    let sql = TypedQuery::<OrderLine>::new()
        .select(OrderLine::product_code())
        .select_sum(OrderLine::quantity())?
        .select_max(OrderLine::amount())?
        .group_by(OrderLine::product_code())?
        .build()?;
    assert_sql(
        &sql,
        "SELECT C.ProductCode,SUM(C.Quantity) as Quantity,MAX(C.Amount) as Amount FROM C\n\
         GROUP BY C.ProductCode\n",
    );
    Ok(())
}

#[test]
fn test_typed_predicates() {
    let sql = people()
        .where_op(Person::id(), Operation::GreaterThan, 100)
        .where_is_not(Person::email(), "none@example.com")
        .where_ignore_case_is(Person::first_name(), "ANNA")
        .where_right_is(2, Person::education_level(), "S3")
        .where_contains(Person::last_name(), "Smi")
        .where_not_contains(Person::last_name(), "x")
        .where_not_null(Person::date_of_birth())
        .build()
        .unwrap();
    assert_sql(
        &sql,
        "SELECT * FROM C\n\
         WHERE C.id > 100 AND C.email <> 'none@example.com' \
         AND LOWER(C.firstName) = 'anna' AND RIGHT(C.educationLevel, 2) = 'S3' \
         AND lower(C.lastName) LIKE '%smi%' AND lower(C.lastName) NOT LIKE '%x%' \
         AND C.dob <> null\n",
    );
}

#[test]
fn test_typed_string_projections() -> Result<()> {
    let sql = TypedQuery::<OrderLine>::new()
        .select_sum_number_string(OrderLine::amount())?
        .select_right(4, OrderLine::product_code())?
        .select_left(2, OrderLine::product_code())?
        .select_right_left(6, 3, OrderLine::order_id())?
        .build()?;
    assert_sql(
        &sql,
        "SELECT SUM(StringToNumber(C.Amount)) as Amount,RIGHT(C.ProductCode, 4) as ProductCode,\
         LEFT(C.ProductCode, 2) as ProductCode,LEFT(RIGHT(C.id, 6), 3) as id FROM C\n",
    );
    Ok(())
}

#[test]
fn test_typed_right_left_predicates() {
    let sql = TypedQuery::<OrderLine>::new()
        .where_right(3, OrderLine::product_code(), Operation::NotEqual, "XYZ")
        .where_right_left(6, 2, OrderLine::order_id(), Operation::GreaterThan, "20")
        .where_right_left_is(4, 1, OrderLine::order_id(), "A")
        .build()
        .unwrap();
    assert_sql(
        &sql,
        "SELECT * FROM C\n\
         WHERE RIGHT(C.ProductCode, 3) <> 'XYZ' AND LEFT(RIGHT(C.id, 6), 2) > '20' \
         AND LEFT(RIGHT(C.id, 4), 1) = 'A'\n",
    );
}

#[test]
fn test_where_in_escapes_values() {
    let sql = people()
        .where_in(Person::last_name(), ["O'Hara", r"back\slash"])
        .where_not_in(Person::id(), vec!["a", "b"])
        .build()
        .unwrap();
    assert_sql(
        &sql,
        "SELECT * FROM C\n\
         WHERE C.lastName IN ('O\\'Hara','back\\\\slash') AND C.id NOT IN ('a','b')\n",
    );
}

#[test]
fn test_typed_where_group() -> Result<()> {
    let sql = people()
        .where_is(Person::education_level(), "S3")
        .where_group("OR", |g| {
            g.where_null(Person::email())
                .where_contains(Person::email(), "@example.com")
        })?
        .build()?;
    assert_sql(
        &sql,
        "SELECT * FROM C\n\
         WHERE C.educationLevel = 'S3' AND (lower(C.email) LIKE '%@example.com%' OR C.email = null)\n",
    );
    Ok(())
}

#[test]
fn test_empty_typed_group_rejected() {
    let err = people().where_group("AND", |g| g).unwrap_err();
    assert_eq!(err, QueryError::EmptyWhereGroup);
}

#[test]
fn test_double_nesting() -> Result<()> {
    let sql = people()
        .from_subquery(|q| {
            q.from_subquery(|q| Ok(q.select((Person::id(), Person::email()))))
                .map(|q| q.select(Person::email()).distinct())
        })?
        .select_count()
        .build()?;
    assert_sql(
        &sql,
        "SELECT COUNT(1) _COUNT FROM (SELECT DISTINCT C.email FROM (SELECT C.id,C.email FROM C\n\
         ) AS C\n\
         ) AS C\n",
    );
    Ok(())
}

#[test]
fn test_row_count_wraps_whole_query() {
    let sql = people()
        .select(Person::email())
        .where_is(Person::education_level(), "S3")
        .skip(0)
        .take(50)
        .select_row_count()
        .build()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT COUNT(_COUNT) _COUNT FROM (SELECT C.email FROM C\n\
         WHERE C.educationLevel = 'S3'\n\
         OFFSET 0 LIMIT 50\n\
         ) AS _COUNT"
    );
}

#[test]
fn test_select_count_of_field() {
    let query = people().select_count_of(Person::email());
    assert!(query.is_select_count());
    assert_sql(&query.build().unwrap(), "SELECT COUNT(C.email) _COUNT FROM C\n");
}

#[test]
fn test_select_distinct_fields() {
    let sql = TypedQuery::<OrderLine>::new()
        .select_distinct((OrderLine::product_code(), OrderLine::amount()))
        .order_by(OrderLine::product_code(), "DESC")
        .build()
        .unwrap();
    assert_sql(
        &sql,
        "SELECT DISTINCT C.ProductCode,C.Amount FROM C\nORDER BY C.ProductCode DESC\n",
    );
}

#[test]
fn test_custom_alias_flows_into_subqueries() {
    let options = QueryOptions::new().table_alias("p");
    let sql = TypedQuery::<Person>::with_options(options)
        .from_subquery(|q| Ok(q.where_is(Person::id(), "42")))
        .unwrap()
        .select(Person::first_name())
        .build()
        .unwrap();
    assert_sql(
        &sql,
        "SELECT p.firstName FROM (SELECT * FROM p\nWHERE p.id = '42'\n) AS p\n",
    );
}

#[test]
fn test_into_untyped_continues_with_strings() {
    let sql = people()
        .select(Person::email())
        .into_untyped()
        .where_is("type", "person")
        .order_by("email", SortOrder::Desc)
        .build()
        .unwrap();
    assert_sql(
        &sql,
        "SELECT C.email FROM C\nWHERE C.type = 'person'\nORDER BY C.email DESC\n",
    );
}

#[test]
fn test_build_is_repeatable() {
    let query = people()
        .select((Person::email(), Person::first_name()))
        .where_in(Person::education_level(), ["S1", "S2"])
        .from_subquery(|q| Ok(q.where_not_null(Person::email())))
        .unwrap();
    let first = query.build().unwrap();
    assert_eq!(query.build().unwrap(), first);
    assert_eq!(query.clone().build().unwrap(), first);
}

#[test]
fn test_untyped_and_typed_agree() {
    let typed = people()
        .select(Person::first_name())
        .where_is(Person::education_level(), "S3")
        .build()
        .unwrap();
    let untyped = QueryBuilder::new()
        .select(&["firstName"])
        .where_is("educationLevel", "S3")
        .build()
        .unwrap();
    assert_eq!(typed, untyped);
}
