//! Serialization of accumulated clauses into query text.

use crate::error::{QueryError, Result};

use super::clauses::{Clauses, Source};
use super::validate::validate;

/// Alias used by count selections and the row-count wrap.
pub const COUNT_ALIAS: &str = "_COUNT";

/// Compiles `clauses` into query text.
///
/// `depth` is the number of enclosing queries; FROM-subqueries are compiled
/// first with `depth + 1`.
pub(crate) fn compile(clauses: &Clauses, depth: usize) -> Result<String> {
    validate(clauses)?;

    let target = from_target(clauses, depth)?;
    let mut sql = select_section(clauses, &target);

    if !clauses.predicates.is_empty() {
        push_line(&mut sql, &format!("WHERE {}", clauses.predicates.join("AND")));
    }

    if !clauses.group_by.is_empty() {
        push_line(&mut sql, &format!("GROUP BY {}", clauses.group_by.join(",")));
    }

    if !clauses.order_by.is_empty() {
        push_line(&mut sql, &format!("ORDER BY {}", clauses.order_by.join(",")));
    }

    if clauses.paging {
        push_line(
            &mut sql,
            &format!("OFFSET {} LIMIT {}", clauses.skip, clauses.take),
        );
    }

    if clauses.select_row_count {
        sql = format!("SELECT COUNT({COUNT_ALIAS}) {COUNT_ALIAS} FROM ({sql}) AS {COUNT_ALIAS}");
    }

    tracing::debug!(depth, sql = %sql, "compiled query");
    Ok(sql)
}

fn from_target(clauses: &Clauses, depth: usize) -> Result<String> {
    match &clauses.source {
        Source::Collection => Ok(clauses.alias().to_string()),
        Source::Subquery(child) => {
            let limit = clauses.options.max_depth;
            if depth >= limit {
                return Err(QueryError::NestingTooDeep { limit });
            }
            let inner = compile(child.clauses(), depth + 1)?;
            Ok(format!("({inner}) AS {}", clauses.alias()))
        }
    }
}

fn select_section(clauses: &Clauses, target: &str) -> String {
    let mut sql = String::new();

    if clauses.select_count {
        let counts = if clauses.counts.is_empty() {
            format!("COUNT(1) {COUNT_ALIAS}")
        } else {
            clauses.counts.join(",")
        };
        push_line(&mut sql, &format!("SELECT {counts} FROM {target}"));
        return sql;
    }

    let keyword = if clauses.select_distinct {
        "SELECT DISTINCT"
    } else {
        "SELECT"
    };
    let projection = clauses.projection();
    if projection.is_empty() {
        push_line(&mut sql, &format!("{keyword} * FROM {target}"));
    } else {
        push_line(
            &mut sql,
            &format!("{keyword} {} FROM {target}", projection.join(",")),
        );
    }
    sql
}

fn push_line(sql: &mut String, line: &str) {
    sql.push_str(line);
    sql.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::QueryOptions;

    fn clauses() -> Clauses {
        Clauses::new(QueryOptions::new())
    }

    #[test]
    fn test_empty_selects_everything() {
        assert_eq!(compile(&clauses(), 0).unwrap(), "SELECT * FROM C\n");
    }

    #[test]
    fn test_sections_in_fixed_order() {
        let mut c = clauses();
        c.paging = true;
        c.order_by.push(String::from("C.a DESC"));
        c.group_by.push(String::from("C.a"));
        c.predicates.conditions.push(String::from("C.b = 1"));
        c.columns.push(String::from("C.a"));
        c.select_default = true;

        assert_eq!(
            compile(&c, 0).unwrap(),
            "SELECT C.a FROM C\nWHERE C.b = 1\nGROUP BY C.a\nORDER BY C.a DESC\nOFFSET 0 LIMIT 10\n"
        );
    }

    #[test]
    fn test_count_default_expression() {
        let mut c = clauses();
        c.select_count = true;
        assert_eq!(compile(&c, 0).unwrap(), "SELECT COUNT(1) _COUNT FROM C\n");
    }

    #[test]
    fn test_row_count_wraps_once() {
        let mut c = clauses();
        c.select_row_count = true;
        assert_eq!(
            compile(&c, 0).unwrap(),
            "SELECT COUNT(_COUNT) _COUNT FROM (SELECT * FROM C\n) AS _COUNT"
        );
    }

    #[test]
    fn test_distinct_without_columns() {
        let mut c = clauses();
        c.select_distinct = true;
        assert_eq!(compile(&c, 0).unwrap(), "SELECT DISTINCT * FROM C\n");
    }
}
