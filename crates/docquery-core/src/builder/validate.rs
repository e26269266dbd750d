//! Selection-mode checks run at the start of `build`.

use crate::error::{QueryError, Result};

use super::clauses::Clauses;

/// Rejects illegal combinations of selection modes and GROUP BY columns.
///
/// Checks run in a fixed order and the first failure wins.
pub(crate) fn validate(clauses: &Clauses) -> Result<()> {
    if clauses.select_count && !clauses.columns.is_empty() {
        return Err(QueryError::CountWithColumns);
    }

    if clauses.select_count && clauses.select_distinct {
        return Err(QueryError::CountWithDistinct);
    }

    if clauses.effective_select_default() && clauses.select_distinct {
        return Err(QueryError::SelectWithDistinct);
    }

    if !clauses.group_by.is_empty() {
        let selected: Vec<&str> = clauses.columns.iter().map(|c| strip_alias(c)).collect();
        if clauses.group_by != selected {
            return Err(QueryError::GroupByMismatch {
                grouped: clauses.group_by.clone(),
                selected: selected.into_iter().map(String::from).collect(),
            });
        }
    }

    Ok(())
}

/// Drops a trailing ` AS alias` from a selected column.
fn strip_alias(column: &str) -> &str {
    column.split(" AS ").next().unwrap_or(column)
}
