//! The core fold: grid rows plus a catalog snapshot become a [`QueryPlan`].
//!
//! One pass over the rows in submission order. Anomalies confined to a
//! single row (unknown operator, unknown table, malformed join operand)
//! remove that row's contribution and surface as warnings on the plan; the
//! only hard failure is a plan with nothing to select.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::SchemaCatalog;
use crate::criteria::Criteria;
use crate::row::{canonical_model, Row};

/// Errors that abort compilation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Nothing ended up in the SELECT list.
    #[error("no columns selected: check at least one row to get output")]
    NoColumnsSelected,
}

/// Anomalies absorbed during compilation. The affected row contributes
/// nothing for the anomalous part, but the grid still compiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CompileWarning {
    /// Operator keyword absent from the catalog; the predicate was dropped.
    UnknownOperator { operator: String, column: String },
    /// Table absent from the catalog; excluded from FROM (and, for joins,
    /// the join predicate was dropped with it).
    UnknownTable { table: String },
    /// Join operand did not name a dotted `model.field` path.
    MalformedJoin { operand: String },
}

impl std::fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileWarning::UnknownOperator { operator, column } => {
                write!(f, "unknown operator '{}' on {}: predicate dropped", operator, column)
            }
            CompileWarning::UnknownTable { table } => {
                write!(f, "unknown table '{}': excluded from query", table)
            }
            CompileWarning::MalformedJoin { operand } => {
                write!(f, "join operand '{}' is not a model.field path: join dropped", operand)
            }
        }
    }
}

/// The compiled intermediate representation of one grid submission.
///
/// Built once per compilation, handed to the renderer, then discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryPlan {
    /// `model.field` tokens in row order. Never deduplicated.
    pub selects: Vec<String>,
    /// Distinct catalog-known tables, first-seen order.
    pub froms: Vec<String>,
    /// Predicate fragments in row order. Join predicates are deduplicated by
    /// exact text; scalar predicates never are.
    pub wheres: Vec<String>,
    /// `model.field` tokens in row order. Never deduplicated.
    pub sorts: Vec<String>,
    /// Operands of the scalar predicates in `wheres`, positionally aligned
    /// left to right with the non-join entries.
    pub params: Vec<String>,
    /// Anomalies absorbed along the way.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<CompileWarning>,
}

impl QueryPlan {
    fn warn_unknown_table(&mut self, table: &str) {
        let already = self.warnings.iter().any(|w| {
            matches!(w, CompileWarning::UnknownTable { table: t } if t == table)
        });
        if !already {
            self.warnings.push(CompileWarning::UnknownTable { table: table.into() });
        }
    }
}

/// Fold `rows` into a [`QueryPlan`] against the given catalog snapshot.
///
/// Pure and synchronous: no I/O, no shared state, nothing cached between
/// calls. Concurrent compilations need no coordination.
pub fn compile<C: SchemaCatalog>(rows: &[Row], catalog: &C) -> Result<QueryPlan, CompileError> {
    let mut plan = QueryPlan::default();

    for row in rows {
        let model = canonical_model(&row.model);
        let db_field = format!("{}.{}", model, row.field);

        if row.show {
            plan.selects.push(db_field.clone());
        }
        if row.sort.is_some() {
            plan.sorts.push(db_field.clone());
        }

        if let Some(criteria) = &row.criteria {
            if criteria.is_join() {
                apply_join(&mut plan, catalog, criteria, &db_field);
            } else if let Some(op_sql) = catalog.operator_sql(&criteria.operator) {
                plan.params.push(criteria.operand.clone());
                plan.wheres.push(format!("{} {}", db_field, op_sql));
            } else {
                plan.warnings.push(CompileWarning::UnknownOperator {
                    operator: criteria.operator.clone(),
                    column: db_field.clone(),
                });
            }
        }

        if plan.froms.iter().any(|f| f == &model) {
            continue;
        }
        if catalog.contains_table(&model) {
            plan.froms.push(model);
        } else {
            plan.warn_unknown_table(&model);
        }
    }

    if plan.selects.is_empty() {
        return Err(CompileError::NoColumnsSelected);
    }
    Ok(plan)
}

/// Join inference. The operand names the joined column (`Author.id`) and the
/// referencing side is assumed to expose a `{field}_id` foreign key, so
/// `join, Author.id` on row `book.author` yields `author.id = book.author_id`.
fn apply_join<C: SchemaCatalog>(
    plan: &mut QueryPlan,
    catalog: &C,
    criteria: &Criteria,
    db_field: &str,
) {
    let operand = criteria.operand.to_lowercase();
    let Some((join_model, join_field)) = operand.rsplit_once('.') else {
        plan.warnings.push(CompileWarning::MalformedJoin {
            operand: criteria.operand.clone(),
        });
        return;
    };

    let join_model = canonical_model(join_model);
    if !catalog.contains_table(&join_model) {
        plan.warn_unknown_table(&join_model);
        return;
    }

    let predicate = format!("{}.{} = {}_id", join_model, join_field, db_field);
    if !plan.wheres.contains(&predicate) {
        plan.wheres.push(predicate);
    }
    // A table referenced by a join predicate must appear in FROM even when no
    // row names it as its model.
    if !plan.froms.iter().any(|f| f == &join_model) {
        plan.froms.push(join_model);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::row::SortDir;

    fn library_catalog() -> StaticCatalog {
        StaticCatalog::sqlite().with_table("book").with_table("author")
    }

    #[test]
    fn test_empty_grid_has_no_columns() {
        let result = compile(&[], &library_catalog());
        assert_eq!(result, Err(CompileError::NoColumnsSelected));
    }

    #[test]
    fn test_pure_join_row_contributes_wheres_and_froms_only() {
        let rows = vec![
            Row::new("Book", "title").with_show(),
            Row::new("Book", "author").with_criteria("join", "Author.id"),
        ];
        let plan = compile(&rows, &library_catalog()).unwrap();
        assert_eq!(plan.selects, ["book.title"]);
        assert_eq!(plan.froms, ["book", "author"]);
        assert_eq!(plan.wheres, ["author.id = book.author_id"]);
        assert!(plan.params.is_empty());
    }

    #[test]
    fn test_unknown_table_warned_once() {
        let rows = vec![
            Row::new("Ghost", "a").with_show(),
            Row::new("Ghost", "b").with_show(),
        ];
        let plan = compile(&rows, &library_catalog()).unwrap();
        assert!(plan.froms.is_empty());
        assert_eq!(
            plan.warnings,
            [CompileWarning::UnknownTable { table: "ghost".into() }]
        );
    }

    #[test]
    fn test_sorted_row_contributes_sort_token() {
        let rows = vec![Row::new("Book", "title").with_show().with_sort(SortDir::Desc)];
        let plan = compile(&rows, &library_catalog()).unwrap();
        assert_eq!(plan.sorts, ["book.title"]);
    }
}
