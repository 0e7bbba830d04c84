//! Rendering a [`QueryPlan`] into one parameterized statement.

use serde::Serialize;

use super::token::{SqlStream, SqlToken};
use crate::compiler::QueryPlan;

/// What to emit when the plan has no predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyWhere {
    /// Omit the WHERE clause entirely.
    #[default]
    Omit,
    /// Emit `WHERE 1=1`, for callers whose downstream tooling appends
    /// `AND ...` to the statement.
    Tautology,
}

/// A rendered statement plus the positional parameters to bind, in order.
///
/// The renderer never inlines operand values into the SQL text; the params
/// come back exactly as the compiler accumulated them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// Render with the default empty-WHERE policy ([`EmptyWhere::Omit`]).
pub fn render(plan: &QueryPlan) -> RenderedQuery {
    render_with(plan, EmptyWhere::Omit)
}

/// Serialize a plan into `SELECT .. FROM .. WHERE .. ORDER BY .. ;`.
///
/// Every clause is guarded by its list being non-empty, so the output never
/// contains a dangling keyword: no sorts means no `ORDER BY` at all, and an
/// all-unknown-tables plan drops `FROM` along with everything else.
pub fn render_with(plan: &QueryPlan, empty_where: EmptyWhere) -> RenderedQuery {
    let mut ts = SqlStream::new();

    ts.push(SqlToken::Select).space();
    ts.separated(&plan.selects, SqlToken::Comma);

    if !plan.froms.is_empty() {
        ts.space().push(SqlToken::From).space();
        ts.separated(&plan.froms, SqlToken::Comma);
    }

    if !plan.wheres.is_empty() {
        ts.space().push(SqlToken::Where).space();
        ts.separated(&plan.wheres, SqlToken::And);
    } else if empty_where == EmptyWhere::Tautology {
        ts.space().push(SqlToken::Where).space().fragment("1=1");
    }

    if !plan.sorts.is_empty() {
        ts.space().push(SqlToken::OrderBy).space();
        ts.separated(&plan.sorts, SqlToken::Comma);
    }

    ts.space().push(SqlToken::Semicolon);

    RenderedQuery {
        sql: ts.serialize(),
        params: plan.params.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> QueryPlan {
        QueryPlan {
            selects: vec!["book.title".into()],
            froms: vec!["book".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_plan_omits_where_by_default() {
        let rendered = render(&plan());
        assert_eq!(rendered.sql, "SELECT book.title FROM book ;");
        assert!(rendered.params.is_empty());
    }

    #[test]
    fn test_tautology_policy_keeps_where_present() {
        let rendered = render_with(&plan(), EmptyWhere::Tautology);
        assert_eq!(rendered.sql, "SELECT book.title FROM book WHERE 1=1 ;");
    }

    #[test]
    fn test_params_pass_through_untouched() {
        let mut plan = plan();
        plan.wheres.push("book.price > ?".into());
        plan.params.push("10".into());
        let rendered = render(&plan);
        assert_eq!(rendered.sql, "SELECT book.title FROM book WHERE book.price > ? ;");
        assert_eq!(rendered.params, ["10"]);
    }
}
