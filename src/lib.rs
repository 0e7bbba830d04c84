//! # Exemplar
//!
//! A query-by-example grid that compiles to parameterized SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │               Grid (ordered Row entries)                 │
//! │          (model, field, show, criteria, sort)            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [validation]
//! ┌─────────────────────────────────────────────────────────┐
//! │          Row set with at least one shown column          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compiler + catalog snapshot]
//! ┌─────────────────────────────────────────────────────────┐
//! │   QueryPlan (selects / froms / wheres / sorts / params)  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [renderer]
//! ┌─────────────────────────────────────────────────────────┐
//! │              SQL text + positional params                │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The compiler is a pure, synchronous, single-pass fold: each call gets its
//! own row sequence and catalog snapshot and returns an independent plan.
//! Executing the rendered statement belongs to the caller.

pub mod catalog;
pub mod compiler;
pub mod criteria;
pub mod row;
pub mod sql;
pub mod validation;

use crate::catalog::SchemaCatalog;
use crate::row::Row;
use crate::sql::{render_with, EmptyWhere, RenderedQuery};

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::catalog::{SchemaCatalog, StaticCatalog};
    pub use crate::compiler::{compile, CompileError, CompileWarning, QueryPlan};
    pub use crate::criteria::Criteria;
    pub use crate::row::{canonical_model, Row, SortDir};
    pub use crate::sql::{render, render_with, EmptyWhere, RenderedQuery};
    pub use crate::validation::{validate, ValidationError};
    pub use crate::{compile_grid, CompileOptions, GridError};
}

/// Errors that can occur when compiling a grid end to end.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("validation error: {0}")]
    Validation(#[from] validation::ValidationError),

    #[error("compile error: {0}")]
    Compile(#[from] compiler::CompileError),
}

/// Options for end-to-end compilation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// What to emit when no predicates survive compilation.
    pub empty_where: EmptyWhere,
}

impl CompileOptions {
    /// Set the empty-WHERE rendering policy.
    #[must_use]
    pub fn with_empty_where(mut self, empty_where: EmptyWhere) -> Self {
        self.empty_where = empty_where;
        self
    }
}

/// Compile a grid end to end: validate, fold into a plan, render.
///
/// Fail-soft anomalies (unknown operators, unknown tables, malformed joins)
/// do not surface here; callers that want them inspect the plan from
/// [`compiler::compile`] directly.
pub fn compile_grid<C: SchemaCatalog>(
    rows: &[Row],
    catalog: &C,
    options: CompileOptions,
) -> Result<RenderedQuery, GridError> {
    validation::validate(rows)?;
    let plan = compiler::compile(rows, catalog)?;
    Ok(render_with(&plan, options.empty_where))
}
