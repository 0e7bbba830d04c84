//! Row-set validation applied before compilation.

use thiserror::Error;

use crate::row::Row;

/// Validation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No row in the grid is marked for output.
    #[error("no rows selected: check at least one row to get output")]
    NoRowsSelected,
}

/// Check that the grid selects at least one output column.
///
/// The compiler re-checks the same invariant on the finished plan
/// ([`crate::compiler::CompileError::NoColumnsSelected`]); a grid that
/// passes here always compiles past that check, since `selects` ends up
/// non-empty exactly when some row has `show` set.
pub fn validate(rows: &[Row]) -> Result<(), ValidationError> {
    if rows.iter().any(|row| row.show) {
        Ok(())
    } else {
        Err(ValidationError::NoRowsSelected)
    }
}
