//! Grid rows - one user-submitted criterion entry per row.

use serde::{Deserialize, Serialize};

use crate::criteria::Criteria;

/// Sort order requested for a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    /// Leave the column out of ORDER BY.
    #[default]
    None,
    Asc,
    /// The grid widget historically submits `"des"` for this.
    #[serde(alias = "des")]
    Desc,
}

impl SortDir {
    /// Whether the row participates in ORDER BY at all.
    pub fn is_some(&self) -> bool {
        !matches!(self, SortDir::None)
    }
}

/// One row of the query-by-example grid.
///
/// Rows arrive from an external widget layer, typically as JSON. `model` is
/// stored as submitted; the compiler canonicalizes it before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct Row {
    /// Model (table) the field belongs to.
    pub model: String,
    pub field: String,
    /// Include this field in the SELECT list.
    #[serde(default)]
    pub show: bool,
    /// Filter or join hint. `None` means "no filter".
    #[serde(default)]
    pub criteria: Option<Criteria>,
    #[serde(default)]
    pub sort: SortDir,
}

impl Row {
    /// Create a row with no output flag, no criteria and no sort.
    pub fn new(model: &str, field: &str) -> Self {
        Self {
            model: model.into(),
            field: field.into(),
            show: false,
            criteria: None,
            sort: SortDir::None,
        }
    }

    /// Mark the row's field for inclusion in the SELECT list.
    pub fn with_show(mut self) -> Self {
        self.show = true;
        self
    }

    /// Attach a criteria pair.
    pub fn with_criteria(mut self, operator: &str, operand: &str) -> Self {
        self.criteria = Some(Criteria::new(operator, operand));
        self
    }

    /// Request a sort on the row's field.
    pub fn with_sort(mut self, dir: SortDir) -> Self {
        self.sort = dir;
        self
    }
}

/// Canonical table-name form: lower-cased, dotted path collapsed to a single
/// identifier token (`Store.Book` -> `store_book`). Catalog table names and
/// row models are compared in this form.
pub fn canonical_model(model: &str) -> String {
    model.to_lowercase().replace('.', "_")
}
