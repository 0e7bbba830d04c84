//! Catalog snapshots - the tables and comparison operators a compilation may
//! reference.
//!
//! The compiler never discovers schema on its own: every call receives a
//! read-only snapshot from the caller and nothing is cached across calls.
//! Whether a snapshot is stale is entirely the caller's concern.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::row::canonical_model;

/// Read-only view of the schema the query engine currently exposes.
///
/// The compiler asks exactly two questions: is this table known, and what
/// SQL does this operator keyword stand for.
pub trait SchemaCatalog {
    /// Whether `name` (in canonical form) is a table visible to the engine.
    fn contains_table(&self, name: &str) -> bool;

    /// The SQL fragment spliced after a column reference for a recognized
    /// operator keyword (`"gt"` -> `"> ?"`), or `None` if unrecognized.
    ///
    /// The fragment carries the parameter placeholder; whatever style the
    /// executing backend expects (`?`, `%s`, `$1`) lives here and nowhere
    /// else.
    fn operator_sql(&self, operator: &str) -> Option<&str>;
}

/// In-memory catalog snapshot.
///
/// Deserializable so a caller can ship the engine's current table and
/// operator lists as JSON:
///
/// ```json
/// {
///   "tables": ["author", "book"],
///   "operators": { "exact": "= ?", "gt": "> ?" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct StaticCatalog {
    #[serde(default)]
    pub tables: BTreeSet<String>,
    #[serde(default)]
    pub operators: BTreeMap<String, String>,
}

impl StaticCatalog {
    /// An empty snapshot: nothing is known, every criterion is dropped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot preloaded with [`StaticCatalog::sqlite_operators`].
    pub fn sqlite() -> Self {
        Self {
            tables: BTreeSet::new(),
            operators: Self::sqlite_operators(),
        }
    }

    /// Register a table. The name is canonicalized so lookups from row
    /// models always compare like against like.
    pub fn with_table(mut self, name: &str) -> Self {
        self.tables.insert(canonical_model(name));
        self
    }

    /// Register an operator keyword and the SQL fragment it stands for.
    pub fn with_operator(mut self, keyword: &str, sql: &str) -> Self {
        self.operators.insert(keyword.into(), sql.into());
        self
    }

    /// The operator table in the SQLite flavor the dev harness executes
    /// against: positional `?` placeholders, LIKE-based text matching.
    /// Callers supply their own wildcards in the operand for the LIKE
    /// family.
    pub fn sqlite_operators() -> BTreeMap<String, String> {
        [
            ("exact", "= ?"),
            ("iexact", "LIKE ?"),
            ("contains", "LIKE ?"),
            ("icontains", "LIKE ?"),
            ("gt", "> ?"),
            ("gte", ">= ?"),
            ("lt", "< ?"),
            ("lte", "<= ?"),
            ("startswith", "LIKE ?"),
            ("endswith", "LIKE ?"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

impl SchemaCatalog for StaticCatalog {
    fn contains_table(&self, name: &str) -> bool {
        self.tables.contains(name)
    }

    fn operator_sql(&self, operator: &str) -> Option<&str> {
        self.operators.get(operator).map(String::as_str)
    }
}
