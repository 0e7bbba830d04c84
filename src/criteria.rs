//! Criteria parsing - the textual filter expression attached to a grid row.
//!
//! The grid widget submits each criterion as a small two-element tuple
//! expression, e.g. `("icontains", "rust")`, `gt, 10` or
//! `join, Author.id`. The parser accepts exactly that shape and nothing
//! else; the raw text is never evaluated.
//!
//! Grammar (optionally parenthesized, whitespace-insensitive):
//!
//! ```text
//! criteria := "(" element "," element ")" | element "," element
//! element  := double-quoted string | single-quoted string | bare token
//! ```
//!
//! A bare token may not contain commas, quotes or parens. An element that is
//! present but empty invalidates the whole expression: a filter with nothing
//! to compare against is no filter.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pattern for the tuple body: two elements, each quoted or bare.
static TUPLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^\s*(?:"(?P<op_dq>[^"]*)"|'(?P<op_sq>[^']*)'|(?P<op_bare>[^\s'"(),][^'"(),]*?))"#,
        r#"\s*,\s*"#,
        r#"(?:"(?P<val_dq>[^"]*)"|'(?P<val_sq>[^']*)'|(?P<val_bare>[^\s'"(),][^'"(),]*?))\s*$"#,
    ))
    .expect("tuple pattern is valid")
});

/// Errors raised by the strict parser. The fail-soft entry point
/// [`Criteria::parse`] absorbs these into "no filter".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CriteriaParseError {
    #[error("empty criteria expression")]
    Empty,

    #[error("criteria is not a two-element tuple: {raw}")]
    NotATuple { raw: String },

    #[error("criteria element is empty: {raw}")]
    EmptyElement { raw: String },
}

/// A parsed criterion: a comparison operator keyword plus the operand it
/// applies to, or the `join` marker paired with a dotted `model.field` path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    pub operator: String,
    pub operand: String,
}

impl Criteria {
    pub fn new(operator: &str, operand: &str) -> Self {
        Self {
            operator: operator.into(),
            operand: operand.into(),
        }
    }

    /// Fail-soft parse: any input that is not a well-formed two-element
    /// expression is treated as "no filter". Never panics, never errors.
    pub fn parse(raw: &str) -> Option<Criteria> {
        Self::parse_strict(raw).ok()
    }

    /// Parse under the fixed tuple grammar, reporting what went wrong.
    pub fn parse_strict(raw: &str) -> Result<Criteria, CriteriaParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CriteriaParseError::Empty);
        }

        // At most one layer of parens, and only balanced.
        let body = match trimmed.strip_prefix('(') {
            Some(rest) => rest
                .strip_suffix(')')
                .ok_or_else(|| CriteriaParseError::NotATuple { raw: raw.into() })?,
            None => trimmed,
        };

        let caps = TUPLE_PATTERN
            .captures(body)
            .ok_or_else(|| CriteriaParseError::NotATuple { raw: raw.into() })?;

        let operator = element(&caps, "op_dq", "op_sq", "op_bare");
        let operand = element(&caps, "val_dq", "val_sq", "val_bare");
        if operator.is_empty() || operand.is_empty() {
            return Err(CriteriaParseError::EmptyElement { raw: raw.into() });
        }

        Ok(Criteria { operator, operand })
    }

    /// Whether this criterion expresses a join to another table rather than
    /// a scalar comparison. Matched case-insensitively.
    pub fn is_join(&self) -> bool {
        self.operator.eq_ignore_ascii_case("join")
    }
}

fn element(caps: &regex::Captures<'_>, dq: &str, sq: &str, bare: &str) -> String {
    caps.name(dq)
        .or_else(|| caps.name(sq))
        .or_else(|| caps.name(bare))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_widget_tuple_literal() {
        let c = Criteria::parse(r#"("icontains", "rust")"#).unwrap();
        assert_eq!(c, Criteria::new("icontains", "rust"));
    }

    #[test]
    fn test_parse_single_quotes_and_bare_tokens() {
        assert_eq!(
            Criteria::parse("('exact', 'Austen')"),
            Some(Criteria::new("exact", "Austen"))
        );
        assert_eq!(Criteria::parse("gt, 10"), Some(Criteria::new("gt", "10")));
        assert_eq!(
            Criteria::parse("join, Author.id"),
            Some(Criteria::new("join", "Author.id"))
        );
    }

    #[test]
    fn test_parse_operand_with_internal_space() {
        assert_eq!(
            Criteria::parse("exact, New York"),
            Some(Criteria::new("exact", "New York"))
        );
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        assert_eq!(Criteria::parse("exact"), None);
        assert_eq!(Criteria::parse("a, b, c"), None);
        assert_eq!(Criteria::parse(""), None);
        assert_eq!(Criteria::parse("   "), None);
    }

    #[test]
    fn test_parse_rejects_unbalanced_parens() {
        assert_eq!(Criteria::parse("(gt, 10"), None);
        assert_eq!(Criteria::parse("gt, 10)"), None);
    }

    #[test]
    fn test_parse_rejects_empty_elements() {
        // An empty operand meant "no filter" in the legacy widget too.
        assert_eq!(Criteria::parse(r#"("exact", "")"#), None);
        assert_eq!(
            Criteria::parse_strict(r#"("", "x")"#),
            Err(CriteriaParseError::EmptyElement {
                raw: r#"("", "x")"#.into()
            })
        );
    }

    #[test]
    fn test_parse_never_evaluates_input() {
        // Code-shaped payloads fall out of the grammar instead of running.
        assert_eq!(Criteria::parse("__import__('os').system('rm -rf /')"), None);
        assert_eq!(Criteria::parse("(lambda: 1)()"), None);
    }

    #[test]
    fn test_code_shaped_operand_is_inert_data() {
        // An operand may look like SQL; it can only ever be bound as a
        // parameter, never spliced into the statement.
        let c = Criteria::parse(r#"("exact", "1 OR 1=1")"#).unwrap();
        assert_eq!(c.operand, "1 OR 1=1");
        let c = Criteria::parse("exact, 1; DROP TABLE book").unwrap();
        assert_eq!(c.operand, "1; DROP TABLE book");
    }

    #[test]
    fn test_is_join_case_insensitive() {
        assert!(Criteria::new("join", "Author.id").is_join());
        assert!(Criteria::new("JOIN", "Author.id").is_join());
        assert!(!Criteria::new("gt", "10").is_join());
    }

    #[test]
    fn test_strict_error_display() {
        let err = Criteria::parse_strict("nonsense").unwrap_err();
        assert!(err.to_string().contains("nonsense"));
    }
}
