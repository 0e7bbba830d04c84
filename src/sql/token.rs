//! SQL tokens - the atomic units of rendered output.
//!
//! The renderer pushes keywords and pre-validated fragments into a
//! [`SqlStream`] and serializes once at the end, so spacing and joining
//! rules live in one place.

/// Every element that can appear in a rendered statement.
///
/// Adding a variant here will cause compile errors everywhere it needs to be
/// handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlToken {
    Select,
    From,
    Where,
    OrderBy,
    And,
    Comma,
    Space,
    Semicolon,

    /// A pre-rendered fragment: a `table.field` token, a table name, or a
    /// predicate whose operator text came from the catalog.
    ///
    /// # Security Warning
    ///
    /// Fragments are spliced into the output verbatim. Only pass identifiers
    /// that were matched against the catalog, or operator text the catalog
    /// itself supplied. Literal operands never belong here; they travel as
    /// bound parameters.
    Fragment(String),
}

impl SqlToken {
    /// Serialize this token to its SQL text.
    pub fn serialize(&self) -> &str {
        match self {
            SqlToken::Select => "SELECT",
            SqlToken::From => "FROM",
            SqlToken::Where => "WHERE",
            SqlToken::OrderBy => "ORDER BY",
            SqlToken::And => "AND",
            SqlToken::Comma => ",",
            SqlToken::Space => " ",
            SqlToken::Semicolon => ";",
            SqlToken::Fragment(s) => s,
        }
    }
}

/// A stream of tokens that serializes to a single SQL string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlStream {
    tokens: Vec<SqlToken>,
}

impl SqlStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: SqlToken) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn space(&mut self) -> &mut Self {
        self.push(SqlToken::Space)
    }

    pub fn fragment(&mut self, text: &str) -> &mut Self {
        self.push(SqlToken::Fragment(text.into()))
    }

    /// Push `fragments` joined by `separator`: `, ` for [`SqlToken::Comma`],
    /// surrounding spaces for word separators like [`SqlToken::And`].
    pub fn separated(&mut self, fragments: &[String], separator: SqlToken) -> &mut Self {
        for (i, fragment) in fragments.iter().enumerate() {
            if i > 0 {
                match separator {
                    SqlToken::Comma => self.push(SqlToken::Comma).space(),
                    _ => self.space().push(separator.clone()).space(),
                };
            }
            self.fragment(fragment);
        }
        self
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self) -> String {
        self.tokens.iter().map(SqlToken::serialize).collect()
    }
}
