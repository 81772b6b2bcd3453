//! SQL Tokens - the atomic units of SQL output.
//!
//! Composed queries are emitted as a flat stream of tokens. Serialization
//! separates tokens with a single space, except that a comma attaches to the
//! token before it, so a stream always renders as one line of
//! single-spaced SQL.

/// SQL Token - every element the query builders emit.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Keywords ===
    Select,
    From,
    As,
    On,
    Join,
    OrderBy,
    Limit,

    // === Aggregates ===
    /// `COUNT(*)`
    CountStar,

    // === Punctuation ===
    Comma,
    Star,
    LParen,
    RParen,

    // === Operators ===
    Eq,

    // === Dynamic Content ===
    /// Identifier (table, column, alias), emitted verbatim.
    ///
    /// No quoting is applied: callers are responsible for passing names that
    /// are valid bare identifiers in the target database.
    Ident(String),
    /// Integer literal
    LitInt(u64),

    // === Escape Hatch ===
    /// Raw SQL passed directly to output without escaping.
    ///
    /// Used for the query text produced by nested builders and for
    /// schema-level ORDER BY items. **Never pass user input to this variant.**
    Raw(String),
}

impl Token {
    /// Serialize this token to a string.
    pub fn serialize(&self) -> String {
        match self {
            Token::Select => "SELECT".into(),
            Token::From => "FROM".into(),
            Token::As => "AS".into(),
            Token::On => "ON".into(),
            Token::Join => "JOIN".into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::Limit => "LIMIT".into(),

            Token::CountStar => "COUNT(*)".into(),

            Token::Comma => ",".into(),
            Token::Star => "*".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),

            Token::Eq => "=".into(),

            Token::Ident(name) => name.clone(),
            Token::LitInt(n) => n.to_string(),

            Token::Raw(sql) => sql.clone(),
        }
    }
}

/// A sequence of tokens that serializes to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    /// Append another token stream.
    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    /// Push `items` separated by commas.
    pub fn comma_separated(&mut self, items: impl IntoIterator<Item = Token>) -> &mut Self {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.push(Token::Comma);
            }
            self.push(item);
        }
        self
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (i, token) in self.tokens.iter().enumerate() {
            let text = token.serialize();
            if text.is_empty() {
                continue;
            }
            if i > 0 && *token != Token::Comma && !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&text);
        }
        out
    }

    // Convenience methods for common tokens
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }
    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }
    pub fn ident(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(Token::Ident(name.into()))
    }
}
