//! Token model shared by the lexer and the parser
//!
//! Tokens are produced once by a token source and are immutable afterwards.
//! The parser only ever reads them by index.

use serde::{Serialize, Serializer};
use std::fmt;

/// Kinds of tokens in the pipeql vocabulary
///
/// The discriminants are stable and double as bit positions in [`TokenSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TokenKind {
    /// `eval`
    Eval,
    /// `explain`
    Explain,
    /// `from`
    From,
    /// `row`
    Row,
    /// `stats`
    Stats,
    /// `where`
    Where,
    /// `sort`
    Sort,
    /// `limit`
    Limit,
    /// `project`
    Project,
    /// A word in command position that is not a known command
    UnknownCmd,
    /// `|`
    Pipe,
    /// Double-quoted string literal
    String,
    /// Integer literal
    IntegerLiteral,
    /// Decimal literal
    DecimalLiteral,
    /// `by`
    By,
    /// `and`
    And,
    /// `asc`
    Asc,
    /// `=`
    Assign,
    /// `,`
    Comma,
    /// `desc`
    Desc,
    /// `.`
    Dot,
    /// `false`
    False,
    /// `first`
    First,
    /// `last`
    Last,
    /// `(`
    Lp,
    /// `[`
    OpeningBracket,
    /// `]`
    ClosingBracket,
    /// `not`
    Not,
    /// `null`
    Null,
    /// `nulls`
    Nulls,
    /// `or`
    Or,
    /// `)`
    Rp,
    /// `true`
    True,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Asterisk,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// Identifier in expression position
    UnquotedIdentifier,
    /// Backtick-quoted identifier in expression position
    QuotedIdentifier,
    /// Source (index) name after `from` / `project`
    SrcUnquotedIdentifier,
    /// Backtick-quoted source name
    SrcQuotedIdentifier,
    /// End-of-input sentinel
    Eof,
}

impl TokenKind {
    /// Every token kind, in discriminant order
    pub const ALL: [TokenKind; 49] = [
        TokenKind::Eval,
        TokenKind::Explain,
        TokenKind::From,
        TokenKind::Row,
        TokenKind::Stats,
        TokenKind::Where,
        TokenKind::Sort,
        TokenKind::Limit,
        TokenKind::Project,
        TokenKind::UnknownCmd,
        TokenKind::Pipe,
        TokenKind::String,
        TokenKind::IntegerLiteral,
        TokenKind::DecimalLiteral,
        TokenKind::By,
        TokenKind::And,
        TokenKind::Asc,
        TokenKind::Assign,
        TokenKind::Comma,
        TokenKind::Desc,
        TokenKind::Dot,
        TokenKind::False,
        TokenKind::First,
        TokenKind::Last,
        TokenKind::Lp,
        TokenKind::OpeningBracket,
        TokenKind::ClosingBracket,
        TokenKind::Not,
        TokenKind::Null,
        TokenKind::Nulls,
        TokenKind::Or,
        TokenKind::Rp,
        TokenKind::True,
        TokenKind::Eq,
        TokenKind::Neq,
        TokenKind::Lt,
        TokenKind::Lte,
        TokenKind::Gt,
        TokenKind::Gte,
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Asterisk,
        TokenKind::Slash,
        TokenKind::Percent,
        TokenKind::UnquotedIdentifier,
        TokenKind::QuotedIdentifier,
        TokenKind::SrcUnquotedIdentifier,
        TokenKind::SrcQuotedIdentifier,
        TokenKind::Eof,
    ];

    /// Symbolic vocabulary name, e.g. `INTEGER_LITERAL`
    pub fn symbolic_name(self) -> &'static str {
        match self {
            TokenKind::Eval => "EVAL",
            TokenKind::Explain => "EXPLAIN",
            TokenKind::From => "FROM",
            TokenKind::Row => "ROW",
            TokenKind::Stats => "STATS",
            TokenKind::Where => "WHERE",
            TokenKind::Sort => "SORT",
            TokenKind::Limit => "LIMIT",
            TokenKind::Project => "PROJECT",
            TokenKind::UnknownCmd => "UNKNOWN_CMD",
            TokenKind::Pipe => "PIPE",
            TokenKind::String => "STRING",
            TokenKind::IntegerLiteral => "INTEGER_LITERAL",
            TokenKind::DecimalLiteral => "DECIMAL_LITERAL",
            TokenKind::By => "BY",
            TokenKind::And => "AND",
            TokenKind::Asc => "ASC",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Comma => "COMMA",
            TokenKind::Desc => "DESC",
            TokenKind::Dot => "DOT",
            TokenKind::False => "FALSE",
            TokenKind::First => "FIRST",
            TokenKind::Last => "LAST",
            TokenKind::Lp => "LP",
            TokenKind::OpeningBracket => "OPENING_BRACKET",
            TokenKind::ClosingBracket => "CLOSING_BRACKET",
            TokenKind::Not => "NOT",
            TokenKind::Null => "NULL",
            TokenKind::Nulls => "NULLS",
            TokenKind::Or => "OR",
            TokenKind::Rp => "RP",
            TokenKind::True => "TRUE",
            TokenKind::Eq => "EQ",
            TokenKind::Neq => "NEQ",
            TokenKind::Lt => "LT",
            TokenKind::Lte => "LTE",
            TokenKind::Gt => "GT",
            TokenKind::Gte => "GTE",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::Slash => "SLASH",
            TokenKind::Percent => "PERCENT",
            TokenKind::UnquotedIdentifier => "UNQUOTED_IDENTIFIER",
            TokenKind::QuotedIdentifier => "QUOTED_IDENTIFIER",
            TokenKind::SrcUnquotedIdentifier => "SRC_UNQUOTED_IDENTIFIER",
            TokenKind::SrcQuotedIdentifier => "SRC_QUOTED_IDENTIFIER",
            TokenKind::Eof => "EOF",
        }
    }

    /// Literal spelling for fixed-text tokens, e.g. `'|'`
    pub fn literal_name(self) -> Option<&'static str> {
        let name = match self {
            TokenKind::Eval => "'eval'",
            TokenKind::Explain => "'explain'",
            TokenKind::From => "'from'",
            TokenKind::Row => "'row'",
            TokenKind::Stats => "'stats'",
            TokenKind::Where => "'where'",
            TokenKind::Sort => "'sort'",
            TokenKind::Limit => "'limit'",
            TokenKind::Project => "'project'",
            TokenKind::Pipe => "'|'",
            TokenKind::By => "'by'",
            TokenKind::And => "'and'",
            TokenKind::Asc => "'asc'",
            TokenKind::Assign => "'='",
            TokenKind::Comma => "','",
            TokenKind::Desc => "'desc'",
            TokenKind::Dot => "'.'",
            TokenKind::False => "'false'",
            TokenKind::First => "'first'",
            TokenKind::Last => "'last'",
            TokenKind::Lp => "'('",
            TokenKind::OpeningBracket => "'['",
            TokenKind::ClosingBracket => "']'",
            TokenKind::Not => "'not'",
            TokenKind::Null => "'null'",
            TokenKind::Nulls => "'nulls'",
            TokenKind::Or => "'or'",
            TokenKind::Rp => "')'",
            TokenKind::True => "'true'",
            TokenKind::Eq => "'=='",
            TokenKind::Neq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Lte => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Gte => "'>='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Asterisk => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Eof => "<EOF>",
            _ => return None,
        };
        Some(name)
    }

    /// Name used in diagnostics: the literal spelling when there is one
    pub fn display_name(self) -> &'static str {
        self.literal_name().unwrap_or_else(|| self.symbolic_name())
    }

    /// Bit position of this kind inside a [`TokenSet`]
    pub const fn bit(self) -> u64 {
        1u64 << (self as u8)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Location of a token in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub stop: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column (in characters)
    pub column: usize,
}

impl Span {
    /// Create a span
    pub fn new(start: usize, stop: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            stop,
            line,
            column,
        }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    /// Whether the span covers no text (the EOF token)
    pub fn is_empty(&self) -> bool {
        self.start == self.stop
    }
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            stop: 0,
            line: 1,
            column: 1,
        }
    }
}

/// A lexed token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    /// Token kind
    pub kind: TokenKind,
    /// Exact source text of the token
    pub text: String,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Create a token
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// End-of-input sentinel positioned at `span`
    pub fn eof(span: Span) -> Self {
        Self::new(TokenKind::Eof, "<EOF>", span)
    }

    /// Whether this is the end-of-input sentinel
    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[@{}:{}='{}',<{}>,{}:{}]",
            self.span.start,
            self.span.stop,
            self.text,
            self.kind.symbolic_name(),
            self.span.line,
            self.span.column
        )
    }
}

/// A set of token kinds stored as a bit set
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSet(u64);

impl TokenSet {
    /// The empty set
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Build a set from a list of kinds
    pub const fn of(kinds: &[TokenKind]) -> TokenSet {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            bits |= kinds[i].bit();
            i += 1;
        }
        TokenSet(bits)
    }

    /// Union of two sets
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }

    /// Set with `kind` added
    pub const fn with(self, kind: TokenKind) -> TokenSet {
        TokenSet(self.0 | kind.bit())
    }

    /// Set with `kind` removed
    pub const fn without(self, kind: TokenKind) -> TokenSet {
        TokenSet(self.0 & !kind.bit())
    }

    /// Membership test
    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Whether the set is empty
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of kinds in the set
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate the kinds in discriminant order
    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl FromIterator<TokenKind> for TokenSet {
    fn from_iter<I: IntoIterator<Item = TokenKind>>(iter: I) -> Self {
        iter.into_iter().fold(TokenSet::EMPTY, TokenSet::with)
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(TokenKind::symbolic_name))
            .finish()
    }
}

impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(TokenKind::display_name).collect();
        match names.as_slice() {
            [single] => f.write_str(single),
            _ => write!(f, "{{{}}}", names.join(", ")),
        }
    }
}

impl Serialize for TokenSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(TokenKind::symbolic_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_kinds_are_in_discriminant_order() {
        for (i, kind) in TokenKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, i);
        }
        assert!(TokenKind::ALL.len() <= 64);
    }

    #[test]
    fn test_names() {
        assert_eq!(TokenKind::IntegerLiteral.symbolic_name(), "INTEGER_LITERAL");
        assert_eq!(TokenKind::Pipe.display_name(), "'|'");
        assert_eq!(
            TokenKind::SrcUnquotedIdentifier.display_name(),
            "SRC_UNQUOTED_IDENTIFIER"
        );
        assert_eq!(TokenKind::Eof.to_string(), "<EOF>");
    }

    #[test]
    fn test_assign_and_eq_are_distinct() {
        assert_ne!(TokenKind::Assign, TokenKind::Eq);
        let set = TokenSet::of(&[TokenKind::Assign]);
        assert!(!set.contains(TokenKind::Eq));
    }

    #[test]
    fn test_token_set_operations() {
        let a = TokenSet::of(&[TokenKind::And, TokenKind::Or]);
        let b = TokenSet::EMPTY.with(TokenKind::Not);
        let all = a.union(b);
        assert_eq!(all.len(), 3);
        assert!(all.contains(TokenKind::Not));
        assert!(!all.without(TokenKind::Not).contains(TokenKind::Not));
        assert_eq!(
            all.iter().collect::<Vec<_>>(),
            vec![TokenKind::And, TokenKind::Not, TokenKind::Or]
        );
        let collected: TokenSet = vec![TokenKind::Eof, TokenKind::Pipe].into_iter().collect();
        assert!(collected.contains(TokenKind::Eof));
        assert!(TokenSet::EMPTY.is_empty());
    }

    #[test]
    fn test_token_set_display() {
        assert_eq!(TokenSet::of(&[TokenKind::IntegerLiteral]).to_string(), "INTEGER_LITERAL");
        assert_eq!(
            TokenSet::of(&[TokenKind::Pipe, TokenKind::Eof]).to_string(),
            "{'|', <EOF>}"
        );
    }

    #[test]
    fn test_token_set_serializes_as_names() {
        let set = TokenSet::of(&[TokenKind::Comma, TokenKind::Rp]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["COMMA","RP"]"#);
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenKind::Limit, "limit", Span::new(0, 5, 1, 1));
        assert_eq!(token.to_string(), "[@0:5='limit',<LIMIT>,1:1]");
        assert!(!token.is_eof());
        assert!(Token::eof(Span::default()).is_eof());
    }
}
