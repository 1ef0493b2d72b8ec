//! Token source boundary and the parser's cursor over it

use pipeql_shared::{Span, Token, TokenKind};

/// An indexable, immutable sequence of tokens
///
/// This is the interface the parser expects from a lexer. The sequence should
/// end with an `EOF` token; [`TokenStream`] appends one if it does not.
pub trait TokenSource {
    /// Number of tokens
    fn len(&self) -> usize;

    /// Token at `index`
    fn get(&self, index: usize) -> Option<&Token>;

    /// Whether the source holds no tokens at all
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TokenSource for [Token] {
    fn len(&self) -> usize {
        <[Token]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&Token> {
        <[Token]>::get(self, index)
    }
}

impl TokenSource for Vec<Token> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&Token> {
        self.as_slice().get(index)
    }
}

/// Rewindable cursor over a token sequence that always ends with `EOF`
#[derive(Debug, Clone, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenStream {
    /// Build a stream, truncating after the first `EOF` or appending one
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if let Some(eof) = tokens.iter().position(Token::is_eof) {
            tokens.truncate(eof + 1);
        } else {
            let span = tokens.last().map_or_else(Span::default, |last| {
                Span::new(
                    last.span.stop,
                    last.span.stop,
                    last.span.line,
                    last.span.column + last.text.chars().count(),
                )
            });
            tokens.push(Token::eof(span));
        }
        Self { tokens, index: 0 }
    }

    /// Copy the tokens of any [`TokenSource`] into a stream
    pub fn from_source<S: TokenSource + ?Sized>(source: &S) -> Self {
        let tokens = (0..source.len())
            .filter_map(|i| source.get(i).cloned())
            .collect();
        Self::new(tokens)
    }

    /// Kind of the token `k` positions ahead (`la(1)` is the current token)
    ///
    /// Looking past the end yields `EOF`; `la(0)` is treated as `la(1)`.
    pub fn la(&self, k: usize) -> TokenKind {
        self.lt(k).kind
    }

    /// Token `k` positions ahead, with the same conventions as [`la`](Self::la)
    pub fn lt(&self, k: usize) -> &Token {
        let at = self.index + k.max(1) - 1;
        self.tokens.get(at).unwrap_or_else(|| self.eof())
    }

    /// Index of the current token
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move the cursor to `index`, clamped to the `EOF` token
    pub fn seek(&mut self, index: usize) {
        self.index = index.min(self.tokens.len() - 1);
    }

    /// Advance past the current token and return its index
    ///
    /// Consuming `EOF` leaves the cursor on `EOF`.
    pub fn consume(&mut self) -> usize {
        let at = self.index;
        if !self.tokens[at].is_eof() {
            self.index += 1;
        }
        at
    }

    /// Token at an absolute index
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Number of tokens including `EOF`
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the stream holds only `EOF`
    pub fn is_empty(&self) -> bool {
        self.tokens.len() == 1
    }

    /// All tokens
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Give the tokens back
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    fn eof(&self) -> &Token {
        // `new` guarantees the last token is EOF
        &self.tokens[self.tokens.len() - 1]
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str, start: usize) -> Token {
        Token::new(kind, text, Span::new(start, start + text.len(), 1, start + 1))
    }

    #[test]
    fn test_appends_eof() {
        let stream = TokenStream::new(vec![token(TokenKind::Limit, "limit", 0)]);
        assert_eq!(stream.len(), 2);
        let eof = stream.get(1).unwrap();
        assert!(eof.is_eof());
        assert_eq!(eof.span, Span::new(5, 5, 1, 6));
    }

    #[test]
    fn test_truncates_after_eof() {
        let stream = TokenStream::new(vec![
            token(TokenKind::Row, "row", 0),
            Token::eof(Span::new(3, 3, 1, 4)),
            token(TokenKind::Limit, "limit", 4),
        ]);
        assert_eq!(stream.len(), 2);
        assert!(!stream.is_empty());
        assert!(TokenStream::new(Vec::new()).is_empty());
    }

    #[test]
    fn test_lookahead_and_consume() {
        let mut stream = TokenStream::new(vec![
            token(TokenKind::Row, "row", 0),
            token(TokenKind::UnquotedIdentifier, "a", 4),
        ]);
        assert_eq!(stream.la(1), TokenKind::Row);
        assert_eq!(stream.la(2), TokenKind::UnquotedIdentifier);
        assert_eq!(stream.la(3), TokenKind::Eof);
        assert_eq!(stream.la(10), TokenKind::Eof);
        assert_eq!(stream.consume(), 0);
        assert_eq!(stream.lt(1).text, "a");
        stream.consume();
        assert_eq!(stream.consume(), 2);
        assert_eq!(stream.consume(), 2);
        stream.seek(0);
        assert_eq!(stream.index(), 0);
        stream.seek(99);
        assert_eq!(stream.index(), 2);
    }

    #[test]
    fn test_from_source() {
        let tokens = vec![token(TokenKind::Row, "row", 0)];
        let stream = TokenStream::from_source(tokens.as_slice());
        assert_eq!(stream.tokens()[0], tokens[0]);
        assert_eq!(TokenSource::len(&tokens), 1);
    }
}
