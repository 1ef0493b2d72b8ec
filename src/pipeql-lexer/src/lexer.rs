//! Mode-aware lexer driver
//!
//! The driver skips trivia, asks the recognisers of the current mode for the
//! next token and switches modes on command keywords, pipes and brackets.

use log::{debug, trace};
use pipeql_shared::{Span, Token, TokenKind};

use crate::error::{LexError, Result};
use crate::scanner;

/// Lexer mode, deciding how the next word is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexMode {
    /// Start of a pipe stage: words are commands
    #[default]
    Command,
    /// Inside `eval`, `where`, `stats`, ... arguments
    Expression,
    /// Inside `from` / `project` source lists
    Source,
}

/// Converts query text into a token vector terminated by `EOF`
pub struct Lexer<'a> {
    source: &'a str,
    rest: &'a str,
    line: usize,
    column: usize,
    mode: LexMode,
    stack: Vec<LexMode>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer starting in command mode
    pub fn new(source: &'a str) -> Self {
        Self::with_mode(source, LexMode::Command)
    }

    /// Create a lexer starting in `mode`
    pub fn with_mode(source: &'a str, mode: LexMode) -> Self {
        Self {
            source,
            rest: source,
            line: 1,
            column: 1,
            mode,
            stack: Vec::new(),
        }
    }

    /// Current lexer mode
    pub fn mode(&self) -> LexMode {
        self.mode
    }

    /// Lex the whole input
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.rest.is_empty() {
                let offset = self.offset();
                tokens.push(Token::eof(Span::new(
                    offset,
                    offset,
                    self.line,
                    self.column,
                )));
                break;
            }
            let (kind, text) = self.next_token()?;
            let token = self.emit(kind, text);
            trace!("{}", token);
            self.transition(kind);
            tokens.push(token);
        }
        debug!("lexed {} tokens", tokens.len());
        Ok(tokens)
    }

    fn offset(&self) -> usize {
        self.source.len() - self.rest.len()
    }

    fn skip_trivia(&mut self) -> Result<()> {
        // trivia never fails, it matches the empty string at worst
        if let Ok((_, skipped)) = scanner::trivia(self.rest) {
            self.advance(skipped.len());
        }
        if self.rest.starts_with("/*") {
            return Err(LexError::UnterminatedComment {
                offset: self.offset(),
                line: self.line,
                column: self.column,
            });
        }
        Ok(())
    }

    fn advance(&mut self, len: usize) {
        let (consumed, rest) = self.rest.split_at(len);
        for c in consumed.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.rest = rest;
    }

    fn emit(&mut self, kind: TokenKind, text: &'a str) -> Token {
        let start = self.offset();
        let (line, column) = (self.line, self.column);
        self.advance(text.len());
        Token::new(kind, text, Span::new(start, start + text.len(), line, column))
    }

    fn next_token(&self) -> Result<(TokenKind, &'a str)> {
        match self.mode {
            LexMode::Command => self.command_token(),
            LexMode::Expression => self.expression_token(),
            LexMode::Source => self.source_token(),
        }
    }

    fn command_token(&self) -> Result<(TokenKind, &'a str)> {
        if let Ok((_, token)) = scanner::command_punctuation(self.rest) {
            return Ok(token);
        }
        match scanner::command_word(self.rest) {
            Ok((_, word)) => Ok((
                scanner::command_keyword(word).unwrap_or(TokenKind::UnknownCmd),
                word,
            )),
            Err(_) => Err(self.unexpected()),
        }
    }

    fn expression_token(&self) -> Result<(TokenKind, &'a str)> {
        let input = self.rest;
        if input.starts_with('"') {
            return match scanner::string_literal(input) {
                Ok((_, text)) => Ok((TokenKind::String, text)),
                Err(_) => Err(LexError::UnterminatedString {
                    offset: self.offset(),
                    line: self.line,
                    column: self.column,
                }),
            };
        }
        if input.starts_with('`') {
            return scanner::quoted_identifier(input)
                .map(|(_, text)| (TokenKind::QuotedIdentifier, text))
                .map_err(|_| self.unterminated_identifier());
        }
        if let Ok((_, token)) = scanner::number(input) {
            return Ok(token);
        }
        if let Ok((_, word)) = scanner::identifier(input) {
            let kind = scanner::expression_keyword(word).unwrap_or(TokenKind::UnquotedIdentifier);
            return Ok((kind, word));
        }
        scanner::operator(input)
            .map(|(_, token)| token)
            .map_err(|_| self.unexpected())
    }

    fn source_token(&self) -> Result<(TokenKind, &'a str)> {
        let input = self.rest;
        if input.starts_with('`') {
            return scanner::quoted_identifier(input)
                .map(|(_, text)| (TokenKind::SrcQuotedIdentifier, text))
                .map_err(|_| self.unterminated_identifier());
        }
        if let Ok((_, token)) = scanner::source_punctuation(input) {
            return Ok(token);
        }
        scanner::source_identifier(input)
            .map(|(_, text)| (TokenKind::SrcUnquotedIdentifier, text))
            .map_err(|_| self.unexpected())
    }

    fn transition(&mut self, kind: TokenKind) {
        let next = match kind {
            TokenKind::Eval
            | TokenKind::Explain
            | TokenKind::Row
            | TokenKind::Stats
            | TokenKind::Where
            | TokenKind::Sort
            | TokenKind::Limit => LexMode::Expression,
            TokenKind::From | TokenKind::Project => LexMode::Source,
            TokenKind::Pipe => LexMode::Command,
            TokenKind::OpeningBracket => {
                self.stack.push(self.mode);
                LexMode::Command
            }
            TokenKind::ClosingBracket => self.stack.pop().unwrap_or(self.mode),
            _ => return,
        };
        if next != self.mode {
            trace!("lexer mode {:?} -> {:?}", self.mode, next);
            self.mode = next;
        }
    }

    fn unexpected(&self) -> LexError {
        LexError::UnexpectedCharacter {
            found: self.rest.chars().next().unwrap_or('\0'),
            offset: self.offset(),
            line: self.line,
            column: self.column,
        }
    }

    fn unterminated_identifier(&self) -> LexError {
        LexError::UnterminatedIdentifier {
            offset: self.offset(),
            line: self.line,
            column: self.column,
        }
    }
}
