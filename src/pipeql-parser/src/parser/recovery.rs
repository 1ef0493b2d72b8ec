//! Error recovery
//!
//! After a local syntax error the parser skips tokens until one can be
//! consumed by some rule still on the invocation stack, i.e. one in the union
//! of the FOLLOW sets of the open frames. Skipped tokens stay in the tree as
//! error leaves. Running into `EOF` after skipping is terminal.
//!
//! Between an error and the next successfully matched token the parser is in
//! the recovering state, in which further errors are not reported.

use log::debug;
use pipeql_shared::{TokenKind, TokenSet};

use super::{Abort, Recognizer, RecoveryState, Step};
use crate::error::{ParseError, SyntaxErrorKind};
use crate::grammar::Rule;
use crate::tree::Child;

impl Recognizer<'_> {
    /// Tokens at which an open rule can pick up again
    fn resync_set(&self) -> TokenSet {
        self.frames
            .iter()
            .fold(TokenSet::EMPTY, |set, frame| set.union(frame.rule.follow()))
            .without(TokenKind::Eof)
    }

    /// Skip to a resynchronisation token
    ///
    /// The parser stays in the recovering state until the next token is
    /// matched, so rules unwinding over the same token report nothing new.
    pub(crate) fn recover(&mut self) -> Step {
        self.state = RecoveryState::Recovering;
        let resync = self.resync_set();
        let node = self.node();
        let mut skipped = 0;
        while self.la(1) != TokenKind::Eof && !resync.contains(self.la(1)) {
            let index = self.stream.consume();
            self.tree.push(node, Child::Error(index));
            skipped += 1;
        }

        if self.la(1) == TokenKind::Eof && skipped > 0 {
            if let Some(error) = self.last_error.take() {
                self.terminate(ParseError::Unrecoverable(error));
            }
            return Err(Abort::Terminal);
        }

        if let Some(frame) = self.frames.last() {
            debug!(
                "resynchronised in {} (floor {}) at {} after skipping {} token(s)",
                frame.rule.name(),
                frame.floor,
                self.stream.lt(1),
                skipped
            );
        }
        Ok(())
    }

    /// Check a pipe stage boundary in the `query` loop
    ///
    /// Called when the token after a complete command is neither `|` nor
    /// something that may follow the query. The error lands on the query node
    /// and parsing resumes at the next stage boundary.
    pub(crate) fn sync_stage(&mut self) -> Step {
        let expected = Rule::Query.follow();
        let error = self.error_here(SyntaxErrorKind::NoViableAlternative, expected);
        match self.fail(error) {
            Abort::Syntax => self.recover(),
            Abort::Terminal => Err(Abort::Terminal),
        }
    }
}
