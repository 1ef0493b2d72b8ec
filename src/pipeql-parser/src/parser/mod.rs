//! Grammar engine
//!
//! One method per grammar rule, each running inside [`Recognizer::rule`],
//! which opens the rule's node, runs the body and always closes the node
//! again. Alternatives are chosen by matching on the lookahead or, where one
//! token is not enough, by the predictors in `prediction`. The
//! left-recursive rules loop and wrap their previous result instead of
//! recursing on the left.

mod commands;
mod expressions;
mod prediction;
mod recovery;
mod terminals;

use log::{debug, trace, warn};
use pipeql_shared::{TokenKind, TokenSet};

use crate::error::{ParseError, Result, SyntaxError, SyntaxErrorKind};
use crate::grammar::{NodeKind, Rule};
use crate::options::{ErrorStrategy, ParserOptions};
use crate::stream::{TokenSource, TokenStream};
use crate::tree::{Child, NodeId, ParseTree, TreeBuilder};

/// Parser for pipeql token streams
///
/// A `Parser` holds only configuration; every call to [`parse`](Self::parse)
/// runs on its own recognizer state, so one parser can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    /// Create a parser with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options
    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    /// The parser options
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse a full query (`singleStatement`)
    ///
    /// Syntax errors that could be recovered from are attached to the tree;
    /// check [`ParseTree::is_valid`] before using it. An `Err` is returned only
    /// when parsing could not continue.
    pub fn parse<S: TokenSource + ?Sized>(&self, source: &S) -> Result<ParseTree> {
        let stream = TokenStream::from_source(source);
        if stream.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        debug!("parsing statement of {} tokens", stream.len());
        Recognizer::new(stream, &self.options).run(Recognizer::single_statement)
    }

    /// Parse a standalone `booleanExpression` followed by `EOF`
    pub fn parse_expression<S: TokenSource + ?Sized>(&self, source: &S) -> Result<ParseTree> {
        self.parse_expression_at(source, 0)
    }

    /// Parse a standalone `booleanExpression` with an explicit precedence floor
    ///
    /// Only operators whose precedence is at least `floor` are folded into the
    /// root expression. A floor above the highest level is reported as a
    /// failed predicate on the root node.
    pub fn parse_expression_at<S: TokenSource + ?Sized>(
        &self,
        source: &S,
        floor: u8,
    ) -> Result<ParseTree> {
        let stream = TokenStream::from_source(source);
        if stream.is_empty() {
            return Err(ParseError::EmptyInput);
        }
        debug!("parsing expression of {} tokens at floor {}", stream.len(), floor);
        Recognizer::new(stream, &self.options).run(|r| r.standalone_expression(floor))
    }
}

/// Unwinding signal inside the engine; never leaves the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Abort {
    /// The current rule failed and should resynchronise
    Syntax,
    /// The parse is over, see `Recognizer::failure`
    Terminal,
}

pub(crate) type Step = std::result::Result<(), Abort>;
pub(crate) type Parsed = std::result::Result<NodeId, Abort>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecoveryState {
    Normal,
    /// An error was reported and no token has been matched since
    Recovering,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    rule: Rule,
    node: NodeId,
    floor: u8,
}

/// State of one in-flight parse
pub(crate) struct Recognizer<'o> {
    stream: TokenStream,
    tree: TreeBuilder,
    frames: Vec<Frame>,
    state: RecoveryState,
    options: &'o ParserOptions,
    last_error: Option<SyntaxError>,
    failure: Option<ParseError>,
}

impl<'o> Recognizer<'o> {
    fn new(stream: TokenStream, options: &'o ParserOptions) -> Self {
        Self {
            stream,
            tree: TreeBuilder::default(),
            frames: Vec::new(),
            state: RecoveryState::Normal,
            options,
            last_error: None,
            failure: None,
        }
    }

    fn run(mut self, entry: impl FnOnce(&mut Self) -> Parsed) -> Result<ParseTree> {
        let outcome = entry(&mut self);
        if let Some(failure) = self.failure.take() {
            return Err(failure);
        }
        debug_assert!(outcome.is_ok());
        self.tree
            .finish(self.stream.into_tokens())
            .ok_or(ParseError::EmptyInput)
    }

    /// Run `body` as the rule labelled `kind`
    ///
    /// The node is closed whether or not the body failed. A local syntax
    /// error is resynchronised here, in the rule that raised it.
    pub(crate) fn rule(
        &mut self,
        kind: NodeKind,
        floor: u8,
        body: impl FnOnce(&mut Self) -> Step,
    ) -> Parsed {
        let rule = kind.rule();
        let parent = self.frames.last().map(|frame| frame.node);
        let node = self.tree.open(kind, parent, self.stream.index());
        self.frames.push(Frame { rule, node, floor });
        trace!(
            "enter {} at {} (floor {})",
            rule.name(),
            self.stream.index(),
            floor
        );

        let outcome = if self.frames.len() > self.options.max_depth {
            Err(self.too_deep())
        } else {
            body(self)
        };
        let outcome = match outcome {
            Err(Abort::Syntax) => self.recover(),
            other => other,
        };

        let node = self.frames.pop().map_or(node, |frame| frame.node);
        self.tree.close(node, self.stream.index());
        trace!("exit {} at {}", rule.name(), self.stream.index());
        outcome.map(|()| node)
    }

    /// Node of the innermost rule
    fn node(&self) -> NodeId {
        // only called from rule bodies, where a frame is always open
        self.frames[self.frames.len() - 1].node
    }

    fn current_rule(&self) -> Rule {
        self.frames
            .last()
            .map_or(Rule::SingleStatement, |frame| frame.rule)
    }

    /// Give the current node its alternative label
    pub(crate) fn relabel(&mut self, kind: NodeKind) {
        let node = self.node();
        self.tree.relabel(node, kind);
    }

    /// Wrap the current node for another round of a left-recursive rule
    pub(crate) fn wrap(&mut self, kind: NodeKind) {
        let depth = self.frames.len() - 1;
        let prev = self.frames[depth].node;
        let wrapper = self.tree.wrap(prev, kind, self.stream.index());
        self.frames[depth].node = wrapper;
        trace!("wrap {:?} in {:?}", self.tree.kind(prev), kind);
    }

    pub(crate) fn la(&self, k: usize) -> TokenKind {
        self.stream.la(k)
    }

    /// Consume the current token into the current node
    pub(crate) fn consume(&mut self) -> usize {
        let index = self.stream.consume();
        let node = self.node();
        self.tree.push(node, Child::Token(index));
        self.state = RecoveryState::Normal;
        trace!("consume {}", self.stream.get(index).map_or_else(String::new, ToString::to_string));
        index
    }

    /// Match a token of `kind`
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Step {
        self.expect_one_of(TokenSet::of(&[kind]))
    }

    /// Match a token of any kind in `set`
    ///
    /// A single stray token in front of an expected one is dropped and
    /// reported instead of failing the rule.
    pub(crate) fn expect_one_of(&mut self, set: TokenSet) -> Step {
        if set.contains(self.la(1)) {
            self.consume();
            return Ok(());
        }
        if self.la(1) != TokenKind::Eof && set.contains(self.la(2)) {
            let index = self.stream.index();
            let error = SyntaxError::extraneous(self.current_rule(), index, self.stream.lt(1), set);
            let node = self.node();
            self.report(node, error)?;
            self.stream.consume();
            self.tree.push(node, Child::Error(index));
            self.consume();
            return Ok(());
        }
        Err(self.mismatch(set))
    }

    fn error_here(&self, kind: SyntaxErrorKind, expected: TokenSet) -> SyntaxError {
        SyntaxError::new(
            kind,
            self.current_rule(),
            self.stream.index(),
            self.stream.lt(1),
            expected,
        )
    }

    pub(crate) fn mismatch(&mut self, expected: TokenSet) -> Abort {
        let error = self.error_here(SyntaxErrorKind::MismatchedToken, expected);
        self.fail(error)
    }

    pub(crate) fn no_viable(&mut self, expected: TokenSet) -> Abort {
        let error = self.error_here(SyntaxErrorKind::NoViableAlternative, expected);
        self.fail(error)
    }

    /// Fail the floor guard of a left-recursive rule when `floor > max`
    pub(crate) fn check_floor(&mut self, floor: u8, max: u8) -> Step {
        if floor <= max {
            return Ok(());
        }
        let predicate = format!("{} <= {}", floor, max);
        let error = self.error_here(SyntaxErrorKind::FailedPredicate { predicate }, TokenSet::EMPTY);
        let node = self.node();
        self.report(node, error)
    }

    fn fail(&mut self, error: SyntaxError) -> Abort {
        let node = self.node();
        match self.report(node, error) {
            Ok(()) => Abort::Syntax,
            Err(abort) => abort,
        }
    }

    /// Attach `error` to `node`; under the bail strategy this ends the parse
    ///
    /// Errors raised while recovering from an earlier one are dropped.
    pub(crate) fn report(&mut self, node: NodeId, error: SyntaxError) -> Step {
        if self.state == RecoveryState::Recovering {
            debug!("suppressed while recovering: {} (in {})", error, error.rule.name());
            return Ok(());
        }
        debug!("{} (in {})", error, error.rule.name());
        self.state = RecoveryState::Recovering;
        self.tree.attach(node, error.clone());
        if self.options.error_strategy == ErrorStrategy::Bail {
            self.terminate(ParseError::Bailed(error));
            return Err(Abort::Terminal);
        }
        self.last_error = Some(error);
        Ok(())
    }

    fn too_deep(&mut self) -> Abort {
        let max_depth = self.options.max_depth;
        let error = self.error_here(SyntaxErrorKind::GrammarTooDeep { max_depth }, TokenSet::EMPTY);
        let node = self.node();
        self.tree.attach(node, error.clone());
        self.terminate(ParseError::TooDeep(error));
        Abort::Terminal
    }

    fn terminate(&mut self, failure: ParseError) {
        warn!("parse failed: {}", failure);
        if self.failure.is_none() {
            self.failure = Some(failure);
        }
    }
}
