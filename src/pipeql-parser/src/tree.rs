//! Parse tree arena
//!
//! Nodes live in one vector and refer to each other by [`NodeId`]. Parent
//! links are plain handles, so the tree has no reference cycles and can be
//! cloned, compared and serialised like ordinary data.
//!
//! Left-recursive rules nest one node per operator, so a long `a + b + ...`
//! chain is as deep as it is long. The traversals here keep their own work
//! stack instead of recursing.

use std::fmt::Write as _;

use pipeql_shared::Token;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::SyntaxError;
use crate::grammar::{NodeKind, Rule};

/// Handle of a node inside a [`ParseTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// A child slot of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Child {
    /// A sub-rule node
    Node(NodeId),
    /// A matched token, by token index
    Token(usize),
    /// A token discarded during error recovery, by token index
    Error(usize),
}

/// Half-open interval of token indexes `[start, stop)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TokenSpan {
    /// First token index
    pub start: usize,
    /// One past the last token index
    pub stop: usize,
}

impl TokenSpan {
    /// Whether `other` lies inside this span
    pub fn contains(&self, other: &TokenSpan) -> bool {
        self.start <= other.start && other.stop <= self.stop
    }

    /// Number of tokens covered
    pub fn len(&self) -> usize {
        self.stop.saturating_sub(self.start)
    }

    /// Whether no token is covered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<Child>,
    span: TokenSpan,
    exception: Option<SyntaxError>,
}

/// Mutable arena used while a parse is in flight
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    /// Nodes that received an error, in the order the errors were attached
    reported: Vec<NodeId>,
}

impl TreeBuilder {
    pub(crate) fn open(&mut self, kind: NodeKind, parent: Option<NodeId>, start: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
            span: TokenSpan { start, stop: start },
            exception: None,
        });
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(Child::Node(id)),
            None => {
                if self.root.is_none() {
                    self.root = Some(id);
                }
            }
        }
        id
    }

    pub(crate) fn push(&mut self, node: NodeId, child: Child) {
        self.nodes[node.0].children.push(child);
    }

    pub(crate) fn close(&mut self, node: NodeId, stop: usize) {
        let span = &mut self.nodes[node.0].span;
        span.stop = stop.max(span.start);
    }

    pub(crate) fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes[node.0].kind
    }

    pub(crate) fn relabel(&mut self, node: NodeId, kind: NodeKind) {
        debug_assert_eq!(self.nodes[node.0].kind.rule(), kind.rule());
        self.nodes[node.0].kind = kind;
    }

    /// Attach `error` unless the node already carries one
    pub(crate) fn attach(&mut self, node: NodeId, error: SyntaxError) {
        let slot = &mut self.nodes[node.0].exception;
        if slot.is_none() {
            *slot = Some(error);
            self.reported.push(node);
        }
    }

    /// Wrap `prev` in a new node of `kind` that takes its place in the tree
    ///
    /// `prev` is closed at `stop` and becomes the first child of the wrapper.
    pub(crate) fn wrap(&mut self, prev: NodeId, kind: NodeKind, stop: usize) -> NodeId {
        self.close(prev, stop);
        let id = NodeId(self.nodes.len());
        let parent = self.nodes[prev.0].parent;
        let span = self.nodes[prev.0].span;
        self.nodes.push(Node {
            kind,
            parent,
            children: vec![Child::Node(prev)],
            span,
            exception: None,
        });
        match parent {
            Some(parent) => {
                for child in &mut self.nodes[parent.0].children {
                    if *child == Child::Node(prev) {
                        *child = Child::Node(id);
                    }
                }
            }
            None => self.root = Some(id),
        }
        self.nodes[prev.0].parent = Some(id);
        id
    }

    pub(crate) fn finish(self, tokens: Vec<Token>) -> Option<ParseTree> {
        let root = self.root?;
        Some(ParseTree {
            tokens,
            nodes: self.nodes,
            root,
            reported: self.reported,
        })
    }
}

/// A complete parse tree together with the tokens it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTree {
    tokens: Vec<Token>,
    nodes: Vec<Node>,
    root: NodeId,
    reported: Vec<NodeId>,
}

impl ParseTree {
    /// The root node
    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root)
    }

    /// Borrow the node behind `id`
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.0 < self.nodes.len(), "node id out of range");
        NodeRef { tree: self, id }
    }

    /// The token sequence, ending with `EOF`
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes (never true for a finished parse)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All syntax errors attached to nodes, in source order
    ///
    /// Errors at the same token keep the order in which they were raised.
    pub fn diagnostics(&self) -> Vec<&SyntaxError> {
        let mut errors: Vec<&SyntaxError> = self
            .reported
            .iter()
            .filter_map(|id| self.nodes[id.0].exception.as_ref())
            .collect();
        errors.sort_by_key(|error| error.token_index);
        errors
    }

    /// Whether the parse produced no errors anywhere in the tree
    pub fn is_valid(&self) -> bool {
        !self.root().has_errors()
    }

    /// LISP-style rendering using rule names, e.g. `(limitCommand limit 10)`
    pub fn to_string_tree(&self) -> String {
        let mut out = String::new();
        self.root().write_lisp(&mut out);
        out
    }

    /// The tree as JSON, in the same shape as its [`Serialize`] impl
    ///
    /// Unlike going through `serde_json::to_string`, this does not recurse per
    /// tree level and so handles arbitrarily deep operator chains.
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        let mut writer = JsonWriter {
            out: String::new(),
            pretty,
        };
        writer.write_tree(self.root())?;
        Ok(writer.out)
    }
}

/// A borrowed node of a [`ParseTree`]
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t ParseTree,
    id: NodeId,
}

/// A borrowed child of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChildRef<'t> {
    /// Sub-rule node
    Node(NodeRef<'t>),
    /// Matched token
    Token(&'t Token),
    /// Token discarded during recovery
    Error(&'t Token),
}

impl<'t> NodeRef<'t> {
    fn data(&self) -> &'t Node {
        &self.tree.nodes[self.id.0]
    }

    /// The tree this node belongs to
    pub fn tree(&self) -> &'t ParseTree {
        self.tree
    }

    /// Handle of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Node label
    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    /// Grammar rule of the node
    pub fn rule(&self) -> Rule {
        self.data().kind.rule()
    }

    /// Enclosing node
    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    /// Raw child slots
    pub fn child_slots(&self) -> &'t [Child] {
        &self.data().children
    }

    /// Children in order
    pub fn children(&self) -> impl Iterator<Item = ChildRef<'t>> + 't {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |child| tree.child_ref(*child))
    }

    /// The `n`-th child slot, resolved
    pub(crate) fn child(&self, n: usize) -> Option<ChildRef<'t>> {
        let child = *self.data().children.get(n)?;
        Some(self.tree.child_ref(child))
    }

    /// Child nodes, skipping tokens
    pub fn child_nodes(&self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        self.children().filter_map(|child| match child {
            ChildRef::Node(node) => Some(node),
            _ => None,
        })
    }

    /// The `n`-th child node
    pub fn child_node(&self, n: usize) -> Option<NodeRef<'t>> {
        self.child_nodes().nth(n)
    }

    /// Directly matched tokens, skipping nodes and discarded tokens
    pub fn tokens(&self) -> impl Iterator<Item = &'t Token> + 't {
        self.children().filter_map(|child| match child {
            ChildRef::Token(token) => Some(token),
            _ => None,
        })
    }

    /// First directly matched token
    pub fn first_token(&self) -> Option<&'t Token> {
        self.tokens().next()
    }

    /// Every leaf token below this node in source order, discarded ones included
    pub fn leaf_tokens(&self) -> Vec<&'t Token> {
        let mut leaves = Vec::new();
        let tree = self.tree;
        let mut pending: Vec<ChildRef<'t>> = self.children().collect();
        pending.reverse();
        while let Some(child) = pending.pop() {
            match child {
                ChildRef::Node(node) => {
                    pending.extend(node.child_slots().iter().rev().map(|child| tree.child_ref(*child)));
                }
                ChildRef::Token(token) | ChildRef::Error(token) => leaves.push(token),
            }
        }
        leaves
    }

    /// Concatenated text of the leaf tokens, `EOF` excluded
    pub fn text(&self) -> String {
        self.leaf_tokens()
            .into_iter()
            .filter(|token| !token.is_eof())
            .map(|token| token.text.as_str())
            .collect()
    }

    /// Slice of `source` covered by this node, if it covers any token
    pub fn source_text<'s>(&self, source: &'s str) -> Option<&'s str> {
        let span = self.span();
        if span.is_empty() {
            return None;
        }
        let first = self.tree.tokens.get(span.start)?;
        let last = self.tree.tokens.get(span.stop - 1)?;
        source.get(first.span.start..last.span.stop)
    }

    /// Token interval covered by this node
    pub fn span(&self) -> TokenSpan {
        self.data().span
    }

    /// Syntax error attached to this node
    pub fn exception(&self) -> Option<&'t SyntaxError> {
        self.data().exception.as_ref()
    }

    /// Whether this node or anything below it carries an error
    pub fn has_errors(&self) -> bool {
        self.descendants().any(|node| {
            node.exception().is_some()
                || node
                    .child_slots()
                    .iter()
                    .any(|child| matches!(child, Child::Error(_)))
        })
    }

    /// This node and every node below it, in pre-order
    pub fn descendants(&self) -> Descendants<'t> {
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
        }
    }

    /// First node of `kind` in pre-order, this node included
    pub fn find(&self, kind: NodeKind) -> Option<NodeRef<'t>> {
        self.descendants().find(|node| node.kind() == kind)
    }

    fn write_lisp(&self, out: &mut String) {
        // (node, index of the next child to print)
        let mut stack: Vec<(NodeRef<'t>, usize)> = Vec::new();
        open_lisp(out, *self, &mut stack);
        while let Some((node, next)) = stack.last_mut() {
            let node = *node;
            let index = *next;
            *next += 1;
            match node.child(index) {
                Some(child) => {
                    out.push(' ');
                    match child {
                        ChildRef::Node(child) => open_lisp(out, child, &mut stack),
                        ChildRef::Token(token) | ChildRef::Error(token) => out.push_str(&token.text),
                    }
                }
                None => {
                    out.push(')');
                    stack.pop();
                }
            }
        }
    }
}

/// Print the head of `node`, pushing it when it has children to follow
fn open_lisp<'t>(out: &mut String, node: NodeRef<'t>, stack: &mut Vec<(NodeRef<'t>, usize)>) {
    if node.child_slots().is_empty() {
        out.push_str(node.rule().name());
    } else {
        let _ = write!(out, "({}", node.rule().name());
        stack.push((node, 0));
    }
}

impl ParseTree {
    fn child_ref(&self, child: Child) -> ChildRef<'_> {
        match child {
            Child::Node(id) => ChildRef::Node(self.node(id)),
            Child::Token(index) => ChildRef::Token(&self.tokens[index]),
            Child::Error(index) => ChildRef::Error(&self.tokens[index]),
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("span", &self.span())
            .finish()
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'t> {
    tree: &'t ParseTree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.node(id);
        self.stack.extend(node.child_slots().iter().rev().filter_map(|child| match child {
            Child::Node(id) => Some(*id),
            _ => None,
        }));
        Some(node)
    }
}

impl Serialize for ParseTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}

/// Nested map of `rule`, `label`, `span`, `error` and `children`
///
/// serde serialises nested values by recursion; use [`ParseTree::to_json`]
/// for trees with very long operator chains.
impl Serialize for NodeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("rule", &self.rule())?;
        if self.kind().is_alternative() {
            map.serialize_entry("label", &self.kind())?;
        }
        map.serialize_entry("span", &self.span())?;
        if let Some(error) = self.exception() {
            map.serialize_entry("error", error)?;
        }
        map.serialize_entry("children", &SerializeChildren(*self))?;
        map.end()
    }
}

struct SerializeChildren<'t>(NodeRef<'t>);

impl Serialize for SerializeChildren<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.child_slots().len()))?;
        for child in self.0.children() {
            match child {
                ChildRef::Node(node) => seq.serialize_element(&node)?,
                ChildRef::Token(token) => seq.serialize_element(&LeafToken { token, discarded: false })?,
                ChildRef::Error(token) => seq.serialize_element(&LeafToken { token, discarded: true })?,
            }
        }
        seq.end()
    }
}

#[derive(Serialize)]
struct LeafToken<'t> {
    token: &'t Token,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    discarded: bool,
}

/// JSON emitter for [`ParseTree::to_json`]
///
/// Scalars and leaf tokens go through `serde_json`; the node structure is
/// written from an explicit stack. A node object at indent level `L` has its
/// keys at `L + 1` and its children at `L + 2`.
struct JsonWriter {
    out: String,
    pretty: bool,
}

impl JsonWriter {
    fn write_tree(&mut self, root: NodeRef<'_>) -> serde_json::Result<()> {
        // (node, index of the next child to write)
        let mut stack: Vec<(NodeRef<'_>, usize)> = Vec::new();
        self.open_node(root, 0)?;
        stack.push((root, 0));
        while let Some((node, next)) = stack.last_mut() {
            let node = *node;
            let index = *next;
            *next += 1;
            let level = 2 * (stack.len() - 1);
            let Some(child) = node.child(index) else {
                if index > 0 {
                    self.newline(level + 1);
                }
                self.out.push(']');
                self.newline(level);
                self.out.push('}');
                stack.pop();
                continue;
            };
            if index > 0 {
                self.out.push(',');
            }
            self.newline(level + 2);
            match child {
                ChildRef::Node(child) => {
                    self.open_node(child, level + 2)?;
                    stack.push((child, 0));
                }
                ChildRef::Token(token) => {
                    self.value(&LeafToken { token, discarded: false }, level + 2)?;
                }
                ChildRef::Error(token) => {
                    self.value(&LeafToken { token, discarded: true }, level + 2)?;
                }
            }
        }
        Ok(())
    }

    /// Write every key of `node` up to the opening bracket of its children
    fn open_node(&mut self, node: NodeRef<'_>, level: usize) -> serde_json::Result<()> {
        self.out.push('{');
        self.key("rule", level + 1, true);
        self.value(&node.rule(), level + 1)?;
        if node.kind().is_alternative() {
            self.key("label", level + 1, false);
            self.value(&node.kind(), level + 1)?;
        }
        self.key("span", level + 1, false);
        self.value(&node.span(), level + 1)?;
        if let Some(error) = node.exception() {
            self.key("error", level + 1, false);
            self.value(error, level + 1)?;
        }
        self.key("children", level + 1, false);
        self.out.push('[');
        Ok(())
    }

    fn key(&mut self, name: &str, level: usize, first: bool) {
        if !first {
            self.out.push(',');
        }
        self.newline(level);
        let _ = write!(self.out, "\"{}\":", name);
        if self.pretty {
            self.out.push(' ');
        }
    }

    fn value<T: Serialize + ?Sized>(&mut self, value: &T, level: usize) -> serde_json::Result<()> {
        if self.pretty {
            let text = serde_json::to_string_pretty(value)?;
            // Strings never hold a raw newline, so every one is layout
            let indented = text.replace('\n', &format!("\n{}", "  ".repeat(level)));
            self.out.push_str(&indented);
        } else {
            self.out.push_str(&serde_json::to_string(value)?);
        }
        Ok(())
    }

    fn newline(&mut self, level: usize) {
        if self.pretty {
            self.out.push('\n');
            for _ in 0..level {
                self.out.push_str("  ");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeql_shared::{Span, TokenKind};

    fn tokens() -> Vec<Token> {
        vec![
            Token::new(TokenKind::UnquotedIdentifier, "a", Span::new(0, 1, 1, 1)),
            Token::new(TokenKind::Or, "or", Span::new(2, 4, 1, 3)),
            Token::new(TokenKind::UnquotedIdentifier, "b", Span::new(5, 6, 1, 6)),
            Token::eof(Span::new(6, 6, 1, 7)),
        ]
    }

    #[test]
    fn test_wrap_reparents_previous_node() {
        let mut builder = TreeBuilder::default();
        let left = builder.open(NodeKind::BooleanDefault, None, 0);
        builder.push(left, Child::Token(0));
        let binary = builder.wrap(left, NodeKind::LogicalBinary, 1);
        builder.push(binary, Child::Token(1));
        let right = builder.open(NodeKind::BooleanDefault, Some(binary), 2);
        builder.push(right, Child::Token(2));
        builder.close(right, 3);
        builder.close(binary, 3);
        let tree = builder.finish(tokens()).unwrap();

        let root = tree.root();
        assert_eq!(root.kind(), NodeKind::LogicalBinary);
        assert_eq!(root.span(), TokenSpan { start: 0, stop: 3 });
        let left = root.child_node(0).unwrap();
        assert_eq!(left.parent(), Some(root));
        assert_eq!(left.span(), TokenSpan { start: 0, stop: 1 });
        assert!(root.span().contains(&left.span()));
        assert_eq!(root.text(), "aorb");
        assert_eq!(tree.to_string_tree(), "(booleanExpression (booleanExpression a) or (booleanExpression b))");
        assert_eq!(root.descendants().count(), 3);
        assert_eq!(root.source_text("a or b"), Some("a or b"));
        assert!(tree.is_valid());
    }

    #[test]
    fn test_error_leaves_count_as_errors() {
        let mut builder = TreeBuilder::default();
        let root = builder.open(NodeKind::BooleanDefault, None, 0);
        builder.push(root, Child::Token(0));
        builder.push(root, Child::Error(1));
        builder.close(root, 2);
        let tree = builder.finish(tokens()).unwrap();
        assert!(!tree.is_valid());
        assert!(tree.diagnostics().is_empty());
        assert_eq!(tree.root().leaf_tokens().len(), 2);
        assert_eq!(tree.root().tokens().count(), 1);
    }
}
