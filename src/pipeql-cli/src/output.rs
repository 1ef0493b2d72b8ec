//! Output rendering
//!
//! Everything the binary prints is built here as a `String`, so the
//! renderings can be tested without spawning the process.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::ValueEnum;
use pipeql_parser::{ChildRef, NodeRef, ParseTree, SyntaxError, Token};
use serde::{Deserialize, Serialize};

/// What to print for a parsed query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The parse tree (indented, or LISP-style when compact)
    #[default]
    Tree,
    /// The parse tree as JSON
    Json,
    /// The token stream, one token per line
    Tokens,
    /// Only the syntax errors
    Diagnostics,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Tree => "tree",
            OutputFormat::Json => "json",
            OutputFormat::Tokens => "tokens",
            OutputFormat::Diagnostics => "diagnostics",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s, true)
    }
}

/// Render `tree` in `format`
pub fn render(tree: &ParseTree, format: OutputFormat, pretty: bool) -> Result<String> {
    let rendered = match format {
        OutputFormat::Tree if pretty => indented_tree(tree),
        OutputFormat::Tree => tree.to_string_tree(),
        OutputFormat::Json => tree.to_json(pretty).context("Failed to serialize parse tree")?,
        OutputFormat::Tokens => render_tokens(tree.tokens()),
        OutputFormat::Diagnostics => render_diagnostics(&tree.diagnostics()),
    };
    Ok(rendered)
}

/// One token per line, `[@start:stop='text',<KIND>,line:column]`
pub fn render_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(|token| format!("{}\n", token)).collect()
}

/// One error per line, `line L:C message`
pub fn render_diagnostics(errors: &[&SyntaxError]) -> String {
    errors.iter().map(|error| format!("{}\n", error)).collect()
}

/// The parse tree with one node or token per line
///
/// Alternative labels follow the rule name in brackets; tokens dropped during
/// error recovery are marked with `!`.
pub fn indented_tree(tree: &ParseTree) -> String {
    let mut out = String::new();
    // (child, depth); children go on in reverse so they come off in order
    let mut pending: Vec<(ChildRef<'_>, usize)> = vec![(ChildRef::Node(tree.root()), 0)];
    while let Some((child, depth)) = pending.pop() {
        let indent = "  ".repeat(depth);
        match child {
            ChildRef::Node(node) => {
                write_node(&mut out, node, &indent);
                let children: Vec<_> = node.children().collect();
                pending.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
            }
            ChildRef::Token(token) => {
                let _ = writeln!(out, "{}'{}'", indent, token.text);
            }
            ChildRef::Error(token) => {
                let _ = writeln!(out, "{}!'{}'", indent, token.text);
            }
        }
    }
    out
}

fn write_node(out: &mut String, node: NodeRef<'_>, indent: &str) {
    let _ = write!(out, "{}{}", indent, node.rule().name());
    if node.kind().is_alternative() {
        let _ = write!(out, " [{}]", label_name(node));
    }
    if let Some(error) = node.exception() {
        let _ = write!(out, "  <- {}", error.message);
    }
    out.push('\n');
}

fn label_name(node: NodeRef<'_>) -> String {
    serde_json::to_value(node.kind())
        .ok()
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", node.kind()))
}

/// Point at `column` of `line` in `source`
///
/// Returns the source line followed by a caret line, or `None` when the line
/// does not exist.
pub fn caret(source: &str, line: usize, column: usize) -> Option<String> {
    let text = source.lines().nth(line.checked_sub(1)?)?;
    let pad: String = text
        .chars()
        .take(column.saturating_sub(1))
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect();
    Some(format!("{}\n{}^", text, pad))
}
