//! Lookahead predictors for decisions that one token cannot settle

use log::debug;
use pipeql_shared::TokenKind;

use crate::grammar::Rule;
use crate::stream::TokenStream;

/// Alternatives of `field`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldAlt {
    /// `booleanExpression`
    Expression,
    /// `qualifiedName '=' booleanExpression`
    Assignment,
}

/// Alternatives of `primaryExpression`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrimaryAlt {
    Constant,
    Dereference,
    Parenthesized,
    Function,
}

/// Alternatives of `projectClause`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProjectAlt {
    Keep,
    Rename,
}

fn is_identifier(kind: TokenKind) -> bool {
    Rule::Identifier.first().contains(kind)
}

/// Scan past a qualified name and look for `=`
///
/// `a.b = x` is an assignment, `a.b == x` is an expression: `ASSIGN` and `EQ`
/// are different tokens, so the decision is made on the token after the name.
pub(crate) fn field(stream: &TokenStream) -> Option<FieldAlt> {
    if !Rule::Field.first().contains(stream.la(1)) {
        return None;
    }
    let mut alt = FieldAlt::Expression;
    if is_identifier(stream.la(1)) {
        let mut k = 2;
        while stream.la(k) == TokenKind::Dot && is_identifier(stream.la(k + 1)) {
            k += 2;
        }
        if stream.la(k) == TokenKind::Assign {
            alt = FieldAlt::Assignment;
        }
    }
    debug!("predict field -> {:?}", alt);
    Some(alt)
}

pub(crate) fn primary(stream: &TokenStream) -> Option<PrimaryAlt> {
    let la1 = stream.la(1);
    let alt = if Rule::Constant.first().contains(la1) {
        PrimaryAlt::Constant
    } else if la1 == TokenKind::Lp {
        PrimaryAlt::Parenthesized
    } else if is_identifier(la1) && stream.la(2) == TokenKind::Lp {
        PrimaryAlt::Function
    } else if is_identifier(la1) {
        PrimaryAlt::Dereference
    } else {
        return None;
    };
    debug!("predict primaryExpression -> {:?}", alt);
    Some(alt)
}

pub(crate) fn project_clause(stream: &TokenStream) -> Option<ProjectAlt> {
    if !Rule::ProjectClause.first().contains(stream.la(1)) {
        return None;
    }
    if stream.la(2) == TokenKind::Assign {
        Some(ProjectAlt::Rename)
    } else {
        Some(ProjectAlt::Keep)
    }
}
