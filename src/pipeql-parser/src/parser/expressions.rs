//! Precedence climbing for `booleanExpression` and `operatorExpression`
//!
//! Both rules parse one operand, then loop: while the next operator's
//! precedence is at least the floor, the result so far is wrapped in a binary
//! node and the right operand is parsed at `precedence + 1`. The loop keeps
//! the native stack bounded by nesting depth instead of operator count.

use pipeql_shared::TokenKind::{self, *};

use super::prediction::{self, PrimaryAlt};
use super::{Parsed, Recognizer};
use crate::error::SyntaxError;
use crate::grammar::{
    arithmetic_precedence, logical_precedence, precedence, NodeKind, Rule, COMPARISON_OPERATORS,
};
use crate::tree::Child;

impl Recognizer<'_> {
    /// Root `booleanExpression` followed by `EOF`
    pub(crate) fn standalone_expression(&mut self, floor: u8) -> Parsed {
        let root = self.boolean_expression(floor)?;
        if self.la(1) != TokenKind::Eof {
            let index = self.stream.index();
            let error = SyntaxError::trailing(Rule::BooleanExpression, index, self.stream.lt(1));
            self.report(root, error)?;
            while self.la(1) != TokenKind::Eof {
                let index = self.stream.consume();
                self.tree.push(root, Child::Error(index));
            }
            self.tree.close(root, self.stream.index());
        }
        Ok(root)
    }

    pub(crate) fn boolean_expression(&mut self, floor: u8) -> Parsed {
        self.rule(NodeKind::BooleanExpression, floor, |p| {
            p.check_floor(floor, precedence::BOOLEAN_MAX)?;
            match p.la(1) {
                Not => {
                    p.relabel(NodeKind::LogicalNot);
                    p.consume();
                    p.boolean_expression(precedence::NOT_OPERAND)?;
                }
                kind if Rule::ValueExpression.first().contains(kind) => {
                    p.relabel(NodeKind::BooleanDefault);
                    p.value_expression()?;
                }
                _ => return Err(p.no_viable(Rule::BooleanExpression.first())),
            }
            while let Some(prec) = logical_precedence(p.la(1)) {
                if prec < floor {
                    break;
                }
                p.wrap(NodeKind::LogicalBinary);
                p.consume();
                p.boolean_expression(prec + 1)?;
            }
            Ok(())
        })
    }

    /// `valueExpression : operatorExpression (comparisonOperator operatorExpression)?`
    ///
    /// Not recursive: a second comparison operator is left for the caller.
    fn value_expression(&mut self) -> Parsed {
        self.rule(NodeKind::ValueExpression, 0, |p| {
            p.operator_expression(0)?;
            if COMPARISON_OPERATORS.contains(p.la(1)) {
                p.relabel(NodeKind::Comparison);
                p.comparison_operator()?;
                p.operator_expression(0)?;
            } else {
                p.relabel(NodeKind::ValueExpressionDefault);
            }
            Ok(())
        })
    }

    fn operator_expression(&mut self, floor: u8) -> Parsed {
        self.rule(NodeKind::OperatorExpression, floor, |p| {
            p.check_floor(floor, precedence::OPERATOR_MAX)?;
            match p.la(1) {
                Plus | Minus => {
                    p.relabel(NodeKind::ArithmeticUnary);
                    p.consume();
                    p.operator_expression(precedence::UNARY_OPERAND)?;
                }
                kind if Rule::PrimaryExpression.first().contains(kind) => {
                    p.relabel(NodeKind::OperatorExpressionDefault);
                    p.primary_expression()?;
                }
                _ => return Err(p.no_viable(Rule::OperatorExpression.first())),
            }
            while let Some(prec) = arithmetic_precedence(p.la(1)) {
                if prec < floor {
                    break;
                }
                p.wrap(NodeKind::ArithmeticBinary);
                p.consume();
                p.operator_expression(prec + 1)?;
            }
            Ok(())
        })
    }

    fn primary_expression(&mut self) -> Parsed {
        self.rule(NodeKind::PrimaryExpression, 0, |p| {
            match prediction::primary(&p.stream) {
                Some(PrimaryAlt::Constant) => {
                    p.relabel(NodeKind::ConstantDefault);
                    p.constant()?;
                }
                Some(PrimaryAlt::Dereference) => {
                    p.relabel(NodeKind::Dereference);
                    p.qualified_name()?;
                }
                Some(PrimaryAlt::Parenthesized) => {
                    p.relabel(NodeKind::ParenthesizedExpression);
                    p.consume();
                    p.boolean_expression(0)?;
                    p.expect(Rp)?;
                }
                Some(PrimaryAlt::Function) => {
                    p.relabel(NodeKind::FunctionExpression);
                    p.identifier()?;
                    p.expect(Lp)?;
                    if p.la(1) != Rp {
                        p.boolean_expression(0)?;
                        while p.la(1) == Comma {
                            p.consume();
                            p.boolean_expression(0)?;
                        }
                    }
                    p.expect(Rp)?;
                }
                None => return Err(p.no_viable(Rule::PrimaryExpression.first())),
            }
            Ok(())
        })
    }
}
