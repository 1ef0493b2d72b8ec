//! Names, literals and operators

use pipeql_shared::TokenKind::*;
use pipeql_shared::TokenSet;

use super::{Parsed, Recognizer};
use crate::grammar::{NodeKind, Rule, COMPARISON_OPERATORS};

impl Recognizer<'_> {
    /// `qualifiedName : identifier ('.' identifier)*`
    pub(crate) fn qualified_name(&mut self) -> Parsed {
        self.rule(NodeKind::QualifiedName, 0, |p| {
            p.identifier()?;
            while p.la(1) == Dot {
                p.consume();
                p.identifier()?;
            }
            Ok(())
        })
    }

    pub(crate) fn qualified_names(&mut self) -> Parsed {
        self.rule(NodeKind::QualifiedNames, 0, |p| {
            p.qualified_name()?;
            while p.la(1) == Comma {
                p.consume();
                p.qualified_name()?;
            }
            Ok(())
        })
    }

    pub(crate) fn identifier(&mut self) -> Parsed {
        self.rule(NodeKind::Identifier, 0, |p| {
            p.expect_one_of(Rule::Identifier.first())
        })
    }

    pub(crate) fn source_identifier(&mut self) -> Parsed {
        self.rule(NodeKind::SourceIdentifier, 0, |p| {
            p.expect_one_of(Rule::SourceIdentifier.first())
        })
    }

    pub(crate) fn constant(&mut self) -> Parsed {
        self.rule(NodeKind::Constant, 0, |p| match p.la(1) {
            Null => {
                p.relabel(NodeKind::NullLiteral);
                p.consume();
                Ok(())
            }
            IntegerLiteral | DecimalLiteral => {
                p.relabel(NodeKind::NumericLiteral);
                p.number().map(drop)
            }
            True | False => {
                p.relabel(NodeKind::BooleanLiteral);
                p.boolean_value().map(drop)
            }
            String => {
                p.relabel(NodeKind::StringLiteral);
                p.string().map(drop)
            }
            _ => Err(p.no_viable(Rule::Constant.first())),
        })
    }

    fn number(&mut self) -> Parsed {
        self.rule(NodeKind::Number, 0, |p| {
            match p.la(1) {
                DecimalLiteral => p.relabel(NodeKind::DecimalLiteral),
                IntegerLiteral => p.relabel(NodeKind::IntegerLiteral),
                _ => return Err(p.no_viable(Rule::Number.first())),
            }
            p.consume();
            Ok(())
        })
    }

    fn boolean_value(&mut self) -> Parsed {
        self.rule(NodeKind::BooleanValue, 0, |p| {
            p.expect_one_of(TokenSet::of(&[True, False]))
        })
    }

    fn string(&mut self) -> Parsed {
        self.rule(NodeKind::String, 0, |p| p.expect(String))
    }

    pub(crate) fn comparison_operator(&mut self) -> Parsed {
        self.rule(NodeKind::ComparisonOperator, 0, |p| {
            p.expect_one_of(COMPARISON_OPERATORS)
        })
    }
}
