//! Statement, query and command rules

use pipeql_shared::TokenKind::*;

use super::prediction::{self, FieldAlt, ProjectAlt};
use super::{Parsed, Recognizer};
use crate::grammar::{precedence, NodeKind, Rule};

impl Recognizer<'_> {
    /// `singleStatement : query EOF`
    pub(crate) fn single_statement(&mut self) -> Parsed {
        self.rule(NodeKind::SingleStatement, 0, |p| {
            p.query(0)?;
            p.expect(Eof)
        })
    }

    /// `query : sourceCommand | query '|' processingCommand`
    pub(crate) fn query(&mut self, floor: u8) -> Parsed {
        self.rule(NodeKind::Query, floor, |p| {
            p.relabel(NodeKind::SingleCommandQuery);
            p.source_command()?;
            loop {
                match p.la(1) {
                    Pipe if precedence::PIPE >= floor => {
                        p.wrap(NodeKind::CompositeQuery);
                        p.consume();
                        p.processing_command()?;
                    }
                    kind if Rule::Query.follow().contains(kind) => break,
                    _ => p.sync_stage()?,
                }
            }
            Ok(())
        })
    }

    fn source_command(&mut self) -> Parsed {
        self.rule(NodeKind::SourceCommand, 0, |p| match p.la(1) {
            Explain => p.explain_command().map(drop),
            From => p.from_command().map(drop),
            Row => p.row_command().map(drop),
            _ => Err(p.no_viable(Rule::SourceCommand.first())),
        })
    }

    fn processing_command(&mut self) -> Parsed {
        self.rule(NodeKind::ProcessingCommand, 0, |p| match p.la(1) {
            Eval => p.eval_command().map(drop),
            Limit => p.limit_command().map(drop),
            Project => p.project_command().map(drop),
            Sort => p.sort_command().map(drop),
            Stats => p.stats_command().map(drop),
            Where => p.where_command().map(drop),
            _ => Err(p.no_viable(Rule::ProcessingCommand.first())),
        })
    }

    fn where_command(&mut self) -> Parsed {
        self.rule(NodeKind::WhereCommand, 0, |p| {
            p.expect(Where)?;
            p.boolean_expression(0)?;
            Ok(())
        })
    }

    fn row_command(&mut self) -> Parsed {
        self.rule(NodeKind::RowCommand, 0, |p| {
            p.expect(Row)?;
            p.fields()?;
            Ok(())
        })
    }

    fn eval_command(&mut self) -> Parsed {
        self.rule(NodeKind::EvalCommand, 0, |p| {
            p.expect(Eval)?;
            p.fields()?;
            Ok(())
        })
    }

    fn stats_command(&mut self) -> Parsed {
        self.rule(NodeKind::StatsCommand, 0, |p| {
            p.expect(Stats)?;
            p.fields()?;
            if p.la(1) == By {
                p.consume();
                p.qualified_names()?;
            }
            Ok(())
        })
    }

    fn from_command(&mut self) -> Parsed {
        self.rule(NodeKind::FromCommand, 0, |p| {
            p.expect(From)?;
            p.source_identifier()?;
            while p.la(1) == Comma {
                p.consume();
                p.source_identifier()?;
            }
            Ok(())
        })
    }

    fn limit_command(&mut self) -> Parsed {
        self.rule(NodeKind::LimitCommand, 0, |p| {
            p.expect(Limit)?;
            p.expect(IntegerLiteral)
        })
    }

    fn sort_command(&mut self) -> Parsed {
        self.rule(NodeKind::SortCommand, 0, |p| {
            p.expect(Sort)?;
            p.order_expression()?;
            while p.la(1) == Comma {
                p.consume();
                p.order_expression()?;
            }
            Ok(())
        })
    }

    /// `orderExpression : booleanExpression (ASC|DESC)? (NULLS (FIRST|LAST))?`
    fn order_expression(&mut self) -> Parsed {
        self.rule(NodeKind::OrderExpression, 0, |p| {
            p.boolean_expression(0)?;
            if matches!(p.la(1), Asc | Desc) {
                p.consume();
            }
            if p.la(1) == Nulls {
                p.consume();
                p.expect_one_of(pipeql_shared::TokenSet::of(&[First, Last]))?;
            }
            Ok(())
        })
    }

    fn project_command(&mut self) -> Parsed {
        self.rule(NodeKind::ProjectCommand, 0, |p| {
            p.expect(Project)?;
            p.project_clause()?;
            while p.la(1) == Comma {
                p.consume();
                p.project_clause()?;
            }
            Ok(())
        })
    }

    /// `projectClause : sourceIdentifier | newName=sourceIdentifier '=' oldName=sourceIdentifier`
    fn project_clause(&mut self) -> Parsed {
        self.rule(NodeKind::ProjectClause, 0, |p| {
            match prediction::project_clause(&p.stream) {
                Some(ProjectAlt::Keep) => {
                    p.source_identifier()?;
                }
                Some(ProjectAlt::Rename) => {
                    p.source_identifier()?;
                    p.expect(Assign)?;
                    p.source_identifier()?;
                }
                None => return Err(p.no_viable(Rule::ProjectClause.first())),
            }
            Ok(())
        })
    }

    fn explain_command(&mut self) -> Parsed {
        self.rule(NodeKind::ExplainCommand, 0, |p| {
            p.expect(Explain)?;
            p.subquery_expression()?;
            Ok(())
        })
    }

    fn subquery_expression(&mut self) -> Parsed {
        self.rule(NodeKind::SubqueryExpression, 0, |p| {
            p.expect(OpeningBracket)?;
            p.query(0)?;
            p.expect(ClosingBracket)
        })
    }

    fn fields(&mut self) -> Parsed {
        self.rule(NodeKind::Fields, 0, |p| {
            p.field()?;
            while p.la(1) == Comma {
                p.consume();
                p.field()?;
            }
            Ok(())
        })
    }

    /// `field : booleanExpression | qualifiedName '=' booleanExpression`
    fn field(&mut self) -> Parsed {
        self.rule(NodeKind::Field, 0, |p| {
            match prediction::field(&p.stream) {
                Some(FieldAlt::Expression) => {
                    p.boolean_expression(0)?;
                }
                Some(FieldAlt::Assignment) => {
                    p.qualified_name()?;
                    p.expect(Assign)?;
                    p.boolean_expression(0)?;
                }
                None => return Err(p.no_viable(Rule::Field.first())),
            }
            Ok(())
        })
    }
}
