//! Grammar rule table
//!
//! Rules, node labels, FIRST/FOLLOW sets and operator precedences. The table
//! is built once on first use and is read-only afterwards, so concurrent
//! parses share it without locking.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use pipeql_shared::{TokenKind, TokenSet};
use serde::Serialize;

use TokenKind::*;

/// Grammar rules, in grammar declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
#[repr(u8)]
pub enum Rule {
    /// `query EOF`
    SingleStatement,
    /// `sourceCommand ('|' processingCommand)*`
    Query,
    /// `explainCommand | fromCommand | rowCommand`
    SourceCommand,
    /// `evalCommand | limitCommand | projectCommand | sortCommand | statsCommand | whereCommand`
    ProcessingCommand,
    /// `WHERE booleanExpression`
    WhereCommand,
    /// Logical `not` / `and` / `or` expressions
    BooleanExpression,
    /// `operatorExpression (comparisonOperator operatorExpression)?`
    ValueExpression,
    /// Arithmetic expressions
    OperatorExpression,
    /// Constants, names, parenthesized expressions and function calls
    PrimaryExpression,
    /// `ROW fields`
    RowCommand,
    /// `field (',' field)*`
    Fields,
    /// `booleanExpression | qualifiedName '=' booleanExpression`
    Field,
    /// `FROM sourceIdentifier (',' sourceIdentifier)*`
    FromCommand,
    /// `EVAL fields`
    EvalCommand,
    /// `STATS fields (BY qualifiedNames)?`
    StatsCommand,
    /// Source (index) name
    SourceIdentifier,
    /// `identifier ('.' identifier)*`
    QualifiedName,
    /// `qualifiedName (',' qualifiedName)*`
    QualifiedNames,
    /// Unquoted or quoted identifier
    Identifier,
    /// Literal value
    Constant,
    /// `LIMIT INTEGER_LITERAL`
    LimitCommand,
    /// `SORT orderExpression (',' orderExpression)*`
    SortCommand,
    /// `booleanExpression (ASC|DESC)? (NULLS (FIRST|LAST))?`
    OrderExpression,
    /// `PROJECT projectClause (',' projectClause)*`
    ProjectCommand,
    /// `sourceIdentifier | sourceIdentifier '=' sourceIdentifier`
    ProjectClause,
    /// `TRUE | FALSE`
    BooleanValue,
    /// Decimal or integer literal
    Number,
    /// String literal
    String,
    /// `== != < <= > >=`
    ComparisonOperator,
    /// `EXPLAIN subqueryExpression`
    ExplainCommand,
    /// `'[' query ']'`
    SubqueryExpression,
}

impl Rule {
    /// Every rule, indexed by rule id
    pub const ALL: [Rule; 31] = [
        Rule::SingleStatement,
        Rule::Query,
        Rule::SourceCommand,
        Rule::ProcessingCommand,
        Rule::WhereCommand,
        Rule::BooleanExpression,
        Rule::ValueExpression,
        Rule::OperatorExpression,
        Rule::PrimaryExpression,
        Rule::RowCommand,
        Rule::Fields,
        Rule::Field,
        Rule::FromCommand,
        Rule::EvalCommand,
        Rule::StatsCommand,
        Rule::SourceIdentifier,
        Rule::QualifiedName,
        Rule::QualifiedNames,
        Rule::Identifier,
        Rule::Constant,
        Rule::LimitCommand,
        Rule::SortCommand,
        Rule::OrderExpression,
        Rule::ProjectCommand,
        Rule::ProjectClause,
        Rule::BooleanValue,
        Rule::Number,
        Rule::String,
        Rule::ComparisonOperator,
        Rule::ExplainCommand,
        Rule::SubqueryExpression,
    ];

    /// Rule id
    pub fn id(self) -> usize {
        self as usize
    }

    /// Grammar name of the rule, e.g. `booleanExpression`
    pub fn name(self) -> &'static str {
        match self {
            Rule::SingleStatement => "singleStatement",
            Rule::Query => "query",
            Rule::SourceCommand => "sourceCommand",
            Rule::ProcessingCommand => "processingCommand",
            Rule::WhereCommand => "whereCommand",
            Rule::BooleanExpression => "booleanExpression",
            Rule::ValueExpression => "valueExpression",
            Rule::OperatorExpression => "operatorExpression",
            Rule::PrimaryExpression => "primaryExpression",
            Rule::RowCommand => "rowCommand",
            Rule::Fields => "fields",
            Rule::Field => "field",
            Rule::FromCommand => "fromCommand",
            Rule::EvalCommand => "evalCommand",
            Rule::StatsCommand => "statsCommand",
            Rule::SourceIdentifier => "sourceIdentifier",
            Rule::QualifiedName => "qualifiedName",
            Rule::QualifiedNames => "qualifiedNames",
            Rule::Identifier => "identifier",
            Rule::Constant => "constant",
            Rule::LimitCommand => "limitCommand",
            Rule::SortCommand => "sortCommand",
            Rule::OrderExpression => "orderExpression",
            Rule::ProjectCommand => "projectCommand",
            Rule::ProjectClause => "projectClause",
            Rule::BooleanValue => "booleanValue",
            Rule::Number => "number",
            Rule::String => "string",
            Rule::ComparisonOperator => "comparisonOperator",
            Rule::ExplainCommand => "explainCommand",
            Rule::SubqueryExpression => "subqueryExpression",
        }
    }

    /// Table entry for this rule
    pub fn info(self) -> &'static RuleInfo {
        &GRAMMAR.rules[self.id()]
    }

    /// FIRST set of the rule
    pub fn first(self) -> TokenSet {
        self.info().first
    }

    /// FOLLOW set of the rule
    pub fn follow(self) -> TokenSet {
        self.info().follow
    }
}

/// Node labels
///
/// Rules with labelled alternatives (`booleanExpression`, `query`, ...) get one
/// label per alternative. The bare rule label is used for a node whose
/// alternative could not be decided because of a syntax error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    /// `singleStatement`
    SingleStatement,
    /// `query` with no decided alternative
    Query,
    /// `query: sourceCommand`
    SingleCommandQuery,
    /// `query: query '|' processingCommand`
    CompositeQuery,
    /// `sourceCommand`
    SourceCommand,
    /// `processingCommand`
    ProcessingCommand,
    /// `whereCommand`
    WhereCommand,
    /// `booleanExpression` with no decided alternative
    BooleanExpression,
    /// `booleanExpression: NOT booleanExpression`
    LogicalNot,
    /// `booleanExpression: valueExpression`
    BooleanDefault,
    /// `booleanExpression: booleanExpression (AND|OR) booleanExpression`
    LogicalBinary,
    /// `valueExpression` with no decided alternative
    ValueExpression,
    /// `valueExpression: operatorExpression`
    ValueExpressionDefault,
    /// `valueExpression: operatorExpression comparisonOperator operatorExpression`
    Comparison,
    /// `operatorExpression` with no decided alternative
    OperatorExpression,
    /// `operatorExpression: primaryExpression`
    OperatorExpressionDefault,
    /// `operatorExpression: (MINUS|PLUS) operatorExpression`
    ArithmeticUnary,
    /// `operatorExpression: operatorExpression op operatorExpression`
    ArithmeticBinary,
    /// `primaryExpression` with no decided alternative
    PrimaryExpression,
    /// `primaryExpression: constant`
    ConstantDefault,
    /// `primaryExpression: qualifiedName`
    Dereference,
    /// `primaryExpression: '(' booleanExpression ')'`
    ParenthesizedExpression,
    /// `primaryExpression: identifier '(' args ')'`
    FunctionExpression,
    /// `rowCommand`
    RowCommand,
    /// `fields`
    Fields,
    /// `field`
    Field,
    /// `fromCommand`
    FromCommand,
    /// `evalCommand`
    EvalCommand,
    /// `statsCommand`
    StatsCommand,
    /// `sourceIdentifier`
    SourceIdentifier,
    /// `qualifiedName`
    QualifiedName,
    /// `qualifiedNames`
    QualifiedNames,
    /// `identifier`
    Identifier,
    /// `constant` with no decided alternative
    Constant,
    /// `constant: NULL`
    NullLiteral,
    /// `constant: number`
    NumericLiteral,
    /// `constant: booleanValue`
    BooleanLiteral,
    /// `constant: string`
    StringLiteral,
    /// `limitCommand`
    LimitCommand,
    /// `sortCommand`
    SortCommand,
    /// `orderExpression`
    OrderExpression,
    /// `projectCommand`
    ProjectCommand,
    /// `projectClause`
    ProjectClause,
    /// `booleanValue`
    BooleanValue,
    /// `number` with no decided alternative
    Number,
    /// `number: DECIMAL_LITERAL`
    DecimalLiteral,
    /// `number: INTEGER_LITERAL`
    IntegerLiteral,
    /// `string`
    String,
    /// `comparisonOperator`
    ComparisonOperator,
    /// `explainCommand`
    ExplainCommand,
    /// `subqueryExpression`
    SubqueryExpression,
}

impl NodeKind {
    /// The rule this label belongs to
    pub fn rule(self) -> Rule {
        match self {
            NodeKind::SingleStatement => Rule::SingleStatement,
            NodeKind::Query | NodeKind::SingleCommandQuery | NodeKind::CompositeQuery => Rule::Query,
            NodeKind::SourceCommand => Rule::SourceCommand,
            NodeKind::ProcessingCommand => Rule::ProcessingCommand,
            NodeKind::WhereCommand => Rule::WhereCommand,
            NodeKind::BooleanExpression
            | NodeKind::LogicalNot
            | NodeKind::BooleanDefault
            | NodeKind::LogicalBinary => Rule::BooleanExpression,
            NodeKind::ValueExpression
            | NodeKind::ValueExpressionDefault
            | NodeKind::Comparison => Rule::ValueExpression,
            NodeKind::OperatorExpression
            | NodeKind::OperatorExpressionDefault
            | NodeKind::ArithmeticUnary
            | NodeKind::ArithmeticBinary => Rule::OperatorExpression,
            NodeKind::PrimaryExpression
            | NodeKind::ConstantDefault
            | NodeKind::Dereference
            | NodeKind::ParenthesizedExpression
            | NodeKind::FunctionExpression => Rule::PrimaryExpression,
            NodeKind::RowCommand => Rule::RowCommand,
            NodeKind::Fields => Rule::Fields,
            NodeKind::Field => Rule::Field,
            NodeKind::FromCommand => Rule::FromCommand,
            NodeKind::EvalCommand => Rule::EvalCommand,
            NodeKind::StatsCommand => Rule::StatsCommand,
            NodeKind::SourceIdentifier => Rule::SourceIdentifier,
            NodeKind::QualifiedName => Rule::QualifiedName,
            NodeKind::QualifiedNames => Rule::QualifiedNames,
            NodeKind::Identifier => Rule::Identifier,
            NodeKind::Constant
            | NodeKind::NullLiteral
            | NodeKind::NumericLiteral
            | NodeKind::BooleanLiteral
            | NodeKind::StringLiteral => Rule::Constant,
            NodeKind::LimitCommand => Rule::LimitCommand,
            NodeKind::SortCommand => Rule::SortCommand,
            NodeKind::OrderExpression => Rule::OrderExpression,
            NodeKind::ProjectCommand => Rule::ProjectCommand,
            NodeKind::ProjectClause => Rule::ProjectClause,
            NodeKind::BooleanValue => Rule::BooleanValue,
            NodeKind::Number | NodeKind::DecimalLiteral | NodeKind::IntegerLiteral => Rule::Number,
            NodeKind::String => Rule::String,
            NodeKind::ComparisonOperator => Rule::ComparisonOperator,
            NodeKind::ExplainCommand => Rule::ExplainCommand,
            NodeKind::SubqueryExpression => Rule::SubqueryExpression,
        }
    }

    /// Whether this is an alternative label rather than the bare rule
    pub fn is_alternative(self) -> bool {
        matches!(
            self,
            NodeKind::SingleCommandQuery
                | NodeKind::CompositeQuery
                | NodeKind::LogicalNot
                | NodeKind::BooleanDefault
                | NodeKind::LogicalBinary
                | NodeKind::ValueExpressionDefault
                | NodeKind::Comparison
                | NodeKind::OperatorExpressionDefault
                | NodeKind::ArithmeticUnary
                | NodeKind::ArithmeticBinary
                | NodeKind::ConstantDefault
                | NodeKind::Dereference
                | NodeKind::ParenthesizedExpression
                | NodeKind::FunctionExpression
                | NodeKind::NullLiteral
                | NodeKind::NumericLiteral
                | NodeKind::BooleanLiteral
                | NodeKind::StringLiteral
                | NodeKind::DecimalLiteral
                | NodeKind::IntegerLiteral
        )
    }

    /// The undecided label of `rule`
    pub fn of_rule(rule: Rule) -> NodeKind {
        match rule {
            Rule::SingleStatement => NodeKind::SingleStatement,
            Rule::Query => NodeKind::Query,
            Rule::SourceCommand => NodeKind::SourceCommand,
            Rule::ProcessingCommand => NodeKind::ProcessingCommand,
            Rule::WhereCommand => NodeKind::WhereCommand,
            Rule::BooleanExpression => NodeKind::BooleanExpression,
            Rule::ValueExpression => NodeKind::ValueExpression,
            Rule::OperatorExpression => NodeKind::OperatorExpression,
            Rule::PrimaryExpression => NodeKind::PrimaryExpression,
            Rule::RowCommand => NodeKind::RowCommand,
            Rule::Fields => NodeKind::Fields,
            Rule::Field => NodeKind::Field,
            Rule::FromCommand => NodeKind::FromCommand,
            Rule::EvalCommand => NodeKind::EvalCommand,
            Rule::StatsCommand => NodeKind::StatsCommand,
            Rule::SourceIdentifier => NodeKind::SourceIdentifier,
            Rule::QualifiedName => NodeKind::QualifiedName,
            Rule::QualifiedNames => NodeKind::QualifiedNames,
            Rule::Identifier => NodeKind::Identifier,
            Rule::Constant => NodeKind::Constant,
            Rule::LimitCommand => NodeKind::LimitCommand,
            Rule::SortCommand => NodeKind::SortCommand,
            Rule::OrderExpression => NodeKind::OrderExpression,
            Rule::ProjectCommand => NodeKind::ProjectCommand,
            Rule::ProjectClause => NodeKind::ProjectClause,
            Rule::BooleanValue => NodeKind::BooleanValue,
            Rule::Number => NodeKind::Number,
            Rule::String => NodeKind::String,
            Rule::ComparisonOperator => NodeKind::ComparisonOperator,
            Rule::ExplainCommand => NodeKind::ExplainCommand,
            Rule::SubqueryExpression => NodeKind::SubqueryExpression,
        }
    }
}

/// Operator precedences and floors of the left-recursive rules
///
/// A binary operator continues the current expression when its precedence is
/// at least the floor in force; its right operand is parsed at
/// `precedence + 1`, which makes equal-precedence operators bind left.
pub mod precedence {
    /// `or`
    pub const OR: u8 = 1;
    /// `and`
    pub const AND: u8 = 2;
    /// Floor of the operand of `not`
    pub const NOT_OPERAND: u8 = 4;
    /// Highest floor `booleanExpression` accepts
    pub const BOOLEAN_MAX: u8 = 4;

    /// Binary `+` and `-`
    pub const ADDITIVE: u8 = 1;
    /// `*`, `/` and `%`
    pub const MULTIPLICATIVE: u8 = 2;
    /// Floor of the operand of unary `+` and `-`
    pub const UNARY_OPERAND: u8 = 3;
    /// Highest floor `operatorExpression` accepts
    pub const OPERATOR_MAX: u8 = 3;

    /// `|` continuation of `query`
    pub const PIPE: u8 = 1;
}

/// Precedence of a logical binary operator
pub fn logical_precedence(kind: TokenKind) -> Option<u8> {
    match kind {
        And => Some(precedence::AND),
        Or => Some(precedence::OR),
        _ => None,
    }
}

/// Precedence of an arithmetic binary operator
pub fn arithmetic_precedence(kind: TokenKind) -> Option<u8> {
    match kind {
        Asterisk | Slash | Percent => Some(precedence::MULTIPLICATIVE),
        Plus | Minus => Some(precedence::ADDITIVE),
        _ => None,
    }
}

/// Tokens that end a pipe stage
pub const STAGE_END: TokenSet = TokenSet::of(&[Eof, ClosingBracket, Pipe]);
/// Comparison operators
pub const COMPARISON_OPERATORS: TokenSet = TokenSet::of(&[Eq, Neq, Lt, Lte, Gt, Gte]);
/// Arithmetic operators
pub const ARITHMETIC_OPERATORS: TokenSet = TokenSet::of(&[Plus, Minus, Asterisk, Slash, Percent]);

const FIRST_IDENTIFIER: TokenSet = TokenSet::of(&[UnquotedIdentifier, QuotedIdentifier]);
const FIRST_SOURCE_IDENTIFIER: TokenSet = TokenSet::of(&[SrcUnquotedIdentifier, SrcQuotedIdentifier]);
const FIRST_NUMBER: TokenSet = TokenSet::of(&[IntegerLiteral, DecimalLiteral]);
const FIRST_BOOLEAN_VALUE: TokenSet = TokenSet::of(&[True, False]);
const FIRST_CONSTANT: TokenSet = FIRST_NUMBER
    .union(FIRST_BOOLEAN_VALUE)
    .with(Null)
    .with(String);
const FIRST_PRIMARY: TokenSet = FIRST_CONSTANT.union(FIRST_IDENTIFIER).with(Lp);
const FIRST_OPERATOR: TokenSet = FIRST_PRIMARY.with(Plus).with(Minus);
const FIRST_BOOLEAN: TokenSet = FIRST_OPERATOR.with(Not);
const FIRST_SOURCE_COMMAND: TokenSet = TokenSet::of(&[Explain, From, Row]);
const FIRST_PROCESSING_COMMAND: TokenSet = TokenSet::of(&[Eval, Limit, Project, Sort, Stats, Where]);

const FOLLOW_FIELDS: TokenSet = STAGE_END.with(By);
const FOLLOW_FIELD: TokenSet = FOLLOW_FIELDS.with(Comma);
const FOLLOW_BOOLEAN: TokenSet =
    FOLLOW_FIELD.union(TokenSet::of(&[Rp, Asc, Desc, Nulls, And, Or]));
const FOLLOW_OPERATOR: TokenSet = FOLLOW_BOOLEAN
    .union(COMPARISON_OPERATORS)
    .union(ARITHMETIC_OPERATORS);
const FOLLOW_QUALIFIED_NAME: TokenSet = FOLLOW_OPERATOR.with(Assign).with(Comma);
const FOLLOW_IDENTIFIER: TokenSet = FOLLOW_QUALIFIED_NAME.with(Dot).with(Lp);
const FOLLOW_SOURCE_IDENTIFIER: TokenSet = STAGE_END.with(Comma).with(Assign);
const FOLLOW_LIST_ITEM: TokenSet = STAGE_END.with(Comma);

/// Static data of one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInfo {
    /// The rule
    pub rule: Rule,
    /// Grammar name
    pub name: &'static str,
    /// Whether the rule is left-recursive (parsed by precedence climbing)
    pub left_recursive: bool,
    /// Tokens that can start the rule
    pub first: TokenSet,
    /// Tokens that can follow the rule
    pub follow: TokenSet,
}

/// The process-wide grammar table
#[derive(Debug)]
pub struct GrammarTable {
    rules: Vec<RuleInfo>,
    by_name: HashMap<&'static str, Rule>,
}

impl GrammarTable {
    fn build() -> Self {
        let rules: Vec<RuleInfo> = Rule::ALL
            .iter()
            .map(|&rule| {
                let (first, follow) = sets(rule);
                RuleInfo {
                    rule,
                    name: rule.name(),
                    left_recursive: matches!(
                        rule,
                        Rule::Query | Rule::BooleanExpression | Rule::OperatorExpression
                    ),
                    first,
                    follow,
                }
            })
            .collect();
        let by_name = rules.iter().map(|info| (info.name, info.rule)).collect();
        log::debug!("grammar table initialised with {} rules", rules.len());
        Self { rules, by_name }
    }

    /// Entry for `rule`
    pub fn get(&self, rule: Rule) -> &RuleInfo {
        &self.rules[rule.id()]
    }

    /// Look a rule up by its grammar name
    pub fn rule_by_name(&self, name: &str) -> Option<Rule> {
        self.by_name.get(name).copied()
    }

    /// All entries in rule id order
    pub fn iter(&self) -> impl Iterator<Item = &RuleInfo> {
        self.rules.iter()
    }
}

/// The grammar table, built on first access
pub static GRAMMAR: Lazy<GrammarTable> = Lazy::new(GrammarTable::build);

fn sets(rule: Rule) -> (TokenSet, TokenSet) {
    match rule {
        Rule::SingleStatement => (FIRST_SOURCE_COMMAND, TokenSet::EMPTY),
        Rule::Query => (FIRST_SOURCE_COMMAND, STAGE_END),
        Rule::SourceCommand => (FIRST_SOURCE_COMMAND, STAGE_END),
        Rule::ProcessingCommand => (FIRST_PROCESSING_COMMAND, STAGE_END),
        Rule::WhereCommand => (TokenSet::of(&[Where]), STAGE_END),
        Rule::BooleanExpression => (FIRST_BOOLEAN, FOLLOW_BOOLEAN),
        Rule::ValueExpression => (FIRST_OPERATOR, FOLLOW_BOOLEAN),
        Rule::OperatorExpression => (FIRST_OPERATOR, FOLLOW_OPERATOR),
        Rule::PrimaryExpression => (FIRST_PRIMARY, FOLLOW_OPERATOR),
        Rule::RowCommand => (TokenSet::of(&[Row]), STAGE_END),
        Rule::Fields => (FIRST_BOOLEAN, FOLLOW_FIELDS),
        Rule::Field => (FIRST_BOOLEAN, FOLLOW_FIELD),
        Rule::FromCommand => (TokenSet::of(&[From]), STAGE_END),
        Rule::EvalCommand => (TokenSet::of(&[Eval]), STAGE_END),
        Rule::StatsCommand => (TokenSet::of(&[Stats]), STAGE_END),
        Rule::SourceIdentifier => (FIRST_SOURCE_IDENTIFIER, FOLLOW_SOURCE_IDENTIFIER),
        Rule::QualifiedName => (FIRST_IDENTIFIER, FOLLOW_QUALIFIED_NAME),
        Rule::QualifiedNames => (FIRST_IDENTIFIER, STAGE_END),
        Rule::Identifier => (FIRST_IDENTIFIER, FOLLOW_IDENTIFIER),
        Rule::Constant => (FIRST_CONSTANT, FOLLOW_OPERATOR),
        Rule::LimitCommand => (TokenSet::of(&[Limit]), STAGE_END),
        Rule::SortCommand => (TokenSet::of(&[Sort]), STAGE_END),
        Rule::OrderExpression => (FIRST_BOOLEAN, FOLLOW_LIST_ITEM),
        Rule::ProjectCommand => (TokenSet::of(&[Project]), STAGE_END),
        Rule::ProjectClause => (FIRST_SOURCE_IDENTIFIER, FOLLOW_LIST_ITEM),
        Rule::BooleanValue => (FIRST_BOOLEAN_VALUE, FOLLOW_OPERATOR),
        Rule::Number => (FIRST_NUMBER, FOLLOW_OPERATOR),
        Rule::String => (TokenSet::of(&[String]), FOLLOW_OPERATOR),
        Rule::ComparisonOperator => (COMPARISON_OPERATORS, FIRST_OPERATOR),
        Rule::ExplainCommand => (TokenSet::of(&[Explain]), STAGE_END),
        Rule::SubqueryExpression => (TokenSet::of(&[OpeningBracket]), STAGE_END),
    }
}
