//! Typed views over parse-tree nodes
//!
//! Each rule family is a tagged union with one variant per alternative, so a
//! consumer can `match` exhaustively instead of inspecting labels. Views are
//! cheap: they borrow the tree and hold [`NodeRef`]s for sub-expressions,
//! which are cast again on demand. Casting a node that carries a syntax error
//! may return `None` when a required child is missing.

use std::borrow::Cow;
use std::fmt;

use pipeql_shared::{Token, TokenKind};

use crate::grammar::NodeKind;
use crate::tree::{NodeRef, ParseTree};

/// A typed view of a node
pub trait TypedNode<'t>: Sized {
    /// View `node` as `Self` if its label fits
    fn cast(node: NodeRef<'t>) -> Option<Self>;

    /// The underlying node
    fn syntax(&self) -> NodeRef<'t>;
}

/// `and` / `or`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// `and`
    And,
    /// `or`
    Or,
}

impl LogicalOperator {
    fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::And => Some(LogicalOperator::And),
            TokenKind::Or => Some(LogicalOperator::Or),
            _ => None,
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
}

impl ComparisonOperator {
    fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Eq => Some(ComparisonOperator::Eq),
            TokenKind::Neq => Some(ComparisonOperator::Neq),
            TokenKind::Lt => Some(ComparisonOperator::Lt),
            TokenKind::Lte => Some(ComparisonOperator::Lte),
            TokenKind::Gt => Some(ComparisonOperator::Gt),
            TokenKind::Gte => Some(ComparisonOperator::Gte),
            _ => None,
        }
    }
}

/// Arithmetic operators, binary or unary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Modulo,
}

impl ArithmeticOperator {
    fn from_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(ArithmeticOperator::Plus),
            TokenKind::Minus => Some(ArithmeticOperator::Minus),
            TokenKind::Asterisk => Some(ArithmeticOperator::Multiply),
            TokenKind::Slash => Some(ArithmeticOperator::Divide),
            TokenKind::Percent => Some(ArithmeticOperator::Modulo),
            _ => None,
        }
    }
}

/// `asc` / `desc`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// `asc`
    Asc,
    /// `desc`
    Desc,
}

/// `nulls first` / `nulls last`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    /// `nulls first`
    First,
    /// `nulls last`
    Last,
}

fn operator_token<T>(node: NodeRef<'_>, convert: impl Fn(TokenKind) -> Option<T>) -> Option<T> {
    node.tokens().find_map(|token| convert(token.kind))
}

/// Strip backticks from a quoted identifier, undoubling inner backticks
pub fn unquote_identifier(text: &str) -> Cow<'_, str> {
    match text
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        Some(inner) if inner.contains("``") => Cow::Owned(inner.replace("``", "`")),
        Some(inner) => Cow::Borrowed(inner),
        None => Cow::Borrowed(text),
    }
}

/// Value of a string literal: quotes removed and escapes resolved
///
/// Triple-quoted strings are taken verbatim.
pub fn unquote_string(text: &str) -> String {
    if let Some(inner) = text
        .strip_prefix("\"\"\"")
        .and_then(|rest| rest.strip_suffix("\"\"\""))
    {
        return inner.to_string();
    }
    let inner = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(text);
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }
    value
}

/// `singleStatement`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statement<'t> {
    node: NodeRef<'t>,
}

impl<'t> Statement<'t> {
    /// The top-level query
    pub fn query(&self) -> Option<Query<'t>> {
        self.node.child_nodes().find_map(Query::cast)
    }
}

impl<'t> TypedNode<'t> for Statement<'t> {
    fn cast(node: NodeRef<'t>) -> Option<Self> {
        (node.kind() == NodeKind::SingleStatement).then_some(Statement { node })
    }

    fn syntax(&self) -> NodeRef<'t> {
        self.node
    }
}

impl ParseTree {
    /// Typed view of the root, when the tree was parsed as a statement
    pub fn statement(&self) -> Option<Statement<'_>> {
        Statement::cast(self.root())
    }
}

/// `query`
#[derive(Debug, Clone, PartialEq)]
pub enum Query<'t> {
    /// A query made of its source command only
    SingleCommand {
        /// The `query` node
        node: NodeRef<'t>,
        /// The source command
        command: Command<'t>,
    },
    /// A query extended by one more pipe stage
    Composite {
        /// The `query` node
        node: NodeRef<'t>,
        /// Everything left of the last `|`
        query: NodeRef<'t>,
        /// The last processing command
        command: Command<'t>,
    },
}

impl<'t> Query<'t> {
    /// All commands of the pipeline, source command first
    pub fn pipeline(&self) -> Vec<Command<'t>> {
        let mut commands = Vec::new();
        let mut current = Some(self.clone());
        while let Some(query) = current {
            current = match query {
                Query::SingleCommand { command, .. } => {
                    commands.push(command);
                    None
                }
                Query::Composite { query, command, .. } => {
                    commands.push(command);
                    Query::cast(query)
                }
            };
        }
        commands.reverse();
        commands
    }
}

impl<'t> TypedNode<'t> for Query<'t> {
    fn cast(node: NodeRef<'t>) -> Option<Self> {
        match node.kind() {
            NodeKind::SingleCommandQuery => Some(Query::SingleCommand {
                node,
                command: Command::cast(node.child_node(0)?)?,
            }),
            NodeKind::CompositeQuery => Some(Query::Composite {
                node,
                query: node.child_node(0)?,
                command: Command::cast(node.child_node(1)?)?,
            }),
            _ => None,
        }
    }

    fn syntax(&self) -> NodeRef<'t> {
        match self {
            Query::SingleCommand { node, .. } | Query::Composite { node, .. } => *node,
        }
    }
}

/// A source or processing command
#[derive(Debug, Clone, PartialEq)]
pub enum Command<'t> {
    /// `explain [ query ]`
    Explain {
        /// The `explainCommand` node
        node: NodeRef<'t>,
        /// The bracketed query
        query: NodeRef<'t>,
    },
    /// `from a, b`
    From {
        /// The `fromCommand` node
        node: NodeRef<'t>,
        /// Source names, unquoted
        sources: Vec<Cow<'t, str>>,
    },
    /// `row fields`
    Row {
        /// The `rowCommand` node
        node: NodeRef<'t>,
        /// Row fields
        fields: Vec<Field<'t>>,
    },
    /// `eval fields`
    Eval {
        /// The `evalCommand` node
        node: NodeRef<'t>,
        /// Computed fields
        fields: Vec<Field<'t>>,
    },
    /// `stats fields by names`
    Stats {
        /// The `statsCommand` node
        node: NodeRef<'t>,
        /// Aggregations
        fields: Vec<Field<'t>>,
        /// Grouping names
        by: Vec<QualifiedName<'t>>,
    },
    /// `where condition`
    Where {
        /// The `whereCommand` node
        node: NodeRef<'t>,
        /// The `booleanExpression` node
        condition: NodeRef<'t>,
    },
    /// `limit n`
    Limit {
        /// The `limitCommand` node
        node: NodeRef<'t>,
        /// The integer literal
        count: &'t Token,
    },
    /// `sort orders`
    Sort {
        /// The `sortCommand` node
        node: NodeRef<'t>,
        /// Sort keys
        orders: Vec<OrderExpression<'t>>,
    },
    /// `project clauses`
    Project {
        /// The `projectCommand` node
        node: NodeRef<'t>,
        /// Kept and renamed sources
        clauses: Vec<ProjectClause<'t>>,
    },
}

fn fields_of<'t>(node: NodeRef<'t>) -> Option<Vec<Field<'t>>> {
    let fields = node.child_nodes().find(|n| n.kind() == NodeKind::Fields)?;
    Some(fields.child_nodes().filter_map(Field::cast).collect())
}

fn source_name(node: NodeRef<'_>) -> Option<Cow<'_, str>> {
    (node.kind() == NodeKind::SourceIdentifier)
        .then(|| node.first_token())
        .flatten()
        .map(|token| unquote_identifier(&token.text))
}

impl<'t> Command<'t> {
    /// The keyword of the command, e.g. `where`
    pub fn name(&self) -> &'static str {
        match self {
            Command::Explain { .. } => "explain",
            Command::From { .. } => "from",
            Command::Row { .. } => "row",
            Command::Eval { .. } => "eval",
            Command::Stats { .. } => "stats",
            Command::Where { .. } => "where",
            Command::Limit { .. } => "limit",
            Command::Sort { .. } => "sort",
            Command::Project { .. } => "project",
        }
    }
}

impl<'t> TypedNode<'t> for Command<'t> {
    fn cast(node: NodeRef<'t>) -> Option<Self> {
        let command = match node.kind() {
            NodeKind::SourceCommand | NodeKind::ProcessingCommand => {
                return Command::cast(node.child_node(0)?)
            }
            NodeKind::ExplainCommand => Command::Explain {
                node,
                query: node.child_node(0)?.child_node(0)?,
            },
            NodeKind::FromCommand => Command::From {
                node,
                sources: node.child_nodes().filter_map(source_name).collect(),
            },
            NodeKind::RowCommand => Command::Row {
                node,
                fields: fields_of(node)?,
            },
            NodeKind::EvalCommand => Command::Eval {
                node,
                fields: fields_of(node)?,
            },
            NodeKind::StatsCommand => Command::Stats {
                node,
                fields: fields_of(node)?,
                by: node
                    .child_nodes()
                    .find(|n| n.kind() == NodeKind::QualifiedNames)
                    .map(|names| names.child_nodes().filter_map(QualifiedName::cast).collect())
                    .unwrap_or_default(),
            },
            NodeKind::WhereCommand => Command::Where {
                node,
                condition: node.child_node(0)?,
            },
            NodeKind::LimitCommand => Command::Limit {
                node,
                count: node
                    .tokens()
                    .find(|token| token.kind == TokenKind::IntegerLiteral)?,
            },
            NodeKind::SortCommand => Command::Sort {
                node,
                orders: node.child_nodes().filter_map(OrderExpression::cast).collect(),
            },
            NodeKind::ProjectCommand => Command::Project {
                node,
                clauses: node.child_nodes().filter_map(ProjectClause::cast).collect(),
            },
            _ => return None,
        };
        Some(command)
    }

    fn syntax(&self) -> NodeRef<'t> {
        match self {
            Command::Explain { node, .. }
            | Command::From { node, .. }
            | Command::Row { node, .. }
            | Command::Eval { node, .. }
            | Command::Stats { node, .. }
            | Command::Where { node, .. }
            | Command::Limit { node, .. }
            | Command::Sort { node, .. }
            | Command::Project { node, .. } => *node,
        }
    }
}

/// `field`
#[derive(Debug, Clone, PartialEq)]
pub enum Field<'t> {
    /// A bare expression
    Expression {
        /// The `field` node
        node: NodeRef<'t>,
        /// The `booleanExpression` node
        expression: NodeRef<'t>,
    },
    /// `name = expression`
    Assignment {
        /// The `field` node
        node: NodeRef<'t>,
        /// Assigned name
        name: QualifiedName<'t>,
        /// The `booleanExpression` node
        expression: NodeRef<'t>,
    },
}

impl<'t> TypedNode<'t> for Field<'t> {
    fn cast(node: NodeRef<'t>) -> Option<Self> {
        if node.kind() != NodeKind::Field {
            return None;
        }
        let first = node.child_node(0)?;
        if first.kind() == NodeKind::QualifiedName {
            return Some(Field::Assignment {
                node,
                name: QualifiedName::cast(first)?,
                expression: node.child_node(1)?,
            });
        }
        Some(Field::Expression {
            node,
            expression: first,
        })
    }

    fn syntax(&self) -> NodeRef<'t> {
        match self {
            Field::Expression { node, .. } | Field::Assignment { node, .. } => *node,
        }
    }
}

/// `booleanExpression`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BooleanExpression<'t> {
    /// `not operand`
    LogicalNot {
        /// The expression node
        node: NodeRef<'t>,
        /// The negated `booleanExpression`
        operand: NodeRef<'t>,
    },
    /// A `valueExpression` used as a boolean
    BooleanDefault {
        /// The expression node
        node: NodeRef<'t>,
        /// The `valueExpression`
        value: NodeRef<'t>,
    },
    /// `left and right` / `left or right`
    LogicalBinary {
        /// The expression node
        node: NodeRef<'t>,
        /// Left `booleanExpression`
        left: NodeRef<'t>,
        /// Operator
        operator: LogicalOperator,
        /// Right `booleanExpression`
        right: NodeRef<'t>,
    },
}

impl<'t> TypedNode<'t> for BooleanExpression<'t> {
    fn cast(node: NodeRef<'t>) -> Option<Self> {
        match node.kind() {
            NodeKind::LogicalNot => Some(BooleanExpression::LogicalNot {
                node,
                operand: node.child_node(0)?,
            }),
            NodeKind::BooleanDefault => Some(BooleanExpression::BooleanDefault {
                node,
                value: node.child_node(0)?,
            }),
            NodeKind::LogicalBinary => Some(BooleanExpression::LogicalBinary {
                node,
                left: node.child_node(0)?,
                operator: operator_token(node, LogicalOperator::from_kind)?,
                right: node.child_node(1)?,
            }),
            _ => None,
        }
    }

    fn syntax(&self) -> NodeRef<'t> {
        match self {
            BooleanExpression::LogicalNot { node, .. }
            | BooleanExpression::BooleanDefault { node, .. }
            | BooleanExpression::LogicalBinary { node, .. } => *node,
        }
    }
}

/// `valueExpression`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueExpression<'t> {
    /// A plain `operatorExpression`
    Default {
        /// The expression node
        node: NodeRef<'t>,
        /// The `operatorExpression`
        operand: NodeRef<'t>,
    },
    /// `left op right`
    Comparison {
        /// The expression node
        node: NodeRef<'t>,
        /// Left `operatorExpression`
        left: NodeRef<'t>,
        /// Operator
        operator: ComparisonOperator,
        /// Right `operatorExpression`
        right: NodeRef<'t>,
    },
}

impl<'t> TypedNode<'t> for ValueExpression<'t> {
    fn cast(node: NodeRef<'t>) -> Option<Self> {
        match node.kind() {
            NodeKind::ValueExpressionDefault => Some(ValueExpression::Default {
                node,
                operand: node.child_node(0)?,
            }),
            NodeKind::Comparison => {
                let operator = node
                    .child_nodes()
                    .find(|n| n.kind() == NodeKind::ComparisonOperator)
                    .and_then(|op| operator_token(op, ComparisonOperator::from_kind))?;
                Some(ValueExpression::Comparison {
                    node,
                    left: node.child_node(0)?,
                    operator,
                    right: node.child_node(2)?,
                })
            }
            _ => None,
        }
    }

    fn syntax(&self) -> NodeRef<'t> {
        match self {
            ValueExpression::Default { node, .. } | ValueExpression::Comparison { node, .. } => {
                *node
            }
        }
    }
}

/// `operatorExpression`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatorExpression<'t> {
    /// A plain `primaryExpression`
    Default {
        /// The expression node
        node: NodeRef<'t>,
        /// The `primaryExpression`
        primary: NodeRef<'t>,
    },
    /// `-operand` / `+operand`
    Unary {
        /// The expression node
        node: NodeRef<'t>,
        /// Sign
        operator: ArithmeticOperator,
        /// The `operatorExpression`
        operand: NodeRef<'t>,
    },
    /// `left op right`
    Binary {
        /// The expression node
        node: NodeRef<'t>,
        /// Left `operatorExpression`
        left: NodeRef<'t>,
        /// Operator
        operator: ArithmeticOperator,
        /// Right `operatorExpression`
        right: NodeRef<'t>,
    },
}

impl<'t> TypedNode<'t> for OperatorExpression<'t> {
    fn cast(node: NodeRef<'t>) -> Option<Self> {
        match node.kind() {
            NodeKind::OperatorExpressionDefault => Some(OperatorExpression::Default {
                node,
                primary: node.child_node(0)?,
            }),
            NodeKind::ArithmeticUnary => Some(OperatorExpression::Unary {
                node,
                operator: operator_token(node, ArithmeticOperator::from_kind)?,
                operand: node.child_node(0)?,
            }),
            NodeKind::ArithmeticBinary => Some(OperatorExpression::Binary {
                node,
                left: node.child_node(0)?,
                operator: operator_token(node, ArithmeticOperator::from_kind)?,
                right: node.child_node(1)?,
            }),
            _ => None,
        }
    }

    fn syntax(&self) -> NodeRef<'t> {
        match self {
            OperatorExpression::Default { node, .. }
            | OperatorExpression::Unary { node, .. }
            | OperatorExpression::Binary { node, .. } => *node,
        }
    }
}

/// `primaryExpression`
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryExpression<'t> {
    /// A literal
    Constant {
        /// The expression node
        node: NodeRef<'t>,
        /// The literal
        constant: Constant<'t>,
    },
    /// A field reference
    Dereference {
        /// The expression node
        node: NodeRef<'t>,
        /// The referenced name
        name: QualifiedName<'t>,
    },
    /// `( expression )`
    Parenthesized {
        /// The expression node
        node: NodeRef<'t>,
        /// The inner `booleanExpression`
        inner: NodeRef<'t>,
    },
    /// `name(args)`
    FunctionCall {
        /// The expression node
        node: NodeRef<'t>,
        /// Function name, unquoted
        name: Cow<'t, str>,
        /// Argument `booleanExpression` nodes
        args: Vec<NodeRef<'t>>,
    },
}

impl<'t> TypedNode<'t> for PrimaryExpression<'t> {
    fn cast(node: NodeRef<'t>) -> Option<Self> {
        match node.kind() {
            NodeKind::ConstantDefault => Some(PrimaryExpression::Constant {
                node,
                constant: Constant::cast(node.child_node(0)?)?,
            }),
            NodeKind::Dereference => Some(PrimaryExpression::Dereference {
                node,
                name: QualifiedName::cast(node.child_node(0)?)?,
            }),
            NodeKind::ParenthesizedExpression => Some(PrimaryExpression::Parenthesized {
                node,
                inner: node.child_node(0)?,
            }),
            NodeKind::FunctionExpression => {
                let identifier = node.child_node(0)?.first_token()?;
                Some(PrimaryExpression::FunctionCall {
                    node,
                    name: unquote_identifier(&identifier.text),
                    args: node.child_nodes().skip(1).collect(),
                })
            }
            _ => None,
        }
    }

    fn syntax(&self) -> NodeRef<'t> {
        match self {
            PrimaryExpression::Constant { node, .. }
            | PrimaryExpression::Dereference { node, .. }
            | PrimaryExpression::Parenthesized { node, .. }
            | PrimaryExpression::FunctionCall { node, .. } => *node,
        }
    }
}

/// Numeric literal text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Number<'t> {
    /// `INTEGER_LITERAL`
    Integer(&'t str),
    /// `DECIMAL_LITERAL`
    Decimal(&'t str),
}

impl Number<'_> {
    /// Integer value, if this is an integer that fits in `i64`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(text) => text.parse().ok(),
            Number::Decimal(_) => None,
        }
    }

    /// Value as a float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Integer(text) | Number::Decimal(text) => text.parse().ok(),
        }
    }
}

/// `constant`
#[derive(Debug, Clone, PartialEq)]
pub enum Constant<'t> {
    /// `null`
    Null {
        /// The constant node
        node: NodeRef<'t>,
    },
    /// Integer or decimal literal
    Numeric {
        /// The constant node
        node: NodeRef<'t>,
        /// Literal text
        value: Number<'t>,
    },
    /// `true` / `false`
    Boolean {
        /// The constant node
        node: NodeRef<'t>,
        /// The value
        value: bool,
    },
    /// String literal
    String {
        /// The constant node
        node: NodeRef<'t>,
        /// Unescaped value
        value: String,
    },
}

impl<'t> TypedNode<'t> for Constant<'t> {
    fn cast(node: NodeRef<'t>) -> Option<Self> {
        match node.kind() {
            NodeKind::NullLiteral => Some(Constant::Null { node }),
            NodeKind::NumericLiteral => {
                let number = node.child_node(0)?;
                let text = number.first_token()?.text.as_str();
                let value = match number.kind() {
                    NodeKind::IntegerLiteral => Number::Integer(text),
                    NodeKind::DecimalLiteral => Number::Decimal(text),
                    _ => return None,
                };
                Some(Constant::Numeric { node, value })
            }
            NodeKind::BooleanLiteral => Some(Constant::Boolean {
                node,
                value: node.child_node(0)?.first_token()?.kind == TokenKind::True,
            }),
            NodeKind::StringLiteral => Some(Constant::String {
                node,
                value: unquote_string(&node.child_node(0)?.first_token()?.text),
            }),
            _ => None,
        }
    }

    fn syntax(&self) -> NodeRef<'t> {
        match self {
            Constant::Null { node }
            | Constant::Numeric { node, .. }
            | Constant::Boolean { node, .. }
            | Constant::String { node, .. } => *node,
        }
    }
}

/// `orderExpression`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderExpression<'t> {
    /// The `orderExpression` node
    pub node: NodeRef<'t>,
    /// The sort key `booleanExpression`
    pub expression: NodeRef<'t>,
    /// Explicit `asc` / `desc`
    pub order: Option<SortOrder>,
    /// Explicit `nulls first` / `nulls last`
    pub nulls: Option<NullsOrder>,
}

impl<'t> TypedNode<'t> for OrderExpression<'t> {
    fn cast(node: NodeRef<'t>) -> Option<Self> {
        if node.kind() != NodeKind::OrderExpression {
            return None;
        }
        let mut order = None;
        let mut nulls = None;
        for token in node.tokens() {
            match token.kind {
                TokenKind::Asc => order = Some(SortOrder::Asc),
                TokenKind::Desc => order = Some(SortOrder::Desc),
                TokenKind::First => nulls = Some(NullsOrder::First),
                TokenKind::Last => nulls = Some(NullsOrder::Last),
                _ => {}
            }
        }
        Some(OrderExpression {
            node,
            expression: node.child_node(0)?,
            order,
            nulls,
        })
    }

    fn syntax(&self) -> NodeRef<'t> {
        self.node
    }
}

/// `projectClause`
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectClause<'t> {
    /// Keep a source as is
    Keep {
        /// The clause node
        node: NodeRef<'t>,
        /// Kept name, unquoted
        name: Cow<'t, str>,
    },
    /// `new = old`
    Rename {
        /// The clause node
        node: NodeRef<'t>,
        /// New name, unquoted
        new_name: Cow<'t, str>,
        /// Old name, unquoted
        old_name: Cow<'t, str>,
    },
}

impl<'t> TypedNode<'t> for ProjectClause<'t> {
    fn cast(node: NodeRef<'t>) -> Option<Self> {
        if node.kind() != NodeKind::ProjectClause {
            return None;
        }
        let names: Vec<_> = node.child_nodes().filter_map(source_name).collect();
        let mut names = names.into_iter();
        match (names.next(), names.next()) {
            (Some(new_name), Some(old_name)) => Some(ProjectClause::Rename {
                node,
                new_name,
                old_name,
            }),
            (Some(name), None) => Some(ProjectClause::Keep { node, name }),
            _ => None,
        }
    }

    fn syntax(&self) -> NodeRef<'t> {
        match self {
            ProjectClause::Keep { node, .. } | ProjectClause::Rename { node, .. } => *node,
        }
    }
}

/// `qualifiedName`
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedName<'t> {
    /// The `qualifiedName` node
    pub node: NodeRef<'t>,
    /// Dot-separated parts, unquoted
    pub parts: Vec<Cow<'t, str>>,
}

impl<'t> TypedNode<'t> for QualifiedName<'t> {
    fn cast(node: NodeRef<'t>) -> Option<Self> {
        if node.kind() != NodeKind::QualifiedName {
            return None;
        }
        let parts = node
            .child_nodes()
            .filter_map(|identifier| identifier.first_token())
            .map(|token| unquote_identifier(&token.text))
            .collect();
        Some(QualifiedName { node, parts })
    }

    fn syntax(&self) -> NodeRef<'t> {
        self.node
    }
}

impl fmt::Display for QualifiedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote_identifier() {
        assert_eq!(unquote_identifier("plain"), "plain");
        assert_eq!(unquote_identifier("`a b`"), "a b");
        assert_eq!(unquote_identifier("`a``b`"), "a`b");
    }

    #[test]
    fn test_unquote_string() {
        assert_eq!(unquote_string(r#""a\"b\n""#), "a\"b\n");
        assert_eq!(unquote_string(r#""""raw \n""""#), r"raw \n");
        assert_eq!(unquote_string(r#""""#), "");
    }

    #[test]
    fn test_number_values() {
        assert_eq!(Number::Integer("42").as_i64(), Some(42));
        assert_eq!(Number::Decimal("1.5").as_i64(), None);
        assert_eq!(Number::Decimal("1.5").as_f64(), Some(1.5));
    }
}
