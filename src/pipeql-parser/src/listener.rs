//! Listener interface and tree walker
//!
//! [`ParseTreeWalker::walk`] visits a finished tree depth-first, calling
//! `enter_every_rule` and the node's own `enter_*` method on the way down,
//! then the node's `exit_*` method and `exit_every_rule` on the way up.
//! Every method has an empty default, so a listener only implements what it
//! needs.

use pipeql_shared::Token;

use crate::grammar::NodeKind;
use crate::tree::{ChildRef, NodeRef, ParseTree};

macro_rules! listener {
    ($($kind:ident => $enter:ident, $exit:ident;)*) => {
        /// Callbacks invoked by [`ParseTreeWalker`]
        pub trait ParseTreeListener {
            /// Called before the node-specific `enter_*` method
            fn enter_every_rule(&mut self, _node: NodeRef<'_>) {}

            /// Called after the node-specific `exit_*` method
            fn exit_every_rule(&mut self, _node: NodeRef<'_>) {}

            /// Called for every matched token
            fn visit_terminal(&mut self, _token: &Token) {}

            /// Called for every token discarded during recovery
            fn visit_error_node(&mut self, _token: &Token) {}

            $(
                #[doc = concat!("Called when entering a `", stringify!($kind), "` node")]
                fn $enter(&mut self, _node: NodeRef<'_>) {}

                #[doc = concat!("Called when leaving a `", stringify!($kind), "` node")]
                fn $exit(&mut self, _node: NodeRef<'_>) {}
            )*
        }

        fn enter_node<L: ParseTreeListener + ?Sized>(listener: &mut L, node: NodeRef<'_>) {
            match node.kind() {
                $(NodeKind::$kind => listener.$enter(node),)*
            }
        }

        fn exit_node<L: ParseTreeListener + ?Sized>(listener: &mut L, node: NodeRef<'_>) {
            match node.kind() {
                $(NodeKind::$kind => listener.$exit(node),)*
            }
        }
    };
}

listener! {
    SingleStatement => enter_single_statement, exit_single_statement;
    Query => enter_query, exit_query;
    SingleCommandQuery => enter_single_command_query, exit_single_command_query;
    CompositeQuery => enter_composite_query, exit_composite_query;
    SourceCommand => enter_source_command, exit_source_command;
    ProcessingCommand => enter_processing_command, exit_processing_command;
    WhereCommand => enter_where_command, exit_where_command;
    BooleanExpression => enter_boolean_expression, exit_boolean_expression;
    LogicalNot => enter_logical_not, exit_logical_not;
    BooleanDefault => enter_boolean_default, exit_boolean_default;
    LogicalBinary => enter_logical_binary, exit_logical_binary;
    ValueExpression => enter_value_expression, exit_value_expression;
    ValueExpressionDefault => enter_value_expression_default, exit_value_expression_default;
    Comparison => enter_comparison, exit_comparison;
    OperatorExpression => enter_operator_expression, exit_operator_expression;
    OperatorExpressionDefault => enter_operator_expression_default, exit_operator_expression_default;
    ArithmeticUnary => enter_arithmetic_unary, exit_arithmetic_unary;
    ArithmeticBinary => enter_arithmetic_binary, exit_arithmetic_binary;
    PrimaryExpression => enter_primary_expression, exit_primary_expression;
    ConstantDefault => enter_constant_default, exit_constant_default;
    Dereference => enter_dereference, exit_dereference;
    ParenthesizedExpression => enter_parenthesized_expression, exit_parenthesized_expression;
    FunctionExpression => enter_function_expression, exit_function_expression;
    RowCommand => enter_row_command, exit_row_command;
    Fields => enter_fields, exit_fields;
    Field => enter_field, exit_field;
    FromCommand => enter_from_command, exit_from_command;
    EvalCommand => enter_eval_command, exit_eval_command;
    StatsCommand => enter_stats_command, exit_stats_command;
    SourceIdentifier => enter_source_identifier, exit_source_identifier;
    QualifiedName => enter_qualified_name, exit_qualified_name;
    QualifiedNames => enter_qualified_names, exit_qualified_names;
    Identifier => enter_identifier, exit_identifier;
    Constant => enter_constant, exit_constant;
    NullLiteral => enter_null_literal, exit_null_literal;
    NumericLiteral => enter_numeric_literal, exit_numeric_literal;
    BooleanLiteral => enter_boolean_literal, exit_boolean_literal;
    StringLiteral => enter_string_literal, exit_string_literal;
    LimitCommand => enter_limit_command, exit_limit_command;
    SortCommand => enter_sort_command, exit_sort_command;
    OrderExpression => enter_order_expression, exit_order_expression;
    ProjectCommand => enter_project_command, exit_project_command;
    ProjectClause => enter_project_clause, exit_project_clause;
    BooleanValue => enter_boolean_value, exit_boolean_value;
    Number => enter_number, exit_number;
    DecimalLiteral => enter_decimal_literal, exit_decimal_literal;
    IntegerLiteral => enter_integer_literal, exit_integer_literal;
    String => enter_string, exit_string;
    ComparisonOperator => enter_comparison_operator, exit_comparison_operator;
    ExplainCommand => enter_explain_command, exit_explain_command;
    SubqueryExpression => enter_subquery_expression, exit_subquery_expression;
}

/// Depth-first driver for a [`ParseTreeListener`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseTreeWalker;

impl ParseTreeWalker {
    /// Walk the whole tree
    pub fn walk<L: ParseTreeListener + ?Sized>(listener: &mut L, tree: &ParseTree) {
        Self::walk_node(listener, tree.root());
    }

    /// Walk the subtree rooted at `node`
    ///
    /// The walk keeps its own stack, so deep operator chains do not grow the
    /// call stack.
    pub fn walk_node<L: ParseTreeListener + ?Sized>(listener: &mut L, node: NodeRef<'_>) {
        // (node, index of the next child to visit)
        let mut stack = vec![(node, 0)];
        listener.enter_every_rule(node);
        enter_node(listener, node);
        while let Some((node, next)) = stack.last_mut() {
            let node = *node;
            let index = *next;
            *next += 1;
            match node.child(index) {
                Some(ChildRef::Node(child)) => {
                    listener.enter_every_rule(child);
                    enter_node(listener, child);
                    stack.push((child, 0));
                }
                Some(ChildRef::Token(token)) => listener.visit_terminal(token),
                Some(ChildRef::Error(token)) => listener.visit_error_node(token),
                None => {
                    exit_node(listener, node);
                    listener.exit_every_rule(node);
                    stack.pop();
                }
            }
        }
    }
}
