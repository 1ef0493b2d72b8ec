//! Tests for the pipeql parser
//!
//! These run the lexer and the parser together over real query text and check
//! tree shapes, recovery behaviour and the listener contract.

use super::*;
use crate::typed::{
    ArithmeticOperator, BooleanExpression, Command, ComparisonOperator, Constant, Field,
    LogicalOperator, Number, NullsOrder, OperatorExpression, PrimaryExpression, ProjectClause,
    SortOrder, ValueExpression,
};
use pretty_assertions::assert_eq;

fn tokens(input: &str) -> Vec<Token> {
    pipeql_lexer::tokenize(input).unwrap_or_else(|e| panic!("Failed to lex: {}: {}", input, e))
}

fn parse_success(input: &str) -> ParseTree {
    let tree = Parser::new()
        .parse(&tokens(input))
        .unwrap_or_else(|e| panic!("Failed to parse: {}: {}", input, e));
    assert!(
        tree.is_valid(),
        "Unexpected diagnostics for: {}: {:?}",
        input,
        tree.diagnostics()
    );
    tree
}

fn parse_with_errors(input: &str) -> ParseTree {
    let tree = Parser::new()
        .parse(&tokens(input))
        .unwrap_or_else(|e| panic!("Expected a recovered tree for: {}, got: {}", input, e));
    assert!(!tree.is_valid(), "Expected diagnostics for: {}", input);
    tree
}

fn parse_failure(input: &str) -> ParseError {
    match Parser::new().parse(&tokens(input)) {
        Ok(tree) => panic!(
            "Expected parse failure for: {}, but got: {}",
            input,
            tree.to_string_tree()
        ),
        Err(e) => e,
    }
}

fn expression(input: &str) -> ParseTree {
    let tokens = pipeql_lexer::tokenize_expression(input).unwrap();
    let tree = Parser::new()
        .parse_expression(&tokens)
        .unwrap_or_else(|e| panic!("Failed to parse expression: {}: {}", input, e));
    assert!(tree.is_valid(), "Unexpected diagnostics for: {}", input);
    tree
}

/// Drill through the default alternatives down to the primary expression
fn primary_of(node: NodeRef<'_>) -> PrimaryExpression<'_> {
    let value = match BooleanExpression::cast(node) {
        Some(BooleanExpression::BooleanDefault { value, .. }) => value,
        other => panic!("Expected booleanDefault, got {:?}", other),
    };
    let operand = match ValueExpression::cast(value) {
        Some(ValueExpression::Default { operand, .. }) => operand,
        other => panic!("Expected valueExpressionDefault, got {:?}", other),
    };
    let primary = match OperatorExpression::cast(operand) {
        Some(OperatorExpression::Default { primary, .. }) => primary,
        other => panic!("Expected operatorExpressionDefault, got {:?}", other),
    };
    PrimaryExpression::cast(primary).expect("primary expression")
}

#[test]
fn test_simple_pipeline() {
    let tree = parse_success("from logs | limit 10");
    assert_eq!(
        tree.to_string_tree(),
        "(singleStatement (query (query (sourceCommand (fromCommand from (sourceIdentifier logs)))) | \
         (processingCommand (limitCommand limit 10))) <EOF>)"
    );
}

#[test]
fn test_leaves_cover_every_token() {
    for input in [
        "from logs",
        "from a, b, c | where x > 1 and not y | limit 5",
        "row a = 1, b = \"two\", c = -3.5",
        "from logs | eval z = (a + b) * 2 | stats count(z), max(a) by host, region",
        "from logs | sort a desc nulls first, b | project x = y, z",
        "explain [ from a | where b != c ]",
    ] {
        let tree = parse_success(input);
        let leaves: Vec<&Token> = tree.root().leaf_tokens();
        let all: Vec<&Token> = tree.tokens().iter().collect();
        assert_eq!(leaves, all, "leaves differ from tokens for: {}", input);
    }
}

#[test]
fn test_and_binds_tighter_than_or() {
    let tree = expression("a or b and c");
    let root = tree.root();
    assert_eq!(root.kind(), NodeKind::LogicalBinary);
    assert_eq!(root.first_token().map(|t| t.kind), Some(TokenKind::Or));

    let left = root.child_node(0).unwrap();
    assert_eq!(left.kind(), NodeKind::BooleanDefault);
    assert_eq!(left.text(), "a");

    let right = root.child_node(1).unwrap();
    assert_eq!(right.kind(), NodeKind::LogicalBinary);
    assert_eq!(right.first_token().map(|t| t.kind), Some(TokenKind::And));
    assert_eq!(right.child_node(0).unwrap().text(), "b");
    assert_eq!(right.child_node(1).unwrap().text(), "c");
}

#[test]
fn test_subtraction_is_left_associative() {
    let tree = expression("a - b - c");
    let outer = tree.root().find(NodeKind::ArithmeticBinary).unwrap();
    assert_eq!(outer.child_node(1).unwrap().text(), "c");

    let inner = outer.child_node(0).unwrap();
    assert_eq!(inner.kind(), NodeKind::ArithmeticBinary);
    assert_eq!(inner.text(), "a-b");
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let tree = expression("a + b * c");
    let sum = tree.root().find(NodeKind::ArithmeticBinary).unwrap();
    match OperatorExpression::cast(sum) {
        Some(OperatorExpression::Binary {
            left,
            operator,
            right,
            ..
        }) => {
            assert_eq!(operator, ArithmeticOperator::Plus);
            assert_eq!(left.text(), "a");
            assert_eq!(right.kind(), NodeKind::ArithmeticBinary);
            assert_eq!(right.text(), "b*c");
        }
        other => panic!("Expected a binary expression, got {:?}", other),
    }
}

#[test]
fn test_unary_minus_binds_to_operand() {
    let tree = expression("-a * b");
    let product = tree.root().find(NodeKind::ArithmeticBinary).unwrap();
    assert_eq!(product.child_node(0).unwrap().kind(), NodeKind::ArithmeticUnary);
    assert_eq!(product.child_node(0).unwrap().text(), "-a");
}

#[test]
fn test_not_binds_tighter_than_and() {
    let tree = expression("not a and b");
    let root = tree.root();
    match BooleanExpression::cast(root) {
        Some(BooleanExpression::LogicalBinary {
            left,
            operator,
            right,
            ..
        }) => {
            assert_eq!(operator, LogicalOperator::And);
            assert_eq!(left.kind(), NodeKind::LogicalNot);
            assert_eq!(left.text(), "nota");
            assert_eq!(right.text(), "b");
        }
        other => panic!("Expected a logical binary expression, got {:?}", other),
    }
}

#[test]
fn test_pipe_chaining_nests_left() {
    let tree = parse_success("from logs | where a > 1 | stats b");
    let outer = tree.root().child_node(0).unwrap();
    assert_eq!(outer.kind(), NodeKind::CompositeQuery);

    let inner = outer.child_node(0).unwrap();
    assert_eq!(inner.kind(), NodeKind::CompositeQuery);
    assert_eq!(
        inner.child_node(1).unwrap().child_node(0).unwrap().kind(),
        NodeKind::WhereCommand
    );
    assert_eq!(
        outer.child_node(1).unwrap().child_node(0).unwrap().kind(),
        NodeKind::StatsCommand
    );

    let base = inner.child_node(0).unwrap();
    assert_eq!(base.kind(), NodeKind::SingleCommandQuery);
    assert_eq!(base.find(NodeKind::FromCommand).unwrap().text(), "fromlogs");

    let query = tree.statement().and_then(|s| s.query()).unwrap();
    let names: Vec<&str> = query.pipeline().iter().map(Command::name).collect();
    assert_eq!(names, vec!["from", "where", "stats"]);
}

#[test]
fn test_chained_comparison_is_rejected() {
    let error = parse_failure("row a < b < c");
    assert!(matches!(error, ParseError::Unrecoverable(_)));
    let syntax = error.syntax_error().unwrap();
    assert_eq!(syntax.kind, SyntaxErrorKind::NoViableAlternative);
    assert_eq!(syntax.found, TokenKind::Lt);
    assert_eq!(syntax.token_index, 4);
}

#[test]
fn test_chained_comparison_recovers_at_next_stage() {
    let tree = parse_with_errors("from logs | where a < b < c | limit 1");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, SyntaxErrorKind::NoViableAlternative);
    assert_eq!(diagnostics[0].rule, Rule::Query);
    assert!(tree.root().find(NodeKind::LimitCommand).is_some());
}

#[test]
fn test_error_is_contained_in_its_stage() {
    let tree = parse_with_errors("from logs | eval | limit 5");

    let eval = tree.root().find(NodeKind::EvalCommand).unwrap();
    assert!(eval.has_errors());
    let field = eval.find(NodeKind::Field).unwrap();
    let error = field.exception().unwrap();
    assert_eq!(error.kind, SyntaxErrorKind::NoViableAlternative);
    assert_eq!(error.found, TokenKind::Pipe);
    assert_eq!(error.message, "no viable alternative at input '|'");

    let limit = tree.root().find(NodeKind::LimitCommand).unwrap();
    assert!(!limit.has_errors());
    assert_eq!(limit.text(), "limit5");
    assert_eq!(tree.diagnostics().len(), 1);
}

#[test]
fn test_unwinding_rules_report_one_error() {
    let tree = parse_with_errors("from a | where (((a");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
    assert_eq!(diagnostics[0].kind, SyntaxErrorKind::MismatchedToken);
    assert_eq!(diagnostics[0].found, TokenKind::Eof);

    let tree = parse_with_errors("from logs | stats count(*)");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
    assert_eq!(diagnostics[0].found, TokenKind::Asterisk);

    let tree = parse_with_errors("from logs | eval (a + | limit 5");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1, "{:?}", diagnostics);
    assert_eq!(diagnostics[0].kind, SyntaxErrorKind::NoViableAlternative);
    assert_eq!(diagnostics[0].found, TokenKind::Pipe);
    assert!(tree.root().find(NodeKind::LimitCommand).is_some());
}

#[test]
fn test_matching_a_token_ends_recovery() {
    let tree = parse_with_errors("from logs | eval | where | limit 1");
    let found: Vec<(usize, TokenKind)> = tree
        .diagnostics()
        .iter()
        .map(|error| (error.column, error.found))
        .collect();
    assert_eq!(found, vec![(18, TokenKind::Pipe), (26, TokenKind::Pipe)]);
}

#[test]
fn test_reparse_is_identical() {
    let parser = Parser::new();
    let tokens = tokens("from logs | where a > 1 or b | eval c = d * 2 | limit 3");
    let first = parser.parse(&tokens).unwrap();
    let second = parser.parse(&tokens).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_error_at_end_of_input_is_recoverable() {
    let tree = parse_with_errors("from logs | where");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].found, TokenKind::Eof);
    assert_eq!(diagnostics[0].to_string(), "line 1:18 no viable alternative at input <EOF>");
}

#[test]
fn test_skipping_into_end_of_input_is_terminal() {
    let error = parse_failure("from logs | where a b");
    match error {
        ParseError::Unrecoverable(syntax) => {
            assert_eq!(syntax.found, TokenKind::UnquotedIdentifier);
            assert_eq!(syntax.text, "b");
        }
        other => panic!("Expected an unrecoverable error, got {:?}", other),
    }
}

#[test]
fn test_extraneous_token_is_dropped() {
    let tree = parse_with_errors("from logs | limit x 5");
    let limit = tree.root().find(NodeKind::LimitCommand).unwrap();
    let error = limit.exception().unwrap();
    assert_eq!(error.message, "extraneous input 'x' expecting INTEGER_LITERAL");
    assert_eq!(limit.first_token().unwrap().text, "limit");
    assert_eq!(limit.tokens().last().unwrap().text, "5");
    assert!(limit
        .children()
        .any(|child| matches!(child, ChildRef::Error(token) if token.text == "x")));
}

#[test]
fn test_bail_stops_at_first_error() {
    let parser = Parser::with_options(ParserOptions::default().error_strategy(ErrorStrategy::Bail));
    let error = parser.parse(&tokens("from logs | eval | limit 5")).unwrap_err();
    match error {
        ParseError::Bailed(syntax) => {
            assert_eq!(syntax.kind, SyntaxErrorKind::NoViableAlternative);
            assert_eq!(syntax.rule, Rule::Field);
        }
        other => panic!("Expected a bailed parse, got {:?}", other),
    }

    assert!(parser.parse(&tokens("from logs | limit 5")).is_ok());
}

#[test]
fn test_depth_limit_fails_fast() {
    let parser = Parser::with_options(ParserOptions::default().max_depth(16));
    assert!(parser.parse(&tokens("row 1")).is_ok());

    let error = parser.parse(&tokens("row ((((1))))")).unwrap_err();
    match error {
        ParseError::TooDeep(syntax) => {
            assert_eq!(syntax.kind, SyntaxErrorKind::GrammarTooDeep { max_depth: 16 });
        }
        other => panic!("Expected a depth failure, got {:?}", other),
    }
}

#[test]
fn test_empty_input() {
    assert_eq!(parse_failure(""), ParseError::EmptyInput);
    assert_eq!(parse_failure("  // nothing here"), ParseError::EmptyInput);
    let none: Vec<Token> = Vec::new();
    assert_eq!(Parser::new().parse(&none), Err(ParseError::EmptyInput));
}

#[test]
fn test_precedence_floor() {
    let tokens = pipeql_lexer::tokenize_expression("a or b").unwrap();
    let tree = Parser::new().parse_expression_at(&tokens, 2).unwrap();
    assert_eq!(tree.root().kind(), NodeKind::BooleanDefault);
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].found, TokenKind::Or);

    let tokens = pipeql_lexer::tokenize_expression("a").unwrap();
    let tree = Parser::new().parse_expression_at(&tokens, 5).unwrap();
    let error = tree.root().exception().unwrap();
    assert_eq!(
        error.kind,
        SyntaxErrorKind::FailedPredicate {
            predicate: "5 <= 4".to_string()
        }
    );
    assert_eq!(error.message, "rule booleanExpression failed predicate: {5 <= 4}?");
}

#[test]
fn test_expression_tree_excludes_eof() {
    let tree = expression("f(a, 1)");
    assert!(tree.root().leaf_tokens().iter().all(|token| !token.is_eof()));
    match primary_of(tree.root()) {
        PrimaryExpression::FunctionCall { name, args, .. } => {
            assert_eq!(name, "f");
            assert_eq!(args.len(), 2);
        }
        other => panic!("Expected a function call, got {:?}", other),
    }
}

#[test]
fn test_empty_function_arguments() {
    let tree = expression("now()");
    match primary_of(tree.root()) {
        PrimaryExpression::FunctionCall { args, .. } => assert!(args.is_empty()),
        other => panic!("Expected a function call, got {:?}", other),
    }
}

#[test]
fn test_assignment_versus_equality() {
    let tree = parse_success("row a = 1, b == 2");
    let command = tree.statement().and_then(|s| s.query()).unwrap().pipeline().remove(0);
    let Command::Row { fields, .. } = command else {
        panic!("Expected a row command");
    };
    assert!(matches!(&fields[0], Field::Assignment { name, .. } if name.to_string() == "a"));
    match &fields[1] {
        Field::Expression { expression, .. } => {
            let comparison = expression.find(NodeKind::Comparison).unwrap();
            assert!(matches!(
                ValueExpression::cast(comparison),
                Some(ValueExpression::Comparison {
                    operator: ComparisonOperator::Eq,
                    ..
                })
            ));
        }
        other => panic!("Expected an expression field, got {:?}", other),
    }
}

#[test]
fn test_typed_commands() {
    let tree = parse_success(
        "from logs, metrics-* | eval x = a + 1 | stats count(x) by host.name \
         | sort x desc nulls last | project y = x, z | limit 10",
    );
    let query = tree.statement().and_then(|s| s.query()).unwrap();
    let pipeline = query.pipeline();
    let names: Vec<&str> = pipeline.iter().map(Command::name).collect();
    assert_eq!(names, vec!["from", "eval", "stats", "sort", "project", "limit"]);

    match &pipeline[0] {
        Command::From { sources, .. } => assert_eq!(sources, &vec!["logs", "metrics-*"]),
        other => panic!("Expected from, got {:?}", other),
    }
    match &pipeline[1] {
        Command::Eval { fields, .. } => match &fields[0] {
            Field::Assignment {
                name, expression, ..
            } => {
                assert_eq!(name.parts, vec!["x"]);
                assert_eq!(expression.text(), "a+1");
            }
            other => panic!("Expected an assignment, got {:?}", other),
        },
        other => panic!("Expected eval, got {:?}", other),
    }
    match &pipeline[2] {
        Command::Stats { fields, by, .. } => {
            assert_eq!(fields.len(), 1);
            assert_eq!(by.len(), 1);
            assert_eq!(by[0].to_string(), "host.name");
        }
        other => panic!("Expected stats, got {:?}", other),
    }
    match &pipeline[3] {
        Command::Sort { orders, .. } => {
            assert_eq!(orders[0].order, Some(SortOrder::Desc));
            assert_eq!(orders[0].nulls, Some(NullsOrder::Last));
            assert_eq!(orders[0].expression.text(), "x");
        }
        other => panic!("Expected sort, got {:?}", other),
    }
    match &pipeline[4] {
        Command::Project { clauses, .. } => {
            assert!(matches!(
                &clauses[0],
                ProjectClause::Rename { new_name, old_name, .. } if new_name == "y" && old_name == "x"
            ));
            assert!(matches!(&clauses[1], ProjectClause::Keep { name, .. } if name == "z"));
        }
        other => panic!("Expected project, got {:?}", other),
    }
    match &pipeline[5] {
        Command::Limit { count, .. } => assert_eq!(count.text, "10"),
        other => panic!("Expected limit, got {:?}", other),
    }
}

#[test]
fn test_typed_constants() {
    let tree = parse_success(r#"row a = null, b = 1.5, c = true, d = "hi\n", e = 42"#);
    let Command::Row { fields, .. } = tree.statement().and_then(|s| s.query()).unwrap().pipeline().remove(0)
    else {
        panic!("Expected a row command");
    };
    let constants: Vec<Constant<'_>> = fields
        .iter()
        .map(|field| match field {
            Field::Assignment { expression, .. } => match primary_of(*expression) {
                PrimaryExpression::Constant { constant, .. } => constant,
                other => panic!("Expected a constant, got {:?}", other),
            },
            other => panic!("Expected an assignment, got {:?}", other),
        })
        .collect();

    assert!(matches!(constants[0], Constant::Null { .. }));
    assert!(matches!(constants[1], Constant::Numeric { value: Number::Decimal("1.5"), .. }));
    assert!(matches!(constants[2], Constant::Boolean { value: true, .. }));
    assert!(matches!(&constants[3], Constant::String { value, .. } if value == "hi\n"));
    match &constants[4] {
        Constant::Numeric { value, .. } => assert_eq!(value.as_i64(), Some(42)),
        other => panic!("Expected a number, got {:?}", other),
    }
}

#[test]
fn test_explain_subquery() {
    let tree = parse_success("explain [ from a | where b != c ]");
    let command = tree.statement().and_then(|s| s.query()).unwrap().pipeline().remove(0);
    match command {
        Command::Explain { query, .. } => {
            let inner = typed::Query::cast(query).unwrap();
            assert_eq!(inner.pipeline().len(), 2);
        }
        other => panic!("Expected explain, got {:?}", other),
    }
}

#[test]
fn test_diagnostics_positions() {
    let tree = parse_with_errors("from logs\n| eval x = \n| limit 1");
    let diagnostics = tree.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].line, 3);
    assert_eq!(diagnostics[0].column, 1);
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    terminals: Vec<String>,
    comparisons: usize,
}

impl ParseTreeListener for Recorder {
    fn enter_every_rule(&mut self, node: NodeRef<'_>) {
        self.events.push(format!("enter {}", node.rule().name()));
    }

    fn exit_every_rule(&mut self, node: NodeRef<'_>) {
        self.events.push(format!("exit {}", node.rule().name()));
    }

    fn visit_terminal(&mut self, token: &Token) {
        self.terminals.push(token.text.clone());
    }

    fn enter_comparison(&mut self, _node: NodeRef<'_>) {
        self.comparisons += 1;
    }
}

#[test]
fn test_listener_order() {
    let tree = parse_success("from a | limit 1");
    let mut recorder = Recorder::default();
    ParseTreeWalker::walk(&mut recorder, &tree);

    assert_eq!(
        recorder.events,
        vec![
            "enter singleStatement",
            "enter query",
            "enter query",
            "enter sourceCommand",
            "enter fromCommand",
            "enter sourceIdentifier",
            "exit sourceIdentifier",
            "exit fromCommand",
            "exit sourceCommand",
            "exit query",
            "enter processingCommand",
            "enter limitCommand",
            "exit limitCommand",
            "exit processingCommand",
            "exit query",
            "exit singleStatement",
        ]
    );
    assert_eq!(recorder.terminals, vec!["from", "a", "|", "limit", "1", "<EOF>"]);
}

#[test]
fn test_listener_rule_callbacks() {
    let tree = parse_success("from a | where b > 1 and c <= 2");
    let mut recorder = Recorder::default();
    ParseTreeWalker::walk(&mut recorder, &tree);
    assert_eq!(recorder.comparisons, 2);
}

#[test]
fn test_tree_serializes_to_json() {
    let tree = parse_success("from logs | limit 1");
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["rule"], "singleStatement");
    assert_eq!(json["children"][0]["rule"], "query");
    assert_eq!(json["children"][0]["label"], "compositeQuery");
    assert_eq!(json["children"][1]["token"]["kind"], "EOF");
}

#[test]
fn test_to_json_matches_serde() {
    for tree in [
        parse_success("from logs | where a > 1.5 and b == \"x\" | limit 1"),
        parse_with_errors("from logs | limit x 5"),
    ] {
        assert_eq!(tree.to_json(false).unwrap(), serde_json::to_string(&tree).unwrap());
        assert_eq!(tree.to_json(true).unwrap(), serde_json::to_string_pretty(&tree).unwrap());
    }
}

#[test]
fn test_long_operator_chain() {
    let operators = 50_000;
    let source = format!("row 1{}", " + 1".repeat(operators));
    let tree = parse_success(&source);
    let token_count = 2 * operators + 3;
    assert_eq!(tree.tokens().len(), token_count);

    let root = tree.root();
    assert!(root.find(NodeKind::ArithmeticBinary).is_some());
    assert_eq!(root.leaf_tokens().len(), token_count);
    assert_eq!(root.text(), source.replace(' ', ""));

    let lisp = tree.to_string_tree();
    assert!(lisp.starts_with("(singleStatement (query (sourceCommand (rowCommand row"));
    assert!(lisp.ends_with(" <EOF>)"));
    assert_eq!(lisp.matches('(').count(), lisp.matches(')').count());

    let mut recorder = Recorder::default();
    ParseTreeWalker::walk(&mut recorder, &tree);
    assert_eq!(recorder.events.len(), 2 * root.descendants().count());
    assert_eq!(recorder.events.last().map(String::as_str), Some("exit singleStatement"));
    assert_eq!(recorder.terminals.len(), token_count);

    let json = tree.to_json(false).unwrap();
    assert!(json.starts_with("{\"rule\":\"singleStatement\""));
    assert_eq!(json.matches('{').count(), json.matches('}').count());
}

#[test]
fn test_diagnostics_in_source_order() {
    let tree = parse_with_errors("from logs | eval | where | limit 1");
    let columns: Vec<usize> = tree.diagnostics().iter().map(|e| e.column).collect();
    assert_eq!(columns, [18, 26]);

    // The outer parenthesis reports on an ancestor of the inner error's node
    let tree = parse_with_errors("row ((a +) | limit 1");
    let columns: Vec<usize> = tree.diagnostics().iter().map(|e| e.column).collect();
    assert_eq!(columns, [10, 12]);
    assert!(tree.root().find(NodeKind::LimitCommand).is_some());
}

#[test]
fn test_parsers_share_nothing_across_threads() {
    let tokens = tokens("from logs | where a > 1 | limit 5");
    let expected = Parser::new().parse(&tokens).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tokens = tokens.clone();
            std::thread::spawn(move || Parser::new().parse(&tokens).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
