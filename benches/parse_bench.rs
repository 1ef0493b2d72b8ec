use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pipeql::{Parser, ParserOptions};

// Generate a query with `stages` processing commands
fn generate_query(stages: usize) -> String {
    let mut query = String::from("from logs-*, metrics");
    for i in 0..stages {
        let stage = match i % 5 {
            0 => format!(" | where status >= {} and not (host == \"h{}\" or port < 1024)", 400 + i, i),
            1 => format!(" | eval x{} = a * {} + b / (c - {}) % 7", i, i, i + 1),
            2 => format!(" | stats count(x{}), avg(latency) by host.name, region", i),
            3 => " | sort latency desc nulls last, host asc".to_string(),
            _ => format!(" | project y{} = x, `odd name`, z", i),
        };
        query.push_str(&stage);
    }
    query.push_str(" | limit 100");
    query
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for stages in [1usize, 10, 100].iter() {
        let query = generate_query(*stages);
        group.throughput(Throughput::Bytes(query.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(stages), &query, |b, query| {
            b.iter(|| pipeql::tokenize(black_box(query)).unwrap())
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let parser = Parser::new();

    for stages in [1usize, 10, 100].iter() {
        let tokens = pipeql::tokenize(&generate_query(*stages)).unwrap();
        group.throughput(Throughput::Elements(tokens.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(stages), &tokens, |b, tokens| {
            b.iter(|| parser.parse(black_box(tokens)).unwrap())
        });
    }

    group.finish();
}

fn bench_recovery(c: &mut Criterion) {
    let mut group = c.benchmark_group("recovery");
    let parser = Parser::with_options(ParserOptions::default());

    // Every other stage is missing its arguments
    let mut query = String::from("from logs");
    for i in 0..50 {
        if i % 2 == 0 {
            query.push_str(" | eval");
        } else {
            query.push_str(" | where a > 1");
        }
    }
    let tokens = pipeql::tokenize(&query).unwrap();

    group.bench_function("missing_arguments", |b| {
        b.iter(|| {
            let tree = parser.parse(black_box(&tokens)).unwrap();
            assert!(!tree.is_valid());
            tree
        })
    });

    group.finish();
}

fn bench_nested_expression(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_expression");
    let parser = Parser::new();

    for depth in [8usize, 32, 96].iter() {
        let source = format!("{}1{}", "(".repeat(*depth), ")".repeat(*depth));
        let tokens = expression_tokens(&source);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &tokens, |b, tokens| {
            b.iter(|| parser.parse_expression(black_box(tokens)).unwrap())
        });
    }

    group.finish();
}

fn expression_tokens(source: &str) -> Vec<pipeql::Token> {
    pipeql::Lexer::with_mode(source, pipeql::LexMode::Expression)
        .tokenize()
        .unwrap()
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_parse,
    bench_recovery,
    bench_nested_expression
);
criterion_main!(benches);
