use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use pipeql_parser::{ParseError, Parser, GRAMMAR};
use pipeql_shared::error::input_error;
use pipeql_shared::Token;

use pipeql_cli::cli::{parse_args, Cli, Commands, ConfigCommands};
use pipeql_cli::config::{create_default_config_file, validate_config, Config};
use pipeql_cli::output::{caret, render, render_tokens};

fn main() {
    if std::env::args().any(|arg| arg == "--version" || arg == "-V") {
        print_version();
        return;
    }

    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn print_version() {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    let build_date = option_env!("BUILD_DATE").unwrap_or("unknown");
    let rustc_version = option_env!("RUSTC_VERSION").unwrap_or("unknown");

    println!("pipeql {}", version);
    println!("Commit: {}", git_hash);
    println!("Built: {}", build_date);
    println!("Rustc: {}", rustc_version);
}

/// Returns `Ok(false)` when the query had syntax errors
fn run() -> Result<bool> {
    let args = parse_args();

    let mut config = match &args.config {
        Some(path) => {
            let mut config = Config::load_from_file(path)?;
            config.merge_env();
            config
        }
        None => Config::load()?,
    };
    config.apply_cli(&args);
    validate_config(&config)?;

    setup_logging(&config);

    match args.command {
        Some(Commands::Tokens {
            ref query,
            ref query_file,
            expression,
        }) => {
            let source = read_query(query.as_deref(), query_file.as_deref())?;
            let Some(tokens) = lex(&source, expression) else {
                return Ok(false);
            };
            if !args.quiet {
                print!("{}", render_tokens(&tokens));
            }
            Ok(true)
        }
        Some(Commands::Rules) => {
            print_rules();
            Ok(true)
        }
        Some(Commands::Config { ref command }) => {
            handle_config_command(command, &config)?;
            Ok(true)
        }
        None => parse_query(&args, &config),
    }
}

fn parse_query(args: &Cli, config: &Config) -> Result<bool> {
    let source = read_query(args.query.as_deref(), args.query_file.as_deref())?;
    let Some(tokens) = lex(&source, args.expression) else {
        return Ok(false);
    };

    let parser = Parser::with_options(config.parser.clone());
    let result = if args.expression {
        parser.parse_expression(&tokens)
    } else {
        parser.parse(&tokens)
    };

    let tree = match result {
        Ok(tree) => tree,
        Err(ParseError::EmptyInput) => return Err(input_error("empty query")),
        Err(e) => {
            eprintln!("{}", e);
            if let Some(error) = e.syntax_error() {
                if let Some(snippet) = caret(&source, error.line, error.column) {
                    eprintln!("{}", snippet);
                }
            }
            return Ok(false);
        }
    };

    if !args.quiet {
        let rendered = render(&tree, config.output.format, config.output.pretty)?;
        print!("{}", rendered);
        if !rendered.ends_with('\n') {
            println!();
        }
    }

    let diagnostics = tree.diagnostics();
    for error in &diagnostics {
        log::info!("syntax error in rule {}: {}", error.rule.name(), error);
    }
    if config.output.format != pipeql_cli::OutputFormat::Diagnostics {
        for error in &diagnostics {
            eprintln!("{}", error);
        }
    }

    Ok(diagnostics.is_empty())
}

/// Lex `source`, printing the error and returning `None` on failure
fn lex(source: &str, expression: bool) -> Option<Vec<Token>> {
    let result = if expression {
        pipeql_lexer::tokenize_expression(source)
    } else {
        pipeql_lexer::tokenize(source)
    };

    match result {
        Ok(tokens) => {
            log::debug!("lexed {} tokens", tokens.len());
            Some(tokens)
        }
        Err(e) => {
            eprintln!("{}", e);
            let (line, column) = e.position();
            if let Some(snippet) = caret(source, line, column) {
                eprintln!("{}", snippet);
            }
            None
        }
    }
}

/// Read the query from the argument, the file or stdin
fn read_query(query: Option<&str>, query_file: Option<&Path>) -> Result<String> {
    if let Some(query) = query {
        return Ok(query.to_string());
    }

    if let Some(path) = query_file {
        return fs::read_to_string(path)
            .with_context(|| format!("Failed to read query file {}", path.display()));
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(input_error(
            "no query given (pass QUERY, --file or pipe the query on stdin)",
        ));
    }
    let mut source = String::new();
    stdin
        .lock()
        .read_to_string(&mut source)
        .context("Failed to read query from stdin")?;
    Ok(source)
}

fn print_rules() {
    for info in GRAMMAR.iter() {
        println!(
            "{:<22} first={} follow={}{}",
            info.name,
            info.first,
            info.follow,
            if info.left_recursive {
                " (left-recursive)"
            } else {
                ""
            }
        );
    }
}

fn handle_config_command(command: &ConfigCommands, config: &Config) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let content = toml::to_string_pretty(config)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            print!("{}", content);
            Ok(())
        }
        ConfigCommands::Init { path, force } => init_config(path, *force),
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "Config file already exists: {}. Use --force to overwrite.",
            path.display()
        ));
    }
    create_default_config_file(path)?;
    println!("Created config file: {}", path.display());
    Ok(())
}

fn setup_logging(config: &Config) {
    let log_level = match config.debug.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new().filter_level(log_level).init();
}
