//! nom recognisers for the individual token shapes
//!
//! Every recogniser returns the exact slice it matched so the driver can keep
//! byte offsets and line/column bookkeeping in one place.

use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_till, take_until, take_while, take_while1},
    character::complete::{anychar, char, digit1, multispace1, one_of, satisfy},
    combinator::{map, opt, recognize, value},
    multi::many0_count,
    sequence::pair,
    IResult, Parser,
};

use pipeql_shared::TokenKind;

const COMMAND_KEYWORDS: [(&str, TokenKind); 9] = [
    ("eval", TokenKind::Eval),
    ("explain", TokenKind::Explain),
    ("from", TokenKind::From),
    ("row", TokenKind::Row),
    ("stats", TokenKind::Stats),
    ("where", TokenKind::Where),
    ("sort", TokenKind::Sort),
    ("limit", TokenKind::Limit),
    ("project", TokenKind::Project),
];

const EXPRESSION_KEYWORDS: [(&str, TokenKind); 12] = [
    ("by", TokenKind::By),
    ("and", TokenKind::And),
    ("asc", TokenKind::Asc),
    ("desc", TokenKind::Desc),
    ("false", TokenKind::False),
    ("first", TokenKind::First),
    ("last", TokenKind::Last),
    ("not", TokenKind::Not),
    ("null", TokenKind::Null),
    ("nulls", TokenKind::Nulls),
    ("or", TokenKind::Or),
    ("true", TokenKind::True),
];

fn lookup(table: &[(&str, TokenKind)], word: &str) -> Option<TokenKind> {
    table
        .iter()
        .find(|(keyword, _)| keyword.eq_ignore_ascii_case(word))
        .map(|(_, kind)| *kind)
}

/// Command keyword for `word`, ignoring case
pub(crate) fn command_keyword(word: &str) -> Option<TokenKind> {
    lookup(&COMMAND_KEYWORDS, word)
}

/// Expression keyword for `word`, ignoring case
pub(crate) fn expression_keyword(word: &str) -> Option<TokenKind> {
    lookup(&EXPRESSION_KEYWORDS, word)
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), take_till(|c| c == '\n' || c == '\r'))).parse(input)
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize((tag("/*"), take_until("*/"), tag("*/"))).parse(input)
}

/// Whitespace and comments between tokens (possibly empty)
pub(crate) fn trivia(input: &str) -> IResult<&str, &str> {
    recognize(many0_count(alt((multispace1, line_comment, block_comment)))).parse(input)
}

fn triple_quoted(input: &str) -> IResult<&str, &str> {
    recognize((tag("\"\"\""), take_until("\"\"\""), tag("\"\"\""))).parse(input)
}

fn double_quoted(input: &str) -> IResult<&str, &str> {
    recognize((
        char('"'),
        many0_count(alt((
            recognize(pair(char('\\'), anychar)),
            is_not("\\\"\r\n"),
        ))),
        char('"'),
    ))
    .parse(input)
}

/// Double-quoted string, or a triple-quoted one that may span lines
pub(crate) fn string_literal(input: &str) -> IResult<&str, &str> {
    alt((triple_quoted, double_quoted)).parse(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize((one_of("eE"), opt(one_of("+-")), digit1)).parse(input)
}

fn decimal(input: &str) -> IResult<&str, &str> {
    alt((
        recognize((digit1, char('.'), opt(digit1), opt(exponent))),
        recognize(pair(digit1, exponent)),
    ))
    .parse(input)
}

/// Integer or decimal literal
pub(crate) fn number(input: &str) -> IResult<&str, (TokenKind, &str)> {
    alt((
        map(decimal, |text| (TokenKind::DecimalLiteral, text)),
        map(digit1, |text| (TokenKind::IntegerLiteral, text)),
    ))
    .parse(input)
}

/// Bare identifier: a letter, `_` or `@` followed by letters, digits or `_`
pub(crate) fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_' || c == '@'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))
    .parse(input)
}

/// Backtick-quoted identifier, with a doubled backtick as the escape
pub(crate) fn quoted_identifier(input: &str) -> IResult<&str, &str> {
    recognize((
        char('`'),
        many0_count(alt((tag("``"), is_not("`")))),
        char('`'),
    ))
    .parse(input)
}

/// Operators and punctuation valid inside expressions, longest match first
pub(crate) fn operator(input: &str) -> IResult<&str, (TokenKind, &str)> {
    let (rest, kind) = alt((
        value(TokenKind::Eq, tag("==")),
        value(TokenKind::Neq, tag("!=")),
        value(TokenKind::Lte, tag("<=")),
        value(TokenKind::Gte, tag(">=")),
        value(TokenKind::Lt, tag("<")),
        value(TokenKind::Gt, tag(">")),
        value(TokenKind::Assign, tag("=")),
        value(TokenKind::Plus, tag("+")),
        value(TokenKind::Minus, tag("-")),
        value(TokenKind::Asterisk, tag("*")),
        value(TokenKind::Slash, tag("/")),
        value(TokenKind::Percent, tag("%")),
        value(TokenKind::Lp, tag("(")),
        value(TokenKind::Rp, tag(")")),
        value(TokenKind::Comma, tag(",")),
        value(TokenKind::Dot, tag(".")),
        value(TokenKind::OpeningBracket, tag("[")),
        value(TokenKind::ClosingBracket, tag("]")),
        value(TokenKind::Pipe, tag("|")),
    ))
    .parse(input)?;
    Ok((rest, (kind, &input[..input.len() - rest.len()])))
}

/// Punctuation valid inside a source list
pub(crate) fn source_punctuation(input: &str) -> IResult<&str, (TokenKind, &str)> {
    let (rest, kind) = alt((
        value(TokenKind::Comma, tag(",")),
        value(TokenKind::Assign, tag("=")),
        value(TokenKind::Pipe, tag("|")),
        value(TokenKind::OpeningBracket, tag("[")),
        value(TokenKind::ClosingBracket, tag("]")),
    ))
    .parse(input)?;
    Ok((rest, (kind, &input[..input.len() - rest.len()])))
}

/// Punctuation valid in command position
pub(crate) fn command_punctuation(input: &str) -> IResult<&str, (TokenKind, &str)> {
    let (rest, kind) = alt((
        value(TokenKind::Pipe, tag("|")),
        value(TokenKind::OpeningBracket, tag("[")),
        value(TokenKind::ClosingBracket, tag("]")),
    ))
    .parse(input)?;
    Ok((rest, (kind, &input[..input.len() - rest.len()])))
}

/// Unquoted source name such as `logs-*` or `metrics.2024`
pub(crate) fn source_identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| {
        !c.is_whitespace() && !matches!(c, '=' | '`' | '|' | ',' | '[' | ']' | '/')
    })
    .parse(input)
}

/// A word in command position
pub(crate) fn command_word(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !matches!(c, '[' | ']' | '/' | '|'))
        .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivia_skips_comments() {
        let (rest, skipped) = trivia("  // note\n /* block */ limit").unwrap();
        assert_eq!(rest, "limit");
        assert_eq!(skipped, "  // note\n /* block */ ");
        assert_eq!(trivia("limit").unwrap(), ("limit", ""));
    }

    #[test]
    fn test_string_literal() {
        assert_eq!(string_literal(r#""a\"b" rest"#).unwrap(), (" rest", r#""a\"b""#));
        assert_eq!(string_literal(r#""""x"y""" rest"#).unwrap().1, r#""""x"y""""#);
        assert!(string_literal("\"open").is_err());
        assert!(string_literal("\"line\nbreak\"").is_err());
    }

    #[test]
    fn test_numbers() {
        assert_eq!(number("42 ").unwrap(), (" ", (TokenKind::IntegerLiteral, "42")));
        assert_eq!(number("4.5)").unwrap(), (")", (TokenKind::DecimalLiteral, "4.5")));
        assert_eq!(number("1e10").unwrap().1, (TokenKind::DecimalLiteral, "1e10"));
        assert_eq!(number("2.5E-3").unwrap().1, (TokenKind::DecimalLiteral, "2.5E-3"));
    }

    #[test]
    fn test_decimal_at_end_of_input() {
        assert_eq!(number("3.5").unwrap(), ("", (TokenKind::DecimalLiteral, "3.5")));
        assert_eq!(number("3.").unwrap(), ("", (TokenKind::DecimalLiteral, "3.")));
        assert_eq!(number("12.25e3").unwrap(), ("", (TokenKind::DecimalLiteral, "12.25e3")));
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(identifier("@timestamp ").unwrap().1, "@timestamp");
        assert_eq!(identifier("_id.x").unwrap(), (".x", "_id"));
        assert!(identifier("1abc").is_err());
        assert_eq!(quoted_identifier("`a``b` x").unwrap().1, "`a``b`");
    }

    #[test]
    fn test_operator_longest_match() {
        assert_eq!(operator("==1").unwrap().1, (TokenKind::Eq, "=="));
        assert_eq!(operator("=1").unwrap().1, (TokenKind::Assign, "="));
        assert_eq!(operator("<=").unwrap().1, (TokenKind::Lte, "<="));
        assert!(operator("#").is_err());
    }

    #[test]
    fn test_source_identifier() {
        assert_eq!(source_identifier("logs-*, other").unwrap(), (", other", "logs-*"));
        assert_eq!(source_identifier("a=b").unwrap(), ("=b", "a"));
    }

    #[test]
    fn test_keywords_ignore_case() {
        assert_eq!(command_keyword("FROM"), Some(TokenKind::From));
        assert_eq!(command_keyword("frobnicate"), None);
        assert_eq!(expression_keyword("Nulls"), Some(TokenKind::Nulls));
        assert_eq!(expression_keyword("nullsx"), None);
    }
}
