//! A `nom`-based parser for the binding expression grammar.
//!
//! Grammar (informal):
//! ```text
//! path        := segmentAndBrackets ('.' segmentAndBrackets)*
//! segmentAndBrackets := segment bracket*
//! segment     := (identifier | nestedPath | nestedExpression)+
//! identifier  := [\w\-@]+
//! nestedPath  := '{{' WS? path WS? '}}'
//! nestedExpression := '`' [^`]* '`'
//! bracket     := '[' WS? (query | optionallyQuotedSegment) WS? ']'
//! query       := optionallyQuotedSegment '='{1,3} optionallyQuotedSegment
//! optionallyQuotedSegment := '"'[^"]*'"' | "'"[^']*"'" | segment
//! ```
use super::ast::{AnyNode, Literal, PathNode, to_concatenated_node};
use crate::error::BindingError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, verify},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair},
};

// --- Main Public Parser ---

pub fn parse(raw: &str) -> Result<PathNode, BindingError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(BindingError::Empty);
    }
    match path(input) {
        Ok(("", segments)) => Ok(PathNode::new(segments)),
        Ok((rem, _)) => Err(BindingError::Parse(
            raw.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(BindingError::Parse(raw.to_string(), e.to_string())),
    }
}

// --- Path Parsers ---

fn path(input: &str) -> IResult<&str, Vec<AnyNode>> {
    map(
        separated_list1(char('.'), segment_and_brackets),
        |groups| groups.into_iter().flatten().collect(),
    )
    .parse(input)
}

fn segment_and_brackets(input: &str) -> IResult<&str, Vec<AnyNode>> {
    map(pair(segment, many0(bracket)), |(seg, brackets)| {
        let mut out = vec![seg];
        out.extend(brackets);
        out
    })
    .parse(input)
}

fn segment(input: &str) -> IResult<&str, AnyNode> {
    map(many1(segment_part), to_concatenated_node).parse(input)
}

fn segment_part(input: &str) -> IResult<&str, AnyNode> {
    alt((identifier, nested_path, nested_expression)).parse(input)
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '@'
}

fn identifier(input: &str) -> IResult<&str, AnyNode> {
    map(take_while1(is_identifier_char), |s: &str| {
        AnyNode::Value(Literal::Str(s.to_string()))
    })
    .parse(input)
}

fn nested_path(input: &str) -> IResult<&str, AnyNode> {
    map(
        delimited(
            pair(tag("{{"), multispace0),
            path,
            pair(multispace0, tag("}}")),
        ),
        AnyNode::Path,
    )
    .parse(input)
}

fn nested_expression(input: &str) -> IResult<&str, AnyNode> {
    map(
        delimited(char('`'), take_while(|c| c != '`'), char('`')),
        |s: &str| AnyNode::Expression(s.to_string()),
    )
    .parse(input)
}

// --- Bracket Parsers ---

fn bracket(input: &str) -> IResult<&str, AnyNode> {
    delimited(
        pair(char('['), multispace0),
        alt((query, optionally_quoted_segment)),
        pair(multispace0, char(']')),
    )
    .parse(input)
}

/// `=`, `==` and `===` are accepted as sugar for the same equality check; the
/// AST records no distinction between them.
fn equals_run(input: &str) -> IResult<&str, &str> {
    verify(take_while1(|c| c == '='), |s: &str| s.len() <= 3).parse(input)
}

fn query(input: &str) -> IResult<&str, AnyNode> {
    map(
        (optionally_quoted_segment, equals_run, optionally_quoted_segment),
        |(key, _, value)| AnyNode::Query {
            key: Box::new(key),
            value: Some(Box::new(value)),
        },
    )
    .parse(input)
}

fn optionally_quoted_segment(input: &str) -> IResult<&str, AnyNode> {
    alt((quoted, segment)).parse(input)
}

fn quoted(input: &str) -> IResult<&str, AnyNode> {
    map(
        alt((
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
        )),
        |s: &str| AnyNode::Value(Literal::Str(s.to_string())),
    )
    .parse(input)
}
