//! A hand-rolled recursive-descent parser for the binding grammar.
//!
//! This is a deliberately independent second implementation of the grammar in
//! [`crate::parser`]: both must accept the same inputs and produce
//! structurally identical ASTs, which the shared test corpus enforces. Keep
//! the two in sync when the grammar changes.
use super::ast::{AnyNode, Literal, PathNode, to_concatenated_node};
use crate::error::BindingError;
use crate::parser::is_identifier_char;

pub fn parse(raw: &str) -> Result<PathNode, BindingError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(BindingError::Empty);
    }
    let mut cur = Cursor { input, pos: 0 };
    match parse_path(&mut cur) {
        Some(segments) if cur.eof() => Ok(PathNode::new(segments)),
        Some(_) => Err(BindingError::Parse(
            raw.to_string(),
            format!(
                "Parser did not consume all input. Remainder: '{}'",
                cur.rest()
            ),
        )),
        None => Err(BindingError::Parse(
            raw.to_string(),
            format!("unexpected input at '{}'", cur.rest()),
        )),
    }
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Consume `s` if the remaining input starts with it.
    fn consume(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consume the longest run of chars satisfying `pred` (possibly empty).
    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|(_, c)| !pred(*c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += end;
        &rest[..end]
    }

    /// Like `take_while`, but fails on an empty match.
    fn take_while1(&mut self, pred: impl Fn(char) -> bool) -> Option<&'a str> {
        let taken = self.take_while(pred);
        if taken.is_empty() { None } else { Some(taken) }
    }

    fn skip_ws(&mut self) {
        self.take_while(char::is_whitespace);
    }
}

fn parse_path(cur: &mut Cursor) -> Option<Vec<AnyNode>> {
    let mut out = parse_segment_and_brackets(cur)?;
    loop {
        let save = cur.pos;
        if !cur.consume(".") {
            break;
        }
        match parse_segment_and_brackets(cur) {
            Some(more) => out.extend(more),
            None => {
                // Dangling separator: leave it unconsumed for the caller.
                cur.pos = save;
                break;
            }
        }
    }
    Some(out)
}

fn parse_segment_and_brackets(cur: &mut Cursor) -> Option<Vec<AnyNode>> {
    let seg = parse_segment(cur)?;
    let mut out = vec![seg];
    while let Some(bracket) = parse_bracket(cur) {
        out.push(bracket);
    }
    Some(out)
}

fn parse_segment(cur: &mut Cursor) -> Option<AnyNode> {
    let mut parts = Vec::new();
    loop {
        if let Some(id) = cur.take_while1(is_identifier_char) {
            parts.push(AnyNode::Value(Literal::Str(id.to_string())));
            continue;
        }
        if cur.rest().starts_with("{{") {
            if let Some(path) = parse_nested_path(cur) {
                parts.push(path);
                continue;
            }
        }
        if cur.rest().starts_with('`') {
            if let Some(expr) = parse_nested_expression(cur) {
                parts.push(expr);
                continue;
            }
        }
        break;
    }
    if parts.is_empty() {
        None
    } else {
        Some(to_concatenated_node(parts))
    }
}

fn parse_nested_path(cur: &mut Cursor) -> Option<AnyNode> {
    let save = cur.pos;
    if !cur.consume("{{") {
        return None;
    }
    cur.skip_ws();
    if let Some(path) = parse_path(cur) {
        cur.skip_ws();
        if cur.consume("}}") {
            return Some(AnyNode::Path(path));
        }
    }
    cur.pos = save;
    None
}

fn parse_nested_expression(cur: &mut Cursor) -> Option<AnyNode> {
    let save = cur.pos;
    if !cur.consume("`") {
        return None;
    }
    let body = cur.take_while(|c| c != '`');
    if cur.consume("`") {
        return Some(AnyNode::Expression(body.to_string()));
    }
    cur.pos = save;
    None
}

fn parse_bracket(cur: &mut Cursor) -> Option<AnyNode> {
    let save = cur.pos;
    if !cur.consume("[") {
        return None;
    }
    cur.skip_ws();
    if let Some(node) = parse_query_or_segment(cur) {
        cur.skip_ws();
        if cur.consume("]") {
            return Some(node);
        }
    }
    cur.pos = save;
    None
}

fn parse_query_or_segment(cur: &mut Cursor) -> Option<AnyNode> {
    let key = parse_optionally_quoted_segment(cur)?;
    let save = cur.pos;
    let equals = cur.take_while(|c| c == '=');
    if !equals.is_empty() && equals.len() <= 3 {
        if let Some(value) = parse_optionally_quoted_segment(cur) {
            return Some(AnyNode::Query {
                key: Box::new(key),
                value: Some(Box::new(value)),
            });
        }
    }
    // Not a query; fall back to the bare segment form.
    cur.pos = save;
    Some(key)
}

fn parse_optionally_quoted_segment(cur: &mut Cursor) -> Option<AnyNode> {
    for quote in ['"', '\''] {
        let save = cur.pos;
        if cur.consume(&quote.to_string()) {
            let body = cur.take_while(|c| c != quote);
            if cur.consume(&quote.to_string()) {
                return Some(AnyNode::Value(Literal::Str(body.to_string())));
            }
            cur.pos = save;
            return None;
        }
    }
    parse_segment(cur)
}
