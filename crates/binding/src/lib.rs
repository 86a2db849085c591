//! The binding expression grammar and its parsers.
//!
//! A binding is a textual reference into the data model, like `foo.bar`,
//! `foo.{{bar}}.baz` or `foo[key=value]`. This crate turns binding strings
//! into [`PathNode`] ASTs. The grammar is implemented twice, by two
//! independent strategies, to guard against divergence: a `nom` combinator
//! parser and a hand-rolled recursive-descent parser. [`parse`] is the
//! combinator implementation; both are exported and covered by a shared
//! corpus test.

pub mod ast;
pub mod descent;
pub mod error;
pub mod parser;

// --- Public API ---
pub use ast::{AnyNode, Literal, PathNode, to_concatenated_node};
pub use error::BindingError;
pub use parser::parse;

/// True if a raw string contains binding syntax worth parsing.
pub fn contains_binding(raw: &str) -> bool {
    raw.contains("{{")
}

/// Given text immediately following a `{{` opener, the byte offset of the
/// `}}` that closes it. Nested `{{ }}` pairs are skipped, so the extent of
/// a binding like `foo.{{key}}` is found whole. `None` if unterminated.
pub fn closing_brace_offset(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i + 1 < bytes.len() {
        match &bytes[i..i + 2] {
            b"{{" => {
                depth += 1;
                i += 2;
            }
            b"}}" => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bindings every conforming parser must accept.
    const VALID: &[&str] = &[
        "foo",
        "foo.bar",
        "foo.bar.baz",
        "foo-bar@2",
        "_private",
        "{{foo.bar}}",
        "{{ foo.bar }}",
        "foo.{{bar}}.baz",
        "{{foo}}_bar",
        "pre_{{foo}}_post",
        "`1 + 1`",
        "foo.`index`.bar",
        "a[x]",
        "a[0]",
        "a[x=y]",
        "a[x==y]",
        "a[x===y]",
        "a[ x=y ]",
        "a[\"key with spaces\"='quoted value']",
        "a['x'=y]",
        "a[{{b.c}}=d]",
        "a[x][y]",
        "a[x=y].b",
        "a[x=y][z=w].b[0]",
    ];

    /// Strings every conforming parser must reject with a non-empty error.
    const INVALID: &[&str] = &[
        "",
        "   ",
        ".",
        "foo.",
        ".foo",
        "foo..bar",
        "{{foo",
        "{{foo}",
        "foo}}",
        "{{}}",
        "`unterminated",
        "'quoted-at-top-level'",
        "a[]",
        "a[=b]",
        "a[b=]",
        "a[b====c]",
        "a[b",
        "a[x = y]",
        "foo bar",
    ];

    #[test]
    fn valid_corpus_accepted() {
        for s in VALID {
            let result = parser::parse(s);
            assert!(result.is_ok(), "combinator rejected '{}': {:?}", s, result);
        }
    }

    #[test]
    fn invalid_corpus_rejected() {
        for s in INVALID {
            let result = parser::parse(s);
            assert!(result.is_err(), "combinator accepted '{}': {:?}", s, result);
            let msg = result.unwrap_err().to_string();
            assert!(!msg.is_empty(), "empty error message for '{}'", s);
        }
    }

    #[test]
    fn parsers_agree_on_valid_corpus() {
        for s in VALID {
            let a = parser::parse(s).unwrap();
            let b = descent::parse(s).unwrap();
            assert_eq!(a, b, "parsers diverge on '{}'", s);
        }
    }

    #[test]
    fn parsers_agree_on_invalid_corpus() {
        for s in INVALID {
            let a = parser::parse(s);
            let b = descent::parse(s);
            assert!(
                a.is_err() && b.is_err(),
                "parsers diverge on '{}': combinator={:?} descent={:?}",
                s,
                a,
                b
            );
        }
    }

    #[test]
    fn simple_path_structure() {
        let parsed = parse("foo.bar").unwrap();
        assert_eq!(
            parsed,
            PathNode::new(vec![AnyNode::key("foo"), AnyNode::key("bar")])
        );
    }

    #[test]
    fn nested_path_segment() {
        let parsed = parse("foo.{{bar}}.baz").unwrap();
        assert_eq!(
            parsed.path[1],
            AnyNode::Path(vec![AnyNode::key("bar")])
        );
    }

    #[test]
    fn whole_binding_is_single_nested_path() {
        let parsed = parse("{{foo.bar}}").unwrap();
        assert_eq!(
            parsed,
            PathNode::new(vec![AnyNode::Path(vec![
                AnyNode::key("foo"),
                AnyNode::key("bar"),
            ])])
        );
    }

    #[test]
    fn concatenated_segment() {
        let parsed = parse("{{foo}}_bar").unwrap();
        assert_eq!(
            parsed.path[0],
            AnyNode::Concatenated(vec![
                AnyNode::Path(vec![AnyNode::key("foo")]),
                AnyNode::key("_bar"),
            ])
        );
    }

    #[test]
    fn single_element_segment_not_wrapped() {
        let parsed = parse("foo").unwrap();
        assert_eq!(parsed.path, vec![AnyNode::key("foo")]);
    }

    #[test]
    fn query_bracket() {
        let parsed = parse("a[x=y]").unwrap();
        assert_eq!(
            parsed.path[1],
            AnyNode::Query {
                key: Box::new(AnyNode::key("x")),
                value: Some(Box::new(AnyNode::key("y"))),
            }
        );
    }

    #[test]
    fn equals_arity_is_normalized() {
        let one = parse("a[x=y]").unwrap();
        let two = parse("a[x==y]").unwrap();
        let three = parse("a[x===y]").unwrap();
        assert_eq!(one, two);
        assert_eq!(two, three);
    }

    #[test]
    fn quoted_bracket_contents_are_literal() {
        let parsed = parse("a[\"b.c\"]").unwrap();
        assert_eq!(parsed.path[1], AnyNode::key("b.c"));
    }

    #[test]
    fn numeric_identifiers_stay_strings() {
        let parsed = parse("a.0.b").unwrap();
        assert_eq!(parsed.path[1], AnyNode::key("0"));
    }

    #[test]
    fn chained_brackets() {
        let parsed = parse("a[x][y]").unwrap();
        assert_eq!(parsed.path.len(), 3);
        assert_eq!(parsed.path[2], AnyNode::key("y"));
    }

    #[test]
    fn nested_expression_segment() {
        let parsed = parse("foo.`a + b`").unwrap();
        assert_eq!(parsed.path[1], AnyNode::Expression("a + b".to_string()));
    }

    #[test]
    fn empty_binding_error() {
        assert_eq!(parse(""), Err(BindingError::Empty));
        assert_eq!(descent::parse("  "), Err(BindingError::Empty));
    }

    #[test]
    fn closing_brace_offset_skips_nested_pairs() {
        assert_eq!(closing_brace_offset("foo.bar}}"), Some(7));
        assert_eq!(closing_brace_offset("foo.{{key}}}}"), Some(11));
        assert_eq!(closing_brace_offset("foo.{{a.{{b}}}}}}"), Some(15));
        assert_eq!(closing_brace_offset("}} tail"), Some(0));
    }

    #[test]
    fn closing_brace_offset_unterminated_is_none() {
        assert_eq!(closing_brace_offset("foo.bar"), None);
        assert_eq!(closing_brace_offset("foo.{{key}}"), None);
    }
}
