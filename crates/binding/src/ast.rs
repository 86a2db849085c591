//! Defines the Abstract Syntax Tree (AST) for binding expressions.
use serde::{Deserialize, Serialize};

/// A literal segment value. The parsers only ever emit strings; numbers and
/// booleans can arrive through the untagged deserialization of a stored
/// path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl Literal {
    /// The segment as a model key, if it is string-representable.
    pub fn as_key(&self) -> String {
        match self {
            Literal::Str(s) => s.clone(),
            Literal::Num(n) => n.to_string(),
            Literal::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Str(s.to_string())
    }
}

/// One segment of a binding path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnyNode {
    /// A literal segment, like `foo` in `foo.bar`.
    Value(Literal),
    /// A raw expression embedded in the binding (backtick-delimited),
    /// evaluated at read time rather than statically.
    Expression(String),
    /// A nested binding reference (`{{ }}`-delimited), resolved against the
    /// model and spliced into the parent path.
    Path(Vec<AnyNode>),
    /// A bracket filter segment (`[key=value]`) selecting an array element
    /// by predicate rather than index.
    Query {
        key: Box<AnyNode>,
        value: Option<Box<AnyNode>>,
    },
    /// Multiple sub-segments fused into one path segment (`{{foo}}_bar`).
    Concatenated(Vec<AnyNode>),
}

impl AnyNode {
    pub fn key(s: impl Into<String>) -> Self {
        AnyNode::Value(Literal::Str(s.into()))
    }
}

/// The root of a successfully parsed binding: an ordered list of segments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathNode {
    pub path: Vec<AnyNode>,
}

impl PathNode {
    pub fn new(path: Vec<AnyNode>) -> Self {
        PathNode { path }
    }

    /// Builds a path of plain key segments, for programmatic construction.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PathNode {
            path: keys.into_iter().map(AnyNode::key).collect(),
        }
    }
}

/// Collapses a list of concatenable parts into a single segment: exactly one
/// part stays bare, two or more wrap in `Concatenated`.
pub fn to_concatenated_node(mut parts: Vec<AnyNode>) -> AnyNode {
    if parts.len() == 1 {
        parts.remove(0)
    } else {
        AnyNode::Concatenated(parts)
    }
}
