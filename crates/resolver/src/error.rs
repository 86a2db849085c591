//! Resolution errors with asset breadcrumbs.
//!
//! A failure inside a subtree is wrapped with the `(id, type)` identity of
//! each ancestor asset as it bubbles out, so the surfaced message reads as a
//! path from the view root down to the failing node. The innermost message
//! is always preserved verbatim.
use itertools::Itertools;
use thiserror::Error;
use weft_data::EvalError;
use weft_node::NodeError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveErrorKind {
    #[error("Evaluation failed: {0}")]
    Eval(#[from] EvalError),

    #[error("Tap '{name}' failed: {message}")]
    Tap { name: String, message: String },

    #[error("Content decode failed: {0}")]
    Node(#[from] NodeError),
}

/// One ancestor asset on the way to the failing node.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetFrame {
    pub id: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    /// Ancestor frames, innermost first (pushed as the error unwinds).
    pub path: Vec<AssetFrame>,
}

impl ResolveError {
    pub fn tap(name: impl Into<String>, message: impl Into<String>) -> Self {
        ResolveError {
            kind: ResolveErrorKind::Tap {
                name: name.into(),
                message: message.into(),
            },
            path: Vec::new(),
        }
    }

    /// Records the enclosing asset as the error bubbles out of its subtree.
    pub fn with_frame(mut self, id: &str, kind: &str) -> Self {
        self.path.push(AssetFrame {
            id: id.to_string(),
            kind: kind.to_string(),
        });
        self
    }
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.path.is_empty() {
            // Frames were collected innermost-first; render root-first.
            let breadcrumb = self
                .path
                .iter()
                .rev()
                .map(|frame| format!("({}, {})", frame.id, frame.kind))
                .join(" -> ");
            write!(f, ", found in {}", breadcrumb)?;
        }
        Ok(())
    }
}

impl std::error::Error for ResolveError {}

impl<E> From<E> for ResolveError
where
    ResolveErrorKind: From<E>,
{
    fn from(err: E) -> Self {
        ResolveError {
            kind: ResolveErrorKind::from(err),
            path: Vec::new(),
        }
    }
}
