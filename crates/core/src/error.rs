use thiserror::Error;
use weft_node::NodeError;
use weft_resolver::ResolveError;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Flow parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Navigation error: {0}")]
    Navigation(String),

    #[error("View '{0}' not found in flow")]
    MissingView(String),

    #[error("No view is currently loaded")]
    NoCurrentView,

    #[error("Content decode error: {0}")]
    Node(#[from] NodeError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}
