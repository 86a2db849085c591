use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    #[error("Content decode error: {0}")]
    Decode(String),

    #[error("AST hook '{name}' failed: {message}")]
    Hook { name: String, message: String },
}
