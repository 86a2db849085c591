use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Expression parse error in '{0}': {1}")]
    Parse(String, String),

    #[error("Binding error: {0}")]
    Binding(#[from] weft_binding::BindingError),

    #[error("Type error: {0}")]
    Type(String),
}
