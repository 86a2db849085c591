use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    #[error("Binding parse error: empty binding")]
    Empty,

    #[error("Binding parse error in '{0}': {1}")]
    Parse(String, String),
}
