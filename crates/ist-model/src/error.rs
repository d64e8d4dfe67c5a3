use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown source field: {0}")]
    UnknownSourceField(String),
    #[error("unknown output field: {0}")]
    UnknownOutputField(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
