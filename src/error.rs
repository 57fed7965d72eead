use thiserror::Error;

/// Main error type for docshift operations
#[derive(Error, Debug)]
pub enum DocshiftError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0} is not a supported docstring style")]
    UnsupportedStyle(String),

    #[error("Malformed docstring: {0}")]
    MalformedDocstring(String),

    #[error("Invalid element: {0}")]
    InvalidElement(String),

    #[error("Parser error: {0}")]
    Parser(String),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DocshiftError>;
