//! Error types for vtkcrate

use thiserror::Error;

/// Main error type for vtkcrate operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No input file has been parsed yet: {0}")]
    MissingInput(String),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Point table has {actual} rows but the source mesh has {expected} points")]
    PointCountMismatch { expected: usize, actual: usize },

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Visualization error: {0}")]
    Visualization(String),

    #[error("GPU error: {0}")]
    Gpu(String),
}

impl Error {
    /// Build a parse error for the given 1-based line
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse { line, message: message.into() }
    }
}

/// Result type alias for vtkcrate operations
pub type Result<T> = std::result::Result<T, Error>;
