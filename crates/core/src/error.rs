//! Error types for the mietkarte analysis library.

use thiserror::Error;

/// Primary error type for table parsing and effect post-processing.
#[derive(Error, Debug)]
pub enum MietkarteError {
    /// A row does not have the shape the table layout requires.
    #[error("format error at line {line}: {msg}")]
    FormatError { line: usize, msg: String },

    /// A field could not be interpreted, or a name collides after renaming.
    #[error("parse error at line {line}: {msg}")]
    ParseError { line: usize, msg: String },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("unknown zip code: {0}")]
    UnknownZip(String),

    #[error("GeoJSON error: {0}")]
    GeoJson(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type alias for MietkarteError.
pub type Result<T> = std::result::Result<T, MietkarteError>;
