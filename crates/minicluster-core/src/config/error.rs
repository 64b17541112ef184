//! # minicluster Configuration Errors
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error while reading configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported configuration format for path: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to parse {format} configuration: {message}")]
    Parse { format: String, message: String },

    #[error("Malformed line {line} in properties configuration: '{content}'")]
    MalformedLine { line: usize, content: String },

    #[error("Invalid artifact '{value}' under key '{key}': {reason}")]
    InvalidArtifact {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid override '{0}', expected 'IDENTITY:key=value'")]
    InvalidOverride(String),
}
