//! Error types for project creation.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Result type alias for gpc operations.
pub type GpcResult<T> = Result<T, GpcError>;

/// Errors that can occur while creating a project.
#[derive(Error, Debug)]
pub enum GpcError {
    #[error("no template source provided")]
    NoTemplateSource,

    #[error("multiple template sources provided: {0}")]
    MultipleTemplateSources(String),

    #[error("directory already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("template directory does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("{program} exited with {status}")]
    CommandFailed { program: String, status: ExitStatus },

    #[error("failed to run {program}: {source}")]
    CommandSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("download failed: {0}")]
    Transfer(String),

    #[error("unsupported file type: {content_type}{hint}")]
    UnsupportedFileType { content_type: String, hint: String },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid template config {}: {message}", .path.display())]
    InvalidConfig { path: PathBuf, message: String },

    #[error("invalid template pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("template parse error in {file}: {message}")]
    TemplateParse { file: String, message: String },

    #[error("template render error in {file}: {message}")]
    TemplateRender { file: String, message: String },

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
