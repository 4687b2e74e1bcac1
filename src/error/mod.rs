//! Error types and handling infrastructure for tree conversion

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::conversion::ConversionReport;

/// Pipeline stage at which a single file failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// The walker could not read this entry
    Walk,
    /// The destination path could not be derived
    Mapping,
    /// The destination directory could not be created
    Mkdir,
    /// The external converter failed
    Convert,
    /// The converted bytes could not be written
    Write,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Walk => "walk",
            Stage::Mapping => "mapping",
            Stage::Mkdir => "mkdir",
            Stage::Convert => "convert",
            Stage::Write => "write",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-file failure. Recorded, never fatal to the walk.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed for {}: {source:#}", path.display())]
pub struct ConversionError {
    pub path: PathBuf,
    pub stage: Stage,
    #[source]
    pub source: anyhow::Error,
}

impl ConversionError {
    pub fn new(path: impl Into<PathBuf>, stage: Stage, source: impl Into<anyhow::Error>) -> Self {
        Self {
            path: path.into(),
            stage,
            source: source.into(),
        }
    }

    pub fn walk(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        Self::new(path, Stage::Walk, source)
    }

    pub fn mapping(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        Self::new(path, Stage::Mapping, source)
    }

    pub fn mkdir(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        Self::new(path, Stage::Mkdir, source)
    }

    pub fn convert(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        Self::new(path, Stage::Convert, source)
    }

    pub fn write(path: impl Into<PathBuf>, source: impl Into<anyhow::Error>) -> Self {
        Self::new(path, Stage::Write, source)
    }
}

/// Serializable view of a [`ConversionError`] for JSON reports
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    pub path: PathBuf,
    pub stage: Stage,
    pub message: String,
}

impl From<&ConversionError> for ErrorRecord {
    fn from(error: &ConversionError) -> Self {
        Self {
            path: error.path.clone(),
            stage: error.stage,
            message: format!("{:#}", error.source),
        }
    }
}

/// Failures of a whole conversion run
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("Cannot enumerate source tree {}: {source}", path.display())]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Had {} errors", report.error_count())]
    PartialFailure { report: Box<ConversionReport> },
}

impl TreeError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn enumeration(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Enumeration {
            path: path.into(),
            source,
        }
    }

    /// Number of per-file errors, zero for fatal failures
    pub fn error_count(&self) -> usize {
        match self {
            Self::PartialFailure { report } => report.error_count(),
            _ => 0,
        }
    }

    /// The report of a partially failed run
    pub fn report(&self) -> Option<&ConversionReport> {
        match self {
            Self::PartialFailure { report } => Some(report.as_ref()),
            _ => None,
        }
    }

    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration { message } => format!("Invalid configuration: {}", message),
            Self::Enumeration { path, source } => match source.kind() {
                std::io::ErrorKind::NotFound => {
                    format!("Source path does not exist: {}", path.display())
                }
                std::io::ErrorKind::PermissionDenied => {
                    format!("Permission denied reading source: {}", path.display())
                }
                _ => self.to_string(),
            },
            Self::PartialFailure { report } => {
                let mut message = format!("Had {} errors", report.error_count());
                for error in &report.errors {
                    message.push_str(&format!(
                        "\n  [{}] {}: {:#}",
                        error.stage,
                        error.path.display(),
                        error.source
                    ));
                }
                message
            }
        }
    }
}

/// Result type for whole-run operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Result type for a single file passing through the pipeline
pub type FileResult<T> = Result<T, ConversionError>;
