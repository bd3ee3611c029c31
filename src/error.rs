use std::path::PathBuf;

use thiserror::Error;

use crate::analyzers::types::AnalysisKind;

/// Failures surfaced by the loading, analysis and export stages.
///
/// Only [`AnalysisError::MissingFile`] and [`AnalysisError::Parse`] abort a run;
/// the rest are recovered where they happen.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{analysis}: column {column} not available")]
    MissingColumn {
        analysis: AnalysisKind,
        column: String,
    },

    #[error("{analysis}: column {column} has no usable values")]
    NoData {
        analysis: AnalysisKind,
        column: String,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl AnalysisError {
    pub fn missing_column(analysis: AnalysisKind, column: &str) -> Self {
        AnalysisError::MissingColumn {
            analysis,
            column: column.to_string(),
        }
    }

    pub fn no_data(analysis: AnalysisKind, column: &str) -> Self {
        AnalysisError::NoData {
            analysis,
            column: column.to_string(),
        }
    }

    /// Whether the error should stop the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AnalysisError::MissingFile(_) | AnalysisError::Parse { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
