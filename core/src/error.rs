use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Schema error: required column '{column}' is missing")]
    Schema { column: String },

    #[error("Schema error: column '{column}' appears more than once")]
    DuplicateColumn { column: String },

    #[error("Column '{column}' has {actual} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Parse error at row {row}, field '{field}': cannot interpret {value:?}")]
    Parse {
        row: usize,
        field: String,
        value: String,
    },

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Coarse classification used by callers deciding how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Schema,
    Parse,
    Scoring,
    Io,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Schema { .. } | Self::DuplicateColumn { .. } | Self::LengthMismatch { .. } => {
                ErrorKind::Schema
            }
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Scoring(_) => ErrorKind::Scoring,
            Self::Csv(_) | Self::Io(_) | Self::Serialization(_) | Self::Other(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn parse(row: usize, field: &str, value: impl Into<String>) -> Self {
        Self::Parse {
            row,
            field: field.to_string(),
            value: value.into(),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
