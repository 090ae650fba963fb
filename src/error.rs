use std::fmt;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

use crate::schema::CanonicalColumn;

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to parse {kind} data: {reason}")]
    Parse { kind: &'static str, reason: String },

    #[error(transparent)]
    SchemaValidation(#[from] SchemaValidationError),

    #[error("table does not have the canonical layout: {0}")]
    InvalidTable(String),

    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("parquet error: {0}")]
    Parquet(#[from] ParquetError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DashboardError {
    pub(crate) fn parse(kind: &'static str, reason: impl fmt::Display) -> Self {
        DashboardError::Parse {
            kind,
            reason: reason.to_string(),
        }
    }
}

/// Required canonical columns that no source column could be mapped onto.
/// Terminal for the session: the list is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaValidationError {
    pub missing: Vec<CanonicalColumn>,
}

impl fmt::Display for SchemaValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.missing.iter().map(|c| c.name()).collect();
        write!(f, "missing required columns: {}", names.join(", "))
    }
}

impl std::error::Error for SchemaValidationError {}
