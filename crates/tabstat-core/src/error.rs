//! Error types for tabular statistical analysis
//!
//! Provides a unified error type for all tabstat crates.

use thiserror::Error;

/// Core error type for tabular analysis operations
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown dataset identifier
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    /// Named column absent from the target table
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Column exists but cannot be used for the requested operation
    #[error("Invalid column {name}: {reason}")]
    InvalidColumn { name: String, reason: String },

    /// Uploaded file extension outside the supported set
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Operation name outside the fixed enumeration
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Method name outside the fixed enumeration
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    /// Statistical precondition not met: too few rows remain
    #[error("Insufficient data: expected at least {expected} samples, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// No non-missing values remain in the targeted column
    #[error("Empty sample: no non-missing values in column {0}")]
    EmptySample(String),

    /// Too few numeric columns for the requested analysis
    #[error("Insufficient columns: expected at least {expected} numeric columns, got {actual}")]
    InsufficientColumns { expected: usize, actual: usize },

    /// The table (or targeted subset) contains no numeric columns
    #[error("No numeric columns found")]
    NoNumericColumns,

    /// Numerical computation error, carrying the underlying cause
    #[error("Computation error: {0}")]
    Computation(String),

    /// IO error (upload body reads)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for a missing column
    pub fn column_not_found(name: &str) -> Self {
        Self::ColumnNotFound(name.to_string())
    }

    /// Create an error for a column of the wrong kind
    pub fn non_numeric_column(name: &str) -> Self {
        Self::InvalidColumn {
            name: name.to_string(),
            reason: "column is not numeric".to_string(),
        }
    }

    /// Create an error for an empty sample in a named column
    pub fn empty_sample(column: &str) -> Self {
        Self::EmptySample(column.to_string())
    }

    /// Create a computation error with context
    pub fn computation(context: impl std::fmt::Display) -> Self {
        Self::Computation(context.to_string())
    }

    /// Create an error for zero-variance input
    pub fn zero_variance(context: &str) -> Self {
        Self::Computation(format!("{context} has zero variance"))
    }

    /// Error kind tag for response envelopes
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DatasetNotFound(_) => "dataset_not_found",
            Self::ColumnNotFound(_) => "column_not_found",
            Self::InvalidColumn { .. } => "invalid_column",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::InvalidOperation(_) => "invalid_operation",
            Self::InvalidMethod(_) => "invalid_method",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::EmptySample(_) => "empty_sample",
            Self::InsufficientColumns { .. } => "insufficient_columns",
            Self::NoNumericColumns => "no_numeric_columns",
            Self::Computation(_) => "computation",
            Self::Io(_) => "io",
            Self::Other(_) => "other",
        }
    }
}
