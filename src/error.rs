//! Error types for chart construction and data loading.

use std::path::PathBuf;

/// Errors raised while building a chart from raw column data or configuration.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// The data set has no columns at all.
    #[error("chart data has no columns")]
    NoColumns,
    /// No column is typed as the time (`"x"`) column.
    #[error("chart data has no time column")]
    MissingTimeColumn,
    /// More than one column is typed as the time column.
    #[error("chart data has more than one time column ({first} and {second})")]
    DuplicateTimeColumn {
        /// First time column id.
        first: String,
        /// Second time column id.
        second: String,
    },
    /// No value column of type `"line"` exists.
    #[error("chart data has no line columns")]
    NoLineColumns,
    /// A column is empty or its first cell is not a string id.
    #[error("column {index} does not start with a string id")]
    BadColumnId {
        /// Position of the column in the input.
        index: usize,
    },
    /// A column cell could not be read as a number.
    #[error("column {column}: value at position {position} is not a finite number")]
    NonNumeric {
        /// Column id.
        column: String,
        /// Sample position inside the column.
        position: usize,
    },
    /// A value column length differs from the time column length.
    #[error("column {column} has {actual} samples, expected {expected}")]
    LengthMismatch {
        /// Column id.
        column: String,
        /// Length of the time column.
        expected: usize,
        /// Length of the offending column.
        actual: usize,
    },
    /// Not enough samples to span a viewport.
    #[error("chart data needs at least 2 samples, got {len}")]
    TooFewSamples {
        /// Number of samples in the time column.
        len: usize,
    },
    /// The time column does not strictly increase.
    #[error("timestamp at position {position} does not follow the previous one")]
    UnorderedTimestamps {
        /// Sample position of the offending timestamp.
        position: usize,
    },
    /// A timestamp cannot be represented as a calendar date.
    #[error("timestamp {value} at position {position} is out of range")]
    TimestampOutOfRange {
        /// Sample position of the offending timestamp.
        position: usize,
        /// Timestamp in milliseconds.
        value: i64,
    },
    /// A column has no entry in the `types` dictionary.
    #[error("column {0} has no type")]
    MissingType(String),
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A color string could not be parsed.
    #[error("invalid color {0:?}")]
    InvalidColor(String),
    /// JSON input could not be parsed.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a [`DataSource`](crate::datasource::DataSource).
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    /// The requested data does not exist.
    #[error("no data at {0}")]
    NotFound(PathBuf),
    /// The timestamp cannot be mapped to a calendar date.
    #[error("timestamp {0} is out of range")]
    BadTimestamp(i64),
    /// Reading the underlying storage failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The payload was read but is not valid chart data.
    #[error(transparent)]
    Chart(#[from] ChartError),
}
