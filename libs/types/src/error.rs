//! Validation errors for row-read requests
//!
//! Raised before any network call when a request is malformed, and by the
//! message codec when an encoded request does not conform to its schema.

use thiserror::Error;

/// Errors detected locally while validating caller input
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Table name is empty
    #[error("table name must not be empty")]
    EmptyTableName,

    /// Primary key has no cells
    #[error("primary key must contain at least one column")]
    EmptyPrimaryKey,

    /// Primary key column has an empty name
    #[error("primary key column at position {position} has an empty name")]
    EmptyColumnName { position: usize },

    /// Same primary key column appears twice
    #[error("primary key column '{name}' appears more than once")]
    DuplicatePrimaryKeyColumn { name: String },

    /// Version count outside the accepted range
    #[error("max_versions must be between 1 and {max}, got {value}")]
    InvalidMaxVersions { value: u32, max: u32 },

    /// Time range mixes an exact version with an interval
    #[error("time range sets specific_time together with start_time/end_time")]
    AmbiguousTimeRange,

    /// Time range interval is empty or inverted
    #[error("time range start_time {start} must be less than end_time {end}")]
    InvertedTimeRange { start: i64, end: i64 },

    /// Time range has no bound at all
    #[error("time range must set specific_time or at least one of start_time/end_time")]
    EmptyTimeRange,

    /// Encoded message does not conform to its schema
    #[error("schema validation failed: {message}")]
    Schema { message: String },
}

impl ValidationError {
    /// Create a schema violation error from the schema's diagnostic text
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }
}

/// Result type for validation
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
