//! # GetRow Request and Response
//!
//! ## Purpose
//!
//! Strongly typed request/response pair for the single-row read. The request
//! is validated here, at the client boundary, before anything is encoded or
//! sent; the codec layer later maps these types onto the protobuf envelope.
//!
//! ## Version Selection
//!
//! A read selects attribute versions either by count (`max_versions`) or by
//! time (`time_range`), or both. When the caller sets neither, the client
//! asks for the newest version only (see [`GetRowRequest::effective_max_versions`]).

use crate::error::{ValidationError, ValidationResult};
use crate::row::{PrimaryKeyItem, Row};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Version count injected when neither `max_versions` nor `time_range` is set
pub const DEFAULT_MAX_VERSIONS: u32 = 1;

/// Largest version count accepted by the protobuf `int32` field
pub const MAX_VERSIONS_LIMIT: u32 = i32::MAX as u32;

/// Time window selecting attribute versions, in milliseconds
///
/// `specific_time` selects one exact version; `start_time` (inclusive) and
/// `end_time` (exclusive) bound an interval. The two forms are mutually
/// exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_time: Option<i64>,
}

impl TimeRange {
    /// Interval `[start, end)`
    pub fn between(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time: Some(start_time),
            end_time: Some(end_time),
            specific_time: None,
        }
    }

    /// Exactly the version written at `timestamp`
    pub fn specific(timestamp: i64) -> Self {
        Self {
            specific_time: Some(timestamp),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ValidationResult<()> {
        let has_interval = self.start_time.is_some() || self.end_time.is_some();
        if self.specific_time.is_some() && has_interval {
            return Err(ValidationError::AmbiguousTimeRange);
        }
        if self.specific_time.is_none() && !has_interval {
            return Err(ValidationError::EmptyTimeRange);
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start >= end {
                return Err(ValidationError::InvertedTimeRange { start, end });
            }
        }
        Ok(())
    }
}

/// Read one row by primary key
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GetRowRequest {
    pub table_name: String,
    pub primary_key: Vec<PrimaryKeyItem>,
    /// Columns to return; empty means all columns
    #[serde(default)]
    pub columns_to_get: Vec<String>,
    #[serde(default)]
    pub time_range: Option<TimeRange>,
    #[serde(default)]
    pub max_versions: Option<u32>,
    /// First column (inclusive) of a wide-row column window
    #[serde(default)]
    pub start_column: Option<String>,
    /// Last column (exclusive) of a wide-row column window
    #[serde(default)]
    pub end_column: Option<String>,
    /// Continuation token from a previous response's `next_token`
    #[serde(default)]
    pub token: Option<Vec<u8>>,
}

impl GetRowRequest {
    pub fn new(table_name: impl Into<String>, primary_key: Vec<PrimaryKeyItem>) -> Self {
        Self {
            table_name: table_name.into(),
            primary_key,
            ..Self::default()
        }
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns_to_get = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_versions(mut self, max_versions: u32) -> Self {
        self.max_versions = Some(max_versions);
        self
    }

    pub fn time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = Some(time_range);
        self
    }

    pub fn column_window(
        mut self,
        start_column: Option<String>,
        end_column: Option<String>,
    ) -> Self {
        self.start_column = start_column;
        self.end_column = end_column;
        self
    }

    pub fn token(mut self, token: Vec<u8>) -> Self {
        self.token = Some(token);
        self
    }

    /// Version count to put on the wire
    ///
    /// Returns the caller's value when set; otherwise `DEFAULT_MAX_VERSIONS`
    /// unless a time range already bounds the versions.
    pub fn effective_max_versions(&self) -> Option<u32> {
        match (self.max_versions, self.time_range) {
            (Some(n), _) => Some(n),
            (None, Some(_)) => None,
            (None, None) => Some(DEFAULT_MAX_VERSIONS),
        }
    }

    /// Check the request before anything is encoded or sent
    pub fn validate(&self) -> ValidationResult<()> {
        if self.primary_key.is_empty() {
            return Err(ValidationError::EmptyPrimaryKey);
        }
        if self.table_name.is_empty() {
            return Err(ValidationError::EmptyTableName);
        }

        let mut seen = HashSet::with_capacity(self.primary_key.len());
        for (position, item) in self.primary_key.iter().enumerate() {
            if item.name.is_empty() {
                return Err(ValidationError::EmptyColumnName { position });
            }
            if !seen.insert(item.name.as_str()) {
                return Err(ValidationError::DuplicatePrimaryKeyColumn {
                    name: item.name.clone(),
                });
            }
        }

        if let Some(value) = self.max_versions {
            if value == 0 || value > MAX_VERSIONS_LIMIT {
                return Err(ValidationError::InvalidMaxVersions {
                    value,
                    max: MAX_VERSIONS_LIMIT,
                });
            }
        }

        if let Some(range) = &self.time_range {
            range.validate()?;
        }

        Ok(())
    }
}

/// Capacity units consumed by one call, as reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsumedCapacity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write: Option<i32>,
}

/// Result of a row read
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetRowResponse {
    pub consumed: ConsumedCapacity,
    /// `None` when no row exists for the requested primary key
    pub row: Option<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<Vec<u8>>,
}

impl GetRowResponse {
    pub fn exists(&self) -> bool {
        self.row.is_some()
    }
}
