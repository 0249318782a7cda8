//! Error types for awsbill
//!
//! This module defines the error types used throughout the awsbill library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! Fatal conditions (a missing export column, an unpriced instance type, a
//! failed retrieval) abort the whole aggregation call. Row-level anomalies in
//! the billing export (non-numeric cost fields, empty product names) are not
//! errors at all; the extractor skips those rows and keeps going.
//!
//! # Example
//!
//! ```
//! use awsbill::error::{AwsbillError, Result};
//!
//! fn require_column(header: &[String], name: &str) -> Result<usize> {
//!     header
//!         .iter()
//!         .position(|h| h == name)
//!         .ok_or_else(|| AwsbillError::MissingColumn(name.to_string()))
//! }
//! ```

use thiserror::Error;

use crate::types::InstanceType;

/// Main error type for awsbill operations
///
/// This enum encompasses all fatal errors that can occur while producing a
/// billing summary, from export-schema problems to collaborator failures.
#[derive(Error, Debug)]
pub enum AwsbillError {
    /// A required header is absent from the billing export
    #[error("missing column in billing export: {0}")]
    MissingColumn(String),

    /// An instance type has no entry in the rate table
    #[error("no hourly rate for instance type: {0}")]
    UnknownInstanceType(InstanceType),

    /// An export or inventory collaborator reported failure
    #[error("retrieval failure: {0}")]
    Retrieval(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results in awsbill
///
/// # Example
///
/// ```
/// use awsbill::Result;
///
/// fn month_fraction(day: u32) -> Result<f64> {
///     Ok(day as f64 / 30.0)
/// }
/// ```
pub type Result<T> = std::result::Result<T, AwsbillError>;
