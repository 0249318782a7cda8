//! Data sources for billing exports and instance inventories
//!
//! The aggregation core never performs network I/O. It consumes decoded
//! export rows and flat instance lists through the [`ExportSource`] and
//! [`InstanceSource`] traits defined here; an authenticated object-storage
//! or compute-API client is just another implementation of the same seams.
//!
//! This module ships file-backed implementations so the binary works
//! end-to-end against a downloaded billing CSV and an instance inventory
//! JSON, plus the object-key construction a storage-backed implementation
//! needs to locate the month's export.
//!
//! # Examples
//!
//! ```no_run
//! use awsbill::data_loader::{ExportSource, LocalExportSource};
//!
//! # async fn example() -> awsbill::Result<()> {
//! let source = LocalExportSource::new("billing/march.csv");
//! let rows = source.fetch_rows().await?;
//! println!("export has {} data rows", rows.len().saturating_sub(1));
//! # Ok(())
//! # }
//! ```

use crate::error::{AwsbillError, Result};
use crate::types::{AccountId, BillingRow, InstanceDescriptor};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Provider of decoded billing export rows, header row first
///
/// A failed fetch must surface as [`AwsbillError::Retrieval`]; the
/// aggregation call that depends on it aborts rather than report partial
/// numbers.
#[async_trait]
pub trait ExportSource: Send + Sync {
    /// Fetch and decode the export into ordered rows
    async fn fetch_rows(&self) -> Result<Vec<BillingRow>>;
}

/// Provider of a flat list of instance descriptors
///
/// Any nested or grouped response shape from the underlying API must be
/// flattened before descriptors reach the core.
#[async_trait]
pub trait InstanceSource: Send + Sync {
    /// Enumerate instances
    async fn list_instances(&self) -> Result<Vec<InstanceDescriptor>>;
}

/// Object key of an account's monthly billing export
///
/// The key format is `{account}-aws-billing-csv-{YYYY}-{MM}.csv` with the
/// account id separator-stripped and the month zero-padded. An explicit
/// `month` override replaces the computed `{YYYY}-{MM}` suffix verbatim, so
/// both `2026-07` and a bare `07` produce a key.
pub fn export_object_key(
    account: &AccountId,
    month: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let account = account.normalized();
    match month {
        Some(month) => format!("{account}-aws-billing-csv-{month}.csv"),
        None => format!(
            "{account}-aws-billing-csv-{}-{:02}.csv",
            now.year(),
            now.month()
        ),
    }
}

/// Split one CSV line into fields
///
/// Handles quoted fields and doubled quotes; enough for the billing export
/// format. Full CSV dialect handling belongs to the retrieval collaborator,
/// not the core.
pub fn split_csv_line(line: &str) -> BillingRow {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

/// Decode export text into rows, skipping blank lines
pub fn parse_export(text: &str) -> Vec<BillingRow> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(split_csv_line)
        .collect()
}

/// File-backed billing export source
///
/// Reads a billing CSV previously downloaded from the export bucket.
pub struct LocalExportSource {
    path: PathBuf,
}

impl LocalExportSource {
    /// Create a source reading from the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ExportSource for LocalExportSource {
    async fn fetch_rows(&self) -> Result<Vec<BillingRow>> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AwsbillError::Retrieval(format!("{}: {e}", self.path.display()))
        })?;

        let rows = parse_export(&text);
        if rows.is_empty() {
            warn!("export {} contains no rows", self.path.display());
        }
        debug!("decoded {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}

/// Inventory document shapes accepted by [`LocalInstanceSource`]
///
/// Either an already-flat descriptor list or the grouped
/// reservations-with-instances shape the compute API responds with.
#[derive(Deserialize)]
#[serde(untagged)]
enum InventoryDocument {
    Flat(Vec<InstanceDescriptor>),
    Grouped { reservations: Vec<Reservation> },
}

#[derive(Deserialize)]
struct Reservation {
    instances: Vec<InstanceDescriptor>,
}

impl InventoryDocument {
    fn into_flat(self) -> Vec<InstanceDescriptor> {
        match self {
            Self::Flat(instances) => instances,
            Self::Grouped { reservations } => reservations
                .into_iter()
                .flat_map(|r| r.instances)
                .collect(),
        }
    }
}

/// File-backed instance inventory source
pub struct LocalInstanceSource {
    path: PathBuf,
}

impl LocalInstanceSource {
    /// Create a source reading from the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl InstanceSource for LocalInstanceSource {
    async fn list_instances(&self) -> Result<Vec<InstanceDescriptor>> {
        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AwsbillError::Retrieval(format!("{}: {e}", self.path.display()))
        })?;

        let document: InventoryDocument = serde_json::from_str(&text)?;
        let instances = document.into_flat();
        debug!(
            "enumerated {} instances from {}",
            instances.len(),
            self.path.display()
        );
        Ok(instances)
    }
}
