//! Core domain types for awsbill
//!
//! This module contains the fundamental types used throughout the awsbill
//! library. These types provide strong typing for common concepts like
//! account ids, product keys, instance types, and instance lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One decoded row of the billing export, header row included.
///
/// Field order is consistent across all rows of one export; no schema is
/// assumed beyond the header names the extractor resolves.
pub type BillingRow = Vec<String>;

/// Strongly-typed AWS account id wrapper
///
/// Account ids appear both with separators (`1111-2222-3333`) and without
/// (`111122223333`) depending on the AWS surface that produced them.
/// [`AccountId::normalized`] strips the separators so both spellings compare
/// equal.
///
/// # Examples
/// ```
/// use awsbill::types::AccountId;
///
/// let account = AccountId::new("1111-2222-3333");
/// assert_eq!(account.normalized(), "111122223333");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new AccountId from any string-like type
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The id with separator characters stripped
    pub fn normalized(&self) -> String {
        self.0.replace('-', "")
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized product name used as the key of the per-product cost map
///
/// Keys are lower-cased with the leading vendor brand (`amazon ` / `aws `)
/// stripped, so `"Amazon Simple Storage Service"` and
/// `"amazon simple storage service"` accumulate into the same bucket.
/// Normalizing an already-normalized key is a no-op.
///
/// # Examples
/// ```
/// use awsbill::types::ProductKey;
///
/// let key = ProductKey::normalize("Amazon Elastic Compute Cloud");
/// assert_eq!(key.as_str(), "elastic compute cloud");
/// assert_eq!(ProductKey::normalize(key.as_str()), key);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductKey(String);

impl ProductKey {
    /// Derive a normalized key from a raw export field
    pub fn normalize(raw: &str) -> Self {
        let mut key = raw.to_lowercase();
        loop {
            if let Some(rest) = key.strip_prefix("amazon ") {
                key = rest.to_string();
            } else if let Some(rest) = key.strip_prefix("aws ") {
                key = rest.to_string();
            } else {
                break;
            }
        }
        Self(key)
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key is empty (rows with empty keys are never accumulated)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProductKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strongly-typed EC2 instance type identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceType(String);

impl InstanceType {
    /// Create a new InstanceType
    pub fn new(ty: impl Into<String>) -> Self {
        Self(ty.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// EC2 instance lifecycle state
///
/// Only [`InstanceState::Running`] instances contribute to the run-rate
/// estimate; every other state is excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceState {
    /// Launch requested, not yet running
    Pending,
    /// Up and billing
    Running,
    /// Termination in progress
    ShuttingDown,
    /// Gone
    Terminated,
    /// Stop in progress
    Stopping,
    /// Stopped, not billing for compute
    Stopped,
}

impl InstanceState {
    /// Whether the instance is currently running
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Running => write!(f, "running"),
            Self::ShuttingDown => write!(f, "shutting-down"),
            Self::Terminated => write!(f, "terminated"),
            Self::Stopping => write!(f, "stopping"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// A compute instance as reported by the inventory collaborator
///
/// Supplied wholesale by the instance enumeration source; the core never
/// mutates descriptors, it only filters and prices them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceDescriptor {
    /// Instance type identifier, e.g. `m5.large`
    pub instance_type: InstanceType,
    /// Lifecycle state
    pub state: InstanceState,
}

impl InstanceDescriptor {
    /// Create a new descriptor
    pub fn new(instance_type: impl Into<String>, state: InstanceState) -> Self {
        Self {
            instance_type: InstanceType::new(instance_type),
            state,
        }
    }
}

/// Which cost column of the export to accumulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaxMode {
    /// Read the `TotalCost` column (taxes included)
    #[default]
    WithTaxes,
    /// Read the `CostBeforeTax` column
    WithoutTaxes,
}

impl fmt::Display for TaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WithTaxes => write!(f, "with-taxes"),
            Self::WithoutTaxes => write!(f, "without-taxes"),
        }
    }
}
