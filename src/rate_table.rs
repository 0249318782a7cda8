//! Static EC2 rate table
//!
//! Hourly on-demand prices keyed by instance type, parsed once from the
//! embedded JSON and shared read-only for the whole process lifetime. The
//! table is never mutated after initialization, so concurrent readers need
//! no synchronization beyond the one-time `Lazy` init.
//!
//! # Examples
//!
//! ```
//! use awsbill::rate_table::RateTable;
//! use awsbill::types::InstanceType;
//!
//! let rates = RateTable::shared();
//! let hourly = rates.hourly_rate(&InstanceType::new("m5.large")).unwrap();
//! assert!(hourly > 0.0);
//! ```

use crate::error::{AwsbillError, Result};
use crate::types::InstanceType;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Embedded on-demand pricing data
const EMBEDDED_RATES: &str = include_str!("../embedded/ec2_rates.json");

/// Process-wide rate table, initialized on first use
static GLOBAL_RATES: Lazy<Arc<RateTable>> = Lazy::new(|| {
    let table = RateTable::from_embedded().expect("embedded rate table is valid JSON");
    debug!("Loaded {} instance type rates", table.len());
    Arc::new(table)
});

/// Immutable mapping from instance type to hourly on-demand price
pub struct RateTable {
    rates: HashMap<InstanceType, f64>,
}

impl RateTable {
    /// The shared process-wide table parsed from the embedded pricing data
    pub fn shared() -> Arc<RateTable> {
        Arc::clone(&GLOBAL_RATES)
    }

    /// Build a table from an arbitrary rate map
    pub fn from_rates(rates: HashMap<InstanceType, f64>) -> Self {
        Self { rates }
    }

    /// Parse the embedded pricing JSON
    fn from_embedded() -> Result<Self> {
        let raw: HashMap<String, f64> = serde_json::from_str(EMBEDDED_RATES)?;
        Ok(Self {
            rates: raw
                .into_iter()
                .map(|(ty, rate)| (InstanceType::new(ty), rate))
                .collect(),
        })
    }

    /// Hourly price for an instance type
    ///
    /// # Errors
    ///
    /// Returns [`AwsbillError::UnknownInstanceType`] when the type has no
    /// entry. An unpriced instance must surface as an error rather than a
    /// zero, so a summary never silently undercounts running spend.
    pub fn hourly_rate(&self, instance_type: &InstanceType) -> Result<f64> {
        self.rates
            .get(instance_type)
            .copied()
            .ok_or_else(|| AwsbillError::UnknownInstanceType(instance_type.clone()))
    }

    /// Number of priced instance types
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
