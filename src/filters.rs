//! Row filtering policy for the cost extractor
//!
//! This module describes which export rows the extractor accumulates:
//! the tax-inclusion policy, an optional linked sub-account filter, and an
//! optional set of raw product codes to exclude. All filters are optional
//! and can be combined.
//!
//! # Examples
//!
//! ```
//! use awsbill::filters::ExtractOptions;
//! use awsbill::types::{AccountId, TaxMode};
//!
//! // Pre-tax costs for one linked account, ignoring support charges
//! let options = ExtractOptions::new()
//!     .with_tax_mode(TaxMode::WithoutTaxes)
//!     .with_linked_account(AccountId::new("1111-2222-3333"))
//!     .with_excluded_code("AWSSupportBusiness");
//! ```

use crate::types::{AccountId, TaxMode};
use std::collections::HashSet;

/// Filter configuration for billing export rows
///
/// The linked-account comparison normalizes separator characters away on
/// both sides, so `1111-2222-3333` matches a `111122223333` export field.
#[derive(Debug, Default, Clone)]
pub struct ExtractOptions {
    /// Which cost column to accumulate
    pub tax_mode: TaxMode,
    /// Only count rows attributed to this linked account
    pub linked_account: Option<AccountId>,
    /// Raw product codes to skip entirely
    pub exclude_product_codes: HashSet<String>,
}

impl ExtractOptions {
    /// Create options with no filtering and taxes included
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tax mode
    pub fn with_tax_mode(mut self, tax_mode: TaxMode) -> Self {
        self.tax_mode = tax_mode;
        self
    }

    /// Restrict accumulation to a single linked account
    pub fn with_linked_account(mut self, account: AccountId) -> Self {
        self.linked_account = Some(account);
        self
    }

    /// Add one raw product code to the exclusion set
    pub fn with_excluded_code(mut self, code: impl Into<String>) -> Self {
        self.exclude_product_codes.insert(code.into());
        self
    }

    /// Check a row's linked-account field against the configured filter
    ///
    /// Returns `true` when no filter is configured.
    pub fn matches_linked_account(&self, raw_field: &str) -> bool {
        match &self.linked_account {
            Some(account) => raw_field.replace('-', "") == account.normalized(),
            None => true,
        }
    }

    /// Whether a raw product code is excluded
    pub fn excludes_code(&self, raw_code: &str) -> bool {
        self.exclude_product_codes.contains(raw_code)
    }
}
