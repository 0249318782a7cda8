//! Common test utilities and helpers for awsbill tests
//!
//! Provides reusable row builders, stub collaborator sources, and helper
//! assertions shared by the integration tests.

use async_trait::async_trait;
use awsbill::cost_calculator::CostCalculator;
use awsbill::data_loader::{ExportSource, InstanceSource};
use awsbill::error::{AwsbillError, Result};
use awsbill::rate_table::RateTable;
use awsbill::types::{BillingRow, InstanceDescriptor};
use std::collections::HashMap;
use std::sync::Arc;

/// The export header layout used across tests: `ProductCode` is immediately
/// followed by the product display-name column the extractor consumes.
#[allow(dead_code)]
pub const EXPORT_HEADER: &[&str] = &[
    "InvoiceID",
    "ProductCode",
    "ProductName",
    "TotalCost",
    "CostBeforeTax",
    "LinkedAccountId",
];

/// Build one export row matching [`EXPORT_HEADER`]
#[allow(dead_code)]
pub fn export_row(
    code: &str,
    name: &str,
    total: &str,
    before_tax: &str,
    linked_account: &str,
) -> BillingRow {
    vec![
        "1001".to_string(),
        code.to_string(),
        name.to_string(),
        total.to_string(),
        before_tax.to_string(),
        linked_account.to_string(),
    ]
}

/// Reference export: two EC2 line items across two linked accounts plus
/// one S3 line item.
#[allow(dead_code)]
pub fn sample_export() -> Vec<BillingRow> {
    vec![
        EXPORT_HEADER.iter().map(|s| s.to_string()).collect(),
        export_row("AmazonEC2", "Amazon EC2", "10.00", "9.00", "1111"),
        export_row("AmazonS3", "Amazon S3", "5.00", "4.50", "1111"),
        export_row("AmazonEC2", "Amazon EC2", "3.00", "2.70", "2222"),
    ]
}

/// Export source serving fixed in-memory rows
#[allow(dead_code)]
pub struct StaticExport(pub Vec<BillingRow>);

#[async_trait]
impl ExportSource for StaticExport {
    async fn fetch_rows(&self) -> Result<Vec<BillingRow>> {
        Ok(self.0.clone())
    }
}

/// Export source that always fails retrieval
#[allow(dead_code)]
pub struct FailingExport(pub &'static str);

#[async_trait]
impl ExportSource for FailingExport {
    async fn fetch_rows(&self) -> Result<Vec<BillingRow>> {
        Err(AwsbillError::Retrieval(self.0.to_string()))
    }
}

/// Inventory source serving a fixed descriptor list
#[allow(dead_code)]
pub struct StaticInventory(pub Vec<InstanceDescriptor>);

#[async_trait]
impl InstanceSource for StaticInventory {
    async fn list_instances(&self) -> Result<Vec<InstanceDescriptor>> {
        Ok(self.0.clone())
    }
}

/// Inventory source that always fails enumeration
#[allow(dead_code)]
pub struct FailingInventory(pub &'static str);

#[async_trait]
impl InstanceSource for FailingInventory {
    async fn list_instances(&self) -> Result<Vec<InstanceDescriptor>> {
        Err(AwsbillError::Retrieval(self.0.to_string()))
    }
}

/// Cost calculator over a small fixed rate table
///
/// Types `a1.test` and `b1.test` are priced at $0.10 and $0.20 hourly.
pub fn test_calculator() -> Arc<CostCalculator> {
    let mut rates = HashMap::new();
    rates.insert(awsbill::types::InstanceType::new("a1.test"), 0.10);
    rates.insert(awsbill::types::InstanceType::new("b1.test"), 0.20);
    Arc::new(CostCalculator::new(Arc::new(RateTable::from_rates(rates))))
}

/// Assert that two float values are approximately equal
pub fn assert_approx_eq(a: f64, b: f64, tolerance: f64) {
    assert!(
        (a - b).abs() <= tolerance,
        "Values are not approximately equal: {} != {} (tolerance: {})",
        a,
        b,
        tolerance
    );
}
