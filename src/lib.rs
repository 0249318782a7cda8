//! awsbill - Summarize AWS billing exports and estimate EC2 run-rate costs
//!
//! This library provides functionality to:
//! - Extract per-product costs from a monthly billing export
//! - Filter by linked sub-account, tax inclusion, and product code
//! - Estimate the monthly run-rate of running EC2 instances from a static
//!   rate table
//! - Project month-to-date non-EC2 spend to a rolling 30-day figure
//! - Combine either view into one billing summary, as a table or JSON
//!
//! # Examples
//!
//! ```no_run
//! use awsbill::{
//!     aggregation::Aggregator,
//!     cost_calculator::CostCalculator,
//!     data_loader::LocalExportSource,
//!     rate_table::RateTable,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> awsbill::Result<()> {
//!     let aggregator = Aggregator::new(
//!         Arc::new(LocalExportSource::new("billing.csv")),
//!         Arc::new(CostCalculator::new(RateTable::shared())),
//!     );
//!
//!     let summary = aggregator.get().await?;
//!     println!("total: ${:.2}", summary.total());
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod cli;
pub mod cost_calculator;
pub mod data_loader;
pub mod error;
pub mod extractor;
pub mod filters;
pub mod output;
pub mod rate_table;
pub mod rolling;
pub mod types;

// Re-export commonly used types
pub use error::{AwsbillError, Result};
pub use types::{AccountId, InstanceDescriptor, InstanceState, InstanceType, ProductKey, TaxMode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
