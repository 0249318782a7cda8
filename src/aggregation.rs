//! Aggregation module producing the billing summary
//!
//! Combines the extraction pipelines into one [`BillingSummary`]. Two modes
//! are supported:
//!
//! - **Flat**: one pass of the tabular extractor over the full export; the
//!   summary carries the per-product map, its sum, and the calendar-month
//!   window it covers.
//! - **Split**: the instance run-rate estimate and the non-EC2 rolling
//!   estimate, computed concurrently and joined; the summary carries the two
//!   components and their sum, with no per-product breakdown.
//!
//! The two split-mode pipelines share no mutable state; they are issued as
//! concurrent futures and joined before the summary is produced. If either
//! fails, the whole call fails with that error unchanged; no partial summary
//! is ever returned.
//!
//! # Examples
//!
//! ```no_run
//! use awsbill::aggregation::{AggregationMode, Aggregator};
//! use awsbill::cost_calculator::CostCalculator;
//! use awsbill::data_loader::{LocalExportSource, LocalInstanceSource};
//! use awsbill::filters::ExtractOptions;
//! use awsbill::rate_table::RateTable;
//! use std::sync::Arc;
//!
//! # async fn example() -> awsbill::Result<()> {
//! let aggregator = Aggregator::new(
//!     Arc::new(LocalExportSource::new("billing.csv")),
//!     Arc::new(CostCalculator::new(RateTable::shared())),
//! )
//! .with_instance_source(Arc::new(LocalInstanceSource::new("instances.json")))
//! .with_mode(AggregationMode::Split);
//!
//! let summary = aggregator.get().await?;
//! println!("total: ${:.2}", summary.total());
//! # Ok(())
//! # }
//! ```

use crate::cost_calculator::CostCalculator;
use crate::data_loader::{ExportSource, InstanceSource};
use crate::error::{AwsbillError, Result};
use crate::extractor::{CostExtractor, ProductCosts};
use crate::filters::ExtractOptions;
use crate::rolling;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Which summary shape the aggregator produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationMode {
    /// Full per-product breakdown from the export
    #[default]
    Flat,
    /// EC2 run-rate plus non-EC2 rolling estimate
    Split,
}

/// Flat-mode summary: per-product costs over the current month window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatSummary {
    /// Sum of all per-product values
    pub total: f64,
    /// First instant of the current calendar month
    pub start: DateTime<Utc>,
    /// Instant the summary was computed
    pub end: DateTime<Utc>,
    /// Accumulated cost per normalized product name
    pub products: ProductCosts,
}

/// Split-mode summary: instance run-rate vs. everything else
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitSummary {
    /// Estimated monthly cost of running EC2 instances
    pub ec2: f64,
    /// Rolling 30-day estimate of non-EC2 spend
    pub non_ec2: f64,
    /// `ec2 + non_ec2`
    pub total: f64,
}

/// The aggregator's output, shaped by the mode that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum BillingSummary {
    /// Produced by [`AggregationMode::Flat`]
    Flat(FlatSummary),
    /// Produced by [`AggregationMode::Split`]
    Split(SplitSummary),
}

impl BillingSummary {
    /// The grand total, regardless of summary shape
    pub fn total(&self) -> f64 {
        match self {
            Self::Flat(flat) => flat.total,
            Self::Split(split) => split.total,
        }
    }
}

/// Main aggregation engine
///
/// Construct a configured value, then call [`Aggregator::get`]. All inputs
/// arrive through the source collaborators; the aggregator holds no
/// cross-invocation state.
pub struct Aggregator {
    export_source: Arc<dyn ExportSource>,
    instance_source: Option<Arc<dyn InstanceSource>>,
    cost_calculator: Arc<CostCalculator>,
    options: ExtractOptions,
    mode: AggregationMode,
}

impl Aggregator {
    /// Create a new Aggregator in flat mode with no filtering
    pub fn new(export_source: Arc<dyn ExportSource>, cost_calculator: Arc<CostCalculator>) -> Self {
        Self {
            export_source,
            instance_source: None,
            cost_calculator,
            options: ExtractOptions::default(),
            mode: AggregationMode::default(),
        }
    }

    /// Attach an instance inventory source (required for split mode)
    pub fn with_instance_source(mut self, source: Arc<dyn InstanceSource>) -> Self {
        self.instance_source = Some(source);
        self
    }

    /// Set the extraction filtering policy
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the aggregation mode
    pub fn with_mode(mut self, mode: AggregationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Produce the billing summary as of now
    pub async fn get(&self) -> Result<BillingSummary> {
        self.get_at(Utc::now()).await
    }

    /// Produce the billing summary as of a fixed instant
    ///
    /// The instant determines the flat-mode window and the split-mode
    /// elapsed-month fraction; pinning it makes summaries reproducible.
    pub async fn get_at(&self, now: DateTime<Utc>) -> Result<BillingSummary> {
        match self.mode {
            AggregationMode::Flat => self.get_flat(now).await,
            AggregationMode::Split => self.get_split(now).await,
        }
    }

    async fn get_flat(&self, now: DateTime<Utc>) -> Result<BillingSummary> {
        let rows = self.export_source.fetch_rows().await?;
        let products = CostExtractor::new(self.options.clone()).extract(&rows)?;
        let total = products.values().sum();

        info!("flat summary: {} products, ${total:.2} total", products.len());

        Ok(BillingSummary::Flat(FlatSummary {
            total,
            start: month_floor(now),
            end: now,
            products,
        }))
    }

    async fn get_split(&self, now: DateTime<Utc>) -> Result<BillingSummary> {
        let instance_source = self.instance_source.as_ref().ok_or_else(|| {
            AwsbillError::InvalidArgument(
                "split mode requires an instance inventory source".to_string(),
            )
        })?;

        let ec2_estimate = async {
            let instances = instance_source.list_instances().await?;
            self.cost_calculator.monthly_instance_cost(&instances)
        };
        let non_ec2_estimate = async {
            let rows = self.export_source.fetch_rows().await?;
            rolling::rolling_30_day(&rows, now.day())
        };

        let (ec2, non_ec2) = futures::try_join!(ec2_estimate, non_ec2_estimate)?;

        info!("split summary: ec2 ${ec2:.2} + non-ec2 ${non_ec2:.2}");

        Ok(BillingSummary::Split(SplitSummary {
            ec2,
            non_ec2,
            total: ec2 + non_ec2,
        }))
    }
}

/// First instant of the month containing `now`
fn month_floor(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .expect("first instant of a month always exists in UTC")
}
