//! awsbill - Summarize AWS billing exports and estimate EC2 run-rate costs

use awsbill::{
    aggregation::{AggregationMode, Aggregator},
    cli::{Cli, parse_month_override},
    cost_calculator::CostCalculator,
    data_loader::{LocalExportSource, LocalInstanceSource, export_object_key},
    error::{AwsbillError, Result},
    filters::ExtractOptions,
    output::get_formatter,
    rate_table::RateTable,
    types::{AccountId, TaxMode},
};
use chrono::Utc;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. The --quiet flag should override RUST_LOG.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("awsbill=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let account = AccountId::new(&cli.account_id);
    let month = cli
        .month
        .as_deref()
        .map(parse_month_override)
        .transpose()?;

    info!(
        "billing export object key: {}",
        export_object_key(&account, month.as_deref(), Utc::now())
    );

    let mut options = ExtractOptions::new();
    if cli.without_taxes {
        options = options.with_tax_mode(TaxMode::WithoutTaxes);
    }
    if let Some(linked) = &cli.linked_account {
        options = options.with_linked_account(AccountId::new(linked));
    }
    for code in &cli.exclude_products {
        options = options.with_excluded_code(code);
    }

    let cost_calculator = Arc::new(CostCalculator::new(RateTable::shared()));
    let mut aggregator = Aggregator::new(
        Arc::new(LocalExportSource::new(&cli.export)),
        cost_calculator,
    )
    .with_options(options);

    if cli.split {
        let instances = cli.instances.as_ref().ok_or_else(|| {
            AwsbillError::InvalidArgument("--split requires --instances".to_string())
        })?;
        aggregator = aggregator
            .with_instance_source(Arc::new(LocalInstanceSource::new(instances)))
            .with_mode(AggregationMode::Split);
    }

    let summary = aggregator.get().await?;

    let formatter = get_formatter(cli.json);
    println!("{}", formatter.format_summary(&summary));

    Ok(())
}
