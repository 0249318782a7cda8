//! CLI interface for awsbill
//!
//! This module defines the command-line interface using clap. The binary
//! reads a downloaded billing export (and, for split mode, an instance
//! inventory) and prints one summary.
//!
//! # Example
//!
//! ```bash
//! # Per-product breakdown for the current month
//! awsbill 1111-2222-3333 --export billing.csv
//!
//! # Pre-tax costs for one linked account
//! awsbill 1111-2222-3333 --export billing.csv \
//!     --linked-account 4444-5555-6666 --without-taxes
//!
//! # EC2 run-rate vs. rolling non-EC2 estimate, as JSON
//! awsbill 1111-2222-3333 --export billing.csv \
//!     --instances inventory.json --split --json
//! ```

use crate::error::{AwsbillError, Result};
use clap::Parser;
use std::path::PathBuf;

/// Summarize AWS billing exports and estimate EC2 run-rate costs
#[derive(Parser, Debug, Clone)]
#[command(name = "awsbill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// AWS payer account id (with or without separators)
    pub account_id: String,

    /// Billing month override (YYYY-MM, or a bare month number)
    #[arg(long)]
    pub month: Option<String>,

    /// Only count charges attributed to this linked account id
    #[arg(long)]
    pub linked_account: Option<String>,

    /// Accumulate the pre-tax cost column instead of totals
    #[arg(long)]
    pub without_taxes: bool,

    /// Raw product code to exclude from the breakdown (repeatable)
    #[arg(long = "exclude-product", value_name = "CODE")]
    pub exclude_products: Vec<String>,

    /// Report EC2 run-rate plus non-EC2 rolling estimate instead of the
    /// per-product breakdown
    #[arg(long)]
    pub split: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Path to the downloaded billing export CSV
    #[arg(long, value_name = "PATH")]
    pub export: PathBuf,

    /// Path to the instance inventory JSON (required with --split)
    #[arg(long, value_name = "PATH")]
    pub instances: Option<PathBuf>,
}

/// Validate a billing month override
///
/// Accepts `YYYY-MM` or a bare zero-padded month `MM`; the validated string
/// replaces the computed month suffix of the export object key verbatim.
pub fn parse_month_override(raw: &str) -> Result<String> {
    let valid = match raw.split_once('-') {
        Some((year, month)) => {
            year.len() == 4
                && year.chars().all(|c| c.is_ascii_digit())
                && is_month_number(month)
        }
        None => is_month_number(raw),
    };

    if valid {
        Ok(raw.to_string())
    } else {
        Err(AwsbillError::InvalidArgument(format!(
            "invalid month '{raw}', expected YYYY-MM or MM"
        )))
    }
}

fn is_month_number(s: &str) -> bool {
    s.len() == 2 && matches!(s.parse::<u32>(), Ok(1..=12))
}
