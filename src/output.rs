//! Output formatting module for awsbill
//!
//! This module provides formatters for displaying a billing summary in
//! different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! # Examples
//!
//! ```
//! use awsbill::aggregation::{BillingSummary, SplitSummary};
//! use awsbill::output::get_formatter;
//!
//! let summary = BillingSummary::Split(SplitSummary {
//!     ec2: 72.0,
//!     non_ec2: 300.0,
//!     total: 372.0,
//! });
//!
//! // Human-readable table
//! let formatter = get_formatter(false);
//! println!("{}", formatter.format_summary(&summary));
//!
//! // Machine-readable JSON
//! let json_formatter = get_formatter(true);
//! println!("{}", json_formatter.format_summary(&summary));
//! ```

use crate::aggregation::{BillingSummary, FlatSummary, SplitSummary};
use prettytable::{Table, format, row};

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a billing summary
    fn format_summary(&self, summary: &BillingSummary) -> String;
}

/// Table formatter for human-readable output
///
/// Produces ASCII tables suitable for terminal display, with costs shown
/// as dollar amounts rounded to cents and a bold totals row.
pub struct TableFormatter;

impl TableFormatter {
    /// Create a new TableFormatter
    pub fn new() -> Self {
        Self
    }

    /// Format currency with dollar sign
    fn format_currency(amount: f64) -> String {
        format!("${amount:.2}")
    }

    fn format_flat(flat: &FlatSummary) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Product", b -> "Cost"]);

        for (product, cost) in &flat.products {
            table.add_row(row![product.as_str(), r -> Self::format_currency(*cost)]);
        }
        table.add_row(row![b -> "TOTAL", rb -> Self::format_currency(flat.total)]);

        format!(
            "Billing window: {} to {}\n{}",
            flat.start.format("%Y-%m-%d %H:%M"),
            flat.end.format("%Y-%m-%d %H:%M"),
            table
        )
    }

    fn format_split(split: &SplitSummary) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Component", b -> "Cost"]);

        table.add_row(row!["EC2 (monthly run-rate)", r -> Self::format_currency(split.ec2)]);
        table.add_row(row!["Non-EC2 (rolling 30 days)", r -> Self::format_currency(split.non_ec2)]);
        table.add_row(row![b -> "TOTAL", rb -> Self::format_currency(split.total)]);

        table.to_string()
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableFormatter {
    fn format_summary(&self, summary: &BillingSummary) -> String {
        match summary {
            BillingSummary::Flat(flat) => Self::format_flat(flat),
            BillingSummary::Split(split) => Self::format_split(split),
        }
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_summary(&self, summary: &BillingSummary) -> String {
        serde_json::to_string_pretty(summary)
            .unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

/// Get the appropriate formatter for the output mode
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter::new())
    }
}
