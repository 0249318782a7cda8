//! Rolling 30-day estimate for non-EC2 spend
//!
//! Sums month-to-date charges for every product line except the compute
//! instance one, then linearly projects the sum to a full 30-day window by
//! dividing by the elapsed fraction of the month.
//!
//! Unlike the product extractor, this estimator reads the raw product code
//! at its exact column and always uses `TotalCost`; tax mode and
//! linked-account filtering do not apply here.
//!
//! Known distortion: on day 1 the divisor is `1/30`, so a single day of
//! spend projects to a 30x figure. Early-month invocations swing
//! accordingly; callers wanting stability should prefer the flat breakdown
//! until a few days of data exist.

use crate::error::{AwsbillError, Result};
use crate::extractor::{PRODUCT_CODE_HEADER, TOTAL_COST_HEADER};
use crate::types::BillingRow;
use tracing::debug;

/// Raw product code of the compute instance line, excluded from the estimate
pub const EC2_PRODUCT_CODE: &str = "AmazonEC2";

/// Length of the projection window in days
pub const ROLLING_WINDOW_DAYS: f64 = 30.0;

/// Sum month-to-date non-EC2 charges
///
/// A row contributes when its product code is present, is not
/// [`EC2_PRODUCT_CODE`], and its `TotalCost` field parses as a number.
/// Sign is not checked here; credits in the export reduce the estimate.
///
/// # Errors
///
/// Returns [`AwsbillError::MissingColumn`] when `ProductCode` or
/// `TotalCost` is absent from the header row.
pub fn non_instance_month_to_date(rows: &[BillingRow]) -> Result<f64> {
    let header = rows
        .first()
        .ok_or_else(|| AwsbillError::MissingColumn(PRODUCT_CODE_HEADER.to_string()))?;

    let product_col = position(header, PRODUCT_CODE_HEADER)?;
    let cost_col = position(header, TOTAL_COST_HEADER)?;

    let total = rows[1..]
        .iter()
        .filter_map(|row| {
            let code = row.get(product_col).map(String::as_str).unwrap_or("");
            if code.is_empty() || code == EC2_PRODUCT_CODE {
                return None;
            }
            row.get(cost_col)?.trim().parse::<f64>().ok()
        })
        .sum();

    debug!("month-to-date non-EC2 cost: ${total:.2}");
    Ok(total)
}

/// Project month-to-date spend to a full 30-day figure
///
/// # Errors
///
/// Returns [`AwsbillError::InvalidArgument`] when `day_of_month` is zero.
pub fn rolling_30_day(rows: &[BillingRow], day_of_month: u32) -> Result<f64> {
    if day_of_month == 0 {
        return Err(AwsbillError::InvalidArgument(
            "day of month must be at least 1".to_string(),
        ));
    }

    let month_to_date = non_instance_month_to_date(rows)?;
    let month_fraction = f64::from(day_of_month) / ROLLING_WINDOW_DAYS;
    let projected = month_to_date / month_fraction;

    debug!("rolling 30-day non-EC2 cost: ${projected:.2} (day {day_of_month})");
    Ok(projected)
}

fn position(header: &[String], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| AwsbillError::MissingColumn(name.to_string()))
}
