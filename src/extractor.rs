//! Tabular cost extractor for billing exports
//!
//! Turns decoded export rows into a per-product cost map. Column positions
//! are resolved once from the header row, then every data row is folded into
//! the map under the documented inclusion rules: normalized non-empty
//! product key, strictly positive parsed cost, and whatever linked-account
//! and product-code filters are configured.
//!
//! A malformed row (non-numeric cost, empty product name) is skipped, never
//! an error; one bad line item must not abort a monthly report. Only a
//! missing required header is fatal.
//!
//! # Examples
//!
//! ```
//! use awsbill::extractor::CostExtractor;
//! use awsbill::filters::ExtractOptions;
//!
//! let rows: Vec<Vec<String>> = vec![
//!     vec!["ProductCode", "ProductName", "TotalCost", "CostBeforeTax", "LinkedAccountId"],
//!     vec!["AmazonS3", "Amazon Simple Storage Service", "5.00", "4.50", "111122223333"],
//! ]
//! .into_iter()
//! .map(|row| row.into_iter().map(String::from).collect())
//! .collect();
//!
//! let extractor = CostExtractor::new(ExtractOptions::new());
//! let products = extractor.extract(&rows).unwrap();
//! assert_eq!(products.len(), 1);
//! ```

use crate::error::{AwsbillError, Result};
use crate::filters::ExtractOptions;
use crate::types::{BillingRow, ProductKey, TaxMode};
use std::collections::BTreeMap;
use tracing::debug;

/// Header naming the product code column
pub const PRODUCT_CODE_HEADER: &str = "ProductCode";
/// Header naming the tax-inclusive cost column
pub const TOTAL_COST_HEADER: &str = "TotalCost";
/// Header naming the pre-tax cost column
pub const COST_BEFORE_TAX_HEADER: &str = "CostBeforeTax";
/// Header naming the linked sub-account column
pub const LINKED_ACCOUNT_HEADER: &str = "LinkedAccountId";

/// Per-product accumulated costs, keyed by normalized product name
pub type ProductCosts = BTreeMap<ProductKey, f64>;

/// Resolved column positions for one extraction pass
///
/// Resolved once from the header row before any data row is touched, so a
/// schema problem surfaces as a single [`AwsbillError::MissingColumn`]
/// rather than a per-row failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    /// Field consumed as the product name.
    ///
    /// This is the position one to the right of the `ProductCode` header:
    /// in the export layout the adjacent field carries the product's display
    /// name, which is what the normalized key is derived from.
    pub product_col: usize,
    /// Field consumed as the cost amount, chosen by tax mode
    pub cost_col: usize,
    /// Field holding the linked account id, resolved only when filtering
    pub linked_account_col: Option<usize>,
}

impl ColumnIndex {
    /// Resolve all required column positions from the header row
    ///
    /// # Errors
    ///
    /// Returns [`AwsbillError::MissingColumn`] when `ProductCode`, the
    /// cost column selected by the tax mode, or (with a linked-account
    /// filter configured) `LinkedAccountId` is absent.
    pub fn resolve(header: &[String], options: &ExtractOptions) -> Result<Self> {
        let product_col = find_column(header, PRODUCT_CODE_HEADER)? + 1;

        let cost_header = match options.tax_mode {
            TaxMode::WithoutTaxes => COST_BEFORE_TAX_HEADER,
            TaxMode::WithTaxes => TOTAL_COST_HEADER,
        };
        let cost_col = find_column(header, cost_header)?;

        let linked_account_col = match options.linked_account {
            Some(_) => Some(find_column(header, LINKED_ACCOUNT_HEADER)?),
            None => None,
        };

        debug!(
            product_col,
            cost_col,
            ?linked_account_col,
            "resolved export columns (cost column: {cost_header})"
        );

        Ok(Self {
            product_col,
            cost_col,
            linked_account_col,
        })
    }
}

/// Locate a header by name
fn find_column(header: &[String], name: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| AwsbillError::MissingColumn(name.to_string()))
}

/// Field at `col`, or empty when the row is short
fn field(row: &BillingRow, col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

/// Extracts per-product costs from billing export rows
pub struct CostExtractor {
    options: ExtractOptions,
}

impl CostExtractor {
    /// Create an extractor with the given filtering policy
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Fold the export into a per-product cost map
    ///
    /// The first row must be the header row; it is consumed for column
    /// resolution and excluded from accumulation.
    pub fn extract(&self, rows: &[BillingRow]) -> Result<ProductCosts> {
        let header = rows
            .first()
            .ok_or_else(|| AwsbillError::MissingColumn(PRODUCT_CODE_HEADER.to_string()))?;
        let columns = ColumnIndex::resolve(header, &self.options)?;

        let mut products = ProductCosts::new();
        let mut skipped = 0usize;

        for row in &rows[1..] {
            let raw_product = field(row, columns.product_col);
            let key = ProductKey::normalize(raw_product);
            let cost: f64 = field(row, columns.cost_col)
                .trim()
                .parse()
                .unwrap_or(f64::NAN);

            if let Some(col) = columns.linked_account_col {
                if !self.options.matches_linked_account(field(row, col)) {
                    continue;
                }
            }

            if self.options.excludes_code(raw_product) {
                continue;
            }

            // cost > 0.0 is false for NaN, so unparseable rows fall out here
            if key.is_empty() || !(cost > 0.0) {
                skipped += 1;
                continue;
            }

            *products.entry(key).or_insert(0.0) += cost;
        }

        debug!(
            "extracted {} products from {} rows ({} skipped)",
            products.len(),
            rows.len() - 1,
            skipped
        );

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountId;

    fn rows(raw: &[&[&str]]) -> Vec<BillingRow> {
        raw.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn sample_rows() -> Vec<BillingRow> {
        rows(&[
            &["InvoiceID", "ProductCode", "ProductName", "TotalCost", "CostBeforeTax", "LinkedAccountId"],
            &["1001", "AmazonEC2", "Amazon Elastic Compute Cloud", "10.00", "9.00", "1111"],
            &["1002", "AmazonS3", "Amazon Simple Storage Service", "5.00", "4.50", "1111"],
            &["1003", "AmazonEC2", "Amazon Elastic Compute Cloud", "3.00", "2.70", "2222"],
        ])
    }

    #[test]
    fn test_accumulates_by_normalized_product() {
        let extractor = CostExtractor::new(ExtractOptions::new());
        let products = extractor.extract(&sample_rows()).unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(
            products[&ProductKey::normalize("Amazon Elastic Compute Cloud")],
            13.00
        );
        assert_eq!(
            products[&ProductKey::normalize("Amazon Simple Storage Service")],
            5.00
        );
    }

    #[test]
    fn test_product_column_is_right_of_product_code() {
        let extractor = CostExtractor::new(ExtractOptions::new());
        let products = extractor.extract(&sample_rows()).unwrap();

        // Keys come from the ProductName field, not the raw code
        assert!(products.contains_key(&ProductKey::normalize("elastic compute cloud")));
        assert!(!products.contains_key(&ProductKey::normalize("amazonec2")));
    }

    #[test]
    fn test_tax_mode_selects_cost_column() {
        let extractor =
            CostExtractor::new(ExtractOptions::new().with_tax_mode(TaxMode::WithoutTaxes));
        let products = extractor.extract(&sample_rows()).unwrap();

        assert_eq!(
            products[&ProductKey::normalize("elastic compute cloud")],
            11.70
        );
        assert_eq!(
            products[&ProductKey::normalize("simple storage service")],
            4.50
        );
    }

    #[test]
    fn test_linked_account_filter() {
        let extractor = CostExtractor::new(
            ExtractOptions::new().with_linked_account(AccountId::new("1111")),
        );
        let products = extractor.extract(&sample_rows()).unwrap();

        assert_eq!(products[&ProductKey::normalize("elastic compute cloud")], 10.00);
        assert_eq!(products[&ProductKey::normalize("simple storage service")], 5.00);
    }

    #[test]
    fn test_excluded_product_codes_match_raw_value() {
        // The exclusion set is checked against the raw consumed field
        let extractor = CostExtractor::new(
            ExtractOptions::new().with_excluded_code("Amazon Elastic Compute Cloud"),
        );
        let products = extractor.extract(&sample_rows()).unwrap();

        assert_eq!(products.len(), 1);
        assert!(products.contains_key(&ProductKey::normalize("simple storage service")));
    }

    #[test]
    fn test_non_numeric_cost_rows_are_skipped() {
        let data = rows(&[
            &["ProductCode", "ProductName", "TotalCost"],
            &["AmazonS3", "Amazon Simple Storage Service", "not-a-number"],
            &["AmazonS3", "Amazon Simple Storage Service", "2.50"],
        ]);
        let products = CostExtractor::new(ExtractOptions::new())
            .extract(&data)
            .unwrap();

        assert_eq!(products[&ProductKey::normalize("simple storage service")], 2.50);
    }

    #[test]
    fn test_zero_and_negative_costs_are_skipped() {
        let data = rows(&[
            &["ProductCode", "ProductName", "TotalCost"],
            &["AmazonS3", "Amazon Simple Storage Service", "0.00"],
            &["AmazonS3", "Amazon Simple Storage Service", "-1.25"],
        ]);
        let products = CostExtractor::new(ExtractOptions::new())
            .extract(&data)
            .unwrap();

        assert!(products.is_empty());
    }

    #[test]
    fn test_empty_product_rows_are_skipped() {
        let data = rows(&[
            &["ProductCode", "ProductName", "TotalCost"],
            &["", "", "9.99"],
        ]);
        let products = CostExtractor::new(ExtractOptions::new())
            .extract(&data)
            .unwrap();

        assert!(products.is_empty());
    }

    #[test]
    fn test_missing_product_code_header() {
        let data = rows(&[&["Name", "TotalCost"], &["x", "1.00"]]);
        let err = CostExtractor::new(ExtractOptions::new())
            .extract(&data)
            .unwrap_err();

        assert!(matches!(err, AwsbillError::MissingColumn(col) if col == "ProductCode"));
    }

    #[test]
    fn test_missing_cost_before_tax_header() {
        // TotalCost alone is not enough once the caller opts out of taxes
        let data = rows(&[&["ProductCode", "ProductName", "TotalCost"]]);
        let err = CostExtractor::new(ExtractOptions::new().with_tax_mode(TaxMode::WithoutTaxes))
            .extract(&data)
            .unwrap_err();
        assert!(matches!(err, AwsbillError::MissingColumn(col) if col == "CostBeforeTax"));
    }

    #[test]
    fn test_linked_account_column_only_required_when_filtering() {
        let data = rows(&[
            &["ProductCode", "ProductName", "TotalCost"],
            &["AmazonS3", "Amazon Simple Storage Service", "1.00"],
        ]);

        // No filter: LinkedAccountId absence is fine
        assert!(CostExtractor::new(ExtractOptions::new()).extract(&data).is_ok());

        // Filter configured: absence is fatal
        let err = CostExtractor::new(
            ExtractOptions::new().with_linked_account(AccountId::new("1111")),
        )
        .extract(&data)
        .unwrap_err();
        assert!(matches!(err, AwsbillError::MissingColumn(col) if col == "LinkedAccountId"));
    }

    #[test]
    fn test_empty_export_is_missing_header() {
        let err = CostExtractor::new(ExtractOptions::new())
            .extract(&[])
            .unwrap_err();
        assert!(matches!(err, AwsbillError::MissingColumn(_)));
    }
}
