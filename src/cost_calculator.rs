//! Cost calculator for running-instance spend
//!
//! Prices the running subset of an instance inventory against the static
//! rate table and projects the hourly total to a 30-day month. Costs stay
//! as plain `f64` sums; rounding happens only at presentation time.

use crate::error::Result;
use crate::rate_table::RateTable;
use crate::types::InstanceDescriptor;
use std::sync::Arc;
use tracing::debug;

/// Hours in a billed day
pub const HOURS_PER_DAY: f64 = 24.0;
/// Days in the estimation month
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Calculates monthly run-rate from instance descriptors and hourly rates
pub struct CostCalculator {
    /// Rate table instance
    rate_table: Arc<RateTable>,
}

impl CostCalculator {
    /// Create a new CostCalculator
    pub fn new(rate_table: Arc<RateTable>) -> Self {
        Self { rate_table }
    }

    /// Estimated monthly cost of one instance type
    ///
    /// # Errors
    ///
    /// Returns [`crate::AwsbillError::UnknownInstanceType`] when the type
    /// has no entry in the rate table.
    pub fn monthly_rate(&self, descriptor: &InstanceDescriptor) -> Result<f64> {
        let hourly = self.rate_table.hourly_rate(&descriptor.instance_type)?;
        Ok(hourly * HOURS_PER_DAY * DAYS_PER_MONTH)
    }

    /// Estimated monthly cost of all running instances
    ///
    /// Non-running instances are excluded before pricing, so a stopped
    /// instance of an unpriced type does not fail the estimate. A running
    /// instance of an unpriced type does; an unpriced running instance
    /// would otherwise silently undercount spend.
    pub fn monthly_instance_cost(&self, instances: &[InstanceDescriptor]) -> Result<f64> {
        let mut cost = 0.0;
        let mut running = 0usize;

        for descriptor in instances.iter().filter(|i| i.state.is_running()) {
            cost += self.monthly_rate(descriptor)?;
            running += 1;
        }

        debug!(
            "monthly EC2 cost: ${cost:.2} across {running} running of {} instances",
            instances.len()
        );

        Ok(cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AwsbillError;
    use crate::types::{InstanceState, InstanceType};
    use std::collections::HashMap;

    fn test_calculator() -> CostCalculator {
        let mut rates = HashMap::new();
        rates.insert(InstanceType::new("a1.test"), 0.10);
        rates.insert(InstanceType::new("b1.test"), 0.20);
        CostCalculator::new(Arc::new(RateTable::from_rates(rates)))
    }

    #[test]
    fn test_only_running_instances_are_priced() {
        let calculator = test_calculator();
        let instances = vec![
            InstanceDescriptor::new("a1.test", InstanceState::Running),
            InstanceDescriptor::new("a1.test", InstanceState::Stopped),
            InstanceDescriptor::new("b1.test", InstanceState::Running),
        ];

        // 0.10*24*30 + 0.20*24*30 = 72 + 144
        let cost = calculator.monthly_instance_cost(&instances).unwrap();
        assert!((cost - 216.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_inventory_costs_nothing() {
        let cost = test_calculator().monthly_instance_cost(&[]).unwrap();
        assert_eq!(cost, 0.0);
    }

    #[test]
    fn test_unknown_running_type_is_an_error() {
        let calculator = test_calculator();
        let instances = vec![InstanceDescriptor::new("z9.unpriced", InstanceState::Running)];

        let err = calculator.monthly_instance_cost(&instances).unwrap_err();
        assert!(matches!(err, AwsbillError::UnknownInstanceType(ty) if ty.as_str() == "z9.unpriced"));
    }

    #[test]
    fn test_unknown_stopped_type_is_ignored() {
        let calculator = test_calculator();
        let instances = vec![
            InstanceDescriptor::new("z9.unpriced", InstanceState::Stopped),
            InstanceDescriptor::new("a1.test", InstanceState::Running),
        ];

        let cost = calculator.monthly_instance_cost(&instances).unwrap();
        assert!((cost - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_monthly_rate() {
        let calculator = test_calculator();
        let rate = calculator
            .monthly_rate(&InstanceDescriptor::new("b1.test", InstanceState::Running))
            .unwrap();
        assert!((rate - 144.0).abs() < 1e-9);
    }
}
