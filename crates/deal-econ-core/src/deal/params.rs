use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Capital spend per deployed unit in one amortization bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapexBucket {
    /// Spend per unit, committed in full at inception
    pub cost_per_unit: Money,
    /// Straight-line amortization window in months
    pub amortization_months: u32,
}

/// Per-unit monthly recurring cost components (cash COGS).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurringUnitCosts {
    pub connectivity: Money,
    pub third_party: Money,
    pub license: Money,
    pub labor: Money,
    pub warranty: Money,
}

impl RecurringUnitCosts {
    pub fn total(&self) -> Money {
        self.connectivity + self.third_party + self.license + self.labor + self.warranty
    }
}

/// Optional ratable recognition of part of the upfront payment as deferred
/// revenue. Cash timing is unaffected; only the accrual view changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpfrontDeferral {
    /// Share of the upfront payment recognized over the window (0..=1);
    /// the remainder is recognized at inception
    pub deferred_share: Rate,
    /// Recognition window in months
    pub recognition_months: u32,
}

/// Immutable description of one deal scenario. Passed by value into
/// [`crate::deal::evaluate`]; the engine never mutates or retains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealParameters {
    /// Contract term in operating months
    pub term_months: u32,
    /// Deployed unit count
    pub units: u32,
    /// Monthly recurring revenue per unit
    pub monthly_revenue_per_unit: Money,
    /// One-off upfront payment per unit, collected at inception
    pub upfront_per_unit: Money,
    /// Primary hardware capex
    pub primary_hardware: CapexBucket,
    /// Secondary hardware capex
    pub secondary_hardware: CapexBucket,
    /// Installation capex
    pub installation: CapexBucket,
    /// Per-unit monthly recurring cost components
    pub recurring_costs: RecurringUnitCosts,
    /// Annual discount rate for NPV (0.10 = 10%)
    pub annual_discount_rate: Rate,
    /// Optional deferred recognition of the upfront payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upfront_deferral: Option<UpfrontDeferral>,
}

impl DealParameters {
    /// Clamp degenerate fields into their valid ranges so evaluation always
    /// has a well-formed scenario to work from: term and amortization
    /// windows at least 1 month, discount rate above -100%, deferral share
    /// inside [0, 1].
    pub fn sanitized(&self) -> DealParameters {
        let mut p = self.clone();
        p.term_months = p.term_months.max(1);
        p.primary_hardware.amortization_months = p.primary_hardware.amortization_months.max(1);
        p.secondary_hardware.amortization_months = p.secondary_hardware.amortization_months.max(1);
        p.installation.amortization_months = p.installation.amortization_months.max(1);
        p.annual_discount_rate = p.annual_discount_rate.max(dec!(-0.9999));
        if let Some(ref mut deferral) = p.upfront_deferral {
            deferral.deferred_share = deferral.deferred_share.clamp(Decimal::ZERO, Decimal::ONE);
            deferral.recognition_months = deferral.recognition_months.max(1);
        }
        p
    }

    /// Total capex per unit across all buckets.
    pub fn capex_per_unit(&self) -> Money {
        self.primary_hardware.cost_per_unit
            + self.secondary_hardware.cost_per_unit
            + self.installation.cost_per_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bucket(cost: Money, months: u32) -> CapexBucket {
        CapexBucket {
            cost_per_unit: cost,
            amortization_months: months,
        }
    }

    fn degenerate_params() -> DealParameters {
        DealParameters {
            term_months: 0,
            units: 10,
            monthly_revenue_per_unit: dec!(20),
            upfront_per_unit: dec!(0),
            primary_hardware: bucket(dec!(80), 0),
            secondary_hardware: bucket(dec!(0), 24),
            installation: bucket(dec!(0), 24),
            recurring_costs: RecurringUnitCosts::default(),
            annual_discount_rate: dec!(-2),
            upfront_deferral: Some(UpfrontDeferral {
                deferred_share: dec!(1.5),
                recognition_months: 0,
            }),
        }
    }

    #[test]
    fn test_sanitized_clamps_windows_and_rates() {
        let p = degenerate_params().sanitized();
        assert_eq!(p.term_months, 1);
        assert_eq!(p.primary_hardware.amortization_months, 1);
        assert_eq!(p.annual_discount_rate, dec!(-0.9999));

        let deferral = p.upfront_deferral.unwrap();
        assert_eq!(deferral.deferred_share, Decimal::ONE);
        assert_eq!(deferral.recognition_months, 1);
    }

    #[test]
    fn test_sanitized_preserves_valid_params() {
        let mut p = degenerate_params();
        p.term_months = 36;
        p.primary_hardware.amortization_months = 24;
        p.annual_discount_rate = dec!(0.10);
        p.upfront_deferral = None;

        assert_eq!(p.sanitized(), p);
    }

    #[test]
    fn test_capex_per_unit_sums_buckets() {
        let mut p = degenerate_params();
        p.primary_hardware = bucket(dec!(80), 24);
        p.secondary_hardware = bucket(dec!(70), 24);
        p.installation = bucket(dec!(30), 24);
        assert_eq!(p.capex_per_unit(), dec!(180));
    }

    #[test]
    fn test_recurring_costs_total() {
        let costs = RecurringUnitCosts {
            connectivity: dec!(0.35),
            third_party: dec!(0.20),
            license: dec!(0.25),
            labor: dec!(0.15),
            warranty: dec!(0.05),
        };
        assert_eq!(costs.total(), dec!(1.00));
    }
}
