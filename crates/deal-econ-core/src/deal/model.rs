use rust_decimal::Decimal;

use crate::types::Money;

use super::params::DealParameters;

/// Straight-line monthly amortization for one capex bucket.
#[derive(Debug, Clone)]
pub(crate) struct BucketAmortization {
    /// Expense per month while the window is open
    pub monthly: Money,
    /// Window length: expense runs over operating periods 1..=months
    pub months: u32,
}

impl BucketAmortization {
    /// Expense active in operating period `period`, zero outside the window.
    pub fn at(&self, period: u32) -> Money {
        if period >= 1 && period <= self.months {
            self.monthly
        } else {
            Decimal::ZERO
        }
    }
}

/// Per-evaluation constants derived once from the deal parameters:
/// everything the schedule builder consumes.
#[derive(Debug, Clone)]
pub(crate) struct CashModel {
    /// Total capital outlay at inception (positive figure)
    pub capex_total: Money,
    /// Upfront cash collected at inception
    pub upfront_total: Money,
    /// Per-bucket amortization: primary, secondary, installation
    pub amortization: [BucketAmortization; 3],
    /// Cash COGS per operating month
    pub monthly_recurring_cost: Money,
    /// Recurring revenue per operating month
    pub monthly_recurring_revenue: Money,
    /// Upfront revenue recognized at inception (the non-deferred share; zero
    /// when no deferral is configured — the payment is then cash-only)
    pub inception_revenue: Money,
    /// Upfront revenue recognized per month inside the deferral window
    pub deferred_monthly_revenue: Money,
    /// Deferral window length (0 when disabled)
    pub deferral_months: u32,
}

impl CashModel {
    /// Expects sanitized parameters (windows ≥ 1).
    pub fn derive(params: &DealParameters) -> Self {
        let units = Decimal::from(params.units);

        let capex_total = units * params.capex_per_unit();
        let upfront_total = units * params.upfront_per_unit;

        let amortization = [
            &params.primary_hardware,
            &params.secondary_hardware,
            &params.installation,
        ]
        .map(|bucket| BucketAmortization {
            monthly: straight_line(units * bucket.cost_per_unit, bucket.amortization_months),
            months: bucket.amortization_months,
        });

        let (inception_revenue, deferred_monthly_revenue, deferral_months) =
            match params.upfront_deferral {
                Some(ref deferral) => {
                    let deferred = upfront_total * deferral.deferred_share;
                    (
                        upfront_total - deferred,
                        straight_line(deferred, deferral.recognition_months),
                        deferral.recognition_months,
                    )
                }
                None => (Decimal::ZERO, Decimal::ZERO, 0),
            };

        CashModel {
            capex_total,
            upfront_total,
            amortization,
            monthly_recurring_cost: units * params.recurring_costs.total(),
            monthly_recurring_revenue: units * params.monthly_revenue_per_unit,
            inception_revenue,
            deferred_monthly_revenue,
            deferral_months,
        }
    }

    /// Total amortization expense active in operating period `period`.
    pub fn amortization_at(&self, period: u32) -> Money {
        self.amortization.iter().map(|b| b.at(period)).sum()
    }

    /// Deferred-upfront revenue recognized in operating period `period`.
    pub fn deferred_revenue_at(&self, period: u32) -> Money {
        if period >= 1 && period <= self.deferral_months {
            self.deferred_monthly_revenue
        } else {
            Decimal::ZERO
        }
    }
}

/// Even spend over the window; a zero window yields no expense rather than
/// an undefined value.
fn straight_line(total: Money, months: u32) -> Money {
    if months == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::params::{CapexBucket, RecurringUnitCosts, UpfrontDeferral};
    use rust_decimal_macros::dec;

    fn reference_params() -> DealParameters {
        DealParameters {
            term_months: 36,
            units: 100,
            monthly_revenue_per_unit: dec!(20),
            upfront_per_unit: dec!(100),
            primary_hardware: CapexBucket {
                cost_per_unit: dec!(80),
                amortization_months: 24,
            },
            secondary_hardware: CapexBucket {
                cost_per_unit: dec!(70),
                amortization_months: 24,
            },
            installation: CapexBucket {
                cost_per_unit: dec!(30),
                amortization_months: 24,
            },
            recurring_costs: RecurringUnitCosts {
                connectivity: dec!(0.35),
                third_party: dec!(0.20),
                license: dec!(0.25),
                labor: dec!(0.15),
                warranty: dec!(0.05),
            },
            annual_discount_rate: dec!(0.10),
            upfront_deferral: None,
        }
    }

    #[test]
    fn test_derived_cash_totals() {
        let model = CashModel::derive(&reference_params());
        assert_eq!(model.capex_total, dec!(18_000));
        assert_eq!(model.upfront_total, dec!(10_000));
        assert_eq!(model.monthly_recurring_revenue, dec!(2_000));
        assert_eq!(model.monthly_recurring_cost, dec!(100));
    }

    #[test]
    fn test_straight_line_amortization_window() {
        let model = CashModel::derive(&reference_params());

        // 18,000 over 24 months = 750/month while every bucket is open
        assert!((model.amortization_at(1) - dec!(750)).abs() < dec!(0.0001));
        assert!((model.amortization_at(24) - dec!(750)).abs() < dec!(0.0001));
        assert_eq!(model.amortization_at(25), Decimal::ZERO);
        assert_eq!(model.amortization_at(0), Decimal::ZERO);
    }

    #[test]
    fn test_staggered_bucket_windows() {
        let mut params = reference_params();
        params.installation.amortization_months = 12;
        let model = CashModel::derive(&params);

        // Installation (3,000 / 12 = 250) drops out after month 12
        let month_12 = model.amortization_at(12);
        let month_13 = model.amortization_at(13);
        assert!((month_12 - month_13 - dec!(250)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_no_deferral_means_cash_only_upfront() {
        let model = CashModel::derive(&reference_params());
        assert_eq!(model.inception_revenue, Decimal::ZERO);
        assert_eq!(model.deferred_revenue_at(1), Decimal::ZERO);
    }

    #[test]
    fn test_deferral_splits_upfront_recognition() {
        let mut params = reference_params();
        params.upfront_deferral = Some(UpfrontDeferral {
            deferred_share: dec!(0.6),
            recognition_months: 12,
        });
        let model = CashModel::derive(&params);

        // 40% of 10,000 at inception; 60% over 12 months = 500/month
        assert_eq!(model.inception_revenue, dec!(4_000));
        assert_eq!(model.deferred_revenue_at(1), dec!(500));
        assert_eq!(model.deferred_revenue_at(12), dec!(500));
        assert_eq!(model.deferred_revenue_at(13), Decimal::ZERO);
        // Cash timing is untouched
        assert_eq!(model.upfront_total, dec!(10_000));
    }

    #[test]
    fn test_zero_units_zero_everything() {
        let mut params = reference_params();
        params.units = 0;
        let model = CashModel::derive(&params);

        assert_eq!(model.capex_total, Decimal::ZERO);
        assert_eq!(model.upfront_total, Decimal::ZERO);
        assert_eq!(model.monthly_recurring_revenue, Decimal::ZERO);
        assert_eq!(model.monthly_recurring_cost, Decimal::ZERO);
        assert_eq!(model.amortization_at(1), Decimal::ZERO);
    }
}
