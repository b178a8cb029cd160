use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

use super::model::CashModel;
use super::params::DealParameters;

/// One row of the monthly accrual and cash-flow schedule. Period 0 is the
/// inception cash event; periods 1..=term are operating months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRow {
    pub period: u32,
    /// Accrual revenue recognized in the period
    pub revenue: Money,
    /// Portion of revenue sourced from the upfront payment (non-cash in the
    /// FCF bridge — the cash itself lands in `upfront_cash` at inception)
    pub upfront_revenue: Money,
    /// Recurring cash cost of goods sold
    pub recurring_cogs: Money,
    pub amortization_primary: Money,
    pub amortization_secondary: Money,
    pub amortization_installation: Money,
    pub amortization_total: Money,
    pub total_cogs: Money,
    pub gross_margin: Money,
    pub gross_margin_pct: Rate,
    /// Equal to gross margin: all operating costs are modeled inside COGS
    pub operating_profit: Money,
    /// Non-cash amortization added back for the cash view
    pub amortization_addback: Money,
    /// Capital cash outflow (negative, inception only)
    pub capex_cash: Money,
    /// Upfront cash inflow (positive, inception only)
    pub upfront_cash: Money,
    pub free_cash_flow: Money,
    pub cumulative_fcf: Money,
}

/// A line item as a fraction of revenue; 0 when there is no revenue to
/// compare against, never an undefined value.
pub(crate) fn pct_of_revenue(value: Money, revenue: Money) -> Rate {
    if revenue > Decimal::ZERO {
        value / revenue
    } else {
        Decimal::ZERO
    }
}

/// Build the ordered period schedule from inception through the contract
/// term. Each row is final once pushed; only the cumulative carries forward.
pub(crate) fn build_schedule(params: &DealParameters, model: &CashModel) -> Vec<PeriodRow> {
    let mut rows = Vec::with_capacity(params.term_months as usize + 1);
    let mut cumulative = Decimal::ZERO;

    for period in 0..=params.term_months {
        let is_inception = period == 0;

        let upfront_revenue = if is_inception {
            model.inception_revenue
        } else {
            model.deferred_revenue_at(period)
        };
        let revenue = if is_inception {
            upfront_revenue
        } else {
            model.monthly_recurring_revenue + upfront_revenue
        };

        let recurring_cogs = if is_inception {
            Decimal::ZERO
        } else {
            model.monthly_recurring_cost
        };
        let [amortization_primary, amortization_secondary, amortization_installation] =
            [0, 1, 2].map(|i| model.amortization[i].at(period));
        let amortization_total = model.amortization_at(period);

        let total_cogs = recurring_cogs + amortization_total;
        let gross_margin = revenue - total_cogs;
        let operating_profit = gross_margin;

        let capex_cash = if is_inception {
            -model.capex_total
        } else {
            Decimal::ZERO
        };
        let upfront_cash = if is_inception {
            model.upfront_total
        } else {
            Decimal::ZERO
        };

        // Accrual-to-cash bridge: add back non-cash amortization, back out
        // non-cash (upfront-sourced) revenue, then layer the inception cash
        // events. With no deferral this is profit + add-back + cash events.
        let free_cash_flow =
            operating_profit + amortization_total - upfront_revenue + capex_cash + upfront_cash;
        cumulative += free_cash_flow;

        rows.push(PeriodRow {
            period,
            revenue,
            upfront_revenue,
            recurring_cogs,
            amortization_primary,
            amortization_secondary,
            amortization_installation,
            amortization_total,
            total_cogs,
            gross_margin,
            gross_margin_pct: pct_of_revenue(gross_margin, revenue),
            operating_profit,
            amortization_addback: amortization_total,
            capex_cash,
            upfront_cash,
            free_cash_flow,
            cumulative_fcf: cumulative,
        });
    }

    rows
}
