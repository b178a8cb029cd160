use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::dcf;
use crate::types::{Money, Rate};

use super::schedule::{pct_of_revenue, PeriodRow};

/// Up to 12 consecutive operating periods rolled into one fiscal year; the
/// final year is partial when the term is not a multiple of 12. Year 1 also
/// absorbs the inception row so cumulative FCF reconciles with the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualRow {
    /// Fiscal year, 1-based
    pub year: u32,
    pub revenue: Money,
    pub total_cogs: Money,
    pub gross_margin: Money,
    /// Common-size: gross margin as a fraction of the year's revenue
    pub gross_margin_pct: Rate,
    /// Common-size: COGS as a fraction of the year's revenue
    pub cogs_pct: Rate,
    pub operating_profit: Money,
    pub free_cash_flow: Money,
    /// Running total across year boundaries
    pub cumulative_revenue: Money,
    /// Running total across year boundaries, including the inception event
    pub cumulative_fcf: Money,
}

/// Headline investment-decision metrics for the deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealSummary {
    /// NPV of the free-cash-flow vector at the deal's discount rate
    pub npv: Money,
    /// Annualized IRR; absent when the solver reports no result
    pub irr: Option<Rate>,
    /// First period with non-negative cumulative FCF; absent when never
    /// reached within the term
    pub payback_month: Option<u32>,
    /// Cumulative FCF at the final period
    pub terminal_cumulative_fcf: Money,
    /// Blended gross margin over the operating periods
    pub blended_gross_margin_pct: Rate,
}

/// Roll the period schedule into fiscal-year summaries.
pub(crate) fn annualize(schedule: &[PeriodRow]) -> Vec<AnnualRow> {
    let mut years: Vec<AnnualRow> = Vec::new();

    for row in schedule {
        let year = if row.period == 0 {
            1
        } else {
            (row.period - 1) / 12 + 1
        };
        if years.len() < year as usize {
            years.push(AnnualRow {
                year,
                revenue: Decimal::ZERO,
                total_cogs: Decimal::ZERO,
                gross_margin: Decimal::ZERO,
                gross_margin_pct: Decimal::ZERO,
                cogs_pct: Decimal::ZERO,
                operating_profit: Decimal::ZERO,
                free_cash_flow: Decimal::ZERO,
                cumulative_revenue: Decimal::ZERO,
                cumulative_fcf: Decimal::ZERO,
            });
        }

        let y = &mut years[year as usize - 1];
        y.revenue += row.revenue;
        y.total_cogs += row.total_cogs;
        y.gross_margin += row.gross_margin;
        y.operating_profit += row.operating_profit;
        y.free_cash_flow += row.free_cash_flow;
    }

    let mut cumulative_revenue = Decimal::ZERO;
    let mut cumulative_fcf = Decimal::ZERO;
    for y in &mut years {
        y.gross_margin_pct = pct_of_revenue(y.gross_margin, y.revenue);
        y.cogs_pct = pct_of_revenue(y.total_cogs, y.revenue);
        cumulative_revenue += y.revenue;
        cumulative_fcf += y.free_cash_flow;
        y.cumulative_revenue = cumulative_revenue;
        y.cumulative_fcf = cumulative_fcf;
    }

    years
}

/// Derive the headline metrics from a finished schedule. Solver failures
/// degrade to absent metrics with a warning; this never errors.
pub(crate) fn summarize(
    schedule: &[PeriodRow],
    annual_discount_rate: Rate,
    warnings: &mut Vec<String>,
) -> DealSummary {
    let flows: Vec<Money> = schedule.iter().map(|r| r.free_cash_flow).collect();
    let rate = dcf::monthly_rate(annual_discount_rate);

    let npv = match dcf::npv(rate, &flows) {
        Ok(v) => v,
        Err(e) => {
            warnings.push(format!("NPV unavailable at the supplied discount rate: {e}"));
            Decimal::ZERO
        }
    };

    let irr = match dcf::irr(&flows, dec!(0.10)) {
        Ok(r) => Some(dcf::annualized(r)),
        Err(e) => {
            warnings.push(format!("IRR unavailable: {e}"));
            None
        }
    };

    let payback_month = schedule
        .iter()
        .find(|r| r.cumulative_fcf >= Decimal::ZERO)
        .map(|r| r.period);

    let operating = &schedule[1..];
    let op_revenue: Money = operating.iter().map(|r| r.revenue).sum();
    let op_cogs: Money = operating.iter().map(|r| r.total_cogs).sum();

    DealSummary {
        npv,
        irr,
        payback_month,
        terminal_cumulative_fcf: schedule.last().map(|r| r.cumulative_fcf).unwrap_or_default(),
        blended_gross_margin_pct: pct_of_revenue(op_revenue - op_cogs, op_revenue),
    }
}
