//! Deal-economics evaluation: parameters in, monthly schedule, annual
//! roll-up, and headline metrics out. The engine is a pure function; the
//! caller owns any notion of a "current scenario".

mod model;
mod params;
mod reporting;
mod schedule;

pub use params::{CapexBucket, DealParameters, RecurringUnitCosts, UpfrontDeferral};
pub use reporting::{AnnualRow, DealSummary};
pub use schedule::PeriodRow;

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::types::{with_metadata, ComputationOutput};

use model::CashModel;

/// Complete result of one evaluation. Recomputed wholesale on every call;
/// no state is shared across evaluations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealEvaluation {
    /// Period 0 (inception) through the final operating month, in order
    pub schedule: Vec<PeriodRow>,
    /// Fiscal-year roll-up of the schedule
    pub annual: Vec<AnnualRow>,
    /// Headline investment-decision metrics
    pub summary: DealSummary,
}

/// Evaluate a deal scenario.
///
/// Degenerate input is clamped into range rather than rejected, so this
/// always returns a complete result; an unsolvable IRR surfaces as
/// `summary.irr = None` with a warning in the envelope.
pub fn evaluate(params: &DealParameters) -> ComputationOutput<DealEvaluation> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let p = params.sanitized();
    if p != *params {
        warnings.push("Degenerate parameters were clamped into their valid ranges".into());
    }

    let model = CashModel::derive(&p);
    let schedule = schedule::build_schedule(&p, &model);
    let annual = reporting::annualize(&schedule);
    let summary = reporting::summarize(&schedule, p.annual_discount_rate, &mut warnings);

    let result = DealEvaluation {
        schedule,
        annual,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Monthly accrual schedule with cash bridge; DCF at monthly compounding",
        &serde_json::json!({
            "term_months": p.term_months,
            "units": p.units,
            "monthly_revenue_per_unit": p.monthly_revenue_per_unit.to_string(),
            "upfront_per_unit": p.upfront_per_unit.to_string(),
            "capex_per_unit": p.capex_per_unit().to_string(),
            "annual_discount_rate": p.annual_discount_rate.to_string(),
            "upfront_deferral": p.upfront_deferral.is_some(),
        }),
        warnings,
        elapsed,
        result,
    )
}
