use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Raw cash-flow input for the standalone NPV/IRR functions.
#[derive(Deserialize)]
struct CashFlowInput {
    /// Monthly cash flows, index 0 = inception
    flows: Vec<Decimal>,
    /// Annual discount rate (NPV only)
    #[serde(default)]
    annual_rate: Option<Decimal>,
    /// Initial monthly-rate guess for the IRR solver
    #[serde(default)]
    guess: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Deal evaluation
// ---------------------------------------------------------------------------

#[napi]
pub fn evaluate_deal(params_json: String) -> NapiResult<String> {
    let params: deal_econ_core::deal::DealParameters =
        serde_json::from_str(&params_json).map_err(to_napi_error)?;
    let output = deal_econ_core::deal::evaluate(&params);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Standalone DCF utilities
// ---------------------------------------------------------------------------

#[napi]
pub fn npv(input_json: String) -> NapiResult<String> {
    let input: CashFlowInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let annual = input
        .annual_rate
        .ok_or_else(|| napi::Error::from_reason("annual_rate is required for NPV"))?;
    let monthly = deal_econ_core::dcf::monthly_rate(annual);
    let value = deal_econ_core::dcf::npv(monthly, &input.flows).map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({
        "monthly_rate": monthly.to_string(),
        "npv": value.to_string(),
    }))
    .map_err(to_napi_error)
}

#[napi]
pub fn irr(input_json: String) -> NapiResult<String> {
    let input: CashFlowInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let guess = input.guess.unwrap_or(Decimal::new(1, 1)); // 0.1
    let monthly = deal_econ_core::dcf::irr(&input.flows, guess).map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({
        "irr_monthly": monthly.to_string(),
        "irr": deal_econ_core::dcf::annualized(monthly).to_string(),
    }))
    .map_err(to_napi_error)
}
