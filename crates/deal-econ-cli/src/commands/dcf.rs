use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use deal_econ_core::dcf;
use deal_econ_core::types::Money;

use crate::input;

/// Arguments for NPV over a raw cash-flow vector
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct NpvArgs {
    /// Annual discount rate (e.g. 0.10 for 10%)
    #[arg(long)]
    pub rate: Decimal,

    /// Comma-separated monthly cash flows, index 0 = inception
    /// (e.g. "-8000,1900,1900")
    #[arg(long, allow_hyphen_values = true)]
    pub flows: Option<String>,

    /// Path to a JSON array of cash flows (overrides --flows)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for IRR over a raw cash-flow vector
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct IrrArgs {
    /// Comma-separated monthly cash flows, index 0 = inception
    #[arg(long, allow_hyphen_values = true)]
    pub flows: Option<String>,

    /// Path to a JSON array of cash flows (overrides --flows)
    #[arg(long)]
    pub input: Option<String>,

    /// Initial monthly-rate guess for the solver
    #[arg(long, default_value = "0.10")]
    pub guess: Decimal,
}

pub fn run_npv(args: NpvArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let flows = resolve_flows(&args.input, &args.flows)?;
    let monthly = dcf::monthly_rate(args.rate);
    let npv = dcf::npv(monthly, &flows)?;

    Ok(serde_json::json!({
        "annual_rate": args.rate.to_string(),
        "monthly_rate": monthly.to_string(),
        "periods": flows.len(),
        "npv": npv.to_string(),
    }))
}

pub fn run_irr(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let flows = resolve_flows(&args.input, &args.flows)?;
    let monthly = dcf::irr(&flows, args.guess)?;

    Ok(serde_json::json!({
        "periods": flows.len(),
        "irr_monthly": monthly.to_string(),
        "irr": dcf::annualized(monthly).to_string(),
    }))
}

/// Cash flows from a JSON file, piped stdin, or the --flows list, in that
/// order of precedence.
fn resolve_flows(
    input_path: &Option<String>,
    flows_arg: &Option<String>,
) -> Result<Vec<Money>, Box<dyn std::error::Error>> {
    if let Some(path) = input_path {
        let flows: Vec<Money> = input::read_json(path)?;
        return Ok(flows);
    }
    if let Some(data) = input::read_stdin()? {
        let flows: Vec<Money> = serde_json::from_value(data)?;
        return Ok(flows);
    }
    let raw = flows_arg
        .as_deref()
        .ok_or("--flows is required (or provide --input)")?;

    raw.split(',')
        .map(|s| {
            Decimal::from_str(s.trim())
                .map_err(|e| format!("invalid cash flow '{}': {}", s.trim(), e).into())
        })
        .collect()
}
