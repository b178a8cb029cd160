use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_econ_core::deal::{
    self, CapexBucket, DealParameters, RecurringUnitCosts, UpfrontDeferral,
};

use crate::input;

/// Arguments for deal evaluation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EvaluateArgs {
    /// Path to a JSON file with the full DealParameters record
    /// (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Contract term in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Deployed unit count
    #[arg(long)]
    pub units: Option<u32>,

    /// Monthly recurring revenue per unit
    #[arg(long)]
    pub monthly_revenue: Option<Decimal>,

    /// Upfront payment per unit, collected at inception
    #[arg(long, default_value = "0")]
    pub upfront: Decimal,

    /// Primary hardware capex per unit
    #[arg(long, default_value = "0")]
    pub primary_capex: Decimal,

    /// Primary hardware amortization term in months
    #[arg(long, default_value = "24")]
    pub primary_amortization: u32,

    /// Secondary hardware capex per unit
    #[arg(long, default_value = "0")]
    pub secondary_capex: Decimal,

    /// Secondary hardware amortization term in months
    #[arg(long, default_value = "24")]
    pub secondary_amortization: u32,

    /// Installation capex per unit
    #[arg(long, default_value = "0")]
    pub installation_capex: Decimal,

    /// Installation amortization term in months
    #[arg(long, default_value = "24")]
    pub installation_amortization: u32,

    /// Per-unit monthly connectivity cost
    #[arg(long, default_value = "0")]
    pub connectivity: Decimal,

    /// Per-unit monthly third-party service cost
    #[arg(long, default_value = "0")]
    pub third_party: Decimal,

    /// Per-unit monthly license cost
    #[arg(long, default_value = "0")]
    pub license: Decimal,

    /// Per-unit monthly labor cost
    #[arg(long, default_value = "0")]
    pub labor: Decimal,

    /// Per-unit monthly warranty reserve
    #[arg(long, default_value = "0")]
    pub warranty: Decimal,

    /// Annual discount rate (e.g. 0.10 for 10%)
    #[arg(long, default_value = "0.10")]
    pub discount_rate: Decimal,

    /// Share of the upfront payment recognized as deferred revenue (0..1)
    #[arg(long)]
    pub deferred_share: Option<Decimal>,

    /// Recognition window for deferred upfront revenue, in months
    #[arg(long)]
    pub deferred_months: Option<u32>,
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params: DealParameters = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let upfront_deferral = match (args.deferred_share, args.deferred_months) {
            (None, None) => None,
            (share, months) => Some(UpfrontDeferral {
                deferred_share: share.unwrap_or(Decimal::ONE),
                recognition_months: months.unwrap_or(12),
            }),
        };

        DealParameters {
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            units: args.units.ok_or("--units is required (or provide --input)")?,
            monthly_revenue_per_unit: args
                .monthly_revenue
                .ok_or("--monthly-revenue is required (or provide --input)")?,
            upfront_per_unit: args.upfront,
            primary_hardware: CapexBucket {
                cost_per_unit: args.primary_capex,
                amortization_months: args.primary_amortization,
            },
            secondary_hardware: CapexBucket {
                cost_per_unit: args.secondary_capex,
                amortization_months: args.secondary_amortization,
            },
            installation: CapexBucket {
                cost_per_unit: args.installation_capex,
                amortization_months: args.installation_amortization,
            },
            recurring_costs: RecurringUnitCosts {
                connectivity: args.connectivity,
                third_party: args.third_party,
                license: args.license,
                labor: args.labor,
                warranty: args.warranty,
            },
            annual_discount_rate: args.discount_rate,
            upfront_deferral,
        }
    };

    let result = deal::evaluate(&params);
    Ok(serde_json::to_value(result)?)
}
