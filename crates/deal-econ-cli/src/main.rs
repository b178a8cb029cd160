mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::dcf::{IrrArgs, NpvArgs};
use commands::deal::EvaluateArgs;

/// Deal economics for hardware-plus-subscription contracts
#[derive(Parser)]
#[command(
    name = "dea",
    version,
    about = "Deal economics for hardware-plus-subscription contracts",
    long_about = "Projects the month-by-month P&L and cash-flow schedule of a \
                  hardware-plus-subscription deal and derives NPV, IRR, payback, \
                  and blended gross margin with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a deal scenario into a schedule, annual roll-up, and summary
    Evaluate(EvaluateArgs),
    /// Net present value of a raw cash-flow vector
    Npv(NpvArgs),
    /// Internal rate of return of a raw cash-flow vector
    Irr(IrrArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Evaluate(args) => commands::deal::run_evaluate(args),
        Commands::Npv(args) => commands::dcf::run_npv(args),
        Commands::Irr(args) => commands::dcf::run_irr(args),
        Commands::Version => {
            println!("dea {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
