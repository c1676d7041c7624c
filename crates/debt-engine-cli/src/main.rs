mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::emi::{EmiArgs, ScheduleArgs};
use commands::repayment::CompareArgs;
use output::OutputFormat;

/// Loan EMI breakdowns and debt repayment strategy comparison
#[derive(Parser)]
#[command(
    name = "debtx",
    version,
    about = "Loan EMI breakdowns and debt repayment strategy comparison",
    long_about = "A CLI for loan amortisation and multi-debt payoff planning with decimal \
                  precision. Supports flat and reducing-balance EMI breakdowns, full \
                  amortisation schedules, and avalanche vs snowball simulations."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log computation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Principal/interest split of one month's installment
    Emi(EmiArgs),
    /// Full month-by-month amortisation schedule
    Schedule(ScheduleArgs),
    /// Compare avalanche and snowball payoff strategies
    Compare(CompareArgs),
    /// Print version information
    Version,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("DEBTX_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::emi::run_emi(args),
        Commands::Schedule(args) => commands::emi::run_schedule(args),
        Commands::Compare(args) => commands::repayment::run_compare(args),
        Commands::Version => {
            println!("debtx {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            cli.output.render(&value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
