use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use debt_engine_core::repayment::{self, StrategyComparisonInput};

use crate::input;

/// Arguments for the avalanche vs snowball comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file with a `debts` array
    #[arg(long)]
    pub input: Option<String>,

    /// Extra monthly payment on top of the minimums (overrides the input file)
    #[arg(long)]
    pub extra: Option<Decimal>,

    /// Stop simulating after this many months
    #[arg(long)]
    pub max_months: Option<u32>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut cmp_input: StrategyComparisonInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        return Err("--input <file.json> or stdin required for strategy comparison".into());
    };

    if let Some(extra) = args.extra {
        cmp_input.extra_monthly_payment = extra;
    }
    if args.max_months.is_some() {
        cmp_input.max_months = args.max_months;
    }

    let result = repayment::run_strategy_comparison(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}
