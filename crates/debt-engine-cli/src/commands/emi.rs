use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use debt_engine_core::emi::{self, EmiBreakdownInput, LoanTerms};
use debt_engine_core::InterestType;

use crate::input;

/// Loan terms shared by the EMI commands
#[derive(Args)]
pub struct LoanArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Tenure in months
    #[arg(long)]
    pub tenure_months: Option<u32>,

    /// Annual interest rate in percent (e.g. 12 for 12%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Interest type: flat or diminishing
    #[arg(long)]
    pub interest_type: Option<String>,
}

impl LoanArgs {
    fn into_terms(self) -> Result<LoanTerms, Box<dyn std::error::Error>> {
        let principal = self
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let tenure_months = self
            .tenure_months
            .ok_or("--tenure-months is required (or provide --input)")?;
        let rate = self.rate.ok_or("--rate is required (or provide --input)")?;
        let interest_type: InterestType = self
            .interest_type
            .ok_or("--interest-type is required (or provide --input)")?
            .parse()?;

        Ok(LoanTerms {
            principal,
            tenure_months,
            annual_interest_rate_percent: rate,
            interest_type,
        })
    }
}

/// Arguments for a single-month EMI breakdown
#[derive(Args)]
pub struct EmiArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub loan: LoanArgs,

    /// Month of the installment to break down (1-based)
    #[arg(long, default_value_t = 1)]
    pub month: u32,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let emi_input: EmiBreakdownInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        EmiBreakdownInput {
            terms: args.loan.into_terms()?,
            target_month: args.month,
        }
    };

    let result = emi::calculate_emi_breakdown(&emi_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for a full amortisation schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(piped) = input::stdin::read_stdin()? {
        piped
    } else {
        args.loan.into_terms()?
    };

    let result = emi::calculate_amortization(&terms)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn loan_args() -> LoanArgs {
        LoanArgs {
            principal: Some(dec!(120000)),
            tenure_months: Some(12),
            rate: Some(dec!(12)),
            interest_type: Some("flat".into()),
        }
    }

    #[test]
    fn test_flags_build_terms() {
        let terms = loan_args().into_terms().unwrap();
        assert_eq!(terms.interest_type, InterestType::Flat);
        assert_eq!(terms.tenure_months, 12);
    }

    #[test]
    fn test_missing_flag_reported() {
        let mut args = loan_args();
        args.rate = None;
        let err = args.into_terms().unwrap_err();
        assert!(err.to_string().contains("--rate"));
    }

    #[test]
    fn test_bad_interest_type_reported() {
        let mut args = loan_args();
        args.interest_type = Some("balloon".into());
        let err = args.into_terms().unwrap_err();
        assert!(err.to_string().contains("interest_type"));
    }
}
