use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use debt_engine_core::emi::{self, EmiBreakdownInput, LoanTerms};
use debt_engine_core::repayment::{self, StrategyComparisonInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<T: for<'de> Deserialize<'de>>(input_json: &str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn emi_breakdown(input_json: String) -> NapiResult<String> {
    let input: EmiBreakdownInput = parse(&input_json)?;
    let output = emi::calculate_emi_breakdown(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let terms: LoanTerms = parse(&input_json)?;
    let output = emi::calculate_amortization(&terms).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Repayment strategies
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_strategies(input_json: String) -> NapiResult<String> {
    let input: StrategyComparisonInput = parse(&input_json)?;
    let output = repayment::run_strategy_comparison(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
