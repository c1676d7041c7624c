//! EMI breakdown calculator and amortisation tables for single loans.

pub mod breakdown;
pub mod schedule;

pub use breakdown::{
    calculate_emi_breakdown, compute_breakdown, loan_summary, next_breakdown, EmiBreakdownInput,
    LoanSummary, LoanTerms, MonthlyBreakdown,
};
pub use schedule::{
    build_amortization_schedule, calculate_amortization, AmortizationRow, AmortizationSchedule,
};
