use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::breakdown::LoanTerms;
use crate::interest;
use crate::types::*;
use crate::DebtEngineResult;

/// Residual balance below which the final row is treated as fully repaid.
const BALANCE_EPSILON: Decimal = dec!(0.01);

/// A single row of the amortisation table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub opening_balance: Money,
    pub installment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub closing_balance: Money,
}

/// Full month-by-month repayment table for one loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub interest_type: InterestType,
    pub installment: Money,
    pub rows: Vec<AmortizationRow>,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_paid: Money,
}

/// Build the amortisation table for every month of the tenure.
pub fn build_amortization_schedule(terms: &LoanTerms) -> DebtEngineResult<AmortizationSchedule> {
    terms.validate()?;

    let n = Decimal::from(terms.tenure_months);
    let rate = interest::monthly_rate(terms.annual_interest_rate_percent);

    let (installment, flat_interest) = match terms.interest_type {
        InterestType::Flat => {
            let total = interest::flat_total_interest(
                terms.principal,
                terms.annual_interest_rate_percent,
                terms.tenure_months,
            );
            ((terms.principal + total) / n, Some(total / n))
        }
        InterestType::Diminishing => (
            interest::annuity_installment(terms.principal, rate, terms.tenure_months)?,
            None,
        ),
    };

    let mut rows = Vec::with_capacity(terms.tenure_months as usize);
    let mut balance = terms.principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;

    for month in 1..=terms.tenure_months {
        let opening = balance;
        let interest_portion = flat_interest.unwrap_or(opening * rate);
        let principal_portion = installment - interest_portion;
        balance = match flat_interest {
            Some(_) => opening - principal_portion,
            None => interest::annuity_balance_after(
                terms.principal,
                rate,
                terms.tenure_months,
                month,
            )?,
        };

        if month == terms.tenure_months && balance.abs() < BALANCE_EPSILON {
            balance = Decimal::ZERO;
        }

        total_interest += interest_portion;
        total_principal += principal_portion;

        rows.push(AmortizationRow {
            month,
            opening_balance: round_money(opening),
            installment: round_money(installment),
            principal_portion: round_money(principal_portion),
            interest_portion: round_money(interest_portion),
            closing_balance: round_money(balance),
        });
    }

    Ok(AmortizationSchedule {
        interest_type: terms.interest_type,
        installment: round_money(installment),
        rows,
        total_interest: round_money(total_interest),
        total_principal: round_money(total_principal),
        total_paid: round_money(total_interest + total_principal),
    })
}

/// Amortisation table wrapped in the standard output envelope.
pub fn calculate_amortization(
    terms: &LoanTerms,
) -> DebtEngineResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let schedule = build_amortization_schedule(terms)?;

    tracing::debug!(
        interest_type = %terms.interest_type,
        months = schedule.rows.len(),
        total_interest = %schedule.total_interest,
        "built amortisation schedule"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Amortisation Schedule",
        terms,
        Vec::new(),
        elapsed,
        schedule,
    ))
}
