//! Interest-accrual rules shared by the EMI calculator and the repayment
//! simulator. Rates arrive as annual percentages and are converted here.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::DebtEngineError;
use crate::types::{Money, Percent, Rate};
use crate::DebtEngineResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const HUNDRED: Decimal = dec!(100);

/// Annual percentage to a decimal monthly rate (12 -> 0.01).
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / HUNDRED / MONTHS_PER_YEAR
}

/// Total interest charged over the whole tenure of a flat-rate loan.
pub fn flat_total_interest(
    principal: Money,
    annual_rate_percent: Percent,
    tenure_months: u32,
) -> Money {
    principal * (annual_rate_percent / HUNDRED) * (Decimal::from(tenure_months) / MONTHS_PER_YEAR)
}

/// Interest charged each month on a flat-rate loan. Independent of the
/// outstanding balance.
///
/// `total / tenure` reduces to `principal * monthly_rate`, which also keeps a
/// zero-tenure snapshot well defined.
pub fn flat_monthly_interest(original_principal: Money, annual_rate_percent: Percent) -> Money {
    original_principal * monthly_rate(annual_rate_percent)
}

/// Interest charged for one month on a reducing balance.
pub fn diminishing_monthly_interest(balance: Money, annual_rate_percent: Percent) -> Money {
    balance * monthly_rate(annual_rate_percent)
}

/// `(1+r)^-periods`, raised from `1/(1+r)` so it shrinks toward zero instead
/// of overflowing for long tenures or steep rates.
fn discount_factor(rate: Rate, periods: u32) -> DebtEngineResult<Decimal> {
    Decimal::ONE
        .checked_div(Decimal::ONE + rate)
        .and_then(|v| v.checked_powi(periods as i64))
        .ok_or_else(|| {
            DebtEngineError::invalid(
                "annual_interest_rate_percent",
                "Discount factor outside the representable range",
            )
        })
}

/// `1 - (1+r)^-n`, the annuity denominator.
fn annuity_denominator(rate: Rate, n: u32) -> DebtEngineResult<Decimal> {
    let denominator = Decimal::ONE - discount_factor(rate, n)?;
    if denominator.is_zero() {
        return Err(DebtEngineError::DivisionByZero {
            context: "annuity installment denominator".into(),
        });
    }
    Ok(denominator)
}

/// Level annuity payment: `P * r / (1 - (1+r)^-n)`.
///
/// A zero rate degenerates to straight-line repayment `P / n`.
pub fn annuity_installment(principal: Money, rate: Rate, n: u32) -> DebtEngineResult<Money> {
    if n == 0 {
        return Err(DebtEngineError::invalid(
            "tenure_months",
            "Number of periods must be > 0",
        ));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(n));
    }

    let denominator = annuity_denominator(rate, n)?;
    principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_div(denominator))
        .ok_or_else(|| DebtEngineError::invalid("principal", "Installment overflows Decimal range"))
}

/// Outstanding balance of a level-annuity loan after `paid` installments:
/// `P * (1 - (1+r)^-(n-paid)) / (1 - (1+r)^-n)`.
///
/// Closed form, so late rows of long or steep loans keep their precision.
pub fn annuity_balance_after(
    principal: Money,
    rate: Rate,
    n: u32,
    paid: u32,
) -> DebtEngineResult<Money> {
    if n == 0 || paid > n {
        return Err(DebtEngineError::invalid(
            "tenure_months",
            format!("Cannot take {paid} installments from a {n}-month annuity"),
        ));
    }

    if paid == 0 {
        return Ok(principal);
    }
    if rate.is_zero() {
        return Ok(principal * Decimal::from(n - paid) / Decimal::from(n));
    }

    let remaining = Decimal::ONE - discount_factor(rate, n - paid)?;
    let denominator = annuity_denominator(rate, n)?;
    principal
        .checked_mul(remaining)
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| DebtEngineError::invalid("principal", "Balance overflows Decimal range"))
}
