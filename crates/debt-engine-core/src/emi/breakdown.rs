use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DebtEngineError;
use crate::interest;
use crate::types::*;
use crate::DebtEngineResult;

/// Terms of a single loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub tenure_months: u32,
    /// Annual rate in percent (12 = 12% p.a.).
    pub annual_interest_rate_percent: Percent,
    pub interest_type: InterestType,
}

impl LoanTerms {
    pub fn validate(&self) -> DebtEngineResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(DebtEngineError::invalid(
                "principal",
                "Loan principal must be positive",
            ));
        }
        if self.tenure_months == 0 {
            return Err(DebtEngineError::invalid(
                "tenure_months",
                "Tenure must be at least 1 month",
            ));
        }
        if self.annual_interest_rate_percent < Decimal::ZERO {
            return Err(DebtEngineError::invalid(
                "annual_interest_rate_percent",
                "Interest rate cannot be negative",
            ));
        }
        Ok(())
    }
}

/// One month's installment split into principal and interest, in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    pub installment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
}

impl MonthlyBreakdown {
    fn rounded(installment: Money, principal_portion: Money, interest_portion: Money) -> Self {
        MonthlyBreakdown {
            installment: round_money(installment),
            principal_portion: round_money(principal_portion),
            interest_portion: round_money(interest_portion),
        }
    }
}

/// Input for the enveloped breakdown calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiBreakdownInput {
    #[serde(flatten)]
    pub terms: LoanTerms,
    pub target_month: u32,
}

/// Headline figures over the full tenure of a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub installment: Money,
    pub total_interest: Money,
    pub total_payable: Money,
}

/// Principal/interest split of the installment due in `target_month`
/// (1-based).
///
/// Flat loans have the same split every month, so `target_month` only has
/// to be in range. Diminishing loans take the opening balance of the
/// requested row of the amortisation table.
pub fn compute_breakdown(terms: &LoanTerms, target_month: u32) -> DebtEngineResult<MonthlyBreakdown> {
    terms.validate()?;
    if target_month == 0 || target_month > terms.tenure_months {
        return Err(DebtEngineError::invalid(
            "target_month",
            format!(
                "Target month {target_month} outside the loan tenure [1, {}]",
                terms.tenure_months
            ),
        ));
    }

    match terms.interest_type {
        InterestType::Flat => {
            let (installment, interest_portion) = flat_split(terms);
            Ok(MonthlyBreakdown::rounded(
                installment,
                installment - interest_portion,
                interest_portion,
            ))
        }
        InterestType::Diminishing => {
            let rate = interest::monthly_rate(terms.annual_interest_rate_percent);
            let installment = interest::annuity_installment(terms.principal, rate, terms.tenure_months)?;

            let opening = interest::annuity_balance_after(
                terms.principal,
                rate,
                terms.tenure_months,
                target_month - 1,
            )?;

            let interest_portion = opening * rate;
            Ok(MonthlyBreakdown::rounded(
                installment,
                installment - interest_portion,
                interest_portion,
            ))
        }
    }
}

/// Breakdown of the next installment after `installments_paid` have been
/// settled, or `None` once the loan is fully repaid.
pub fn next_breakdown(
    terms: &LoanTerms,
    installments_paid: u32,
) -> DebtEngineResult<Option<MonthlyBreakdown>> {
    terms.validate()?;
    if installments_paid >= terms.tenure_months {
        return Ok(None);
    }
    compute_breakdown(terms, installments_paid + 1).map(Some)
}

/// Installment, total interest and total payable over the loan's life.
pub fn loan_summary(terms: &LoanTerms) -> DebtEngineResult<LoanSummary> {
    terms.validate()?;
    let n = Decimal::from(terms.tenure_months);

    let (installment, total_interest) = match terms.interest_type {
        InterestType::Flat => {
            let (installment, _) = flat_split(terms);
            let total = interest::flat_total_interest(
                terms.principal,
                terms.annual_interest_rate_percent,
                terms.tenure_months,
            );
            (installment, total)
        }
        InterestType::Diminishing => {
            let rate = interest::monthly_rate(terms.annual_interest_rate_percent);
            let installment = interest::annuity_installment(terms.principal, rate, terms.tenure_months)?;
            let total_paid = installment.checked_mul(n).ok_or_else(|| {
                DebtEngineError::invalid("principal", "Total payable overflows Decimal range")
            })?;
            (installment, total_paid - terms.principal)
        }
    };

    Ok(LoanSummary {
        installment: round_money(installment),
        total_interest: round_money(total_interest),
        total_payable: round_money(terms.principal + total_interest),
    })
}

/// Breakdown for one month, wrapped in the standard output envelope.
pub fn calculate_emi_breakdown(
    input: &EmiBreakdownInput,
) -> DebtEngineResult<ComputationOutput<MonthlyBreakdown>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let breakdown = compute_breakdown(&input.terms, input.target_month)?;

    if input.terms.interest_type == InterestType::Flat && input.target_month > 1 {
        warnings.push(format!(
            "Flat-rate loan: month {} has the same split as every other month",
            input.target_month
        ));
    }

    tracing::debug!(
        interest_type = %input.terms.interest_type,
        target_month = input.target_month,
        installment = %breakdown.installment,
        "computed EMI breakdown"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        match input.terms.interest_type {
            InterestType::Flat => "EMI Breakdown (flat rate)",
            InterestType::Diminishing => "EMI Breakdown (reducing balance annuity)",
        },
        &serde_json::json!({
            "principal": input.terms.principal.to_string(),
            "tenure_months": input.terms.tenure_months,
            "annual_interest_rate_percent": input.terms.annual_interest_rate_percent.to_string(),
            "interest_type": input.terms.interest_type,
            "target_month": input.target_month,
        }),
        warnings,
        elapsed,
        breakdown,
    ))
}

/// Unrounded (installment, interest portion) for a flat-rate loan.
fn flat_split(terms: &LoanTerms) -> (Money, Money) {
    let n = Decimal::from(terms.tenure_months);
    let total_interest = interest::flat_total_interest(
        terms.principal,
        terms.annual_interest_rate_percent,
        terms.tenure_months,
    );
    ((terms.principal + total_interest) / n, total_interest / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn flat_terms() -> LoanTerms {
        LoanTerms {
            principal: dec!(120000),
            tenure_months: 12,
            annual_interest_rate_percent: dec!(12),
            interest_type: InterestType::Flat,
        }
    }

    fn diminishing_terms() -> LoanTerms {
        LoanTerms {
            principal: dec!(100000),
            tenure_months: 12,
            annual_interest_rate_percent: dec!(12),
            interest_type: InterestType::Diminishing,
        }
    }

    #[test]
    fn test_flat_first_month() {
        let b = compute_breakdown(&flat_terms(), 1).unwrap();
        assert_eq!(
            b,
            MonthlyBreakdown {
                installment: dec!(11200.00),
                principal_portion: dec!(10000.00),
                interest_portion: dec!(1200.00),
            }
        );
    }

    #[test]
    fn test_diminishing_first_month() {
        let b = compute_breakdown(&diminishing_terms(), 1).unwrap();
        assert_eq!(b.installment, dec!(8884.88));
        assert_eq!(b.interest_portion, dec!(1000.00));
        assert_eq!(b.principal_portion, dec!(7884.88));
    }

    #[test]
    fn test_diminishing_second_month_interest_falls() {
        // Balance after month 1 is 100000 - 7884.8788 = 92115.1212
        let b = compute_breakdown(&diminishing_terms(), 2).unwrap();
        assert_eq!(b.interest_portion, dec!(921.15));
        assert_eq!(b.principal_portion, dec!(7963.73));
    }

    #[test]
    fn test_zero_rate_diminishing() {
        let mut terms = diminishing_terms();
        terms.annual_interest_rate_percent = Decimal::ZERO;
        let b = compute_breakdown(&terms, 7).unwrap();
        assert_eq!(b.interest_portion, Decimal::ZERO);
        assert_eq!(b.installment, dec!(8333.33));
    }

    #[test]
    fn test_steep_rate_long_tenure_does_not_overflow() {
        let terms = LoanTerms {
            principal: dec!(10000),
            tenure_months: 360,
            annual_interest_rate_percent: dec!(300),
            interest_type: InterestType::Diminishing,
        };
        let first = compute_breakdown(&terms, 1).unwrap();
        assert_eq!(first.installment, dec!(2500.00));
        assert_eq!(first.interest_portion, dec!(2500.00));
        assert_eq!(first.principal_portion, dec!(0.00));

        // Final row: opening balance 2000 at 25% a month
        let last = compute_breakdown(&terms, 360).unwrap();
        assert_eq!(last.interest_portion, dec!(500.00));
        assert_eq!(last.principal_portion, dec!(2000.00));

        assert!(loan_summary(&terms).is_ok());
    }

    #[test]
    fn test_very_long_tenure_does_not_overflow() {
        let terms = LoanTerms {
            principal: dec!(10000),
            tenure_months: 10000,
            annual_interest_rate_percent: dec!(12),
            interest_type: InterestType::Diminishing,
        };
        let b = compute_breakdown(&terms, 1).unwrap();
        assert_eq!(b.installment, dec!(100.00));
        assert_eq!(b.interest_portion, dec!(100.00));
        assert!(next_breakdown(&terms, 9999).unwrap().is_some());
    }

    #[test]
    fn test_target_month_out_of_range() {
        assert!(compute_breakdown(&diminishing_terms(), 0).is_err());
        assert!(compute_breakdown(&diminishing_terms(), 13).is_err());
        assert!(compute_breakdown(&flat_terms(), 13).is_err());
    }

    #[test]
    fn test_invalid_terms_rejected() {
        let mut terms = flat_terms();
        terms.principal = Decimal::ZERO;
        assert!(compute_breakdown(&terms, 1).is_err());

        let mut terms = flat_terms();
        terms.tenure_months = 0;
        assert!(compute_breakdown(&terms, 1).is_err());

        let mut terms = flat_terms();
        terms.annual_interest_rate_percent = dec!(-1);
        assert!(compute_breakdown(&terms, 1).is_err());
    }

    #[test]
    fn test_next_breakdown() {
        let terms = diminishing_terms();
        let next = next_breakdown(&terms, 0).unwrap().unwrap();
        assert_eq!(next, compute_breakdown(&terms, 1).unwrap());
        let last = next_breakdown(&terms, 11).unwrap().unwrap();
        assert_eq!(last, compute_breakdown(&terms, 12).unwrap());
        assert!(next_breakdown(&terms, 12).unwrap().is_none());
    }

    #[test]
    fn test_loan_summary() {
        let flat = loan_summary(&flat_terms()).unwrap();
        assert_eq!(flat.installment, dec!(11200.00));
        assert_eq!(flat.total_interest, dec!(14400.00));
        assert_eq!(flat.total_payable, dec!(134400.00));

        let dim = loan_summary(&diminishing_terms()).unwrap();
        assert_eq!(dim.installment, dec!(8884.88));
        // 12 * 8884.8788 - 100000
        assert_eq!(dim.total_interest, dec!(6618.55));
    }

    #[test]
    fn test_envelope_warns_for_flat_later_month() {
        let input = EmiBreakdownInput {
            terms: flat_terms(),
            target_month: 5,
        };
        let out = calculate_emi_breakdown(&input).unwrap();
        assert_eq!(out.result.installment, dec!(11200.00));
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.methodology, "EMI Breakdown (flat rate)");
    }

    #[test]
    fn test_input_deserialises_flattened_terms() {
        let json = r#"{
            "principal": "100000",
            "tenure_months": 12,
            "annual_interest_rate_percent": "12",
            "interest_type": "Diminishing",
            "target_month": 1
        }"#;
        let input: EmiBreakdownInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.terms, diminishing_terms());
        assert_eq!(input.target_month, 1);
    }

    #[test]
    fn test_input_with_unknown_interest_type_rejected() {
        let json = r#"{
            "principal": "100000",
            "tenure_months": 12,
            "annual_interest_rate_percent": "12",
            "interest_type": "balloon",
            "target_month": 1
        }"#;
        assert!(serde_json::from_str::<EmiBreakdownInput>(json).is_err());
    }
}
