use debt_engine_core::emi::{self, LoanTerms};
use debt_engine_core::{DebtEngineError, InterestType};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn loan(principal: Decimal, tenure_months: u32, rate: Decimal, interest_type: InterestType) -> LoanTerms {
    LoanTerms {
        principal,
        tenure_months,
        annual_interest_rate_percent: rate,
        interest_type,
    }
}

// ===========================================================================
// Known answers
// ===========================================================================

#[test]
fn test_flat_known_answer() {
    let terms = loan(dec!(120000), 12, dec!(12), InterestType::Flat);
    let b = emi::compute_breakdown(&terms, 1).unwrap();
    assert_eq!(b.installment, dec!(11200.00));
    assert_eq!(b.interest_portion, dec!(1200.00));
    assert_eq!(b.principal_portion, dec!(10000.00));
}

#[test]
fn test_diminishing_known_answer() {
    let terms = loan(dec!(100000), 12, dec!(12), InterestType::Diminishing);
    let b = emi::compute_breakdown(&terms, 1).unwrap();
    assert_eq!(b.interest_portion, dec!(1000.00));
    assert_eq!(b.installment, dec!(8884.88));
    assert!((b.principal_portion - (b.installment - dec!(1000.00))).abs() <= dec!(0.01));
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_flat_breakdown_independent_of_month() {
    let terms = loan(dec!(75000), 36, dec!(9.5), InterestType::Flat);
    let first = emi::compute_breakdown(&terms, 1).unwrap();
    for month in 2..=36 {
        assert_eq!(emi::compute_breakdown(&terms, month).unwrap(), first);
    }
}

#[test]
fn test_diminishing_principal_sums_to_principal() {
    let terms = loan(dec!(250000), 60, dec!(10.75), InterestType::Diminishing);
    let total: Decimal = (1..=60)
        .map(|m| emi::compute_breakdown(&terms, m).unwrap().principal_portion)
        .sum();
    let tolerance = Decimal::from(60) * dec!(0.01);
    assert!(
        (total - dec!(250000)).abs() <= tolerance,
        "principal portions summed to {total}"
    );
}

#[test]
fn test_installment_equals_parts() {
    for interest_type in [InterestType::Flat, InterestType::Diminishing] {
        let terms = loan(dec!(48713), 27, dec!(13.3), interest_type);
        for month in 1..=27 {
            let b = emi::compute_breakdown(&terms, month).unwrap();
            assert!(
                (b.installment - (b.principal_portion + b.interest_portion)).abs() <= dec!(0.01),
                "{interest_type} month {month}: {b:?}"
            );
        }
    }
}

#[test]
fn test_interest_portion_declines_on_reducing_balance() {
    let terms = loan(dec!(500000), 24, dec!(8), InterestType::Diminishing);
    let mut previous = emi::compute_breakdown(&terms, 1).unwrap().interest_portion;
    for month in 2..=24 {
        let current = emi::compute_breakdown(&terms, month).unwrap().interest_portion;
        assert!(current < previous);
        previous = current;
    }
}

// ===========================================================================
// Errors
// ===========================================================================

#[test]
fn test_month_bounds_are_invalid_input() {
    let terms = loan(dec!(10000), 6, dec!(7), InterestType::Diminishing);
    for month in [0, 7] {
        match emi::compute_breakdown(&terms, month) {
            Err(DebtEngineError::InvalidInput { field, .. }) => assert_eq!(field, "target_month"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }
}

#[test]
fn test_unrecognised_interest_type_is_invalid_input() {
    match "balloon".parse::<InterestType>() {
        Err(DebtEngineError::InvalidInput { field, .. }) => assert_eq!(field, "interest_type"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

// ===========================================================================
// Schedule
// ===========================================================================

#[test]
fn test_schedule_totals_match_summary() {
    let terms = loan(dec!(100000), 12, dec!(12), InterestType::Diminishing);
    let schedule = emi::build_amortization_schedule(&terms).unwrap();
    let summary = emi::loan_summary(&terms).unwrap();
    assert_eq!(schedule.installment, summary.installment);
    assert!((schedule.total_interest - summary.total_interest).abs() <= dec!(0.01));
    assert_eq!(schedule.rows.last().unwrap().closing_balance, Decimal::ZERO);
}
