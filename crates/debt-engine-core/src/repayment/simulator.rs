use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Instant;

use super::debt::{DebtSnapshot, DebtState};
use super::strategy::Strategy;
use crate::error::DebtEngineError;
use crate::types::*;
use crate::DebtEngineResult;

/// Upper bound on simulated months for inputs that never amortise.
pub const DEFAULT_MAX_MONTHS: u32 = 1000;

/// Tunables for the month-stepping loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Stepping stops once the month counter passes this value.
    pub max_months: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            max_months: DEFAULT_MAX_MONTHS,
        }
    }
}

/// Month in which a debt reached a zero balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtPayoff {
    pub name: String,
    pub month: u32,
}

/// Outcome of running one strategy to exhaustion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub total_months: u32,
    pub total_interest_paid: Money,
    /// Sum of all minimum payments plus the extra payment.
    pub total_monthly_budget: Money,
    /// False when the month cap was hit with balances still outstanding.
    pub converged: bool,
    pub remaining_balance: Money,
    /// Debts in the order they were paid off.
    pub payoffs: Vec<DebtPayoff>,
}

/// Side-by-side results of both strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub snowball: SimulationResult,
    pub avalanche: SimulationResult,
    /// Lower interest wins, then fewer months, then avalanche.
    pub recommended: Strategy,
    pub interest_saved: Money,
    pub months_saved: u32,
}

/// Input for the enveloped strategy comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparisonInput {
    pub debts: Vec<DebtSnapshot>,
    #[serde(default)]
    pub extra_monthly_payment: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_months: Option<u32>,
}

/// Stateless repayment simulator. Cheap to copy; construct once and hand it
/// to whoever needs it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepaymentEngine {
    config: SimulationConfig,
}

impl RepaymentEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SimulationConfig) -> Self {
        RepaymentEngine { config }
    }

    pub fn config(&self) -> SimulationConfig {
        self.config
    }

    /// Run avalanche and snowball independently over private copies of
    /// `debts`.
    pub fn compare(&self, debts: &[DebtSnapshot], extra_monthly_payment: Money) -> ComparisonResult {
        let snowball = self.simulate(debts, extra_monthly_payment, Strategy::Snowball);
        let avalanche = self.simulate(debts, extra_monthly_payment, Strategy::Avalanche);

        let recommended = match avalanche
            .total_interest_paid
            .cmp(&snowball.total_interest_paid)
            .then(avalanche.total_months.cmp(&snowball.total_months))
        {
            std::cmp::Ordering::Greater => Strategy::Snowball,
            _ => Strategy::Avalanche,
        };

        ComparisonResult {
            interest_saved: (snowball.total_interest_paid - avalanche.total_interest_paid).abs(),
            months_saved: snowball.total_months.abs_diff(avalanche.total_months),
            snowball,
            avalanche,
            recommended,
        }
    }

    /// Step month by month until every balance is zero or the month counter
    /// passes `max_months`.
    pub fn simulate(
        &self,
        debts: &[DebtSnapshot],
        extra_monthly_payment: Money,
        strategy: Strategy,
    ) -> SimulationResult {
        let total_monthly_budget = debts
            .iter()
            .map(|d| d.minimum_monthly_payment)
            .sum::<Decimal>()
            + extra_monthly_payment;

        let mut states: Vec<DebtState<'_>> = debts.iter().map(DebtState::new).collect();
        let mut payoffs = Vec::new();
        let mut total_interest = Decimal::ZERO;
        let mut month: u32 = 0;

        while states.iter().any(DebtState::is_active) && month <= self.config.max_months {
            let active_at_start: Vec<bool> = states.iter().map(DebtState::is_active).collect();

            for state in states.iter_mut().filter(|s| s.is_active()) {
                let payment = state.scheduled_payment();
                total_interest += state.apply_payment(payment);
            }

            if extra_monthly_payment > Decimal::ZERO {
                if let Some(target) = strategy.select_priority(&states) {
                    total_interest += states[target].apply_payment(extra_monthly_payment);
                }
            }

            total_interest += redirect_freed_payments(&mut states, &active_at_start, strategy);

            month += 1;
            for (i, state) in states.iter().enumerate() {
                if active_at_start[i] && !state.is_active() {
                    payoffs.push(DebtPayoff {
                        name: state.snapshot.name.clone(),
                        month,
                    });
                }
            }
        }

        let remaining_balance: Money = states.iter().map(|s| s.balance).sum();
        let converged = remaining_balance.is_zero();

        if converged {
            tracing::debug!(%strategy, months = month, "repayment simulation converged");
        } else {
            tracing::warn!(
                %strategy,
                months = month,
                remaining_balance = %remaining_balance,
                "repayment simulation hit the month cap without converging"
            );
        }

        SimulationResult {
            total_months: month,
            total_interest_paid: round_money(total_interest),
            total_monthly_budget,
            converged,
            remaining_balance: round_money(remaining_balance),
            payoffs,
        }
    }
}

/// Re-apply the minimum payment of every debt settled this month to the
/// current priority debt. Debts settled by a redirected payment free their
/// own minimum in turn. Returns the interest charged.
fn redirect_freed_payments(
    states: &mut [DebtState<'_>],
    active_at_start: &[bool],
    strategy: Strategy,
) -> Money {
    let mut freed: Vec<bool> = states
        .iter()
        .zip(active_at_start)
        .map(|(s, &was_active)| was_active && !s.is_active())
        .collect();
    let mut queue: VecDeque<usize> = (0..states.len()).filter(|&i| freed[i]).collect();
    let mut interest = Decimal::ZERO;

    while let Some(settled) = queue.pop_front() {
        let payment = states[settled].snapshot.minimum_monthly_payment;
        if payment <= Decimal::ZERO {
            continue;
        }
        let Some(target) = strategy.select_priority(states) else {
            break;
        };
        interest += states[target].apply_payment(payment);
        if !states[target].is_active() && !freed[target] {
            freed[target] = true;
            queue.push_back(target);
        }
    }

    interest
}

/// Compare both strategies with the default month cap.
pub fn compare_strategies(debts: &[DebtSnapshot], extra_monthly_payment: Money) -> ComparisonResult {
    RepaymentEngine::default().compare(debts, extra_monthly_payment)
}

/// Validated strategy comparison wrapped in the standard output envelope.
pub fn run_strategy_comparison(
    input: &StrategyComparisonInput,
) -> DebtEngineResult<ComputationOutput<ComparisonResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.extra_monthly_payment < Decimal::ZERO {
        return Err(DebtEngineError::invalid(
            "extra_monthly_payment",
            "Extra monthly payment cannot be negative",
        ));
    }
    if input.max_months == Some(0) {
        return Err(DebtEngineError::invalid(
            "max_months",
            "Month cap must be at least 1",
        ));
    }
    for (i, debt) in input.debts.iter().enumerate() {
        if debt.minimum_monthly_payment < Decimal::ZERO {
            return Err(DebtEngineError::invalid(
                &format!("debts[{i}].minimum_monthly_payment"),
                "Minimum payment cannot be negative",
            ));
        }
        if debt.annual_interest_rate_percent < Decimal::ZERO {
            return Err(DebtEngineError::invalid(
                &format!("debts[{i}].annual_interest_rate_percent"),
                "Interest rate cannot be negative",
            ));
        }

        let first_interest = DebtState::new(debt).accrue();
        if debt.current_balance > Decimal::ZERO && debt.minimum_monthly_payment < first_interest {
            warnings.push(format!(
                "Debt '{}': minimum payment {} does not cover monthly interest {} (negative amortisation)",
                debt.name,
                debt.minimum_monthly_payment,
                round_money(first_interest)
            ));
        }
    }

    let config = SimulationConfig {
        max_months: input.max_months.unwrap_or(DEFAULT_MAX_MONTHS),
    };
    let result = RepaymentEngine::with_config(config).compare(&input.debts, input.extra_monthly_payment);

    for (strategy, sim) in [
        (Strategy::Snowball, &result.snowball),
        (Strategy::Avalanche, &result.avalanche),
    ] {
        if !sim.converged {
            warnings.push(format!(
                "{strategy}: balances not cleared after {} months; {} still outstanding",
                sim.total_months, sim.remaining_balance
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Debt Repayment Strategy Comparison (avalanche vs snowball)",
        &serde_json::json!({
            "debts": input.debts.len(),
            "extra_monthly_payment": input.extra_monthly_payment.to_string(),
            "max_months": config.max_months,
        }),
        warnings,
        elapsed,
        result,
    ))
}
