//! Multi-debt payoff simulation: avalanche versus snowball.

pub mod debt;
pub mod simulator;
pub mod strategy;

pub use debt::DebtSnapshot;
pub use simulator::{
    compare_strategies, run_strategy_comparison, ComparisonResult, DebtPayoff, RepaymentEngine,
    SimulationConfig, SimulationResult, StrategyComparisonInput, DEFAULT_MAX_MONTHS,
};
pub use strategy::Strategy;
