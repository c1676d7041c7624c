use serde::{Deserialize, Serialize};
use std::fmt;

use super::debt::DebtState;

/// Which debt receives money beyond the minimum payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Highest annual interest rate first.
    Avalanche,
    /// Smallest outstanding balance first.
    Snowball,
}

impl Strategy {
    /// Index of the active debt that should receive the next extra payment.
    ///
    /// Linear scan keeping the first-seen best, so ties resolve to input
    /// order.
    pub(crate) fn select_priority(self, debts: &[DebtState<'_>]) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, debt) in debts.iter().enumerate() {
            if !debt.is_active() {
                continue;
            }
            match best {
                None => best = Some(i),
                Some(b) if self.outranks(debt, &debts[b]) => best = Some(i),
                Some(_) => {}
            }
        }
        best
    }

    fn outranks(self, candidate: &DebtState<'_>, incumbent: &DebtState<'_>) -> bool {
        match self {
            Strategy::Avalanche => {
                candidate.snapshot.annual_interest_rate_percent
                    > incumbent.snapshot.annual_interest_rate_percent
            }
            Strategy::Snowball => candidate.balance < incumbent.balance,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Avalanche => write!(f, "avalanche"),
            Strategy::Snowball => write!(f, "snowball"),
        }
    }
}
