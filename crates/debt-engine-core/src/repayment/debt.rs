use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::interest;
use crate::types::*;

/// A caller-supplied view of one debt at the time of the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtSnapshot {
    /// Display label. Not required to be unique.
    pub name: String,
    /// Principal at origination. Drives flat-rate interest.
    pub original_principal: Money,
    pub current_balance: Money,
    /// Annual rate in percent (12 = 12% p.a.).
    pub annual_interest_rate_percent: Percent,
    pub interest_type: InterestType,
    pub minimum_monthly_payment: Money,
    /// Contracted term. Only meaningful for flat-rate debts.
    #[serde(default)]
    pub tenure_months: u32,
}

/// Simulation-private working copy of a debt. The snapshot stays untouched;
/// only the running balance moves.
#[derive(Debug, Clone)]
pub(crate) struct DebtState<'a> {
    pub snapshot: &'a DebtSnapshot,
    pub balance: Money,
}

impl<'a> DebtState<'a> {
    pub fn new(snapshot: &'a DebtSnapshot) -> Self {
        DebtState {
            snapshot,
            balance: snapshot.current_balance.max(Decimal::ZERO),
        }
    }

    pub fn is_active(&self) -> bool {
        self.balance > Decimal::ZERO
    }

    /// Interest due for the coming month at the current balance.
    pub fn accrue(&self) -> Money {
        if !self.is_active() {
            return Decimal::ZERO;
        }
        match self.snapshot.interest_type {
            InterestType::Flat => interest::flat_monthly_interest(
                self.snapshot.original_principal,
                self.snapshot.annual_interest_rate_percent,
            ),
            InterestType::Diminishing => interest::diminishing_monthly_interest(
                self.balance,
                self.snapshot.annual_interest_rate_percent,
            ),
        }
    }

    /// Interest is settled first; only the remainder reduces the balance.
    /// A payment below the interest due leaves the balance unchanged.
    /// Returns the interest charged.
    pub fn apply_payment(&mut self, payment: Money) -> Money {
        let interest_due = self.accrue();
        let principal_payment = (payment - interest_due).max(Decimal::ZERO);
        let actual = principal_payment.min(self.balance);
        self.balance = (self.balance - actual).max(Decimal::ZERO);
        interest_due
    }

    /// Scheduled payment for this month: the minimum, capped at what it
    /// takes to clear the debt.
    pub fn scheduled_payment(&self) -> Money {
        self.snapshot
            .minimum_monthly_payment
            .min(self.balance + self.accrue())
    }
}
