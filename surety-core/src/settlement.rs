use serde::{Deserialize, Serialize};
use tracing::info;

use surety_common::amount::Amount;
use surety_common::time::current_time;
use surety_ledger::InsuranceLedger;
use surety_oracle::Closure;

/// Record of one finalized status request and what it settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub closure: Closure,
    pub credited: Amount,
    pub settled_at: u64,
}

/// Converts consensus closures into ledger effects.
///
/// An airline-caused delay credits every open policy on the flight;
/// any other final status is logged with no payout. Settlement runs
/// synchronously inside the call that closed the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementCoordinator {
    log: Vec<SettlementRecord>,
}

impl SettlementCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settle(&mut self, closure: Closure, ledger: &mut InsuranceLedger) -> Amount {
        let credited = if closure.status.is_payable() {
            let total = ledger.credit_delay(&closure.key);
            info!(
                "⚖️ Flight {} settled as {}: {} credited across {} policies",
                closure.flight,
                closure.status,
                total,
                ledger.policy_count(&closure.key)
            );
            total
        } else {
            info!(
                "⚖️ Flight {} settled as {}: no payout due",
                closure.flight, closure.status
            );
            0
        };

        self.log.push(SettlementRecord {
            closure,
            credited,
            settled_at: current_time(),
        });
        credited
    }

    pub fn history(&self) -> &[SettlementRecord] {
        &self.log
    }
}
