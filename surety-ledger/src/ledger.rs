use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use surety_common::amount::{Amount, MAX_POLICY_STAKE};
use surety_common::flight::FlightKey;
use surety_common::identity::Address;
use surety_common::{Result, SuretyError};

use crate::policy::Policy;

/// Obligation to transfer value out of the core.
///
/// Issued only after the balance has been debited, so a re-entrant
/// caller finds the funds already gone (checks-effects-interactions).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferObligation {
    pub passenger: Address,
    pub amount: Amount,
}

/// Tracks policies per flight key and withdrawable passenger balances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceLedger {
    policies: HashMap<FlightKey, Vec<Policy>>,
    balances: HashMap<Address, Amount>,
}

impl InsuranceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sells `passenger` a policy on `flight` for `stake`.
    pub fn buy(&mut self, passenger: &Address, flight: &FlightKey, stake: Amount) -> Result<String> {
        if stake == 0 || stake > MAX_POLICY_STAKE {
            return Err(SuretyError::StakeTooLarge {
                stake,
                max: MAX_POLICY_STAKE,
            });
        }
        if self.policy(flight, passenger).is_some() {
            return Err(SuretyError::DuplicatePolicy {
                passenger: passenger.to_string(),
                flight: flight.to_string(),
            });
        }

        let policy = Policy::new(passenger.clone(), flight.clone(), stake);
        let id = policy.id.clone();
        info!(
            "🎫 Passenger [{}] bought policy {} on flight {} (stake {})",
            passenger, id, flight, stake
        );
        self.policies.entry(flight.clone()).or_default().push(policy);
        Ok(id)
    }

    /// Credits every not-yet-credited policy on `flight` at 1.5x stake,
    /// moving the payout into the passenger's balance. Idempotent:
    /// already-credited policies are skipped, so a second invocation
    /// for the same flight changes nothing.
    ///
    /// Returns the total newly credited.
    pub fn credit_delay(&mut self, flight: &FlightKey) -> Amount {
        let mut credited = 0;
        if let Some(policies) = self.policies.get_mut(flight) {
            for policy in policies.iter_mut().filter(|p| !p.credited) {
                let payout = policy.payout();
                *self.balances.entry(policy.passenger.clone()).or_insert(0) += payout;
                policy.credited = true;
                credited += payout;
                info!(
                    "💳 Credited {} to passenger [{}] for flight {}",
                    payout, policy.passenger, flight
                );
            }
        }
        credited
    }

    /// Debits `amount` from the passenger's balance and returns the
    /// transfer obligation. The debit happens before the obligation is
    /// handed out; the caller performs the actual value transfer last.
    pub fn withdraw(&mut self, passenger: &Address, amount: Amount) -> Result<TransferObligation> {
        let available = self.balance_of(passenger);
        if amount > available {
            return Err(SuretyError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        if let Some(balance) = self.balances.get_mut(passenger) {
            *balance -= amount;
        }
        info!(
            "💸 Passenger [{}] withdrew {} ({} remaining)",
            passenger,
            amount,
            available - amount
        );
        Ok(TransferObligation {
            passenger: passenger.clone(),
            amount,
        })
    }

    pub fn balance_of(&self, passenger: &Address) -> Amount {
        self.balances.get(passenger).copied().unwrap_or(0)
    }

    pub fn policy(&self, flight: &FlightKey, passenger: &Address) -> Option<&Policy> {
        self.policies
            .get(flight)?
            .iter()
            .find(|p| &p.passenger == passenger)
    }

    pub fn policy_count(&self, flight: &FlightKey) -> usize {
        self.policies.get(flight).map(Vec::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surety_common::amount::{ether, UNIT};

    fn flight() -> FlightKey {
        FlightKey::derive(&Address::from("airline-1"), "ND1309", 1_700_000_000)
    }

    #[test]
    fn test_buy_within_bounds() {
        let mut ledger = InsuranceLedger::new();
        ledger.buy(&Address::from("p1"), &flight(), ether(1)).unwrap();
        assert_eq!(ledger.policy_count(&flight()), 1);
        assert_eq!(
            ledger.policy(&flight(), &Address::from("p1")).unwrap().stake,
            ether(1)
        );
    }

    #[test]
    fn test_oversized_stake_rejected() {
        let mut ledger = InsuranceLedger::new();
        let err = ledger
            .buy(&Address::from("p1"), &flight(), ether(1) + 1)
            .unwrap_err();
        assert_eq!(
            err,
            SuretyError::StakeTooLarge {
                stake: ether(1) + 1,
                max: ether(1),
            }
        );
        assert_eq!(ledger.policy_count(&flight()), 0);
    }

    #[test]
    fn test_zero_stake_rejected() {
        let mut ledger = InsuranceLedger::new();
        assert!(ledger.buy(&Address::from("p1"), &flight(), 0).is_err());
    }

    #[test]
    fn test_duplicate_policy_rejected() {
        let mut ledger = InsuranceLedger::new();
        let passenger = Address::from("p1");
        ledger.buy(&passenger, &flight(), UNIT / 2).unwrap();

        let err = ledger.buy(&passenger, &flight(), UNIT / 4).unwrap_err();
        assert!(matches!(err, SuretyError::DuplicatePolicy { .. }));
        assert_eq!(ledger.policy_count(&flight()), 1);
    }

    #[test]
    fn test_same_passenger_different_flights() {
        let mut ledger = InsuranceLedger::new();
        let passenger = Address::from("p1");
        let other = FlightKey::derive(&Address::from("airline-1"), "ND1310", 1_700_000_000);

        ledger.buy(&passenger, &flight(), UNIT / 2).unwrap();
        ledger.buy(&passenger, &other, UNIT / 2).unwrap();
        assert_eq!(ledger.policy_count(&other), 1);
    }

    #[test]
    fn test_credit_delay_pays_every_policy_once() {
        let mut ledger = InsuranceLedger::new();
        ledger.buy(&Address::from("p1"), &flight(), ether(1)).unwrap();
        ledger.buy(&Address::from("p2"), &flight(), UNIT / 2).unwrap();

        let credited = ledger.credit_delay(&flight());
        assert_eq!(credited, (UNIT * 3 / 2) + (UNIT / 2 * 3 / 2));
        assert_eq!(ledger.balance_of(&Address::from("p1")), UNIT * 3 / 2);
        assert_eq!(ledger.balance_of(&Address::from("p2")), UNIT / 2 * 3 / 2);
    }

    #[test]
    fn test_credit_delay_is_idempotent() {
        let mut ledger = InsuranceLedger::new();
        ledger.buy(&Address::from("p1"), &flight(), ether(1)).unwrap();

        assert_eq!(ledger.credit_delay(&flight()), UNIT * 3 / 2);
        assert_eq!(ledger.credit_delay(&flight()), 0);
        assert_eq!(ledger.balance_of(&Address::from("p1")), UNIT * 3 / 2);
    }

    #[test]
    fn test_late_buyer_not_paid_by_earlier_credit() {
        let mut ledger = InsuranceLedger::new();
        ledger.buy(&Address::from("p1"), &flight(), ether(1)).unwrap();
        ledger.credit_delay(&flight());

        // p2 buys after the flight already settled; a re-credit pays
        // only the new policy.
        ledger.buy(&Address::from("p2"), &flight(), UNIT / 2).unwrap();
        assert_eq!(ledger.credit_delay(&flight()), UNIT / 2 * 3 / 2);
        assert_eq!(ledger.balance_of(&Address::from("p1")), UNIT * 3 / 2);
    }

    #[test]
    fn test_withdraw_decrements_balance() {
        let mut ledger = InsuranceLedger::new();
        ledger.buy(&Address::from("p1"), &flight(), ether(1)).unwrap();
        ledger.credit_delay(&flight());

        let obligation = ledger.withdraw(&Address::from("p1"), UNIT).unwrap();
        assert_eq!(obligation.amount, UNIT);
        assert_eq!(obligation.passenger, Address::from("p1"));
        assert_eq!(ledger.balance_of(&Address::from("p1")), UNIT / 2);
    }

    #[test]
    fn test_overdraw_rejected_and_balance_unchanged() {
        let mut ledger = InsuranceLedger::new();
        ledger.buy(&Address::from("p1"), &flight(), ether(1)).unwrap();
        ledger.credit_delay(&flight());
        let before = ledger.balance_of(&Address::from("p1"));

        let err = ledger
            .withdraw(&Address::from("p1"), before + 1)
            .unwrap_err();
        assert_eq!(
            err,
            SuretyError::InsufficientBalance {
                requested: before + 1,
                available: before,
            }
        );
        assert_eq!(ledger.balance_of(&Address::from("p1")), before);
    }

    #[test]
    fn test_withdraw_without_balance_rejected() {
        let mut ledger = InsuranceLedger::new();
        let err = ledger.withdraw(&Address::from("nobody"), 1).unwrap_err();
        assert_eq!(
            err,
            SuretyError::InsufficientBalance {
                requested: 1,
                available: 0,
            }
        );
    }
}
