use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use surety_common::amount::{Amount, MIN_AIRLINE_FUNDING};
use surety_common::identity::Address;
use surety_common::{Result, SuretyError};

use crate::airline::Airline;
use crate::votes::VoteBook;

/// Below this many registered airlines, a single sponsor registers a
/// candidate directly. At or above it, admission requires votes.
pub const BOOTSTRAP_THRESHOLD: usize = 4;

/// Outcome of a `register_airline` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Admission {
    /// The candidate is now a registered airline.
    Registered,
    /// The vote was recorded but the tally is still below the threshold.
    Pending { votes: usize, threshold: usize },
}

/// The set of airline identities and their registration, funding and
/// voting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineRegistry {
    airlines: HashMap<Address, Airline>,
    votes: VoteBook,
}

impl AirlineRegistry {
    /// Creates a registry seeded with a genesis airline, mirroring a
    /// deployment where the first airline is registered at launch. The
    /// genesis airline still has to fund itself before sponsoring.
    pub fn new(genesis: Address) -> Self {
        let mut airlines = HashMap::new();
        airlines.insert(genesis.clone(), Airline::registered(genesis));
        Self {
            airlines,
            votes: VoteBook::new(),
        }
    }

    /// Registers `candidate`, sponsored (and, past the bootstrap phase,
    /// voted for) by `sponsor`.
    ///
    /// While fewer than [`BOOTSTRAP_THRESHOLD`] airlines are registered
    /// the candidate is admitted directly. Afterwards each call casts
    /// one vote; the candidate is promoted once the distinct-voter
    /// tally reaches half of the current participant count (minimum 1).
    /// The threshold is evaluated against the participant count at each
    /// vote cast, never retroactively.
    pub fn register_airline(&mut self, candidate: &Address, sponsor: &Address) -> Result<Admission> {
        if !self.is_participant(sponsor) {
            return Err(SuretyError::Unauthorized(sponsor.to_string()));
        }
        if self.is_registered(candidate) {
            return Err(SuretyError::AlreadyRegistered(candidate.to_string()));
        }

        if self.registered_count() < BOOTSTRAP_THRESHOLD {
            self.airlines
                .insert(candidate.clone(), Airline::registered(candidate.clone()));
            info!(
                "✈️ Airline [{}] registered directly by [{}] (bootstrap)",
                candidate, sponsor
            );
            return Ok(Admission::Registered);
        }

        // Voting phase. The first vote creates the pending record; a
        // duplicate vote finds the record already present, so the
        // failed call mutates nothing.
        self.airlines
            .entry(candidate.clone())
            .or_insert_with(|| Airline::pending(candidate.clone()));

        if !self.votes.record(candidate, sponsor) {
            return Err(SuretyError::DuplicateVote {
                candidate: candidate.to_string(),
                voter: sponsor.to_string(),
            });
        }

        let votes = self.votes.count(candidate);
        let threshold = self.admission_threshold();
        info!(
            "🗳️ Airline [{}] voted for candidate [{}] ({}/{})",
            sponsor, candidate, votes, threshold
        );

        if votes >= threshold {
            let record = self
                .airlines
                .get_mut(candidate)
                .expect("pending record inserted above");
            record.registered = true;
            info!(
                "✈️ Candidate [{}] promoted to registered airline ({} votes)",
                candidate, votes
            );
            return Ok(Admission::Registered);
        }

        Ok(Admission::Pending { votes, threshold })
    }

    /// Accepts a funding payment from a registered airline.
    ///
    /// Each call must meet [`MIN_AIRLINE_FUNDING`] on its own; funding
    /// accumulates and the `funded` flag never reverts.
    pub fn fund_airline(&mut self, airline: &Address, amount: Amount) -> Result<()> {
        if !self.is_registered(airline) {
            return Err(SuretyError::Unauthorized(airline.to_string()));
        }
        if amount < MIN_AIRLINE_FUNDING {
            return Err(SuretyError::InsufficientFunds {
                amount,
                required: MIN_AIRLINE_FUNDING,
            });
        }

        let record = self
            .airlines
            .get_mut(airline)
            .expect("registration checked above");
        record.funding += amount;
        record.funded = true;
        info!("💰 Airline [{}] funded with {}", airline, amount);
        Ok(())
    }

    /// Votes required to admit a candidate right now: half of the
    /// registered+funded airlines, rounded down, minimum 1.
    pub fn admission_threshold(&self) -> usize {
        std::cmp::max(1, self.participant_count() / 2)
    }

    pub fn get(&self, airline: &Address) -> Option<&Airline> {
        self.airlines.get(airline)
    }

    pub fn is_registered(&self, airline: &Address) -> bool {
        self.airlines
            .get(airline)
            .map(|a| a.registered)
            .unwrap_or(false)
    }

    pub fn is_participant(&self, airline: &Address) -> bool {
        self.airlines
            .get(airline)
            .map(Airline::is_participant)
            .unwrap_or(false)
    }

    pub fn registered_count(&self) -> usize {
        self.airlines.values().filter(|a| a.registered).count()
    }

    /// Airlines that are both registered and funded.
    pub fn participant_count(&self) -> usize {
        self.airlines
            .values()
            .filter(|a| a.is_participant())
            .count()
    }

    pub fn vote_tally(&self, candidate: &Address) -> usize {
        self.votes.count(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surety_common::amount::ether;

    fn addr(id: &str) -> Address {
        Address::from(id)
    }

    /// Registry with `n` registered, funded airlines named a1..an.
    fn funded_registry(n: usize) -> AirlineRegistry {
        let mut registry = AirlineRegistry::new(addr("a1"));
        registry.fund_airline(&addr("a1"), ether(10)).unwrap();
        for i in 2..=n {
            let candidate = addr(&format!("a{}", i));
            // Past the bootstrap phase every funded airline votes until
            // the candidate is admitted.
            let mut admitted = false;
            for j in 1..i {
                match registry.register_airline(&candidate, &addr(&format!("a{}", j))) {
                    Ok(Admission::Registered) => {
                        admitted = true;
                        break;
                    }
                    Ok(Admission::Pending { .. }) => continue,
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }
            assert!(admitted, "airline a{} not admitted", i);
            registry.fund_airline(&candidate, ether(10)).unwrap();
        }
        registry
    }

    #[test]
    fn test_bootstrap_registration_is_direct() {
        let mut registry = AirlineRegistry::new(addr("a1"));
        registry.fund_airline(&addr("a1"), ether(10)).unwrap();

        for id in ["a2", "a3", "a4"] {
            assert_eq!(
                registry.register_airline(&addr(id), &addr("a1")).unwrap(),
                Admission::Registered
            );
        }
        assert_eq!(registry.registered_count(), 4);
    }

    #[test]
    fn test_unfunded_sponsor_rejected() {
        let mut registry = AirlineRegistry::new(addr("a1"));
        let err = registry
            .register_airline(&addr("a2"), &addr("a1"))
            .unwrap_err();
        assert_eq!(err, SuretyError::Unauthorized("a1".to_string()));
        assert_eq!(registry.registered_count(), 1);
    }

    #[test]
    fn test_unknown_sponsor_rejected() {
        let mut registry = funded_registry(2);
        let err = registry
            .register_airline(&addr("a9"), &addr("ghost"))
            .unwrap_err();
        assert_eq!(err, SuretyError::Unauthorized("ghost".to_string()));
    }

    #[test]
    fn test_already_registered_rejected() {
        let mut registry = funded_registry(2);
        let err = registry
            .register_airline(&addr("a2"), &addr("a1"))
            .unwrap_err();
        assert_eq!(err, SuretyError::AlreadyRegistered("a2".to_string()));
    }

    #[test]
    fn test_fifth_airline_requires_votes() {
        let mut registry = funded_registry(4);

        // 4 participants -> threshold 2.
        assert_eq!(
            registry.register_airline(&addr("a5"), &addr("a1")).unwrap(),
            Admission::Pending {
                votes: 1,
                threshold: 2
            }
        );
        assert!(!registry.is_registered(&addr("a5")));

        assert_eq!(
            registry.register_airline(&addr("a5"), &addr("a2")).unwrap(),
            Admission::Registered
        );
        assert!(registry.is_registered(&addr("a5")));
    }

    #[test]
    fn test_five_participants_need_two_votes() {
        // 5 registered+funded airlines propose candidate E.
        let mut registry = funded_registry(5);
        assert_eq!(registry.admission_threshold(), 2);

        assert_eq!(
            registry.register_airline(&addr("e"), &addr("a1")).unwrap(),
            Admission::Pending {
                votes: 1,
                threshold: 2
            }
        );
        assert_eq!(
            registry.register_airline(&addr("e"), &addr("a2")).unwrap(),
            Admission::Registered
        );
    }

    #[test]
    fn test_duplicate_vote_rejected_and_state_unchanged() {
        let mut registry = funded_registry(4);

        registry.register_airline(&addr("a5"), &addr("a1")).unwrap();
        let err = registry
            .register_airline(&addr("a5"), &addr("a1"))
            .unwrap_err();
        assert_eq!(
            err,
            SuretyError::DuplicateVote {
                candidate: "a5".to_string(),
                voter: "a1".to_string(),
            }
        );
        assert_eq!(registry.vote_tally(&addr("a5")), 1);
        assert!(!registry.is_registered(&addr("a5")));
    }

    #[test]
    fn test_pending_candidate_cannot_sponsor() {
        let mut registry = funded_registry(4);
        registry.register_airline(&addr("a5"), &addr("a1")).unwrap();

        let err = registry
            .register_airline(&addr("a6"), &addr("a5"))
            .unwrap_err();
        assert_eq!(err, SuretyError::Unauthorized("a5".to_string()));
    }

    #[test]
    fn test_threshold_uses_participant_count_at_vote_time() {
        let mut registry = funded_registry(4);

        // a5 is admitted but never funds: 5 registered, 4 participants,
        // so the threshold stays at 2.
        registry.register_airline(&addr("a5"), &addr("a1")).unwrap();
        registry.register_airline(&addr("a5"), &addr("a2")).unwrap();
        assert!(registry.is_registered(&addr("a5")));
        assert_eq!(registry.participant_count(), 4);
        assert_eq!(registry.admission_threshold(), 2);
    }

    #[test]
    fn test_funding_below_minimum_rejected() {
        let mut registry = AirlineRegistry::new(addr("a1"));
        let err = registry
            .fund_airline(&addr("a1"), ether(10) - 1)
            .unwrap_err();
        assert_eq!(
            err,
            SuretyError::InsufficientFunds {
                amount: ether(10) - 1,
                required: ether(10),
            }
        );
        assert!(!registry.is_participant(&addr("a1")));
    }

    #[test]
    fn test_funding_unregistered_airline_rejected() {
        let mut registry = AirlineRegistry::new(addr("a1"));
        let err = registry.fund_airline(&addr("a2"), ether(10)).unwrap_err();
        assert_eq!(err, SuretyError::Unauthorized("a2".to_string()));
    }

    #[test]
    fn test_funding_accumulates() {
        let mut registry = AirlineRegistry::new(addr("a1"));
        registry.fund_airline(&addr("a1"), ether(10)).unwrap();
        registry.fund_airline(&addr("a1"), ether(12)).unwrap();

        let airline = registry.get(&addr("a1")).unwrap();
        assert!(airline.funded);
        assert_eq!(airline.funding, ether(22));
    }
}
