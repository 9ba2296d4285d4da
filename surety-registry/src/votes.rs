use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use surety_common::identity::Address;

/// Stores admission endorsements, keyed by (candidate, voter).
///
/// The per-candidate voter set gives O(1) duplicate rejection; the
/// tally for a candidate is simply the set size.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteBook {
    votes: HashMap<Address, HashSet<Address>>,
}

impl VoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a vote. Returns `false` when the voter has already
    /// endorsed this candidate, leaving the book untouched.
    pub fn record(&mut self, candidate: &Address, voter: &Address) -> bool {
        self.votes
            .entry(candidate.clone())
            .or_default()
            .insert(voter.clone())
    }

    pub fn has_voted(&self, candidate: &Address, voter: &Address) -> bool {
        self.votes
            .get(candidate)
            .map(|voters| voters.contains(voter))
            .unwrap_or(false)
    }

    /// Number of distinct voters who endorsed the candidate.
    pub fn count(&self, candidate: &Address) -> usize {
        self.votes.get(candidate).map(HashSet::len).unwrap_or(0)
    }
}
