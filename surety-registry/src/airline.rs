use serde::{Deserialize, Serialize};

use surety_common::amount::Amount;
use surety_common::identity::Address;
use surety_common::time::current_time;

/// Registration record for one airline.
///
/// `registered = false` marks a candidate still collecting admission
/// votes. Funding accumulates across calls; the `funded` flag flips on
/// the first call that meets the minimum and never flips back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    pub address: Address,
    pub registered: bool,
    pub funded: bool,
    pub funding: Amount,
    pub joined_at: u64,
}

impl Airline {
    /// A fully registered airline (bootstrap phase or promoted candidate).
    pub fn registered(address: Address) -> Self {
        Self {
            address,
            registered: true,
            funded: false,
            funding: 0,
            joined_at: current_time(),
        }
    }

    /// A candidate awaiting admission votes.
    pub fn pending(address: Address) -> Self {
        Self {
            registered: false,
            ..Self::registered(address)
        }
    }

    /// Registered and funded airlines may sponsor, vote and be counted
    /// toward the admission threshold.
    pub fn is_participant(&self) -> bool {
        self.registered && self.funded
    }
}
