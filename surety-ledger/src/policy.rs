use serde::{Deserialize, Serialize};
use uuid::Uuid;

use surety_common::amount::Amount;
use surety_common::flight::FlightKey;
use surety_common::identity::Address;
use surety_common::time::current_time;

/// One passenger's insurance position on one flight.
///
/// The stake is immutable after purchase; `credited` guards the
/// credit-at-most-once invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub passenger: Address,
    pub flight: FlightKey,
    pub stake: Amount,
    pub credited: bool,
    pub purchased_at: u64,
}

impl Policy {
    pub fn new(passenger: Address, flight: FlightKey, stake: Amount) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            passenger,
            flight,
            stake,
            credited: false,
            purchased_at: current_time(),
        }
    }

    /// Payout owed on a confirmed airline-caused delay: 1.5x the stake.
    pub fn payout(&self) -> Amount {
        self.stake * 3 / 2
    }
}
