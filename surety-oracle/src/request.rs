use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use surety_common::flight::FlightKey;
use surety_common::identity::Address;
use surety_common::status::FlightStatus;
use surety_common::time::current_time;

/// Distinct oracles that must agree on one status code before a request
/// closes.
pub const MIN_RESPONSES: usize = 3;

/// Effect of recording one oracle response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tally {
    /// Identical submission already on record; nothing changed.
    Duplicate,
    /// Response counted; the status now has this many distinct backers.
    Counted(usize),
    /// This response brought the status to [`MIN_RESPONSES`] backers.
    Reached(FlightStatus),
}

/// One flight-status request: `Open -> Closed(final_status)`, terminal
/// once closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {
    pub key: FlightKey,
    pub airline: Address,
    pub flight: String,
    pub timestamp: u64,
    /// Designated index drawn at open time; only oracles holding it may
    /// respond.
    pub index: u8,
    responses: HashMap<FlightStatus, HashSet<Address>>,
    pub final_status: Option<FlightStatus>,
    pub opened_at: u64,
}

impl StatusRequest {
    pub fn open(airline: Address, flight: String, timestamp: u64, index: u8) -> Self {
        let key = FlightKey::derive(&airline, &flight, timestamp);
        Self {
            key,
            airline,
            flight,
            timestamp,
            index,
            responses: HashMap::new(),
            final_status: None,
            opened_at: current_time(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.final_status.is_none()
    }

    /// Records an oracle's response under `status`.
    ///
    /// Must only be called while the request is open. The first status
    /// to collect [`MIN_RESPONSES`] distinct oracles closes the request
    /// and becomes final.
    pub fn record(&mut self, oracle: &Address, status: FlightStatus) -> Tally {
        debug_assert!(self.is_open(), "closed requests accept no responses");

        let backers = self.responses.entry(status).or_default();
        if !backers.insert(oracle.clone()) {
            return Tally::Duplicate;
        }

        let count = backers.len();
        if count >= MIN_RESPONSES {
            self.final_status = Some(status);
            return Tally::Reached(status);
        }
        Tally::Counted(count)
    }

    /// Distinct oracles currently backing `status`.
    pub fn backers(&self, status: FlightStatus) -> usize {
        self.responses.get(&status).map(HashSet::len).unwrap_or(0)
    }
}
