use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use surety_common::amount::{Amount, ORACLE_REGISTRATION_FEE};
use surety_common::flight::FlightKey;
use surety_common::identity::Address;
use surety_common::status::FlightStatus;
use surety_common::{Result, SuretyError};

use crate::oracle::{Oracle, ORACLE_INDEX_COUNT, ORACLE_INDEX_SPAN};
use crate::request::{StatusRequest, Tally};

/// Outcome of a `request_status` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A new request is open under `key`; oracles holding `index` may
    /// respond.
    Opened { key: FlightKey, index: u8 },
    /// The key already reached consensus earlier; the cached result is
    /// returned so caller-side retries stay safe.
    AlreadyClosed { key: FlightKey, status: FlightStatus },
}

/// Outcome of a `submit_response` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Counted; consensus still open.
    Recorded { backers: usize },
    /// Identical submission already on record; nothing changed.
    Duplicate,
    /// This response closed the request.
    Closed(Closure),
}

/// A finalized status request, handed to the settlement coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Closure {
    pub key: FlightKey,
    pub airline: Address,
    pub flight: String,
    pub timestamp: u64,
    pub status: FlightStatus,
}

/// Issues flight-status requests and accumulates oracle responses until
/// one status code reaches the agreement threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleEngine {
    oracles: HashMap<Address, Oracle>,
    requests: HashMap<FlightKey, StatusRequest>,
}

impl OracleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `oracle` and assigns its three response indexes.
    pub fn register_oracle(&mut self, oracle: &Address, fee: Amount) -> Result<[u8; ORACLE_INDEX_COUNT]> {
        if self.oracles.contains_key(oracle) {
            return Err(SuretyError::AlreadyRegistered(oracle.to_string()));
        }
        if fee < ORACLE_REGISTRATION_FEE {
            return Err(SuretyError::InsufficientFunds {
                amount: fee,
                required: ORACLE_REGISTRATION_FEE,
            });
        }

        let record = Oracle::assign(oracle.clone(), &mut rand::thread_rng());
        let indexes = record.indexes;
        self.oracles.insert(oracle.clone(), record);
        info!("🔮 Oracle [{}] registered with indexes {:?}", oracle, indexes);
        Ok(indexes)
    }

    /// Opens a status request for (airline, flight, timestamp).
    ///
    /// An already-open request is a duplicate; an already-closed one
    /// returns its cached final status instead of erroring, which makes
    /// replays after consensus harmless.
    pub fn request_status(
        &mut self,
        airline: &Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<RequestOutcome> {
        let key = FlightKey::derive(airline, flight, timestamp);
        if let Some(existing) = self.requests.get(&key) {
            return match existing.final_status {
                Some(status) => Ok(RequestOutcome::AlreadyClosed { key, status }),
                None => Err(SuretyError::DuplicateRequest(key.to_string())),
            };
        }

        let index = rand::thread_rng().gen_range(0..ORACLE_INDEX_SPAN);
        let request = StatusRequest::open(airline.clone(), flight.to_string(), timestamp, index);
        info!(
            "🛫 Status request opened for flight {} of [{}] (index {})",
            flight, airline, index
        );
        self.requests.insert(key.clone(), request);
        Ok(RequestOutcome::Opened { key, index })
    }

    /// Records one oracle's status response for an open request.
    pub fn submit_response(
        &mut self,
        oracle: &Address,
        key: &FlightKey,
        status: FlightStatus,
    ) -> Result<ResponseOutcome> {
        let witness = self
            .oracles
            .get(oracle)
            .ok_or_else(|| SuretyError::Unauthorized(oracle.to_string()))?;
        let request = self
            .requests
            .get_mut(key)
            .ok_or_else(|| SuretyError::RequestNotFound(key.to_string()))?;

        if !request.is_open() {
            return Err(SuretyError::RequestClosed(key.to_string()));
        }
        if !witness.matches(request.index) {
            warn!(
                "⚠️ Oracle [{}] submitted for index {} without holding it",
                oracle, request.index
            );
            return Err(SuretyError::IndexMismatch {
                oracle: oracle.to_string(),
                index: request.index,
            });
        }

        match request.record(oracle, status) {
            Tally::Duplicate => Ok(ResponseOutcome::Duplicate),
            Tally::Counted(backers) => {
                info!(
                    "📥 Oracle [{}] reported {} for flight {} ({} backing)",
                    oracle, status, request.flight, backers
                );
                Ok(ResponseOutcome::Recorded { backers })
            }
            Tally::Reached(final_status) => {
                info!(
                    "✅ Consensus closed flight {} of [{}] as {}",
                    request.flight, request.airline, final_status
                );
                Ok(ResponseOutcome::Closed(Closure {
                    key: key.clone(),
                    airline: request.airline.clone(),
                    flight: request.flight.clone(),
                    timestamp: request.timestamp,
                    status: final_status,
                }))
            }
        }
    }

    pub fn oracle(&self, address: &Address) -> Option<&Oracle> {
        self.oracles.get(address)
    }

    /// The oracle's assigned indexes, if registered.
    pub fn indexes(&self, address: &Address) -> Option<[u8; ORACLE_INDEX_COUNT]> {
        self.oracles.get(address).map(|o| o.indexes)
    }

    pub fn oracle_count(&self) -> usize {
        self.oracles.len()
    }

    pub fn request(&self, key: &FlightKey) -> Option<&StatusRequest> {
        self.requests.get(key)
    }
}
