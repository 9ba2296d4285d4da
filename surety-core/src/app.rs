use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use surety_common::amount::Amount;
use surety_common::flight::FlightKey;
use surety_common::identity::Address;
use surety_common::status::FlightStatus;
use surety_common::Result;
use surety_ledger::{InsuranceLedger, Policy, TransferObligation};
use surety_oracle::{
    OracleEngine, RequestOutcome, ResponseOutcome, StatusRequest, ORACLE_INDEX_COUNT,
};
use surety_registry::{Admission, Airline, AirlineRegistry};

use crate::config::AppConfig;
use crate::ops::ControlPanel;
use crate::settlement::{SettlementCoordinator, SettlementRecord};
use crate::snapshot::Snapshot;

/// Caller-facing surface of the consensus and settlement engine.
///
/// Each component sits behind its own lock; an operation takes the
/// write locks it needs for the whole call, so every call is one
/// atomic step and calls are totally ordered per component. All
/// mutating operations check the operational gate first; getters
/// bypass it.
#[derive(Debug)]
pub struct SuretyApp {
    control: Arc<RwLock<ControlPanel>>,
    registry: Arc<RwLock<AirlineRegistry>>,
    oracles: Arc<RwLock<OracleEngine>>,
    ledger: Arc<RwLock<InsuranceLedger>>,
    settlement: Arc<RwLock<SettlementCoordinator>>,
}

impl SuretyApp {
    pub fn new(config: AppConfig) -> Self {
        info!(
            "🚀 Surety engine starting (owner [{}], genesis airline [{}])",
            config.owner, config.first_airline
        );
        Self {
            control: Arc::new(RwLock::new(ControlPanel::new(config.owner))),
            registry: Arc::new(RwLock::new(AirlineRegistry::new(config.first_airline))),
            oracles: Arc::new(RwLock::new(OracleEngine::new())),
            ledger: Arc::new(RwLock::new(InsuranceLedger::new())),
            settlement: Arc::new(RwLock::new(SettlementCoordinator::new())),
        }
    }

    /// Restores an engine from a persisted snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            control: Arc::new(RwLock::new(snapshot.control)),
            registry: Arc::new(RwLock::new(snapshot.registry)),
            oracles: Arc::new(RwLock::new(snapshot.oracles)),
            ledger: Arc::new(RwLock::new(snapshot.ledger)),
            settlement: Arc::new(RwLock::new(snapshot.settlement)),
        }
    }

    async fn ensure_operational(&self) -> Result<()> {
        self.control.read().await.ensure_operational()
    }

    // --- Operational control ---

    pub async fn set_operational(&self, caller: &Address, operational: bool) -> Result<()> {
        self.control.write().await.set_operational(caller, operational)
    }

    pub async fn is_operational(&self) -> bool {
        self.control.read().await.is_operational()
    }

    // --- Registry ---

    pub async fn register_airline(&self, candidate: &Address, sponsor: &Address) -> Result<Admission> {
        self.ensure_operational().await?;
        self.registry.write().await.register_airline(candidate, sponsor)
    }

    pub async fn fund_airline(&self, airline: &Address, amount: Amount) -> Result<()> {
        self.ensure_operational().await?;
        self.registry.write().await.fund_airline(airline, amount)
    }

    pub async fn airline(&self, airline: &Address) -> Option<Airline> {
        self.registry.read().await.get(airline).cloned()
    }

    pub async fn registered_airlines(&self) -> usize {
        self.registry.read().await.registered_count()
    }

    // --- Oracle protocol ---

    pub async fn register_oracle(&self, oracle: &Address, fee: Amount) -> Result<[u8; ORACLE_INDEX_COUNT]> {
        self.ensure_operational().await?;
        self.oracles.write().await.register_oracle(oracle, fee)
    }

    pub async fn oracle_indexes(&self, oracle: &Address) -> Option<[u8; ORACLE_INDEX_COUNT]> {
        self.oracles.read().await.indexes(oracle)
    }

    pub async fn request_status(
        &self,
        airline: &Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<RequestOutcome> {
        self.ensure_operational().await?;
        self.oracles.write().await.request_status(airline, flight, timestamp)
    }

    /// Records an oracle response. When the response closes the
    /// request, settlement runs inside the same call: the ledger is
    /// credited before any lock is released.
    pub async fn submit_response(
        &self,
        oracle: &Address,
        key: &FlightKey,
        status: FlightStatus,
    ) -> Result<ResponseOutcome> {
        self.ensure_operational().await?;

        let mut oracles = self.oracles.write().await;
        let outcome = oracles.submit_response(oracle, key, status)?;

        if let ResponseOutcome::Closed(closure) = &outcome {
            let mut ledger = self.ledger.write().await;
            let mut settlement = self.settlement.write().await;
            settlement.settle(closure.clone(), &mut ledger);
        }
        Ok(outcome)
    }

    pub async fn request(&self, key: &FlightKey) -> Option<StatusRequest> {
        self.oracles.read().await.request(key).cloned()
    }

    // --- Insurance ---

    /// Buys a policy on (airline, flight, timestamp) and returns the
    /// flight key the policy is filed under.
    pub async fn buy_insurance(
        &self,
        passenger: &Address,
        airline: &Address,
        flight: &str,
        timestamp: u64,
        stake: Amount,
    ) -> Result<FlightKey> {
        self.ensure_operational().await?;
        let key = FlightKey::derive(airline, flight, timestamp);
        self.ledger.write().await.buy(passenger, &key, stake)?;
        Ok(key)
    }

    pub async fn withdraw(&self, passenger: &Address, amount: Amount) -> Result<TransferObligation> {
        self.ensure_operational().await?;
        self.ledger.write().await.withdraw(passenger, amount)
    }

    pub async fn balance_of(&self, passenger: &Address) -> Amount {
        self.ledger.read().await.balance_of(passenger)
    }

    pub async fn policy(&self, key: &FlightKey, passenger: &Address) -> Option<Policy> {
        self.ledger.read().await.policy(key, passenger).cloned()
    }

    pub async fn settlements(&self) -> Vec<SettlementRecord> {
        self.settlement.read().await.history().to_vec()
    }

    /// Captures the full engine state for persistence.
    pub async fn snapshot(&self) -> Snapshot {
        Snapshot {
            control: self.control.read().await.clone(),
            registry: self.registry.read().await.clone(),
            oracles: self.oracles.read().await.clone(),
            ledger: self.ledger.read().await.clone(),
            settlement: self.settlement.read().await.clone(),
        }
    }
}
