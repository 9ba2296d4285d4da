use std::{fs, io, path::Path};

use serde::{Deserialize, Serialize};

use surety_ledger::InsuranceLedger;
use surety_oracle::OracleEngine;
use surety_registry::AirlineRegistry;

use crate::ops::ControlPanel;
use crate::settlement::SettlementCoordinator;

/// Full persisted state of the engine.
///
/// The storage contract is whole-state only: serialize everything,
/// write everything. There is no partial write to recover from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub control: ControlPanel,
    pub registry: AirlineRegistry,
    pub oracles: OracleEngine,
    pub ledger: InsuranceLedger,
    pub settlement: SettlementCoordinator,
}

impl Snapshot {
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        fs::write(path, json)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
