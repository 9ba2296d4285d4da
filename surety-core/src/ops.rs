use serde::{Deserialize, Serialize};
use tracing::warn;

use surety_common::identity::Address;
use surety_common::{Result, SuretyError};

/// Global pause switch consumed by every state-mutating operation.
///
/// Starts operational. Only the owner may toggle it; reads stay
/// available while paused. The single-owner check is the one place a
/// multi-party ownership mechanism would slot in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlPanel {
    owner: Address,
    operational: bool,
}

impl ControlPanel {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            operational: true,
        }
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// Guard called first by every mutating entry point.
    pub fn ensure_operational(&self) -> Result<()> {
        if !self.operational {
            return Err(SuretyError::NotOperational);
        }
        Ok(())
    }

    pub fn set_operational(&mut self, caller: &Address, operational: bool) -> Result<()> {
        if caller != &self.owner {
            return Err(SuretyError::Unauthorized(caller.to_string()));
        }
        if !operational {
            warn!("⏸️ Operations paused by [{}]", caller);
        }
        self.operational = operational;
        Ok(())
    }
}
