use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::identity::Address;

/// Composite key identifying one scheduled flight leg.
///
/// The key is the SHA-256 digest (hex) over a length-prefixed encoding
/// of `(airline, flight code, departure timestamp)`. Length prefixes
/// keep the encoding unambiguous: ("AB", "C") and ("A", "BC") must not
/// collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlightKey(String);

impl FlightKey {
    pub fn derive(airline: &Address, flight: &str, timestamp: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((airline.as_str().len() as u64).to_le_bytes());
        hasher.update(airline.as_str().as_bytes());
        hasher.update((flight.len() as u64).to_le_bytes());
        hasher.update(flight.as_bytes());
        hasher.update(timestamp.to_le_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
