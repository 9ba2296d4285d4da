use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use surety_common::identity::Address;
use surety_common::time::current_time;

/// Indexes are drawn from `0..ORACLE_INDEX_SPAN`.
pub const ORACLE_INDEX_SPAN: u8 = 10;

/// Each oracle holds this many distinct indexes.
pub const ORACLE_INDEX_COUNT: usize = 3;

/// A registered flight-status witness.
///
/// The three indexes filter which requests the oracle may answer: a
/// response is accepted only when the request's designated index is one
/// of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Oracle {
    pub address: Address,
    pub indexes: [u8; ORACLE_INDEX_COUNT],
    pub registered_at: u64,
}

impl Oracle {
    /// Registers an oracle with three distinct indexes drawn without
    /// replacement.
    pub fn assign<R: Rng>(address: Address, rng: &mut R) -> Self {
        let pool: Vec<u8> = (0..ORACLE_INDEX_SPAN).collect();
        let mut indexes = [0u8; ORACLE_INDEX_COUNT];
        for (slot, drawn) in indexes
            .iter_mut()
            .zip(pool.choose_multiple(rng, ORACLE_INDEX_COUNT))
        {
            *slot = *drawn;
        }
        Self {
            address,
            indexes,
            registered_at: current_time(),
        }
    }

    pub fn matches(&self, index: u8) -> bool {
        self.indexes.contains(&index)
    }
}
