use thiserror::Error;

use crate::amount::Amount;

/// Errors surfaced by the consensus and settlement engine.
///
/// Every operation validates its inputs completely before touching any
/// state, so an `Err` always means the call had no effect.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuretyError {
    /// The caller lacks the role or funding the operation requires.
    #[error("Caller '{0}' is not authorized for this operation.")]
    Unauthorized(String),

    /// The global pause switch is engaged; only reads are served.
    #[error("Operations are paused.")]
    NotOperational,

    /// The identity is already present in the target registry.
    #[error("'{0}' is already registered.")]
    AlreadyRegistered(String),

    /// The sponsor already endorsed this candidate.
    #[error("'{voter}' already voted for candidate '{candidate}'.")]
    DuplicateVote { candidate: String, voter: String },

    /// The passenger already holds a policy for the flight.
    #[error("Passenger '{passenger}' already holds a policy for flight {flight}.")]
    DuplicatePolicy { passenger: String, flight: String },

    /// A status request for the flight key is already open.
    #[error("A status request for flight {0} is already open.")]
    DuplicateRequest(String),

    /// No status request exists for the flight key.
    #[error("No status request found for flight {0}.")]
    RequestNotFound(String),

    /// The status request has reached consensus and is terminal.
    #[error("The status request for flight {0} is closed.")]
    RequestClosed(String),

    /// None of the oracle's assigned indexes matches the request.
    #[error("Oracle '{oracle}' holds no index matching request index {index}.")]
    IndexMismatch { oracle: String, index: u8 },

    /// The stake is zero or above the per-policy bound.
    #[error("Stake of {stake} is outside the allowed range (0, {max}].")]
    StakeTooLarge { stake: Amount, max: Amount },

    /// The amount is below the required minimum for the operation.
    #[error("Amount {amount} is below the required minimum of {required}.")]
    InsufficientFunds { amount: Amount, required: Amount },

    /// The withdrawal exceeds the available balance.
    #[error("Withdrawal of {requested} exceeds the available balance of {available}.")]
    InsufficientBalance { requested: Amount, available: Amount },
}

pub type Result<T> = std::result::Result<T, SuretyError>;
