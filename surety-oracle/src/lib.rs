//! Oracle consensus engine: flight-status requests and independent
//! witness responses, finalized once enough distinct oracles agree.

pub mod engine;
pub mod oracle;
pub mod request;

pub use engine::{Closure, OracleEngine, RequestOutcome, ResponseOutcome};
pub use oracle::{Oracle, ORACLE_INDEX_COUNT, ORACLE_INDEX_SPAN};
pub use request::{StatusRequest, Tally, MIN_RESPONSES};
