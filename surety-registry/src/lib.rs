//! Airline registry: identities, funding status and admission votes.

pub mod airline;
pub mod registry;
pub mod votes;

pub use airline::Airline;
pub use registry::{Admission, AirlineRegistry, BOOTSTRAP_THRESHOLD};
pub use votes::VoteBook;
