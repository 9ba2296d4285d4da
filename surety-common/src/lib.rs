//! Shared types for the surety engine.
//!
//! This crate provides the identity, amount, flight-key and status-code
//! primitives used by every other workspace member, plus the error
//! taxonomy and time helpers.

pub mod amount;
pub mod error;
pub mod flight;
pub mod identity;
pub mod status;
pub mod time;

pub use error::{Result, SuretyError};
pub use identity::Address;
