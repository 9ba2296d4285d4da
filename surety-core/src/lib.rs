//! The surety facade: operational control, settlement coordination and
//! the `SuretyApp` entry point that totally orders external calls.

pub mod app;
pub mod config;
pub mod ops;
pub mod settlement;
pub mod snapshot;

pub use app::SuretyApp;
pub use config::AppConfig;
pub use ops::ControlPanel;
pub use settlement::{SettlementCoordinator, SettlementRecord};
pub use snapshot::Snapshot;
