//! Runtime adapters for outcomes (case store, config, snapshots).

pub mod config;
pub mod snapshot;
pub mod store;

pub use config::Config;
pub use snapshot::{CaseSnapshot, FixtureResponse, FixtureVerdictSource, SnapshotError};
pub use store::{CaseStore, VerdictTicket};
