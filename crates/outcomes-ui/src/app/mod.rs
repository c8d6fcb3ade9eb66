//! Application runtime module for the outcome view
//!
//! Background verdict fetches, the message channel back to the view, and the
//! loop that drives the view until nothing is in flight.

pub mod background;
pub mod messages;
pub mod runtime;

pub use runtime::run_until_settled;

use outcomes_core::VerdictSource;
use std::sync::{mpsc, Arc};
use std::time::Duration;

/// Context passed to runtime operations containing shared state
pub struct RuntimeContext {
    /// Where verdicts are fetched from
    pub source: Arc<dyn VerdictSource>,
    /// Channel for sending messages to the view owner
    pub tx: mpsc::Sender<messages::BackgroundMessage>,
    /// Upper bound for a single verdict fetch
    pub fetch_timeout: Duration,
}
