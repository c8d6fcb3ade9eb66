//! Case-level verdict: when to fetch it, how to present it, and what to
//! surface from its error payload.

pub mod classify;
pub mod orchestrator;
pub mod warning;

pub use classify::{classify_verdict, format_title, Variant, VerdictDisplay, VERDICT_RULES};
pub use orchestrator::{
    FetchReason, OrchestratorInputs, VerdictAction, VerdictOrchestrator,
};
pub use warning::{WarningContent, WarningExtractor, DEFAULT_SWAP_THRESHOLD};
