//! Core outcome view-model for multi-document cases.
//!
//! Pure and synchronous: cards from per-document statuses, the completion
//! gate, the verdict fetch rule, verdict classification and the side-state
//! of the outcome page. No I/O lives here.

pub mod guard;
pub mod protocol;
pub mod status;
pub mod verdict;
pub mod view;

pub use protocol::*;
