//! Outcome view layer: view state, background verdict fetches and rendering.

pub mod app;
pub mod ui;

pub use app::run_until_settled;
pub use ui::{render, OutcomeView};
