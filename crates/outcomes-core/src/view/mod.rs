//! Side-state keyed off the active card, plus the derivations that decide
//! what the active card's result area shows.

pub mod fraud;
pub mod panel;
pub mod selection;

pub use fraud::{fraud_image, FraudImageToggle, ResultPage, IDENTITY_DOCUMENTS_KEY};
pub use panel::{
    annotation_images, card_badge, kpi_view, result_panel, CardBadge, KpiView, ResultPanel,
};
pub use selection::{ExpansionState, SelectionState, StatusPopover};
