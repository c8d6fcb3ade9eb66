//! What the active card's result area shows.

use crate::status::{Card, StatusKey};
use serde_json::{Map, Value};

/// Groups rendered with the generic document details dashboard.
pub const DETAIL_DASHBOARD_KEYS: [&str; 4] = [
    "credit_reports",
    "identity_documents",
    "income_proof",
    "utility_bills",
];

const NO_STRUCTURED_DATA: &str = "No structured data available for this document.";
const NO_KPIS: &str = "No KPIs available for this document.";

#[derive(Debug, Clone, PartialEq)]
pub enum ResultPanel {
    /// Still idle or uploading.
    Pending,
    /// Processing failed; carries the pipeline's error text if any.
    Failed(Option<String>),
    /// Completed with structured `response.data.content`.
    Content,
    /// Completed with a response that has no `data`; shown as pretty JSON.
    RawPayload(String),
    /// Completed with no response at all.
    NoPayload,
    /// Completed with `data` but without usable content.
    Empty,
}

pub fn result_panel(card: &Card) -> ResultPanel {
    match card.status_key {
        StatusKey::Idle | StatusKey::Uploading => ResultPanel::Pending,
        StatusKey::Error => ResultPanel::Failed(card.error.clone()),
        StatusKey::Completed => match &card.response {
            None => ResultPanel::NoPayload,
            Some(_) if card.content().is_some() => ResultPanel::Content,
            Some(response) if response.get("data").is_none_or(Value::is_null) => {
                ResultPanel::RawPayload(
                    serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string()),
                )
            }
            Some(_) => ResultPanel::Empty,
        },
    }
}

/// Which KPI presentation applies to the active card.
#[derive(Debug, Clone, PartialEq)]
pub enum KpiView {
    BankDashboard {
        kpis: Map<String, Value>,
        summary: Option<String>,
    },
    TaxDashboard {
        report: Map<String, Value>,
        summary: Option<String>,
    },
    DocumentDetails {
        document_key: String,
        data: Map<String, Value>,
        summary: Option<String>,
    },
    Markdown(String),
}

pub fn kpi_view(active_key: Option<&str>, card: Option<&Card>) -> KpiView {
    let Some(content) = card.and_then(Card::content) else {
        return KpiView::Markdown(NO_STRUCTURED_DATA.to_string());
    };

    let kpis = content.get("kpis").filter(|k| !k.is_null());
    let kpi_object = kpis.and_then(Value::as_object);
    let summary = content
        .get("summary")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let key = active_key.unwrap_or_default();

    if key == "bank_statements" {
        if let Some(kpis) = kpi_object {
            return KpiView::BankDashboard {
                kpis: kpis.clone(),
                summary,
            };
        }
    }

    if key == "tax_statements" {
        return KpiView::TaxDashboard {
            report: kpi_object.cloned().unwrap_or_default(),
            summary,
        };
    }

    if DETAIL_DASHBOARD_KEYS.contains(&key) {
        return KpiView::DocumentDetails {
            document_key: key.to_string(),
            data: kpi_object.cloned().unwrap_or_default(),
            summary,
        };
    }

    if let Some(kpis) = kpi_object {
        return KpiView::DocumentDetails {
            document_key: key.to_string(),
            data: kpis.clone(),
            summary,
        };
    }

    if let Some(text) = kpis.and_then(Value::as_str) {
        return KpiView::Markdown(text.to_string());
    }

    KpiView::Markdown(summary.unwrap_or_else(|| NO_KPIS.to_string()))
}

/// Images for the annotations page. A revealed fraud image replaces them.
pub fn annotation_images(card: Option<&Card>, revealed_fraud_image: Option<&Value>) -> Vec<String> {
    if let Some(image) = revealed_fraud_image.and_then(Value::as_str) {
        return vec![image.to_string()];
    }
    card.and_then(Card::content)
        .and_then(|c| c.get("images"))
        .and_then(Value::as_array)
        .map(|images| {
            images
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Status badge of the active card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardBadge {
    pub label: &'static str,
    pub class: &'static str,
    /// Clicking reveals the fraud image.
    pub clickable: bool,
}

pub fn card_badge(card: &Card, can_toggle_fraud: bool) -> CardBadge {
    if can_toggle_fraud {
        CardBadge {
            label: "Fraud Detected",
            class: "danger",
            clickable: true,
        }
    } else {
        CardBadge {
            label: card.status.label,
            class: card.status.badge,
            clickable: false,
        }
    }
}
