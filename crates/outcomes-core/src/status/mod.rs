//! Per-document status aggregation.
//!
//! Turns the externally supplied document groups plus their (possibly
//! missing) upload statuses into display cards, and answers whether the case
//! as a whole has finished processing.

use crate::protocol::{DocumentGroup, UploadStatus, UploadStatuses};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Processing state of one document group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKey {
    #[default]
    Idle,
    Uploading,
    Completed,
    Error,
}

impl StatusKey {
    /// Parse a raw status string. Missing or unrecognized values are idle.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("uploading") => StatusKey::Uploading,
            Some("completed") => StatusKey::Completed,
            Some("error") => StatusKey::Error,
            _ => StatusKey::Idle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKey::Idle => "idle",
            StatusKey::Uploading => "uploading",
            StatusKey::Completed => "completed",
            StatusKey::Error => "error",
        }
    }

    pub fn config(&self) -> &'static StatusConfig {
        match self {
            StatusKey::Idle => &STATUS_IDLE,
            StatusKey::Uploading => &STATUS_UPLOADING,
            StatusKey::Completed => &STATUS_COMPLETED,
            StatusKey::Error => &STATUS_ERROR,
        }
    }
}

/// Static display copy for a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusConfig {
    pub label: &'static str,
    pub badge: &'static str,
    pub description: &'static str,
}

const STATUS_IDLE: StatusConfig = StatusConfig {
    label: "Waiting",
    badge: "secondary",
    description: "We are preparing this document for processing.",
};

const STATUS_UPLOADING: StatusConfig = StatusConfig {
    label: "Processing",
    badge: "info",
    description: "Hold tight while we finalize this document.",
};

const STATUS_COMPLETED: StatusConfig = StatusConfig {
    label: "Processed",
    badge: "success",
    description: "Document processed successfully.",
};

const STATUS_ERROR: StatusConfig = StatusConfig {
    label: "Failed",
    badge: "danger",
    description: "Processing failed. Return to uploads to try again.",
};

/// Display-ready view of one document group.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub key: String,
    pub title: String,
    pub status_key: StatusKey,
    pub status: &'static StatusConfig,
    pub response: Option<Value>,
    pub error: Option<String>,
    pub icon: Option<String>,
}

impl Card {
    pub fn is_completed(&self) -> bool {
        self.status_key == StatusKey::Completed
    }

    /// `response.data.content`, when the pipeline returned structured output.
    pub fn content(&self) -> Option<&Value> {
        self.response
            .as_ref()
            .and_then(|r| r.get("data"))
            .and_then(|d| d.get("content"))
            .filter(|c| !c.is_null())
    }
}

/// Build one card per document group, in group order.
pub fn build_cards(groups: &[DocumentGroup], statuses: &UploadStatuses) -> Vec<Card> {
    let idle = UploadStatus::default();
    groups
        .iter()
        .map(|group| {
            let state = statuses.get(&group.key).unwrap_or(&idle);
            let status_key = StatusKey::parse(state.status.as_deref());
            Card {
                key: group.key.clone(),
                title: group.title.clone(),
                status_key,
                status: status_key.config(),
                response: state.response.clone(),
                error: state.error.clone(),
                icon: group.icon.clone(),
            }
        })
        .collect()
}

/// Completion summary over the card list.
///
/// Plain `Copy` value: two evaluations over unchanged cards compare equal, so
/// downstream consumers can skip work when nothing moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Completion {
    pub all_completed: bool,
    pub processed: usize,
    pub total: usize,
}

impl Completion {
    pub fn of(cards: &[Card]) -> Self {
        let processed = cards.iter().filter(|card| card.is_completed()).count();
        Self {
            all_completed: all_completed(cards),
            processed,
            total: cards.len(),
        }
    }

    /// "Processed n/m" summary line.
    pub fn progress_label(&self) -> String {
        format!("Processed {}/{}", self.processed, self.total)
    }
}

/// True iff there is at least one card and every card is completed.
pub fn all_completed(cards: &[Card]) -> bool {
    !cards.is_empty() && cards.iter().all(Card::is_completed)
}
