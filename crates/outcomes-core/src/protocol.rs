//! Records exchanged with the case/document store and the verdict source.
//!
//! Everything in here arrives from outside the view-model: document groups and
//! their upload statuses from the upload pipeline, the active case identifier,
//! and the case-level verdict. Payloads the view never interprets structurally
//! (`response`, verdict `content`, verdict `error`) stay as `serde_json::Value`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// One logical document type within a case (bank statement, tax return, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentGroup {
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl DocumentGroup {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            icon: None,
        }
    }
}

/// Processing status reported for a single document group.
///
/// `status` is kept raw so that unrecognized values survive deserialization
/// and degrade to idle when cards are built. Decoding never fails: `null`,
/// non-object entries and mistyped fields fall back to empty values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct UploadStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadStatus {
    pub fn with_status(status: &str) -> Self {
        Self {
            status: Some(status.to_string()),
            ..Self::default()
        }
    }

    pub fn completed(response: Value) -> Self {
        Self {
            status: Some("completed".to_string()),
            response: Some(response),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: Some("error".to_string()),
            response: None,
            error: Some(error.into()),
        }
    }
}

impl From<Value> for UploadStatus {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };
        let text = |v: Option<Value>| match v {
            Some(Value::String(s)) => Some(s),
            _ => None,
        };
        Self {
            status: text(fields.remove("status")),
            response: fields.remove("response").filter(|r| !r.is_null()),
            error: text(fields.remove("error")),
        }
    }
}

/// Upload statuses keyed by document group key.
pub type UploadStatuses = HashMap<String, UploadStatus>;

/// Case-level upload bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    #[serde(default)]
    pub case_id: Option<String>,
    /// Uploads the user may still submit before the case is closed.
    #[serde(default)]
    pub remaining_uploads: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
    /// Anything the store reports that is not one of the four known states.
    #[serde(other)]
    Unknown,
}

impl VerdictStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictStatus::Idle => "idle",
            VerdictStatus::Loading => "loading",
            VerdictStatus::Success => "success",
            VerdictStatus::Error => "error",
            VerdictStatus::Unknown => "unknown",
        }
    }
}

/// Verdict payload as returned by the verdict source.
///
/// Besides `uuid` and `content`, the outer object may carry its own
/// `verdict`/`decision`/`message`/... fields; those are kept in `fields`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VerdictData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl VerdictData {
    pub fn new(uuid: impl Into<String>, content: Value) -> Self {
        Self {
            uuid: Some(uuid.into()),
            content: Some(content),
            fields: Map::new(),
        }
    }

    /// Non-empty string value of an outer field.
    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Case-level verdict as owned by the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinalVerdict {
    #[serde(default)]
    pub status: VerdictStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<VerdictData>,
    /// Case id the current result belongs to, when the store records one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    /// Either a plain message or a structured `{text, message, types}` object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl FinalVerdict {
    /// Identifier of the case this verdict was produced for.
    ///
    /// The store-level `uuid` wins over the one embedded in the payload.
    pub fn verdict_uuid(&self) -> Option<&str> {
        self.uuid
            .as_deref()
            .or_else(|| self.data.as_ref().and_then(|d| d.uuid.as_deref()))
    }

    pub fn content(&self) -> Option<&Value> {
        self.data.as_ref().and_then(|d| d.content.as_ref())
    }
}

/// Why a verdict fetch did not produce a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("verdict transport failed: {0}")]
    Transport(String),
    #[error("no verdict is available for case {0}")]
    UnknownCase(String),
    #[error("verdict payload was malformed: {0}")]
    Malformed(String),
    #[error("verdict fetch timed out after {0}s")]
    Timeout(u64),
    #[error("verdict fetch aborted: {0}")]
    Aborted(String),
}

impl FetchError {
    /// Text recorded into `FinalVerdict.error` and shown next to the retry action.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Transport(detail) => {
                format!("We couldn't reach the verdict service ({}).", detail)
            }
            FetchError::UnknownCase(_) => {
                "No final decision is available for this case yet.".to_string()
            }
            FetchError::Malformed(_) => {
                "The final decision came back in an unexpected format.".to_string()
            }
            FetchError::Timeout(secs) => {
                format!("The verdict service did not answer within {}s.", secs)
            }
            FetchError::Aborted(_) => {
                "Fetching the final decision was interrupted. Please try again.".to_string()
            }
        }
    }
}

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<VerdictData, FetchError>> + Send + 'a>>;

/// Transport that resolves the verdict for a case.
///
/// Implementations must tolerate repeated calls with the same id; the store
/// is the one that dedupes in-flight requests.
pub trait VerdictSource: Send + Sync {
    fn fetch_verdict<'a>(&'a self, case_id: &'a str) -> FetchFuture<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_upload_statuses_degrade_to_empty() {
        let statuses: UploadStatuses = serde_json::from_value(json!({
            "a": {"status": 5, "error": {"code": 1}},
            "b": null,
            "c": "completed",
            "d": {"status": "completed", "response": {"data": {}}}
        }))
        .unwrap();
        assert_eq!(statuses["a"], UploadStatus::default());
        assert_eq!(statuses["b"], UploadStatus::default());
        assert_eq!(statuses["c"], UploadStatus::default());
        assert_eq!(statuses["d"].status.as_deref(), Some("completed"));
        assert_eq!(statuses["d"].response, Some(json!({"data": {}})));
    }

    #[test]
    fn test_unknown_verdict_status_deserializes() {
        let verdict: FinalVerdict = serde_json::from_value(json!({"status": "paused"})).unwrap();
        assert_eq!(verdict.status, VerdictStatus::Unknown);
    }

    #[test]
    fn test_verdict_uuid_prefers_store_level_id() {
        let mut verdict = FinalVerdict {
            status: VerdictStatus::Success,
            data: Some(VerdictData::new("payload-id", json!("Approved"))),
            uuid: None,
            error: None,
        };
        assert_eq!(verdict.verdict_uuid(), Some("payload-id"));
        verdict.uuid = Some("store-id".to_string());
        assert_eq!(verdict.verdict_uuid(), Some("store-id"));
    }

    #[test]
    fn test_verdict_data_keeps_outer_fields() {
        let data: VerdictData = serde_json::from_value(json!({
            "uuid": "c1",
            "content": {"decision": "Pass"},
            "verdict": "Eligible",
            "message": ""
        }))
        .unwrap();
        assert_eq!(data.text_field("verdict"), Some("Eligible"));
        assert_eq!(data.text_field("message"), None);
        assert_eq!(data.uuid.as_deref(), Some("c1"));
    }

    #[test]
    fn test_fetch_error_user_message_mentions_timeout() {
        let msg = FetchError::Timeout(30).user_message();
        assert!(msg.contains("30s"));
    }
}
