//! Case snapshots on disk and a fixture-backed verdict source.
//!
//! A snapshot captures what the outcome view would receive from the case
//! store at mount time, plus canned verdict responses per case id. It lets
//! the CLI and tests drive the full view-model without a live backend.

use crate::store::CaseStore;
use outcomes_core::{
    DocumentGroup, FetchError, FetchFuture, FinalVerdict, UploadStatuses, UploadSummary,
    VerdictData, VerdictSource,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot {path} is not valid JSON: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("snapshot {path} has duplicate document group key '{key}'")]
    DuplicateGroup { path: PathBuf, key: String },
}

impl SnapshotError {
    pub fn user_message(&self) -> String {
        match self {
            SnapshotError::Read { path, .. } => {
                format!("Could not open {}. Check the path and try again.", path.display())
            }
            SnapshotError::Decode { source, .. } => {
                format!("The snapshot is not valid JSON (line {}).", source.line())
            }
            SnapshotError::DuplicateGroup { key, .. } => {
                format!("Document group '{}' appears more than once.", key)
            }
        }
    }
}

/// Canned answer for one case id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<VerdictData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Simulated latency.
    #[serde(default)]
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseSnapshot {
    pub document_groups: Vec<DocumentGroup>,
    pub upload_statuses: UploadStatuses,
    pub upload_summary: UploadSummary,
    pub final_verdict: FinalVerdict,
    /// Case id handed over by navigation state, if any.
    pub navigation_case_id: Option<String>,
    pub verdict_responses: HashMap<String, FixtureResponse>,
}

impl CaseSnapshot {
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot: CaseSnapshot =
            serde_json::from_str(&content).map_err(|source| SnapshotError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        let mut seen = std::collections::HashSet::new();
        for group in &snapshot.document_groups {
            if !seen.insert(group.key.as_str()) {
                return Err(SnapshotError::DuplicateGroup {
                    path: path.to_path_buf(),
                    key: group.key.clone(),
                });
            }
        }
        Ok(snapshot)
    }

    /// Build the case store and the fixture source from this snapshot.
    pub fn into_parts(self) -> (CaseStore, FixtureVerdictSource) {
        let mut store = CaseStore::new(
            self.document_groups,
            self.upload_statuses,
            self.upload_summary,
        );
        if self.final_verdict != FinalVerdict::default() {
            store.set_final_verdict(self.final_verdict);
        }
        (store, FixtureVerdictSource::new(self.verdict_responses))
    }
}

/// Verdict source answering from canned responses.
#[derive(Debug, Clone, Default)]
pub struct FixtureVerdictSource {
    responses: HashMap<String, FixtureResponse>,
}

impl FixtureVerdictSource {
    pub fn new(responses: HashMap<String, FixtureResponse>) -> Self {
        Self { responses }
    }

    pub fn with_response(mut self, case_id: impl Into<String>, response: FixtureResponse) -> Self {
        self.responses.insert(case_id.into(), response);
        self
    }
}

impl VerdictSource for FixtureVerdictSource {
    fn fetch_verdict<'a>(&'a self, case_id: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            let Some(response) = self.responses.get(case_id) else {
                return Err(FetchError::UnknownCase(case_id.to_string()));
            };
            if response.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(response.delay_ms)).await;
            }
            if let Some(error) = &response.error {
                return Err(FetchError::Transport(error.clone()));
            }
            response
                .data
                .clone()
                .ok_or_else(|| FetchError::Malformed("response carries neither data nor error".to_string()))
        })
    }
}
