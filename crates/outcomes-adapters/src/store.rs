//! Owned case store.
//!
//! Holds the external inputs of the outcome view (document groups, upload
//! statuses, upload summary) and the case verdict. Readers get accessors;
//! mutation goes through a small set of commands. Verdict fetches are
//! tracked by request id so a late completion can never overwrite the result
//! of a newer request.

use chrono::{DateTime, Utc};
use outcomes_core::{
    DocumentGroup, FetchError, FinalVerdict, UploadStatus, UploadStatuses, UploadSummary,
    VerdictData, VerdictStatus,
};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Handle for one dispatched verdict fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictTicket {
    pub request_id: u64,
    pub case_id: String,
}

#[derive(Debug, Clone)]
pub struct CaseStore {
    document_groups: Vec<DocumentGroup>,
    upload_statuses: UploadStatuses,
    upload_summary: UploadSummary,
    final_verdict: FinalVerdict,
    verdict_updated_at: Option<DateTime<Utc>>,
    active_request: Option<VerdictTicket>,
    next_request_id: u64,
    /// Bumped on every mutation.
    revision: u64,
}

impl Default for CaseStore {
    fn default() -> Self {
        Self::new(Vec::new(), UploadStatuses::new(), UploadSummary::default())
    }
}

impl CaseStore {
    pub fn new(
        document_groups: Vec<DocumentGroup>,
        upload_statuses: UploadStatuses,
        upload_summary: UploadSummary,
    ) -> Self {
        Self {
            document_groups,
            upload_statuses,
            upload_summary,
            final_verdict: FinalVerdict::default(),
            verdict_updated_at: None,
            active_request: None,
            next_request_id: 1,
            revision: 0,
        }
    }

    // ── Read accessors ──────────────────────────────────────────────────

    pub fn document_groups(&self) -> &[DocumentGroup] {
        &self.document_groups
    }

    pub fn upload_statuses(&self) -> &UploadStatuses {
        &self.upload_statuses
    }

    pub fn upload_summary(&self) -> &UploadSummary {
        &self.upload_summary
    }

    pub fn case_id(&self) -> Option<&str> {
        self.upload_summary.case_id.as_deref()
    }

    pub fn final_verdict(&self) -> &FinalVerdict {
        &self.final_verdict
    }

    pub fn verdict_updated_at(&self) -> Option<DateTime<Utc>> {
        self.verdict_updated_at
    }

    pub fn active_request(&self) -> Option<&VerdictTicket> {
        self.active_request.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ── Inputs from the upload pipeline ─────────────────────────────────

    pub fn set_document_groups(&mut self, groups: Vec<DocumentGroup>) {
        self.document_groups = groups;
        self.touch();
    }

    pub fn set_upload_status(&mut self, key: impl Into<String>, status: UploadStatus) {
        self.upload_statuses.insert(key.into(), status);
        self.touch();
    }

    pub fn set_case_id(&mut self, case_id: Option<String>) {
        self.upload_summary.case_id = case_id;
        self.touch();
    }

    /// Replace the verdict wholesale, e.g. when restoring a snapshot.
    pub fn set_final_verdict(&mut self, verdict: FinalVerdict) {
        self.final_verdict = verdict;
        self.active_request = None;
        self.verdict_updated_at = Some(Utc::now());
        self.touch();
    }

    // ── Commands ────────────────────────────────────────────────────────

    /// Start a verdict fetch for `case_id`.
    ///
    /// Returns `None` when a fetch is already in flight. Prior verdict data is
    /// kept while loading.
    pub fn request_verdict(&mut self, case_id: &str) -> Option<VerdictTicket> {
        if self.final_verdict.status == VerdictStatus::Loading {
            debug!(case_id, "verdict fetch already in flight");
            return None;
        }
        let ticket = VerdictTicket {
            request_id: self.next_request_id,
            case_id: case_id.to_string(),
        };
        self.next_request_id = self.next_request_id.saturating_add(1);
        self.final_verdict.status = VerdictStatus::Loading;
        self.final_verdict.error = None;
        self.active_request = Some(ticket.clone());
        self.verdict_updated_at = Some(Utc::now());
        self.touch();
        info!(case_id, request_id = ticket.request_id, "verdict fetch requested");
        Some(ticket)
    }

    /// Record the outcome of a fetch. Returns `false` if the request is no
    /// longer the active one and the outcome was dropped.
    pub fn complete_verdict(
        &mut self,
        request_id: u64,
        outcome: Result<VerdictData, FetchError>,
    ) -> bool {
        let Some(ticket) = self
            .active_request
            .take_if(|active| active.request_id == request_id)
        else {
            debug!(request_id, "dropping superseded verdict completion");
            return false;
        };

        match outcome {
            Ok(data) => {
                info!(
                    case_id = %ticket.case_id,
                    request_id,
                    "verdict fetched"
                );
                self.final_verdict = FinalVerdict {
                    status: VerdictStatus::Success,
                    data: Some(data),
                    uuid: Some(ticket.case_id),
                    error: None,
                };
            }
            Err(err) => {
                warn!(
                    case_id = %ticket.case_id,
                    request_id,
                    error = %err,
                    "verdict fetch failed"
                );
                self.final_verdict.status = VerdictStatus::Error;
                self.final_verdict.error = Some(Value::String(err.user_message()));
            }
        }
        self.verdict_updated_at = Some(Utc::now());
        self.touch();
        true
    }

    /// Clear uploads, the active case and its verdict.
    pub fn reset_case(&mut self) {
        self.upload_statuses.clear();
        self.upload_summary.case_id = None;
        self.final_verdict = FinalVerdict::default();
        self.active_request = None;
        self.verdict_updated_at = None;
        self.touch();
    }

    pub fn set_remaining_count(&mut self, count: u32) {
        self.upload_summary.remaining_uploads = count;
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
