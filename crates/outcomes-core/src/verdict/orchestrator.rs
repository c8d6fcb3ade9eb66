//! Decides when the case verdict has to be (re-)fetched.
//!
//! The rule is evaluated against a full snapshot of its four inputs. It never
//! performs the fetch itself; it returns an action the caller dispatches.

use crate::protocol::VerdictStatus;
use tracing::debug;

/// Everything the fetch rule looks at.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrchestratorInputs {
    pub case_id: Option<String>,
    pub all_completed: bool,
    pub status: VerdictStatus,
    pub verdict_uuid: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchReason {
    /// No verdict has been requested for this case yet.
    Initial,
    /// The stored verdict belongs to a different case.
    Stale,
    /// The user asked to try again.
    Retry,
}

impl FetchReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchReason::Initial => "initial",
            FetchReason::Stale => "stale",
            FetchReason::Retry => "retry",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictAction {
    Noop,
    Fetch { case_id: String, reason: FetchReason },
}

impl VerdictAction {
    pub fn is_fetch(&self) -> bool {
        matches!(self, VerdictAction::Fetch { .. })
    }
}

/// The bare fetch rule, without any memory of earlier evaluations.
pub fn decide(inputs: &OrchestratorInputs) -> VerdictAction {
    let Some(case_id) = inputs.case_id.as_deref() else {
        return VerdictAction::Noop;
    };
    if !inputs.all_completed {
        return VerdictAction::Noop;
    }

    match inputs.status {
        VerdictStatus::Idle => VerdictAction::Fetch {
            case_id: case_id.to_string(),
            reason: FetchReason::Initial,
        },
        VerdictStatus::Success if inputs.verdict_uuid.as_deref() != Some(case_id) => {
            VerdictAction::Fetch {
                case_id: case_id.to_string(),
                reason: FetchReason::Stale,
            }
        }
        // Loading is in flight, errors wait for an explicit retry.
        _ => VerdictAction::Noop,
    }
}

/// Reconcile the current snapshot against the previously evaluated one.
///
/// Re-running with inputs equal to `previous` is always a no-op, so callers
/// may invoke this on every state change without issuing duplicate fetches.
pub fn reconcile(
    inputs: &OrchestratorInputs,
    previous: Option<&OrchestratorInputs>,
) -> VerdictAction {
    if previous == Some(inputs) {
        return VerdictAction::Noop;
    }
    decide(inputs)
}

/// Stateful wrapper around [`reconcile`] that remembers the last snapshot.
#[derive(Debug, Clone, Default)]
pub struct VerdictOrchestrator {
    last_evaluated: Option<OrchestratorInputs>,
}

impl VerdictOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconcile(&mut self, inputs: &OrchestratorInputs) -> VerdictAction {
        let action = reconcile(inputs, self.last_evaluated.as_ref());
        if self.last_evaluated.as_ref() != Some(inputs) {
            debug!(
                case_id = inputs.case_id.as_deref().unwrap_or("-"),
                all_completed = inputs.all_completed,
                status = inputs.status.as_str(),
                fetch = action.is_fetch(),
                "verdict inputs changed"
            );
            self.last_evaluated = Some(inputs.clone());
        }
        action
    }

    /// Remember the state a dispatched fetch moved the store into, so that
    /// a later return to the pre-dispatch inputs is evaluated again.
    pub fn record_dispatch(&mut self, inputs: &OrchestratorInputs) {
        self.last_evaluated = Some(inputs.clone());
    }

    /// User-initiated retry. Allowed whenever a case is known and nothing is
    /// already in flight.
    pub fn retry(&self, inputs: &OrchestratorInputs) -> VerdictAction {
        match inputs.case_id.as_deref() {
            Some(case_id) if inputs.status != VerdictStatus::Loading => VerdictAction::Fetch {
                case_id: case_id.to_string(),
                reason: FetchReason::Retry,
            },
            _ => VerdictAction::Noop,
        }
    }

    /// Forget the last snapshot so the next reconcile evaluates from scratch.
    pub fn reset(&mut self) {
        self.last_evaluated = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(status: VerdictStatus, uuid: Option<&str>) -> OrchestratorInputs {
        OrchestratorInputs {
            case_id: Some("case-1".to_string()),
            all_completed: true,
            status,
            verdict_uuid: uuid.map(str::to_string),
        }
    }

    #[test]
    fn test_return_to_pre_dispatch_inputs_fetches_again() {
        let mut orchestrator = VerdictOrchestrator::new();
        let idle = inputs(VerdictStatus::Idle, None);
        assert!(orchestrator.reconcile(&idle).is_fetch());

        orchestrator.record_dispatch(&inputs(VerdictStatus::Loading, None));
        assert_eq!(
            orchestrator.reconcile(&inputs(VerdictStatus::Loading, None)),
            VerdictAction::Noop
        );
        assert!(orchestrator.reconcile(&idle).is_fetch());
    }

    #[test]
    fn test_no_action_without_case_or_completion() {
        let mut no_case = inputs(VerdictStatus::Idle, None);
        no_case.case_id = None;
        assert_eq!(decide(&no_case), VerdictAction::Noop);

        let mut pending = inputs(VerdictStatus::Idle, None);
        pending.all_completed = false;
        assert_eq!(decide(&pending), VerdictAction::Noop);
    }

    #[test]
    fn test_idle_fetches_exactly_once_for_unchanged_inputs() {
        let mut orchestrator = VerdictOrchestrator::new();
        let idle = inputs(VerdictStatus::Idle, None);

        let first = orchestrator.reconcile(&idle);
        assert_eq!(
            first,
            VerdictAction::Fetch {
                case_id: "case-1".to_string(),
                reason: FetchReason::Initial
            }
        );
        for _ in 0..5 {
            assert_eq!(orchestrator.reconcile(&idle), VerdictAction::Noop);
        }
    }

    #[test]
    fn test_loading_suppresses_fetch() {
        let mut orchestrator = VerdictOrchestrator::new();
        let loading = inputs(VerdictStatus::Loading, None);
        for _ in 0..3 {
            assert_eq!(orchestrator.reconcile(&loading), VerdictAction::Noop);
        }
    }

    #[test]
    fn test_stale_success_refetches_until_uuid_matches() {
        let mut orchestrator = VerdictOrchestrator::new();

        let stale = inputs(VerdictStatus::Success, Some("case-0"));
        assert!(matches!(
            orchestrator.reconcile(&stale),
            VerdictAction::Fetch {
                reason: FetchReason::Stale,
                ..
            }
        ));

        assert_eq!(
            orchestrator.reconcile(&inputs(VerdictStatus::Loading, Some("case-0"))),
            VerdictAction::Noop
        );

        let fresh = inputs(VerdictStatus::Success, Some("case-1"));
        assert_eq!(orchestrator.reconcile(&fresh), VerdictAction::Noop);
        assert_eq!(orchestrator.reconcile(&fresh), VerdictAction::Noop);
    }

    #[test]
    fn test_late_stale_response_triggers_new_fetch() {
        let mut orchestrator = VerdictOrchestrator::new();
        let stale = inputs(VerdictStatus::Success, Some("old"));
        assert!(orchestrator.reconcile(&stale).is_fetch());
        assert!(!orchestrator
            .reconcile(&inputs(VerdictStatus::Loading, Some("old")))
            .is_fetch());
        // Another stale result lands after the loading phase.
        assert!(orchestrator.reconcile(&stale).is_fetch());
    }

    #[test]
    fn test_error_waits_for_retry() {
        let mut orchestrator = VerdictOrchestrator::new();
        let failed = inputs(VerdictStatus::Error, None);
        assert_eq!(orchestrator.reconcile(&failed), VerdictAction::Noop);
        assert_eq!(
            orchestrator.retry(&failed),
            VerdictAction::Fetch {
                case_id: "case-1".to_string(),
                reason: FetchReason::Retry
            }
        );
    }

    #[test]
    fn test_retry_is_ignored_while_loading_or_without_case() {
        let orchestrator = VerdictOrchestrator::new();
        assert_eq!(
            orchestrator.retry(&inputs(VerdictStatus::Loading, None)),
            VerdictAction::Noop
        );
        let mut no_case = inputs(VerdictStatus::Error, None);
        no_case.case_id = None;
        assert_eq!(orchestrator.retry(&no_case), VerdictAction::Noop);
    }

    #[test]
    fn test_unknown_status_does_nothing() {
        assert_eq!(
            decide(&inputs(VerdictStatus::Unknown, None)),
            VerdictAction::Noop
        );
    }

    #[test]
    fn test_reset_allows_fresh_evaluation() {
        let mut orchestrator = VerdictOrchestrator::new();
        let idle = inputs(VerdictStatus::Idle, None);
        assert!(orchestrator.reconcile(&idle).is_fetch());
        orchestrator.reset();
        assert!(orchestrator.reconcile(&idle).is_fetch());
    }
}
