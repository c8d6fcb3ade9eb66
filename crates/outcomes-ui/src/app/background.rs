//! Background task handling for verdict fetches
//!
//! Channel sends use `let _ =`: a failed send means the view owner is gone
//! and nobody is waiting for the result.

use crate::app::messages::BackgroundMessage;
use crate::app::RuntimeContext;
use crate::ui::OutcomeView;
use futures::FutureExt;
use outcomes_adapters::VerdictTicket;
use outcomes_core::FetchError;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::mpsc;
use tracing::{debug, warn};

pub const VERDICT_FETCH_TASK: &str = "verdict_fetch";

/// Fetch the verdict for `ticket` off the caller's task, bounded by the
/// configured timeout.
pub fn spawn_verdict_fetch(ctx: &RuntimeContext, ticket: VerdictTicket) {
    let source = ctx.source.clone();
    let tx = ctx.tx.clone();
    let timeout = ctx.fetch_timeout;
    spawn_background(ctx.tx.clone(), VERDICT_FETCH_TASK, async move {
        let VerdictTicket {
            request_id,
            case_id,
        } = ticket;
        let result = match tokio::time::timeout(timeout, source.fetch_verdict(&case_id)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout.as_secs())),
        };
        let _ = tx.send(BackgroundMessage::VerdictFetched { request_id, result });
    });
}

/// Apply every pending background message to the view. Returns whether
/// anything arrived.
pub fn drain_messages(view: &mut OutcomeView, rx: &mpsc::Receiver<BackgroundMessage>) -> bool {
    let mut changed = false;
    while let Ok(msg) = rx.try_recv() {
        changed = true;
        match msg {
            BackgroundMessage::VerdictFetched { request_id, result } => {
                if !view.complete_verdict(request_id, result) {
                    debug!(request_id, "verdict result arrived for a superseded request");
                }
            }
            BackgroundMessage::TaskCrashed { task_name, detail } => {
                warn!(task_name, detail = %detail, "background task crashed");
                if task_name == VERDICT_FETCH_TASK {
                    view.abandon_verdict_request(detail);
                }
            }
        }
    }
    changed
}

pub fn spawn_background<F>(tx: mpsc::Sender<BackgroundMessage>, task_name: &'static str, fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
            let detail = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            };
            let _ = tx.send(BackgroundMessage::TaskCrashed { task_name, detail });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use outcomes_adapters::{CaseStore, Config, FixtureResponse, FixtureVerdictSource};
    use outcomes_core::{
        DocumentGroup, FetchFuture, UploadStatus, UploadStatuses, UploadSummary, VerdictData,
        VerdictSource, VerdictStatus,
    };
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    struct PanickingSource;

    impl VerdictSource for PanickingSource {
        fn fetch_verdict<'a>(&'a self, case_id: &'a str) -> FetchFuture<'a> {
            Box::pin(async move {
                if case_id.is_empty() {
                    return Err(FetchError::UnknownCase(String::new()));
                }
                panic!("decoder exploded")
            })
        }
    }

    fn ready_view() -> OutcomeView {
        let mut statuses = UploadStatuses::new();
        statuses.insert("a".to_string(), UploadStatus::with_status("completed"));
        let store = CaseStore::new(
            vec![DocumentGroup::new("a", "A")],
            statuses,
            UploadSummary {
                case_id: Some("case-1".to_string()),
                remaining_uploads: 0,
            },
        );
        OutcomeView::new(store, None, Some("case-1"), &Config::default())
    }

    async fn wait_for(rx: &mpsc::Receiver<BackgroundMessage>) -> BackgroundMessage {
        for _ in 0..200 {
            if let Ok(msg) = rx.try_recv() {
                return msg;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("no background message arrived");
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let (tx, rx) = mpsc::channel();
        let source = FixtureVerdictSource::default().with_response(
            "case-1",
            FixtureResponse {
                data: Some(VerdictData::new("case-1", json!("Approved"))),
                error: None,
                delay_ms: 500,
            },
        );
        let ctx = RuntimeContext {
            source: Arc::new(source),
            tx,
            fetch_timeout: Duration::from_millis(20),
        };
        spawn_verdict_fetch(
            &ctx,
            VerdictTicket {
                request_id: 7,
                case_id: "case-1".to_string(),
            },
        );

        match wait_for(&rx).await {
            BackgroundMessage::VerdictFetched { request_id, result } => {
                assert_eq!(request_id, 7);
                assert!(matches!(result, Err(FetchError::Timeout(_))));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_crashed_fetch_fails_the_request() {
        let (tx, rx) = mpsc::channel();
        let ctx = RuntimeContext {
            source: Arc::new(PanickingSource),
            tx,
            fetch_timeout: Duration::from_secs(1),
        };
        let mut view = ready_view();
        let ticket = view.reconcile_verdict().unwrap();
        spawn_verdict_fetch(&ctx, ticket);

        let msg = wait_for(&rx).await;
        assert!(matches!(
            &msg,
            BackgroundMessage::TaskCrashed { task_name, detail }
                if *task_name == VERDICT_FETCH_TASK && detail.contains("decoder exploded")
        ));

        let (replay_tx, replay_rx) = mpsc::channel();
        replay_tx.send(msg).unwrap();
        assert!(drain_messages(&mut view, &replay_rx));
        assert_eq!(view.store().final_verdict().status, VerdictStatus::Error);
        assert!(view.verdict_display().show_retry);
    }

    #[test]
    fn test_drain_drops_superseded_results() {
        let mut view = ready_view();
        let ticket = view.reconcile_verdict().unwrap();
        let (tx, rx) = mpsc::channel();
        tx.send(BackgroundMessage::VerdictFetched {
            request_id: ticket.request_id + 1,
            result: Ok(VerdictData::new("case-1", json!("Rejected"))),
        })
        .unwrap();
        tx.send(BackgroundMessage::VerdictFetched {
            request_id: ticket.request_id,
            result: Ok(VerdictData::new("case-1", json!("Approved"))),
        })
        .unwrap();

        assert!(drain_messages(&mut view, &rx));
        assert_eq!(view.verdict_display().label, "Approved");
        assert!(!drain_messages(&mut view, &rx));
    }
}
