//! Runtime loop for the outcome view
//!
//! Reconciles the verdict rule after every change, hands fetches to the
//! background, and applies their results until nothing is in flight.

use crate::app::background;
use crate::app::messages::BackgroundMessage;
use crate::app::RuntimeContext;
use crate::ui::OutcomeView;
use anyhow::{bail, Result};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Slack on top of the fetch timeout before the loop gives up.
const SETTLE_GRACE: Duration = Duration::from_secs(2);

/// Evaluate the fetch rule and spawn a fetch if it asks for one.
pub fn dispatch(view: &mut OutcomeView, ctx: &RuntimeContext) -> bool {
    match view.reconcile_verdict() {
        Some(ticket) => {
            background::spawn_verdict_fetch(ctx, ticket);
            true
        }
        None => false,
    }
}

/// User-initiated retry of the verdict fetch.
pub fn retry(view: &mut OutcomeView, ctx: &RuntimeContext) -> bool {
    match view.retry_verdict() {
        Some(ticket) => {
            background::spawn_verdict_fetch(ctx, ticket);
            true
        }
        None => false,
    }
}

/// Drive the view until no verdict fetch is in flight.
pub async fn run_until_settled(
    view: &mut OutcomeView,
    ctx: &RuntimeContext,
    rx: &mpsc::Receiver<BackgroundMessage>,
) -> Result<()> {
    let deadline = Instant::now() + ctx.fetch_timeout + SETTLE_GRACE;
    loop {
        dispatch(view, ctx);
        if background::drain_messages(view, rx) {
            // A result may make the rule fire again (e.g. a stale verdict).
            continue;
        }
        if !view.verdict_in_flight() {
            debug!("outcome view settled");
            return Ok(());
        }
        if Instant::now() >= deadline {
            bail!("verdict fetch did not report back in time");
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
