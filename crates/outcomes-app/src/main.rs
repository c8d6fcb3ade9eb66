//! Outcomes - case outcome viewer
//!
//! Loads a case snapshot, settles the final verdict against the snapshot's
//! fixture responses and prints the outcome page as text.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use outcomes_adapters::{CaseSnapshot, Config};
use outcomes_core::guard::resolve_case_id;
use outcomes_core::view::ResultPage;
use outcomes_ui::app::{runtime, RuntimeContext};
use outcomes_ui::{render, run_until_settled, OutcomeView};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Page {
    Annotations,
    Kpis,
}

#[derive(Parser, Debug)]
#[command(
    name = "outcomes",
    about = "Show the outcome of a document verification case",
    version
)]
struct Args {
    /// Case snapshot (JSON) to load
    snapshot: PathBuf,

    /// Case id from the route; defaults to the snapshot's active case
    #[arg(long)]
    route_case_id: Option<String>,

    /// Retry the verdict fetch once after the first attempt settles
    #[arg(long)]
    retry: bool,

    /// Select a document group by key
    #[arg(long)]
    select: Option<String>,

    /// Reveal the fraud image of the selected identity document
    #[arg(long)]
    reveal_fraud: bool,

    /// Result page to show for the selected document
    #[arg(long, value_enum)]
    page: Option<Page>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("OUTCOMES_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = Config::load();
    let snapshot = CaseSnapshot::load(&args.snapshot).map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let navigation_case_id = snapshot.navigation_case_id.clone();
    let (store, source) = snapshot.into_parts();
    info!(
        path = %args.snapshot.display(),
        groups = store.document_groups().len(),
        "snapshot loaded"
    );

    let route_case_id = args
        .route_case_id
        .clone()
        .or_else(|| resolve_case_id(navigation_case_id.as_deref(), store.upload_summary()));
    let mut view = OutcomeView::new(store, navigation_case_id, route_case_id.as_deref(), &config);
    if let Some(message) = view.alert().map(|alert| alert.message) {
        let to = view.take_navigation().map(|n| n.to).unwrap_or("/");
        bail!("{} (redirecting to {})", message, to);
    }

    let (tx, rx) = mpsc::channel();
    let ctx = RuntimeContext {
        source: Arc::new(source),
        tx,
        fetch_timeout: config.fetch_timeout(),
    };

    run_until_settled(&mut view, &ctx, &rx)
        .await
        .context("Failed to settle the final verdict")?;
    if args.retry && runtime::retry(&mut view, &ctx) {
        run_until_settled(&mut view, &ctx, &rx)
            .await
            .context("Failed to settle the retried verdict")?;
    }

    apply_actions(&mut view, &args)?;
    print!("{}", render(&view));
    Ok(())
}

fn apply_actions(view: &mut OutcomeView, args: &Args) -> Result<()> {
    if let Some(key) = &args.select {
        if view.active_key() != Some(key.as_str()) && !view.select(key) {
            bail!("No document group named '{}' in this case", key);
        }
    }

    if let Some(page) = args.page {
        let wanted = match page {
            Page::Annotations => ResultPage::Annotations,
            Page::Kpis => ResultPage::Kpis,
        };
        if view.page() != wanted {
            view.flip_page();
        }
    }

    if args.reveal_fraud && !view.reveal_fraud_image() {
        eprintln!("  ! No fraud image is available for the selected document.");
    }
    Ok(())
}
