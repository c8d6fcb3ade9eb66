//! Plain-text rendering of the outcome view.
//!
//! Produces the same information the outcome page lays out: document cards,
//! the active card's result area, and the verdict panel with its warning.

use super::theme::Theme;
use super::OutcomeView;
use outcomes_core::view::{KpiView, ResultPage, ResultPanel};
use serde_json::{Map, Value};
use std::fmt::Write;

const RULE: &str = "────────────────────────────────────────────────────────────";

pub fn render(view: &OutcomeView) -> String {
    let mut out = String::new();
    render_cards(view, &mut out);
    render_active(view, &mut out);
    render_verdict(view, &mut out);
    out
}

// ═══════════════════════════════════════════════════════════════════════════
//  DOCUMENT CARDS
// ═══════════════════════════════════════════════════════════════════════════

fn render_cards(view: &OutcomeView, out: &mut String) {
    let completion = view.completion();
    let _ = writeln!(out, "Documents  ({})", completion.progress_label());
    let _ = writeln!(out, "{RULE}");

    let active = view.active_card().map(|card| card.key.as_str());
    for card in view.cards() {
        let marker = if Some(card.key.as_str()) == active { ">" } else { " " };
        let _ = writeln!(
            out,
            "{marker} {} {:<32} {}",
            Theme::badge_glyph(card.status.badge),
            card.title,
            card.status.label
        );
    }

    if view.status_popover_open() {
        for card in view.cards() {
            let _ = writeln!(out, "    {}: {}", card.title, card.status.description);
        }
    }
    out.push('\n');
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTIVE CARD
// ═══════════════════════════════════════════════════════════════════════════

fn render_active(view: &OutcomeView, out: &mut String) {
    let Some(card) = view.active_card() else {
        let _ = writeln!(out, "No documents for this case.\n");
        return;
    };

    let badge = view.badge();
    let _ = write!(out, "{}", card.title);
    if let Some(badge) = &badge {
        let _ = write!(out, "  [{}]", badge.label);
    }
    out.push('\n');
    let _ = writeln!(out, "{RULE}");

    match view.result_panel() {
        Some(ResultPanel::Content) => render_pages(view, out),
        Some(ResultPanel::Pending) => {
            let _ = writeln!(out, "{}", card.status.description);
        }
        Some(ResultPanel::Failed(error)) => {
            let _ = writeln!(
                out,
                "{}",
                error.as_deref().unwrap_or(card.status.description)
            );
        }
        Some(ResultPanel::RawPayload(json)) => {
            let _ = writeln!(out, "{json}");
        }
        Some(ResultPanel::NoPayload) => {
            let _ = writeln!(out, "No response payload was returned.");
        }
        Some(ResultPanel::Empty) | None => {
            let _ = writeln!(out, "No content to display.");
        }
    }
    out.push('\n');
}

fn render_pages(view: &OutcomeView, out: &mut String) {
    let page = view.page();
    let _ = writeln!(out, "[switch to {}]", page.switch_label());
    match page {
        ResultPage::Annotations => {
            let images = view.annotation_images();
            if images.is_empty() {
                let _ = writeln!(out, "No annotations extracted.");
            }
            for image in images {
                let _ = writeln!(out, "  image: {}", truncate(&image, 72));
            }
        }
        ResultPage::Kpis => render_kpis(view, out),
    }
}

fn render_kpis(view: &OutcomeView, out: &mut String) {
    let mut body = String::new();
    match view.kpi_view() {
        KpiView::BankDashboard { kpis, summary } => {
            let _ = writeln!(body, "Bank statement KPIs");
            write_fields(&mut body, &kpis);
            write_summary(&mut body, summary.as_deref());
        }
        KpiView::TaxDashboard { report, summary } => {
            let _ = writeln!(body, "Tax report");
            write_fields(&mut body, &report);
            write_summary(&mut body, summary.as_deref());
        }
        KpiView::DocumentDetails {
            document_key,
            data,
            summary,
        } => {
            let _ = writeln!(body, "Details ({document_key})");
            write_fields(&mut body, &data);
            write_summary(&mut body, summary.as_deref());
        }
        KpiView::Markdown(text) => {
            let _ = writeln!(body, "{text}");
        }
    }

    if view.content_clamped() {
        const CLAMP_LINES: usize = 12;
        let total = body.lines().count();
        for line in body.lines().take(CLAMP_LINES) {
            let _ = writeln!(out, "{line}");
        }
        if total > CLAMP_LINES {
            let _ = writeln!(out, "  ... {} more lines (expand to see all)", total - CLAMP_LINES);
        }
    } else {
        out.push_str(&body);
    }
}

fn write_fields(out: &mut String, fields: &Map<String, Value>) {
    for (key, value) in fields {
        let shown = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let _ = writeln!(out, "  {key}: {}", truncate(&shown, 60));
    }
}

fn write_summary(out: &mut String, summary: Option<&str>) {
    if let Some(summary) = summary {
        let _ = writeln!(out, "Summary: {summary}");
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  VERDICT
// ═══════════════════════════════════════════════════════════════════════════

fn render_verdict(view: &OutcomeView, out: &mut String) {
    let display = view.verdict_display();
    let _ = writeln!(out, "Final Verdict");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(
        out,
        "{} {}  ({})",
        Theme::glyph(display.variant),
        display.label,
        display.variant.as_str()
    );
    let _ = writeln!(out, "{}", display.message);
    if display.show_retry {
        let _ = writeln!(out, "[retry]");
    }

    let warning = view.warning_content();
    if !warning.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{}", warning.label);
        if !warning.summary.is_empty() {
            let _ = writeln!(out, "{}", warning.summary);
        }
        if !warning.details.is_empty() {
            let _ = writeln!(out, "{}", warning.details);
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
