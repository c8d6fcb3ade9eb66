//! Verdict classification.
//!
//! Maps the verdict store state to the headline shown above the per-document
//! reports: label, supporting message, sentiment variant, icon and whether a
//! retry affordance is offered. Sentiment comes from an ordered rule table;
//! the first rule whose terms occur in the verdict text wins.

use crate::protocol::{FinalVerdict, VerdictData, VerdictStatus};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Sentiment/severity class driving display styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Success,
    Danger,
    Info,
    Warning,
    Primary,
    Secondary,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Success => "success",
            Variant::Danger => "danger",
            Variant::Info => "info",
            Variant::Warning => "warning",
            Variant::Primary => "primary",
            Variant::Secondary => "secondary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictDisplay {
    pub label: String,
    pub message: String,
    pub variant: Variant,
    pub icon: &'static str,
    pub show_retry: bool,
}

/// One row of the sentiment table.
#[derive(Debug, Clone, Copy)]
pub struct VerdictRule {
    /// Substrings matched against the lowercased verdict text.
    pub terms: &'static [&'static str],
    pub variant: Variant,
    pub icon: &'static str,
}

/// Evaluated top to bottom, first match wins. New categories are new rows.
pub const VERDICT_RULES: &[VerdictRule] = &[
    VerdictRule {
        terms: &["yes", "approve", "eligible", "pass", "green"],
        variant: Variant::Success,
        icon: "fa-solid fa-circle-check",
    },
    VerdictRule {
        terms: &["no", "reject", "ineligible", "fail", "decline", "red"],
        variant: Variant::Danger,
        icon: "fa-solid fa-circle-xmark",
    },
    VerdictRule {
        terms: &["pending", "processing"],
        variant: Variant::Info,
        icon: "fa-solid fa-hourglass-half",
    },
    VerdictRule {
        terms: &["review", "manual"],
        variant: Variant::Primary,
        icon: "fa-solid fa-user-pen",
    },
];

/// Used when no rule matches. Unmatched text is treated with caution.
pub const UNMATCHED_VARIANT: Variant = Variant::Warning;
pub const UNMATCHED_ICON: &str = "fa-solid fa-scale-balanced";

const PRIMARY_FIELDS: [&str; 4] = ["verdict", "decision", "status", "label"];
const SECONDARY_FIELDS: [&str; 3] = ["message", "summary", "reason"];

const FALLBACK_PRIMARY: &str = "Completed";
const FALLBACK_SECONDARY: &str = "Review the evaluation summary above for more insights.";
const FALLBACK_ERROR: &str = "We couldn't retrieve the final decision. Please try again.";

fn compiled_rules() -> &'static [(Option<Regex>, &'static VerdictRule)] {
    static RULES: OnceLock<Vec<(Option<Regex>, &'static VerdictRule)>> = OnceLock::new();
    RULES.get_or_init(|| {
        VERDICT_RULES
            .iter()
            .map(|rule| {
                let alternation = rule
                    .terms
                    .iter()
                    .map(|term| regex::escape(term))
                    .collect::<Vec<_>>()
                    .join("|");
                (Regex::new(&alternation).ok(), rule)
            })
            .collect()
    })
}

/// Find the first rule matching `text` (case-insensitive).
pub fn match_rule(text: &str) -> Option<&'static VerdictRule> {
    let normalized = text.to_lowercase();
    compiled_rules().iter().find_map(|(regex, rule)| {
        let hit = match regex {
            Some(re) => re.is_match(&normalized),
            None => rule.terms.iter().any(|term| normalized.contains(term)),
        };
        hit.then_some(*rule)
    })
}

fn waiting_display() -> VerdictDisplay {
    VerdictDisplay {
        label: "Waiting for verdict".to_string(),
        message: "We will share the final verdict once all documents finish processing."
            .to_string(),
        variant: Variant::Warning,
        icon: "fa-solid fa-hourglass-half fa-beat",
        show_retry: false,
    }
}

fn fetching_display() -> VerdictDisplay {
    VerdictDisplay {
        label: "Fetching verdict...".to_string(),
        message: "Please wait while we finalize the assessment.".to_string(),
        variant: Variant::Info,
        icon: "fa-solid fa-circle-notch fa-spin",
        show_retry: false,
    }
}

/// Classify the verdict for display.
pub fn classify_verdict(all_completed: bool, verdict: &FinalVerdict) -> VerdictDisplay {
    if !all_completed {
        return waiting_display();
    }

    match verdict.status {
        VerdictStatus::Loading => fetching_display(),
        VerdictStatus::Error => VerdictDisplay {
            label: "Unable to fetch verdict".to_string(),
            message: error_text(verdict.error.as_ref())
                .unwrap_or_else(|| FALLBACK_ERROR.to_string()),
            variant: Variant::Danger,
            icon: "fa-solid fa-triangle-exclamation",
            show_retry: true,
        },
        VerdictStatus::Success => {
            let data = verdict.data.as_ref();
            let primary = primary_text(data);
            let secondary = secondary_text(data);
            let (variant, icon) = match match_rule(&primary) {
                Some(rule) => (rule.variant, rule.icon),
                None => (UNMATCHED_VARIANT, UNMATCHED_ICON),
            };
            VerdictDisplay {
                label: format_title(&primary),
                message: secondary,
                variant,
                icon,
                show_retry: false,
            }
        }
        VerdictStatus::Idle | VerdictStatus::Unknown => waiting_display(),
    }
}

/// Headline text of a successful verdict.
pub fn primary_text(data: Option<&VerdictData>) -> String {
    let content = data.and_then(|d| d.content.as_ref());
    let from_content = match content {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Object(_)) => first_field(content, &PRIMARY_FIELDS).unwrap_or_default(),
        _ => String::new(),
    };
    if !from_content.is_empty() {
        return from_content;
    }
    data.and_then(|d| PRIMARY_FIELDS.iter().find_map(|f| d.text_field(f)))
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_PRIMARY.to_string())
}

/// Supporting sentence of a successful verdict.
pub fn secondary_text(data: Option<&VerdictData>) -> String {
    let content = data
        .and_then(|d| d.content.as_ref())
        .filter(|c| c.is_object());
    first_field(content, &SECONDARY_FIELDS)
        .or_else(|| {
            data.and_then(|d| SECONDARY_FIELDS.iter().find_map(|f| d.text_field(f)))
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_SECONDARY.to_string())
}

fn first_field(object: Option<&Value>, fields: &[&str]) -> Option<String> {
    let object = object?;
    fields.iter().find_map(|field| {
        object
            .get(*field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Readable text of a verdict error, whether it is a plain string or an
/// object carrying `message`/`text`.
pub fn error_text(error: Option<&Value>) -> Option<String> {
    match error? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        obj @ Value::Object(_) => first_field(Some(obj), &["message", "text"]),
        _ => None,
    }
}

/// Title-case verdict text for the headline.
///
/// `yes` and `no` are special-cased: they render as "Yes" and "NO".
pub fn format_title(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let lower = text.to_lowercase();
    if lower == "yes" {
        return "Yes".to_string();
    }
    if lower == "no" {
        return "NO".to_string();
    }

    let spaced = lower.replace('_', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut prev_is_word = false;
    for ch in spaced.chars() {
        let is_word = ch.is_ascii_alphanumeric() || ch == '_';
        if is_word && !prev_is_word {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        prev_is_word = is_word;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn success(content: Value) -> FinalVerdict {
        FinalVerdict {
            status: VerdictStatus::Success,
            data: Some(VerdictData::new("case-1", content)),
            uuid: Some("case-1".to_string()),
            error: None,
        }
    }

    #[test]
    fn test_waiting_until_all_documents_complete() {
        let display = classify_verdict(false, &success(json!("Approved")));
        assert_eq!(display.label, "Waiting for verdict");
        assert_eq!(display.variant, Variant::Warning);
        assert!(!display.show_retry);
    }

    #[test]
    fn test_loading_shows_fetching() {
        let verdict = FinalVerdict {
            status: VerdictStatus::Loading,
            ..FinalVerdict::default()
        };
        let display = classify_verdict(true, &verdict);
        assert_eq!(display.label, "Fetching verdict...");
        assert_eq!(display.variant, Variant::Info);
        assert!(!display.show_retry);
    }

    #[test]
    fn test_error_offers_retry_with_message() {
        let mut verdict = FinalVerdict {
            status: VerdictStatus::Error,
            error: Some(json!("gateway timeout")),
            ..FinalVerdict::default()
        };
        let display = classify_verdict(true, &verdict);
        assert_eq!(display.variant, Variant::Danger);
        assert_eq!(display.message, "gateway timeout");
        assert!(display.show_retry);

        verdict.error = None;
        assert_eq!(classify_verdict(true, &verdict).message, FALLBACK_ERROR);
    }

    #[test]
    fn test_error_object_uses_message_field() {
        let verdict = FinalVerdict {
            status: VerdictStatus::Error,
            error: Some(json!({"message": "score unavailable", "text": "detail"})),
            ..FinalVerdict::default()
        };
        assert_eq!(classify_verdict(true, &verdict).message, "score unavailable");
    }

    #[test]
    fn test_approved_and_rejected() {
        let approved = classify_verdict(true, &success(json!("Approved")));
        assert_eq!(approved.variant, Variant::Success);
        assert_eq!(approved.label, "Approved");
        assert_eq!(approved.icon, "fa-solid fa-circle-check");

        let rejected = classify_verdict(true, &success(json!("Rejected")));
        assert_eq!(rejected.variant, Variant::Danger);
        assert_eq!(rejected.label, "Rejected");
    }

    #[test]
    fn test_yes_and_no_labels() {
        assert_eq!(classify_verdict(true, &success(json!("yes"))).label, "Yes");
        assert_eq!(classify_verdict(true, &success(json!("YES"))).label, "Yes");
        assert_eq!(classify_verdict(true, &success(json!("no"))).label, "NO");
        assert_eq!(classify_verdict(true, &success(json!("No"))).label, "NO");
    }

    #[test]
    fn test_rule_order_first_match_wins() {
        assert_eq!(
            classify_verdict(true, &success(json!("Pending review"))).variant,
            Variant::Info
        );
        assert_eq!(
            classify_verdict(true, &success(json!("manual_review"))).variant,
            Variant::Primary
        );
        assert_eq!(
            classify_verdict(true, &success(json!("manual_review"))).label,
            "Manual Review"
        );
        // "eligible" matches before "ineligible" can be considered.
        assert_eq!(
            classify_verdict(true, &success(json!("Ineligible"))).variant,
            Variant::Success
        );
    }

    #[test]
    fn test_unmatched_text_defaults_to_warning() {
        let display = classify_verdict(true, &success(json!("Inconclusive")));
        assert_eq!(display.variant, Variant::Warning);
        assert_eq!(display.icon, UNMATCHED_ICON);
    }

    #[test]
    fn test_object_content_field_preference() {
        let display = classify_verdict(
            true,
            &success(json!({"status": "pending", "decision": "Pass", "summary": "All good"})),
        );
        assert_eq!(display.label, "Pass");
        assert_eq!(display.variant, Variant::Success);
        assert_eq!(display.message, "All good");
    }

    #[test]
    fn test_falls_back_to_outer_data_then_literal() {
        let data: VerdictData = serde_json::from_value(json!({
            "uuid": "case-1",
            "content": {"notes": []},
            "verdict": "Declined",
            "reason": "Income too low"
        }))
        .unwrap();
        let verdict = FinalVerdict {
            status: VerdictStatus::Success,
            data: Some(data),
            uuid: None,
            error: None,
        };
        let display = classify_verdict(true, &verdict);
        assert_eq!(display.label, "Declined");
        assert_eq!(display.variant, Variant::Danger);
        assert_eq!(display.message, "Income too low");

        let empty = FinalVerdict {
            status: VerdictStatus::Success,
            ..FinalVerdict::default()
        };
        let display = classify_verdict(true, &empty);
        assert_eq!(display.label, "Completed");
        assert_eq!(display.message, FALLBACK_SECONDARY);
        assert_eq!(display.variant, Variant::Warning);
    }

    #[test]
    fn test_string_content_is_trimmed() {
        assert_eq!(primary_text(Some(&VerdictData::new("c", json!("  Pass  ")))), "Pass");
        assert_eq!(primary_text(Some(&VerdictData::new("c", json!("   ")))), "Completed");
    }

    #[test]
    fn test_unknown_status_is_waiting() {
        let verdict = FinalVerdict {
            status: VerdictStatus::Unknown,
            ..FinalVerdict::default()
        };
        assert_eq!(classify_verdict(true, &verdict).label, "Waiting for verdict");
    }

    #[test]
    fn test_format_title() {
        assert_eq!(format_title(""), "");
        assert_eq!(format_title("APPROVED_WITH_CONDITIONS"), "Approved With Conditions");
        assert_eq!(format_title("needs-more docs"), "Needs-More Docs");
        assert_eq!(format_title("nO"), "NO");
    }
}
