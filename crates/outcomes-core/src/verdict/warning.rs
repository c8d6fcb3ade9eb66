//! Secondary "warning" panel content derived from the verdict error object.

use serde_json::Value;

/// Messages longer than this many characters are treated as the detailed
/// explanation rather than the summary.
pub const DEFAULT_SWAP_THRESHOLD: usize = 100;

const LABEL_REASON: &str = "Verdict Reason";
const LABEL_WARNING: &str = "Detected Warning";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WarningContent {
    pub label: String,
    pub summary: String,
    pub details: String,
}

impl WarningContent {
    pub fn is_empty(&self) -> bool {
        self.label.is_empty() && self.summary.is_empty() && self.details.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarningExtractor {
    swap_threshold: usize,
}

impl Default for WarningExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_SWAP_THRESHOLD)
    }
}

impl WarningExtractor {
    pub fn new(swap_threshold: usize) -> Self {
        Self { swap_threshold }
    }

    pub fn swap_threshold(&self) -> usize {
        self.swap_threshold
    }

    /// Whether `message` is long enough to be shown as details.
    pub fn should_swap(&self, message: &str) -> bool {
        message.chars().count() > self.swap_threshold
    }

    /// Derive the warning panel from `error` and the classified verdict text.
    ///
    /// Anything that is not a JSON object yields empty content.
    pub fn extract(&self, error: Option<&Value>, verdict_text: &str) -> WarningContent {
        let Some(error) = error.filter(|e| e.is_object()) else {
            return WarningContent::default();
        };

        let text = string_field(error, "text");
        let message = string_field(error, "message");

        let label = if verdict_text.eq_ignore_ascii_case("rejected") {
            LABEL_REASON
        } else if error.get("types").and_then(Value::as_str) == Some("warning") {
            LABEL_WARNING
        } else {
            LABEL_REASON
        };

        let (summary, details) = if self.should_swap(message) {
            (text, message)
        } else {
            (message, text)
        };

        WarningContent {
            label: label.to_string(),
            summary: summary.to_string(),
            details: details.to_string(),
        }
    }
}

fn string_field<'a>(object: &'a Value, name: &str) -> &'a str {
    object.get(name).and_then(Value::as_str).unwrap_or("")
}
