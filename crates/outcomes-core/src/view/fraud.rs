//! Fraud image reveal and the two result pages of a card.

use crate::status::Card;
use serde_json::Value;

/// The only document group whose response can carry an alternate image.
pub const IDENTITY_DOCUMENTS_KEY: &str = "identity_documents";

/// Alternate image payload (`response.errors`) for the active card, if the
/// active group is the identity document group and the payload is usable.
pub fn fraud_image<'a>(active_key: Option<&str>, card: Option<&'a Card>) -> Option<&'a Value> {
    if active_key != Some(IDENTITY_DOCUMENTS_KEY) {
        return None;
    }
    card?
        .response
        .as_ref()?
        .get("errors")
        .filter(|errors| is_truthy(errors))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Clone, PartialEq)]
struct GateSnapshot {
    active_key: Option<String>,
    image: Option<Value>,
}

/// Whether the alternate (fraud) image is shown instead of the annotations.
///
/// Cleared whenever the gate closes, the active key changes, or the payload
/// changes, so a reveal never carries over to unrelated documents.
#[derive(Debug, Clone, Default)]
pub struct FraudImageToggle {
    revealed: bool,
    gate: Option<GateSnapshot>,
}

impl FraudImageToggle {
    /// Feed the current gate inputs. Returns `true` if a reveal was cleared.
    pub fn observe(&mut self, active_key: Option<&str>, image: Option<&Value>) -> bool {
        let snapshot = GateSnapshot {
            active_key: active_key.map(str::to_string),
            image: image.cloned(),
        };
        let changed = self.gate.as_ref() != Some(&snapshot);
        let can_toggle = snapshot.image.is_some();
        self.gate = Some(snapshot);

        if self.revealed && (changed || !can_toggle) {
            self.revealed = false;
            return true;
        }
        false
    }

    pub fn can_toggle(&self) -> bool {
        self.gate.as_ref().is_some_and(|g| g.image.is_some())
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed && self.can_toggle()
    }

    /// Show the alternate image. A no-op when the gate is closed.
    pub fn reveal(&mut self) -> bool {
        if !self.can_toggle() {
            return false;
        }
        self.revealed = true;
        true
    }

    pub fn hide(&mut self) {
        self.revealed = false;
    }

    pub fn toggle(&mut self) -> bool {
        if self.revealed {
            self.hide();
            false
        } else {
            self.reveal()
        }
    }
}

/// The two pages of a completed card: extracted annotations (images) and KPIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultPage {
    #[default]
    Annotations,
    Kpis,
}

impl ResultPage {
    pub fn flip(&self) -> Self {
        match self {
            ResultPage::Annotations => ResultPage::Kpis,
            ResultPage::Kpis => ResultPage::Annotations,
        }
    }

    /// Caption of the button that flips to the other page.
    pub fn switch_label(&self) -> &'static str {
        match self {
            ResultPage::Annotations => "KPIs",
            ResultPage::Kpis => "Extracted Annotations",
        }
    }
}
