//! Case identity checks performed when the outcome view is opened.

use crate::protocol::UploadSummary;
use crate::verdict::Variant;
use tracing::warn;

pub const REDIRECT_TARGET: &str = "/";
pub const NOT_ALLOWED_ALERT: &str = "Not Allowed";

/// Case id the view works on: the one handed over by navigation, otherwise
/// the store's active case.
pub fn resolve_case_id(navigation_case_id: Option<&str>, summary: &UploadSummary) -> Option<String> {
    navigation_case_id
        .filter(|id| !id.is_empty())
        .or(summary.case_id.as_deref())
        .map(str::to_string)
}

/// Where the user is sent after leaving the outcome view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: &'static str,
}

impl Navigation {
    pub fn home() -> Self {
        Self {
            to: REDIRECT_TARGET,
        }
    }
}

/// Blocking notice shown alongside a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: &'static str,
    pub level: Variant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountDecision {
    Allowed,
    Redirect { navigation: Navigation, alert: Alert },
}

impl MountDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, MountDecision::Allowed)
    }
}

/// Compare the case id in the route with the active one.
///
/// Run once when the view mounts; later state changes do not re-run it.
pub fn check_mount(route_case_id: Option<&str>, active_case_id: Option<&str>) -> MountDecision {
    if route_case_id == active_case_id {
        return MountDecision::Allowed;
    }
    warn!(
        route = route_case_id.unwrap_or("-"),
        active = active_case_id.unwrap_or("-"),
        "route case does not match the active case"
    );
    MountDecision::Redirect {
        navigation: Navigation::home(),
        alert: Alert {
            message: NOT_ALLOWED_ALERT,
            level: Variant::Danger,
        },
    }
}
