//! Which document group is active, which ones are expanded, and whether the
//! status summary popover is open.

use crate::protocol::DocumentGroup;
use std::collections::HashMap;

/// Active document group key.
///
/// Whenever the group list is non-empty the active key is one of its keys.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    active_key: Option<String>,
}

impl SelectionState {
    /// Start on the first group, or nothing if there are none.
    pub fn new(groups: &[DocumentGroup]) -> Self {
        Self {
            active_key: groups.first().map(|g| g.key.clone()),
        }
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active_key.as_deref()
    }

    /// Switch to `key`. Returns `true` when the selection actually changed.
    ///
    /// Keys that are not part of `groups` are ignored.
    pub fn select(&mut self, key: &str, groups: &[DocumentGroup]) -> bool {
        if !groups.iter().any(|g| g.key == key) {
            return false;
        }
        if self.active_key.as_deref() == Some(key) {
            return false;
        }
        self.active_key = Some(key.to_string());
        true
    }

    /// Re-validate against a new group list. Returns `true` when the active
    /// key had to be replaced.
    ///
    /// An empty list leaves the selection untouched.
    pub fn reconcile(&mut self, groups: &[DocumentGroup]) -> bool {
        let Some(first) = groups.first() else {
            return false;
        };
        let valid = self
            .active_key
            .as_deref()
            .is_some_and(|key| groups.iter().any(|g| g.key == key));
        if valid {
            return false;
        }
        self.active_key = Some(first.key.clone());
        true
    }
}

/// Per-group expanded flag. Unknown keys are collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpansionState {
    expanded: HashMap<String, bool>,
}

impl ExpansionState {
    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.get(key).copied().unwrap_or(false)
    }

    /// Flip `key` and return its new value. Other keys keep their state.
    pub fn toggle(&mut self, key: &str) -> bool {
        let next = !self.is_expanded(key);
        self.expanded.insert(key.to_string(), next);
        next
    }
}

/// The "Processed n/m" status summary dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusPopover {
    open: bool,
}

impl StatusPopover {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}
