//! Delegated click handling for the activities list.
//!
//! One entry point receives every click inside the list container. The clicked
//! element is described by its classes and `data-*` attributes, and the action
//! is looked up in [`DISPATCH`] by marker class.

use std::collections::BTreeMap;

/// Marker class of a participant's removal control.
pub const DELETE_MARKER: &str = "delete-btn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    Unregister,
}

/// Marker class → action. First match in target class order wins.
const DISPATCH: &[(&str, ClickAction)] = &[(DELETE_MARKER, ClickAction::Unregister)];

/// The element a click landed on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickTarget {
    pub classes: Vec<String>,
    /// `data-*` attributes without the `data-` prefix, unescaped.
    pub data: BTreeMap<String, String>,
}

impl ClickTarget {
    pub fn new(classes: &[&str]) -> Self {
        Self {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: &str, value: &str) -> Self {
        self.data.insert(key.to_string(), value.to_string());
        self
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn action(&self) -> Option<ClickAction> {
        self.classes.iter().find_map(|class| {
            DISPATCH
                .iter()
                .find(|(marker, _)| marker == class)
                .map(|(_, action)| *action)
        })
    }
}
