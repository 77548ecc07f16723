//! Selection and expansion mode types.

use serde::{Deserialize, Serialize};

/// Selection mode for a table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Rows are not selectable.
    #[default]
    None,
    /// Selecting an item clears previous selection.
    Single,
    /// Selecting toggles. Multiple items can be selected.
    Multi,
}

impl SelectionMode {
    /// Whether rows can be selected at all.
    pub fn is_enabled(self) -> bool {
        self != SelectionMode::None
    }
}

/// Scope of a bulk selection intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionScope {
    /// Items on the current page.
    Page,
    /// Every item matching the current filters, now and after re-filtering.
    AllFiltered,
    /// Clear the selection.
    None,
}

/// Expansion policy for a table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionVariant {
    /// Rows do not expand.
    #[default]
    None,
    /// Expanding an item collapses the previously expanded one.
    Single,
    /// Items expand independently.
    Multi,
}

impl ExpansionVariant {
    /// Whether rows can be expanded at all.
    pub fn is_enabled(self) -> bool {
        self != ExpansionVariant::None
    }
}
