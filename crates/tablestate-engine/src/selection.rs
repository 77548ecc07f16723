//! Selection engine.
//!
//! Selection is either an explicit set of keys, or "every item matching the
//! current filters" minus explicit exclusions. The second form tracks the
//! live filtered set: loosening a filter selects newly matching items,
//! while explicit selections stay put no matter how the filters change.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use tablestate_core::{Key, SelectionMode, SelectionScope};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum Selection {
    /// Exactly these keys are selected.
    Explicit { keys: BTreeSet<Key> },
    /// Every filtered item is selected except these keys.
    AllFiltered { excluding: BTreeSet<Key> },
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Explicit {
            keys: BTreeSet::new(),
        }
    }
}

impl Selection {
    /// Check if the selection follows the filtered set.
    pub fn is_all_filtered(&self) -> bool {
        matches!(self, Selection::AllFiltered { .. })
    }

    /// Check if nothing is selected explicitly and the all-filtered flag is off.
    pub fn is_cleared(&self) -> bool {
        matches!(self, Selection::Explicit { keys } if keys.is_empty())
    }
}

/// The filtered set a selection is evaluated against.
pub struct FilteredKeys<'a> {
    /// Filtered keys in sorted (display) order.
    pub ordered: &'a [Key],
    /// Membership lookup for `ordered`.
    pub members: &'a HashSet<Key>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEngine {
    mode: SelectionMode,
    selection: Selection,
}

impl SelectionEngine {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            selection: Selection::default(),
        }
    }

    /// Selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// The raw selection state.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Toggle selection of one key.
    pub fn toggle(&mut self, key: &Key, filtered: &FilteredKeys<'_>) -> bool {
        let selected = self.is_selected(key, filtered);
        self.set_selected(key, !selected, filtered)
    }

    /// Select or deselect one key. Returns true if the selection changed.
    pub fn set_selected(&mut self, key: &Key, selected: bool, filtered: &FilteredKeys<'_>) -> bool {
        match self.mode {
            SelectionMode::None => {
                tracing::debug!("Ignoring selection of '{}': table is not selectable", key);
                false
            }
            SelectionMode::Single => {
                let next = if selected {
                    BTreeSet::from([key.clone()])
                } else if self.is_selected(key, filtered) {
                    BTreeSet::new()
                } else {
                    return false;
                };
                self.replace(Selection::Explicit { keys: next })
            }
            SelectionMode::Multi => self.set_selected_multi(key, selected, filtered),
        }
    }

    fn set_selected_multi(&mut self, key: &Key, selected: bool, filtered: &FilteredKeys<'_>) -> bool {
        match &mut self.selection {
            Selection::Explicit { keys } => {
                if selected {
                    keys.insert(key.clone())
                } else {
                    keys.remove(key)
                }
            }
            Selection::AllFiltered { excluding } if filtered.members.contains(key) => {
                if selected {
                    excluding.remove(key)
                } else {
                    excluding.insert(key.clone())
                }
            }
            Selection::AllFiltered { .. } => {
                if !selected {
                    return false;
                }
                // Not covered by the flag: fall back to explicit keys.
                let mut keys = self.explicit_keys(filtered);
                keys.insert(key.clone());
                self.replace(Selection::Explicit { keys })
            }
        }
    }

    /// Apply a bulk selection intent.
    pub fn select_all(
        &mut self,
        scope: SelectionScope,
        page_keys: &[Key],
        filtered: &FilteredKeys<'_>,
    ) -> bool {
        match (self.mode, scope) {
            (SelectionMode::None, _) => false,
            (_, SelectionScope::None) => self.replace(Selection::default()),
            (SelectionMode::Single, _) => {
                tracing::debug!("Ignoring bulk selection in single-selection mode");
                false
            }
            (SelectionMode::Multi, SelectionScope::AllFiltered) => self.replace(Selection::AllFiltered {
                excluding: BTreeSet::new(),
            }),
            (SelectionMode::Multi, SelectionScope::Page) => {
                let mut keys = self.explicit_keys(filtered);
                keys.extend(page_keys.iter().cloned());
                self.replace(Selection::Explicit { keys })
            }
        }
    }

    /// Select the page if any of it is unselected, otherwise deselect it.
    pub fn toggle_page(&mut self, page_keys: &[Key], filtered: &FilteredKeys<'_>) -> bool {
        if self.mode != SelectionMode::Multi || page_keys.is_empty() {
            return false;
        }
        let all_selected = page_keys.iter().all(|k| self.is_selected(k, filtered));
        if !all_selected {
            return self.select_all(SelectionScope::Page, page_keys, filtered);
        }
        page_keys.iter().fold(false, |changed, key| {
            self.set_selected_multi(key, false, filtered) || changed
        })
    }

    /// Check if `key` is selected.
    pub fn is_selected(&self, key: &Key, filtered: &FilteredKeys<'_>) -> bool {
        match &self.selection {
            Selection::Explicit { keys } => keys.contains(key),
            Selection::AllFiltered { excluding } => {
                filtered.members.contains(key) && !excluding.contains(key)
            }
        }
    }

    /// Number of selected items.
    pub fn selected_count(&self, filtered: &FilteredKeys<'_>) -> usize {
        match &self.selection {
            Selection::Explicit { keys } => keys.len(),
            Selection::AllFiltered { excluding } => {
                let excluded = excluding
                    .iter()
                    .filter(|k| filtered.members.contains(*k))
                    .count();
                filtered.ordered.len() - excluded
            }
        }
    }

    /// Selected keys. All-filtered selections list in display order.
    pub fn selected_keys(&self, filtered: &FilteredKeys<'_>) -> Vec<Key> {
        match &self.selection {
            Selection::Explicit { keys } => keys.iter().cloned().collect(),
            Selection::AllFiltered { excluding } => filtered
                .ordered
                .iter()
                .filter(|k| !excluding.contains(*k))
                .cloned()
                .collect(),
        }
    }

    /// Replace the selection, honouring the mode. Returns true if it changed.
    pub fn restore(&mut self, selection: Selection) -> bool {
        let selection = match (self.mode, selection) {
            (SelectionMode::None, _) => Selection::default(),
            (SelectionMode::Single, Selection::Explicit { keys }) => Selection::Explicit {
                keys: keys.into_iter().take(1).collect(),
            },
            (SelectionMode::Single, Selection::AllFiltered { .. }) => {
                tracing::warn!("Dropping all-filtered selection: table uses single selection");
                Selection::default()
            }
            (SelectionMode::Multi, selection) => selection,
        };
        self.replace(selection)
    }

    /// Drop keys that no longer exist in the item collection.
    pub fn retain(&mut self, mut exists: impl FnMut(&Key) -> bool) {
        match &mut self.selection {
            Selection::Explicit { keys } => keys.retain(|k| exists(k)),
            Selection::AllFiltered { excluding } => excluding.retain(|k| exists(k)),
        }
    }

    /// The current selection as explicit keys.
    fn explicit_keys(&self, filtered: &FilteredKeys<'_>) -> BTreeSet<Key> {
        self.selected_keys(filtered).into_iter().collect()
    }

    fn replace(&mut self, selection: Selection) -> bool {
        if self.selection == selection {
            return false;
        }
        self.selection = selection;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(ids: &[&str]) -> Vec<Key> {
        ids.iter().map(|s| Key::from(*s)).collect()
    }

    struct Filtered {
        ordered: Vec<Key>,
        members: HashSet<Key>,
    }

    impl Filtered {
        fn new(ids: &[&str]) -> Self {
            let ordered = keys(ids);
            let members = ordered.iter().cloned().collect();
            Self { ordered, members }
        }

        fn view(&self) -> FilteredKeys<'_> {
            FilteredKeys {
                ordered: &self.ordered,
                members: &self.members,
            }
        }
    }

    #[test]
    fn test_explicit_toggle() {
        let filtered = Filtered::new(&["a", "b", "c"]);
        let mut selection = SelectionEngine::new(SelectionMode::Multi);

        selection.toggle(&Key::from("a"), &filtered.view());
        selection.toggle(&Key::from("c"), &filtered.view());
        assert_eq!(selection.selected_count(&filtered.view()), 2);

        selection.toggle(&Key::from("a"), &filtered.view());
        assert!(!selection.is_selected(&Key::from("a"), &filtered.view()));
        assert_eq!(selection.selected_keys(&filtered.view()), keys(&["c"]));
    }

    #[test]
    fn test_explicit_selection_survives_filter_change() {
        let wide = Filtered::new(&["a", "b", "c"]);
        let narrow = Filtered::new(&["b"]);
        let mut selection = SelectionEngine::new(SelectionMode::Multi);
        selection.toggle(&Key::from("a"), &wide.view());

        assert!(selection.is_selected(&Key::from("a"), &narrow.view()));
        assert!(!selection.is_selected(&Key::from("b"), &narrow.view()));
        assert_eq!(selection.selected_count(&narrow.view()), 1);
    }

    #[test]
    fn test_all_filtered_tracks_live_set() {
        let narrow = Filtered::new(&["a"]);
        let wide = Filtered::new(&["a", "b", "c"]);
        let mut selection = SelectionEngine::new(SelectionMode::Multi);

        selection.select_all(SelectionScope::AllFiltered, &[], &narrow.view());
        assert_eq!(selection.selected_count(&narrow.view()), 1);

        // Loosening the filter selects the newly matching items.
        assert!(selection.is_selected(&Key::from("c"), &wide.view()));
        assert_eq!(selection.selected_count(&wide.view()), 3);

        // Narrowing it drops them again.
        assert!(!selection.is_selected(&Key::from("c"), &narrow.view()));
    }

    #[test]
    fn test_deselect_under_all_filtered_is_exclusion() {
        let filtered = Filtered::new(&["a", "b", "c"]);
        let mut selection = SelectionEngine::new(SelectionMode::Multi);
        selection.select_all(SelectionScope::AllFiltered, &[], &filtered.view());

        selection.toggle(&Key::from("b"), &filtered.view());
        assert!(selection.selection().is_all_filtered());
        assert!(!selection.is_selected(&Key::from("b"), &filtered.view()));
        assert_eq!(selection.selected_count(&filtered.view()), 2);
        assert_eq!(selection.selected_keys(&filtered.view()), keys(&["a", "c"]));

        selection.toggle(&Key::from("b"), &filtered.view());
        assert_eq!(selection.selected_count(&filtered.view()), 3);
    }

    #[test]
    fn test_selecting_outside_filter_degrades_to_explicit() {
        let filtered = Filtered::new(&["a", "b"]);
        let mut selection = SelectionEngine::new(SelectionMode::Multi);
        selection.select_all(SelectionScope::AllFiltered, &[], &filtered.view());
        selection.toggle(&Key::from("a"), &filtered.view());

        assert!(selection.set_selected(&Key::from("z"), true, &filtered.view()));
        assert!(!selection.selection().is_all_filtered());
        assert_eq!(selection.selected_keys(&filtered.view()), keys(&["b", "z"]));
    }

    #[test]
    fn test_select_page_and_toggle_page() {
        let filtered = Filtered::new(&["a", "b", "c", "d"]);
        let page = keys(&["a", "b"]);
        let mut selection = SelectionEngine::new(SelectionMode::Multi);
        selection.toggle(&Key::from("d"), &filtered.view());

        selection.select_all(SelectionScope::Page, &page, &filtered.view());
        assert_eq!(selection.selected_keys(&filtered.view()), keys(&["a", "b", "d"]));

        assert!(selection.toggle_page(&page, &filtered.view()));
        assert_eq!(selection.selected_keys(&filtered.view()), keys(&["d"]));

        selection.select_all(SelectionScope::None, &page, &filtered.view());
        assert!(selection.selection().is_cleared());
    }

    #[test]
    fn test_single_mode_replaces() {
        let filtered = Filtered::new(&["a", "b"]);
        let mut selection = SelectionEngine::new(SelectionMode::Single);
        selection.toggle(&Key::from("a"), &filtered.view());
        selection.toggle(&Key::from("b"), &filtered.view());
        assert_eq!(selection.selected_keys(&filtered.view()), keys(&["b"]));
        assert!(!selection.select_all(SelectionScope::AllFiltered, &[], &filtered.view()));
    }

    #[test]
    fn test_disabled_mode_ignores_intents() {
        let filtered = Filtered::new(&["a"]);
        let mut selection = SelectionEngine::new(SelectionMode::None);
        assert!(!selection.toggle(&Key::from("a"), &filtered.view()));
        assert_eq!(selection.selected_count(&filtered.view()), 0);
    }

    #[test]
    fn test_selection_json_shape() {
        let selection = Selection::AllFiltered {
            excluding: BTreeSet::from([Key::from("x")]),
        };
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"{"mode":"allFiltered","excluding":["x"]}"#);
    }
}
