//! Expansion engine.
//!
//! Tracks expanded items by identity key. An expanded entry may also record
//! the column whose cell was expanded (compound expansion).

use std::collections::BTreeMap;

use tablestate_core::{ExpansionVariant, Key};

/// Expanded keys, each with the expanded column for compound expansion.
pub type ExpandedEntries = BTreeMap<Key, Option<String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionEngine {
    variant: ExpansionVariant,
    expanded: ExpandedEntries,
}

impl ExpansionEngine {
    pub fn new(variant: ExpansionVariant) -> Self {
        Self {
            variant,
            expanded: ExpandedEntries::new(),
        }
    }

    /// Expansion policy.
    pub fn variant(&self) -> ExpansionVariant {
        self.variant
    }

    /// Toggle whole-row expansion of `key`.
    pub fn toggle(&mut self, key: &Key) -> bool {
        if self.expanded.contains_key(key) {
            self.set_expanded(key, None, false)
        } else {
            self.set_expanded(key, None, true)
        }
    }

    /// Toggle expansion of one cell of `key`.
    ///
    /// The same cell collapses; another cell of an expanded row switches the
    /// expanded column.
    pub fn toggle_cell(&mut self, key: &Key, column: &str) -> bool {
        match self.expanded.get(key) {
            Some(Some(current)) if current == column => self.set_expanded(key, None, false),
            _ => self.set_expanded(key, Some(column), true),
        }
    }

    /// Expand or collapse `key`. Returns true if the state changed.
    pub fn set_expanded(&mut self, key: &Key, column: Option<&str>, expanded: bool) -> bool {
        if !self.variant.is_enabled() {
            tracing::debug!("Ignoring expansion of '{}': table is not expandable", key);
            return false;
        }

        if !expanded {
            return self.expanded.remove(key).is_some();
        }

        let column = column.map(str::to_string);
        if self.expanded.get(key) == Some(&column) && self.expanded.len() == 1 {
            return false;
        }
        if self.variant == ExpansionVariant::Single {
            self.expanded.clear();
        } else if self.expanded.get(key) == Some(&column) {
            return false;
        }
        self.expanded.insert(key.clone(), column);
        true
    }

    /// Check if the row with `key` is expanded.
    pub fn is_expanded(&self, key: &Key) -> bool {
        self.expanded.contains_key(key)
    }

    /// Check if the given cell of `key` is the expanded one.
    pub fn is_cell_expanded(&self, key: &Key, column: &str) -> bool {
        matches!(self.expanded.get(key), Some(Some(c)) if c == column)
    }

    /// Column expanded for `key`, if it was a cell expansion.
    pub fn expanded_column(&self, key: &Key) -> Option<&str> {
        self.expanded.get(key).and_then(|c| c.as_deref())
    }

    /// Keys of expanded rows.
    pub fn expanded_keys(&self) -> impl Iterator<Item = &Key> {
        self.expanded.keys()
    }

    /// Expanded rows and their expanded compound column.
    pub fn entries(&self) -> &ExpandedEntries {
        &self.expanded
    }

    /// Collapse every row. Returns true if any was expanded.
    pub fn collapse_all(&mut self) -> bool {
        let changed = !self.expanded.is_empty();
        self.expanded.clear();
        changed
    }

    /// Replace the expanded entries, honouring the variant: nothing for
    /// non-expandable tables, only the first entry for single expansion.
    pub fn restore(&mut self, entries: ExpandedEntries) -> bool {
        let entries: ExpandedEntries = match self.variant {
            ExpansionVariant::None => ExpandedEntries::new(),
            ExpansionVariant::Single => entries.into_iter().take(1).collect(),
            ExpansionVariant::Multi => entries,
        };
        let changed = self.expanded != entries;
        self.expanded = entries;
        changed
    }

    /// Drop entries whose keys are no longer present.
    pub fn retain(&mut self, mut exists: impl FnMut(&Key) -> bool) {
        self.expanded.retain(|key, _| exists(key));
    }
}
