//! Table control orchestrator.
//!
//! `TableControls` owns the five engines of one table view and the item
//! collection they are evaluated against. Items flow filter -> sort ->
//! paginate; the result is cached and recomputed before any setter returns,
//! so reads never see a page computed against a stale filtered set.
//!
//! Every setter that changes state also publishes the new [`PersistedState`]
//! on a watch channel. Callers cannot mutate without notifying.

mod builder;
mod props;


pub use builder::TableControlsConfig;
pub use props::{
    BulkCheckState, BulkSelectProps, CompoundExpandProps, ExpandToggleProps, ExpandedContentProps,
    FilterControlProps, PaginationProps, RowProps, SelectCheckboxProps, SelectVariant, TableProps,
    TdProps, ThProps, ThSortProps,
};

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use tokio::sync::watch;

use tablestate_core::{
    ColumnDescriptor, ConfigError, FilterCategory, FilterOption, FilterValue, IdentityRule, Key,
    SelectionScope, SortDirection, SortState, TableOptions,
};

use crate::expansion::ExpansionEngine;
use crate::filter::{self, FilterEngine};
use crate::pagination::PaginationEngine;
use crate::persist::PersistedState;
use crate::selection::{FilteredKeys, Selection, SelectionEngine};
use crate::sort::{sort_indices, SortEngine};

// =============================================================================
// Derived state
// =============================================================================

/// Output of the last derivation.
#[derive(Debug, Default)]
struct Derived {
    /// Indices of filtered items, input order.
    filtered: Vec<usize>,
    /// Indices of filtered items, display order.
    sorted: Vec<usize>,
    /// Keys of `sorted`.
    sorted_keys: Vec<Key>,
    /// Membership set of `sorted_keys`.
    filtered_keys: HashSet<Key>,
    /// Current page as a range into `sorted`.
    page: Range<usize>,
}

/// One row of the current page.
#[derive(Debug)]
pub struct Row<'a, T> {
    pub key: &'a Key,
    pub item: &'a T,
    /// Position on the current page.
    pub row_index: usize,
}

// =============================================================================
// TableControls
// =============================================================================

pub struct TableControls<T> {
    options: TableOptions,
    columns: Vec<ColumnDescriptor<T>>,
    categories: Vec<FilterCategory<T>>,
    identity: IdentityRule<T>,

    items: Vec<T>,
    keys: Vec<Key>,
    key_index: HashMap<Key, usize>,

    filters: FilterEngine,
    sort: SortEngine,
    pagination: PaginationEngine,
    expansion: ExpansionEngine,
    selection: SelectionEngine,

    derived: Derived,
    tx: watch::Sender<PersistedState>,
}

impl<T> TableControls<T> {
    /// Assemble from parts already validated by [`TableControlsConfig::build`].
    fn from_parts(
        options: TableOptions,
        columns: Vec<ColumnDescriptor<T>>,
        categories: Vec<FilterCategory<T>>,
        identity: IdentityRule<T>,
    ) -> Self {
        let (tx, _) = watch::channel(PersistedState::default());
        Self {
            filters: FilterEngine::new(),
            sort: SortEngine::new(),
            pagination: PaginationEngine::new(options.page_size),
            expansion: ExpansionEngine::new(options.expansion),
            selection: SelectionEngine::new(options.selection),
            options,
            columns,
            categories,
            identity,
            items: Vec::new(),
            keys: Vec::new(),
            key_index: HashMap::new(),
            derived: Derived::default(),
            tx,
        }
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Hand over a fresh item collection.
    ///
    /// Keys are resolved for every item before anything changes; an item
    /// without a key is an error and leaves the previous collection in place.
    /// Selections and expansions of keys that disappeared are dropped.
    pub fn set_items(&mut self, items: Vec<T>) -> Result<(), ConfigError> {
        let keys = items
            .iter()
            .enumerate()
            .map(|(index, item)| self.identity.resolve(item, index))
            .collect::<Result<Vec<_>, _>>()?;

        let mut key_index = HashMap::with_capacity(keys.len());
        for (index, key) in keys.iter().enumerate() {
            if let Some(first) = key_index.get(key) {
                if self.options.warn_duplicate_keys {
                    tracing::warn!(
                        "Duplicate identity key '{}' at index {} (first seen at index {})",
                        key,
                        index,
                        first
                    );
                }
                continue;
            }
            key_index.insert(key.clone(), index);
        }

        tracing::debug!("Table received {} items", items.len());
        self.items = items;
        self.keys = keys;
        self.key_index = key_index;

        let key_index = &self.key_index;
        self.selection.retain(|k| key_index.contains_key(k));
        self.expansion.retain(|k| key_index.contains_key(k));

        self.derive();
        self.publish();
        Ok(())
    }

    /// The current collection, in input order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Identity key of `item`.
    pub fn key_of(&self, item: &T) -> Option<Key> {
        self.identity.key_of(item)
    }

    /// The item with `key`. With duplicate keys, the first occurrence.
    pub fn item(&self, key: &Key) -> Option<&T> {
        self.key_index.get(key).map(|&index| &self.items[index])
    }

    /// Check if an item with `key` is in the collection.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.key_index.contains_key(key)
    }

    // =========================================================================
    // Configuration accessors
    // =========================================================================

    /// Table-wide options.
    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Configured columns, in display order.
    pub fn columns(&self) -> &[ColumnDescriptor<T>] {
        &self.columns
    }

    /// Configured filter categories.
    pub fn filter_categories(&self) -> &[FilterCategory<T>] {
        &self.categories
    }

    fn column(&self, key: &str) -> Result<&ColumnDescriptor<T>, ConfigError> {
        self.columns
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| ConfigError::UnknownColumn(key.to_string()))
    }

    fn category(&self, key: &str) -> Result<&FilterCategory<T>, ConfigError> {
        self.categories
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| ConfigError::UnknownFilterCategory(key.to_string()))
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    /// Replace the value of one filter category. `None` or an empty value
    /// clears it. A value that does not fit the category's kind, or names
    /// an unknown option, is ignored.
    pub fn set_filter_value(
        &mut self,
        category: &str,
        value: Option<FilterValue>,
    ) -> Result<bool, ConfigError> {
        let cat = self.category(category)?;
        if value.as_ref().is_some_and(|v| !admits(cat, v)) {
            return Ok(false);
        }
        let changed = self.filters.set(category, value);
        Ok(self.commit_filter_change(changed))
    }

    /// Toggle one option of a choice category.
    pub fn toggle_filter_option(
        &mut self,
        category: &str,
        option_key: &str,
    ) -> Result<bool, ConfigError> {
        let cat = self.category(category)?;
        if !cat.kind.is_choice() {
            tracing::warn!("Ignoring option toggle on non-choice category '{}'", category);
            return Ok(false);
        }
        let selected = matches!(
            self.filters.value(category),
            Some(FilterValue::Selection(keys)) if keys.iter().any(|k| k == option_key)
        );
        if !selected && cat.option_by_key(option_key).is_none() {
            tracing::warn!(
                "Ignoring unknown option '{}' of category '{}'",
                option_key,
                category
            );
            return Ok(false);
        }
        let kind = cat.kind;
        let changed = self.filters.toggle_option(category, kind, option_key);
        Ok(self.commit_filter_change(changed))
    }

    /// Remove the filter value a chip stands for.
    pub fn remove_chip(&mut self, category: &str, chip: &str) -> Result<bool, ConfigError> {
        let cat = self.category(category)?;
        let changed = if cat.kind.is_choice() {
            let option_key = filter::option_key_for_chip(cat, chip).to_string();
            self.filters.remove_option(category, &option_key)
        } else {
            let matches = self
                .filters
                .value(category)
                .is_some_and(|value| filter::chips(cat, value).iter().any(|c| c == chip));
            matches && self.filters.clear(category)
        };
        Ok(self.commit_filter_change(changed))
    }

    /// Clear one category.
    pub fn clear_filter(&mut self, category: &str) -> Result<bool, ConfigError> {
        self.category(category)?;
        let changed = self.filters.clear(category);
        Ok(self.commit_filter_change(changed))
    }

    /// Clear every category.
    pub fn clear_all_filters(&mut self) -> bool {
        let changed = self.filters.clear_all();
        self.commit_filter_change(changed)
    }

    /// Current value of one category.
    pub fn filter_value(&self, category: &str) -> Option<&FilterValue> {
        self.filters.value(category)
    }

    /// The underlying filter state.
    pub fn filter_engine(&self) -> &FilterEngine {
        &self.filters
    }

    /// Check if any category holds a value.
    pub fn has_active_filters(&self) -> bool {
        self.filters.has_active()
    }

    /// Options of `category` whose display value (and key, if configured)
    /// contains `text`.
    pub fn matching_options(
        &self,
        category: &str,
        text: &str,
    ) -> Result<Vec<&FilterOption>, ConfigError> {
        let cat = self.category(category)?;
        Ok(filter::matching_options(cat, text, self.options.option_match))
    }

    /// Chip labels of one category's value.
    pub fn chips(&self, category: &str) -> Result<Vec<String>, ConfigError> {
        let cat = self.category(category)?;
        Ok(self
            .filters
            .value(category)
            .map(|value| filter::chips(cat, value))
            .unwrap_or_default())
    }

    fn commit_filter_change(&mut self, changed: bool) -> bool {
        if changed {
            tracing::debug!("Filters changed, back to page 1");
            self.pagination.reset();
        }
        self.commit(changed)
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Advance the sort cycle of `column`, as a header click does.
    ///
    /// Non-sortable columns ignore the intent.
    pub fn cycle_sort(&mut self, column: &str) -> Result<bool, ConfigError> {
        if !self.column(column)?.sortable {
            tracing::debug!("Ignoring sort on non-sortable column '{}'", column);
            return Ok(false);
        }
        let changed = self.sort.cycle(column);
        Ok(self.commit_sort_change(changed))
    }

    /// Set the sort state directly. `None` clears the sort.
    pub fn set_sort(&mut self, state: Option<SortState>) -> Result<bool, ConfigError> {
        if let Some(state) = &state {
            if !self.column(&state.column)?.sortable {
                tracing::debug!("Ignoring sort on non-sortable column '{}'", state.column);
                return Ok(false);
            }
        }
        let changed = self.sort.set(state);
        Ok(self.commit_sort_change(changed))
    }

    /// The active sort, if any.
    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.state()
    }

    /// Direction of `column` if it is the active sort column.
    pub fn sort_direction(&self, column: &str) -> Option<SortDirection> {
        self.sort.direction_of(column)
    }

    fn commit_sort_change(&mut self, changed: bool) -> bool {
        if changed {
            tracing::debug!("Sort changed to {:?}, back to page 1", self.sort.state());
            self.pagination.reset();
        }
        self.commit(changed)
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Go to `page`, clamped to the available pages.
    pub fn set_page(&mut self, page: usize) -> bool {
        let changed = self.pagination.set_page(page, self.filtered_count());
        self.commit(changed)
    }

    /// Go to the next page, if there is one.
    pub fn next_page(&mut self) -> bool {
        self.set_page(self.pagination.page() + 1)
    }

    /// Go to the previous page, if there is one.
    pub fn prev_page(&mut self) -> bool {
        self.set_page(self.pagination.page().saturating_sub(1))
    }

    /// Change the page size and return to page 1. Zero is ignored.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if page_size == 0 {
            tracing::debug!("Ignoring page size of zero");
            return false;
        }
        let changed = self.pagination.set_page_size(page_size);
        self.commit(changed)
    }

    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.pagination.page()
    }

    /// Items per page.
    pub fn page_size(&self) -> usize {
        self.pagination.page_size()
    }

    /// Number of pages of the filtered set; at least 1.
    pub fn page_count(&self) -> usize {
        if self.options.has_pagination {
            self.pagination.page_count(self.filtered_count())
        } else {
            1
        }
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    /// Toggle whole-row expansion. Keys outside the collection are ignored.
    pub fn toggle_expansion(&mut self, key: &Key) -> bool {
        if !self.known_key(key) {
            return false;
        }
        let changed = self.expansion.toggle(key);
        self.commit(changed)
    }

    /// Toggle expansion of `item` by its identity key.
    pub fn toggle_item_expansion(&mut self, item: &T) -> bool {
        match self.key_of(item) {
            Some(key) => self.toggle_expansion(&key),
            None => false,
        }
    }

    /// Expand or collapse the row with `key`.
    pub fn set_expanded(&mut self, key: &Key, expanded: bool) -> bool {
        if !self.known_key(key) {
            return false;
        }
        let changed = self.expansion.set_expanded(key, None, expanded);
        self.commit(changed)
    }

    /// Toggle expansion of one compound cell.
    pub fn toggle_cell_expansion(&mut self, key: &Key, column: &str) -> Result<bool, ConfigError> {
        if !self.column(column)?.compound_expandable {
            tracing::debug!("Ignoring cell expansion on column '{}'", column);
            return Ok(false);
        }
        if !self.known_key(key) {
            return Ok(false);
        }
        let changed = self.expansion.toggle_cell(key, column);
        Ok(self.commit(changed))
    }

    /// Collapse every row.
    pub fn collapse_all(&mut self) -> bool {
        let changed = self.expansion.collapse_all();
        self.commit(changed)
    }

    /// Check if the row with `key` is expanded.
    pub fn is_expanded(&self, key: &Key) -> bool {
        self.expansion.is_expanded(key)
    }

    /// Check if `item` is expanded.
    pub fn is_item_expanded(&self, item: &T) -> bool {
        self.key_of(item).is_some_and(|key| self.is_expanded(&key))
    }

    /// Check if `column` is the expanded compound cell of the row.
    pub fn is_cell_expanded(&self, key: &Key, column: &str) -> bool {
        self.expansion.is_cell_expanded(key, column)
    }

    /// Keys of expanded rows.
    pub fn expanded_keys(&self) -> Vec<Key> {
        self.expansion.expanded_keys().cloned().collect()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Toggle selection of one key. Keys outside the collection are ignored.
    pub fn toggle_selection(&mut self, key: &Key) -> bool {
        if !self.known_key(key) {
            return false;
        }
        let filtered = FilteredKeys {
            ordered: &self.derived.sorted_keys,
            members: &self.derived.filtered_keys,
        };
        let changed = self.selection.toggle(key, &filtered);
        self.commit(changed)
    }

    /// Toggle selection of `item` by its identity key.
    pub fn toggle_item_selection(&mut self, item: &T) -> bool {
        match self.key_of(item) {
            Some(key) => self.toggle_selection(&key),
            None => false,
        }
    }

    /// Select or deselect the item with `key`.
    pub fn set_selected(&mut self, key: &Key, selected: bool) -> bool {
        if !self.known_key(key) {
            return false;
        }
        let filtered = FilteredKeys {
            ordered: &self.derived.sorted_keys,
            members: &self.derived.filtered_keys,
        };
        let changed = self.selection.set_selected(key, selected, &filtered);
        self.commit(changed)
    }

    /// Bulk selection over `scope`.
    pub fn select_all(&mut self, scope: SelectionScope) -> bool {
        let filtered = FilteredKeys {
            ordered: &self.derived.sorted_keys,
            members: &self.derived.filtered_keys,
        };
        let page_keys = &self.derived.sorted_keys[self.derived.page.clone()];
        let changed = self.selection.select_all(scope, page_keys, &filtered);
        tracing::debug!("Select all ({:?}): changed={}", scope, changed);
        self.commit(changed)
    }

    /// Select the current page, or deselect it if it is fully selected.
    pub fn toggle_page_selection(&mut self) -> bool {
        let filtered = FilteredKeys {
            ordered: &self.derived.sorted_keys,
            members: &self.derived.filtered_keys,
        };
        let page_keys = &self.derived.sorted_keys[self.derived.page.clone()];
        let changed = self.selection.toggle_page(page_keys, &filtered);
        self.commit(changed)
    }

    /// Check if the item with `key` is selected.
    pub fn is_selected(&self, key: &Key) -> bool {
        self.selection.is_selected(key, &self.filtered_view())
    }

    /// Check if `item` is selected.
    pub fn is_item_selected(&self, item: &T) -> bool {
        self.key_of(item).is_some_and(|key| self.is_selected(&key))
    }

    /// Number of selected items.
    pub fn selected_count(&self) -> usize {
        self.selection.selected_count(&self.filtered_view())
    }

    /// Keys of selected items. All-filtered selections list in display order.
    pub fn selected_keys(&self) -> Vec<Key> {
        self.selection.selected_keys(&self.filtered_view())
    }

    /// Selected items, in the order of [`Self::selected_keys`].
    pub fn selected_items(&self) -> Vec<&T> {
        self.selected_keys()
            .iter()
            .filter_map(|key| self.item(key))
            .collect()
    }

    /// The raw selection state.
    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    fn filtered_view(&self) -> FilteredKeys<'_> {
        FilteredKeys {
            ordered: &self.derived.sorted_keys,
            members: &self.derived.filtered_keys,
        }
    }

    fn known_key(&self, key: &Key) -> bool {
        let known = self.key_index.contains_key(key);
        if !known {
            tracing::debug!("Ignoring intent for unknown key '{}'", key);
        }
        known
    }

    // =========================================================================
    // Derived reads
    // =========================================================================

    /// Items of the current page, in display order.
    pub fn current_page_items(&self) -> Vec<&T> {
        self.derived.sorted[self.derived.page.clone()]
            .iter()
            .map(|&index| &self.items[index])
            .collect()
    }

    /// Keys of the current page, in display order.
    pub fn current_page_keys(&self) -> &[Key] {
        &self.derived.sorted_keys[self.derived.page.clone()]
    }

    /// Rows of the current page with their keys.
    pub fn current_page_rows(&self) -> impl Iterator<Item = Row<'_, T>> {
        let range = self.derived.page.clone();
        self.derived.sorted[range.clone()]
            .iter()
            .zip(&self.derived.sorted_keys[range])
            .enumerate()
            .map(|(row_index, (&index, key))| Row {
                key,
                item: &self.items[index],
                row_index,
            })
    }

    /// Items passing every active filter, in input order.
    pub fn filtered_items(&self) -> Vec<&T> {
        self.derived
            .filtered
            .iter()
            .map(|&index| &self.items[index])
            .collect()
    }

    /// Filtered items in display order, across all pages.
    pub fn sorted_items(&self) -> Vec<&T> {
        self.derived
            .sorted
            .iter()
            .map(|&index| &self.items[index])
            .collect()
    }

    /// Number of items passing the filters, before pagination.
    pub fn filtered_count(&self) -> usize {
        self.derived.sorted.len()
    }

    /// Number of items in the collection.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// The collection itself is empty.
    pub fn is_no_data(&self) -> bool {
        self.items.is_empty()
    }

    /// There are items, but none pass the filters.
    pub fn is_filtered_empty(&self) -> bool {
        !self.items.is_empty() && self.derived.sorted.is_empty()
    }

    /// Check if rows get an expand toggle column.
    pub fn has_expand_column(&self) -> bool {
        self.options.expansion.is_enabled() && !self.columns.iter().any(|c| c.compound_expandable)
    }

    /// Check if rows get a selection column.
    pub fn has_select_column(&self) -> bool {
        self.options.selection.is_enabled()
    }

    /// Columns a full-width row must span: data columns plus structural
    /// columns, unless a count is forced.
    pub fn num_rendered_columns(&self) -> usize {
        if let Some(forced) = self.options.force_num_rendered_columns {
            return forced;
        }
        self.columns.len()
            + usize::from(self.has_expand_column())
            + usize::from(self.has_select_column())
            + usize::from(self.options.has_actions_column)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Snapshot of the state slices. Defaults are left out.
    pub fn persisted_state(&self) -> PersistedState {
        PersistedState {
            filters: self.filters.values().clone(),
            sort: self.sort.state().cloned(),
            page: Some(self.pagination.page()).filter(|&p| p != 1),
            page_size: Some(self.pagination.page_size()).filter(|&s| s != self.options.page_size),
            expanded: self.expansion.entries().clone(),
            selection: self.selection.selection().clone(),
        }
    }

    /// Flat key-value form of [`Self::persisted_state`], using the configured prefix.
    pub fn to_params(&self) -> std::collections::BTreeMap<String, String> {
        self.persisted_state()
            .to_params(self.options.persistence_key_prefix.as_deref())
    }

    /// Replace the state slices, e.g. from URL parameters.
    ///
    /// Entries are checked like the matching intents; invalid ones are
    /// logged and skipped.
    pub fn apply_persisted_state(&mut self, state: PersistedState) {
        let mut filters = FilterEngine::new();
        for (category, value) in state.filters {
            match self.categories.iter().find(|c| c.key == category) {
                Some(cat) if admits(cat, &value) => {
                    filters.set(&category, Some(value));
                }
                Some(_) => {}
                None => tracing::warn!("Ignoring persisted filter for unknown category '{}'", category),
            }
        }
        self.filters = filters;

        let sort = state.sort.filter(|s| {
            let sortable = self.columns.iter().any(|c| c.key == s.column && c.sortable);
            if !sortable {
                tracing::warn!("Ignoring persisted sort on column '{}'", s.column);
            }
            sortable
        });
        self.sort.set(sort);

        self.pagination = PaginationEngine::new(state.page_size.unwrap_or(self.options.page_size));

        self.expansion.restore(state.expanded);
        self.selection.restore(state.selection);
        // Before the first collection arrives keys cannot be checked;
        // set_items prunes them then.
        if !self.items.is_empty() {
            let key_index = &self.key_index;
            self.selection.retain(|k| key_index.contains_key(k));
            self.expansion.retain(|k| key_index.contains_key(k));
        }

        self.derive();
        if let Some(page) = state.page {
            self.pagination.set_page(page, self.filtered_count());
        }
        self.derive();
        self.publish();
    }

    /// Apply flat key-value parameters read with the configured prefix.
    pub fn apply_params<I, K, V>(&mut self, params: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let state =
            PersistedState::from_params(params, self.options.persistence_key_prefix.as_deref());
        self.apply_persisted_state(state);
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<PersistedState> {
        self.tx.subscribe()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Re-derive and publish if `changed`.
    fn commit(&mut self, changed: bool) -> bool {
        if changed {
            self.derive();
            self.publish();
        }
        changed
    }

    /// Recompute filtered, sorted and paged views. Pulls the page index back
    /// into range if the filtered set shrank.
    fn derive(&mut self) {
        let filtered = filter::filter_indices(&self.items, self.filters.values(), &self.categories);
        let mut sorted = filtered.clone();
        sort_indices(&self.items, &mut sorted, self.sort.state(), &self.columns);

        let total = sorted.len();
        if self.pagination.clamp(total) {
            tracing::debug!("Page clamped to {} for {} items", self.pagination.page(), total);
        }
        let page = if self.options.has_pagination {
            self.pagination.range(total)
        } else {
            0..total
        };

        let sorted_keys: Vec<Key> = sorted.iter().map(|&index| self.keys[index].clone()).collect();
        let filtered_keys = sorted_keys.iter().cloned().collect();

        self.derived = Derived {
            filtered,
            sorted,
            sorted_keys,
            filtered_keys,
            page,
        };
    }

    /// Broadcast the current snapshot if it differs from the last one.
    fn publish(&self) {
        let state = self.persisted_state();
        self.tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
    }
}

/// Whether `cat` may hold `value`. Rejections are logged.
fn admits<T>(cat: &FilterCategory<T>, value: &FilterValue) -> bool {
    if !value.fits(cat.kind) {
        tracing::warn!(
            "Ignoring filter value {:?} for category '{}' of kind {:?}",
            value,
            cat.key,
            cat.kind
        );
        return false;
    }
    if let FilterValue::Selection(keys) = value {
        if let Some(unknown) = keys.iter().find(|k| cat.option_by_key(k).is_none()) {
            tracing::warn!(
                "Ignoring filter value for category '{}': unknown option '{}'",
                cat.key,
                unknown
            );
            return false;
        }
    }
    true
}
