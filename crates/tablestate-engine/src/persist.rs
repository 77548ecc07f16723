//! Persisted table state and its flat key-value form.
//!
//! The flat form is what URL query strings and similar stores hold: one
//! string per key, JSON where the value is structured. Reading is lenient.
//! A bad entry is logged and skipped, the rest still applies.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tablestate_core::{FilterValue, SortDirection, SortState};

use crate::expansion::ExpandedEntries;
use crate::selection::Selection;

pub const FILTERS_PARAM: &str = "filters";
pub const SORT_COLUMN_PARAM: &str = "sortColumn";
pub const SORT_DIRECTION_PARAM: &str = "sortDirection";
pub const PAGE_PARAM: &str = "pageNumber";
pub const PAGE_SIZE_PARAM: &str = "itemsPerPage";
pub const EXPANDED_PARAM: &str = "expanded";
pub const SELECTED_PARAM: &str = "selected";

/// Snapshot of the five state slices of one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub filters: BTreeMap<String, FilterValue>,

    #[serde(default)]
    pub sort: Option<SortState>,

    /// 1-based page index. `None` means page 1.
    #[serde(default)]
    pub page: Option<usize>,

    /// `None` means the configured page size.
    #[serde(default)]
    pub page_size: Option<usize>,

    #[serde(default)]
    pub expanded: ExpandedEntries,

    #[serde(default)]
    pub selection: Selection,
}

impl PersistedState {
    /// Flatten into string parameters. Default slices are omitted.
    pub fn to_params(&self, prefix: Option<&str>) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        let mut put = |name: &str, value: String| {
            params.insert(param_key(prefix, name), value);
        };

        if !self.filters.is_empty() {
            put(FILTERS_PARAM, to_json(&self.filters));
        }
        if let Some(sort) = &self.sort {
            put(SORT_COLUMN_PARAM, sort.column.clone());
            put(SORT_DIRECTION_PARAM, sort.direction.as_str().to_string());
        }
        if let Some(page) = self.page {
            put(PAGE_PARAM, page.to_string());
        }
        if let Some(page_size) = self.page_size {
            put(PAGE_SIZE_PARAM, page_size.to_string());
        }
        if !self.expanded.is_empty() {
            put(EXPANDED_PARAM, to_json(&self.expanded));
        }
        if !self.selection.is_cleared() {
            put(SELECTED_PARAM, to_json(&self.selection));
        }

        params
    }

    /// Read string parameters. Keys without the prefix are ignored, as are
    /// entries that fail to parse.
    pub fn from_params<I, K, V>(params: I, prefix: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw: BTreeMap<&'static str, String> = BTreeMap::new();
        for (key, value) in params {
            let Some(name) = strip_prefix(prefix, key.as_ref()) else {
                continue;
            };
            if let Some(&known) = KNOWN_PARAMS.iter().find(|p| **p == name) {
                raw.insert(known, value.as_ref().to_string());
            }
        }

        let mut state = PersistedState::default();

        if let Some(json) = raw.get(FILTERS_PARAM) {
            if let Some(filters) = from_json::<BTreeMap<String, FilterValue>>(FILTERS_PARAM, json) {
                state.filters = filters.into_iter().filter(|(_, v)| !v.is_empty()).collect();
            }
        }

        match (raw.get(SORT_COLUMN_PARAM), raw.get(SORT_DIRECTION_PARAM)) {
            (Some(column), direction) if !column.is_empty() => {
                let direction = match direction.map(|d| d.parse::<SortDirection>()) {
                    None => Some(SortDirection::Ascending),
                    Some(Ok(direction)) => Some(direction),
                    Some(Err(e)) => {
                        tracing::warn!("Ignoring persisted sort: {}", e);
                        None
                    }
                };
                state.sort = direction.map(|d| SortState::new(column.clone(), d));
            }
            (_, Some(_)) => {
                tracing::warn!("Ignoring persisted sort direction without a sort column");
            }
            _ => {}
        }

        state.page = raw.get(PAGE_PARAM).and_then(|s| positive(PAGE_PARAM, s));
        state.page_size = raw.get(PAGE_SIZE_PARAM).and_then(|s| positive(PAGE_SIZE_PARAM, s));

        if let Some(json) = raw.get(EXPANDED_PARAM) {
            state.expanded = from_json(EXPANDED_PARAM, json).unwrap_or_default();
        }
        if let Some(json) = raw.get(SELECTED_PARAM) {
            state.selection = from_json(SELECTED_PARAM, json).unwrap_or_default();
        }

        state
    }
}

const KNOWN_PARAMS: [&str; 7] = [
    FILTERS_PARAM,
    SORT_COLUMN_PARAM,
    SORT_DIRECTION_PARAM,
    PAGE_PARAM,
    PAGE_SIZE_PARAM,
    EXPANDED_PARAM,
    SELECTED_PARAM,
];

fn param_key(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, name),
        None => name.to_string(),
    }
}

fn strip_prefix<'a>(prefix: Option<&str>, key: &'a str) -> Option<&'a str> {
    match prefix {
        Some(prefix) => key.strip_prefix(prefix)?.strip_prefix(':'),
        None => Some(key),
    }
}

fn to_json<V: Serialize>(value: &V) -> String {
    // Maps with string keys and plain enums cannot fail to serialize.
    serde_json::to_string(value).unwrap_or_default()
}

fn from_json<V: DeserializeOwned>(name: &str, json: &str) -> Option<V> {
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring persisted '{}': {}", name, e);
            None
        }
    }
}

fn positive(name: &str, raw: &str) -> Option<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            tracing::warn!("Ignoring persisted '{}': '{}' is not a positive integer", name, raw);
            None
        }
    }
}
