//! Filter categories and filter values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value::Accessor;

/// Predicate kind of a filter category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    SingleSelect,
    MultiSelect,
    /// Case-insensitive substring search.
    Search,
    NumericRange,
    DateRange,
}

impl FilterKind {
    /// Whether the category chooses from a list of options.
    pub fn is_choice(self) -> bool {
        matches!(self, FilterKind::SingleSelect | FilterKind::MultiSelect)
    }
}

/// How selected options of one multi-select category combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiselectLogic {
    /// Item passes if it matches any selected option.
    #[default]
    Or,
    /// Item passes only if it matches every selected option.
    And,
}

/// Which option fields the in-dropdown search compares against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OptionMatch {
    #[default]
    ValueOnly,
    KeyAndValue,
}

/// A selectable option of a choice-based category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    key: String,
    value: String,
}

impl FilterOption {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Option key, stored in filter state.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display value, shown in the dropdown and on chips.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// One user-facing filter dimension.
pub struct FilterCategory<T> {
    pub key: String,
    pub title: String,
    pub kind: FilterKind,
    pub options: Vec<FilterOption>,
    pub placeholder: Option<String>,
    pub logic: MultiselectLogic,
    pub accessor: Option<Accessor<T>>,
}

impl<T> FilterCategory<T> {
    /// Create a category with no options and no accessor.
    pub fn new(key: impl Into<String>, title: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            kind,
            options: Vec::new(),
            placeholder: None,
            logic: MultiselectLogic::Or,
            accessor: None,
        }
    }

    pub fn multiselect(
        key: impl Into<String>,
        title: impl Into<String>,
        options: Vec<FilterOption>,
        accessor: Accessor<T>,
    ) -> Self {
        Self::new(key, title, FilterKind::MultiSelect)
            .options(options)
            .accessor(accessor)
    }

    pub fn single_select(
        key: impl Into<String>,
        title: impl Into<String>,
        options: Vec<FilterOption>,
        accessor: Accessor<T>,
    ) -> Self {
        Self::new(key, title, FilterKind::SingleSelect)
            .options(options)
            .accessor(accessor)
    }

    pub fn search(key: impl Into<String>, title: impl Into<String>, accessor: Accessor<T>) -> Self {
        Self::new(key, title, FilterKind::Search).accessor(accessor)
    }

    pub fn numeric_range(
        key: impl Into<String>,
        title: impl Into<String>,
        accessor: Accessor<T>,
    ) -> Self {
        Self::new(key, title, FilterKind::NumericRange).accessor(accessor)
    }

    pub fn date_range(
        key: impl Into<String>,
        title: impl Into<String>,
        accessor: Accessor<T>,
    ) -> Self {
        Self::new(key, title, FilterKind::DateRange).accessor(accessor)
    }

    pub fn options(mut self, options: Vec<FilterOption>) -> Self {
        self.options = options;
        self
    }

    pub fn accessor(mut self, accessor: Accessor<T>) -> Self {
        self.accessor = Some(accessor);
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn logic(mut self, logic: MultiselectLogic) -> Self {
        self.logic = logic;
        self
    }

    /// Find an option by key.
    pub fn option_by_key(&self, key: &str) -> Option<&FilterOption> {
        self.options.iter().find(|o| o.key() == key)
    }

    /// Find an option by display value.
    pub fn option_by_value(&self, value: &str) -> Option<&FilterOption> {
        self.options.iter().find(|o| o.value() == value)
    }
}

impl<T> Clone for FilterCategory<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            title: self.title.clone(),
            kind: self.kind,
            options: self.options.clone(),
            placeholder: self.placeholder.clone(),
            logic: self.logic,
            accessor: self.accessor.clone(),
        }
    }
}

impl<T> fmt::Debug for FilterCategory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterCategory")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("logic", &self.logic)
            .field("has_accessor", &self.accessor.is_some())
            .finish()
    }
}

/// The value held for one filter category.
///
/// An empty value is never stored: the category key is removed instead, so
/// "no constraint" always reads as an absent key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterValue {
    /// Selected option keys, in selection order.
    Selection(Vec<String>),
    Text(String),
    NumberRange {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    DateRange {
        #[serde(default)]
        from: Option<NaiveDate>,
        #[serde(default)]
        to: Option<NaiveDate>,
    },
}

impl FilterValue {
    /// A selection of option keys.
    pub fn selection<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::Selection(keys.into_iter().map(Into::into).collect())
    }

    /// Check if the value places no constraint.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Selection(keys) => keys.is_empty(),
            FilterValue::Text(text) => text.trim().is_empty(),
            FilterValue::NumberRange { min, max } => min.is_none() && max.is_none(),
            FilterValue::DateRange { from, to } => from.is_none() && to.is_none(),
        }
    }

    /// Check if the value can be held by a category of the given kind.
    ///
    /// A single-select category holds at most one option key.
    pub fn fits(&self, kind: FilterKind) -> bool {
        match (self, kind) {
            (FilterValue::Selection(keys), FilterKind::SingleSelect) => keys.len() <= 1,
            (FilterValue::Selection(_), FilterKind::MultiSelect)
            | (FilterValue::Text(_), FilterKind::Search)
            | (FilterValue::NumberRange { .. }, FilterKind::NumericRange)
            | (FilterValue::DateRange { .. }, FilterKind::DateRange) => true,
            _ => false,
        }
    }
}
