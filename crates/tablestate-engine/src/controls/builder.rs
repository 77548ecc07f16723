//! Configuration builder for [`TableControls`].

use std::collections::HashSet;

use tablestate_core::{
    ColumnDescriptor, ConfigError, FilterCategory, FilterKind, IdentityRule, TableOptions,
};

use super::TableControls;
use crate::persist::PersistedState;

/// Everything a table instance is set up with.
///
/// `build` checks the configuration as a whole and fails on the first
/// defect instead of letting it surface at render time.
pub struct TableControlsConfig<T> {
    identity: IdentityRule<T>,
    options: TableOptions,
    columns: Vec<ColumnDescriptor<T>>,
    categories: Vec<FilterCategory<T>>,
    initial_state: Option<PersistedState>,
    items: Vec<T>,
}

impl<T> TableControlsConfig<T> {
    pub fn new(identity: IdentityRule<T>) -> Self {
        Self {
            identity,
            options: TableOptions::default(),
            columns: Vec::new(),
            categories: Vec::new(),
            initial_state: None,
            items: Vec::new(),
        }
    }

    pub fn options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    pub fn column(mut self, column: ColumnDescriptor<T>) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = ColumnDescriptor<T>>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn filter_category(mut self, category: FilterCategory<T>) -> Self {
        self.categories.push(category);
        self
    }

    /// Seed state, e.g. read from URL parameters.
    pub fn initial_state(mut self, state: PersistedState) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn items(mut self, items: Vec<T>) -> Self {
        self.items = items;
        self
    }

    /// Validate and create the controls.
    pub fn build(self) -> Result<TableControls<T>, ConfigError> {
        self.options.validate()?;
        self.identity.validate()?;
        validate_columns(&self.columns)?;
        validate_categories(&self.categories)?;

        let mut controls =
            TableControls::from_parts(self.options, self.columns, self.categories, self.identity);
        controls.set_items(self.items)?;
        if let Some(state) = self.initial_state {
            controls.apply_persisted_state(state);
        }
        Ok(controls)
    }
}

fn validate_columns<T>(columns: &[ColumnDescriptor<T>]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.key.as_str()) {
            return Err(ConfigError::DuplicateColumn(column.key.clone()));
        }
        if column.sortable && column.sort_accessor.is_none() {
            return Err(ConfigError::MissingSortAccessor(column.key.clone()));
        }
    }
    Ok(())
}

fn validate_categories<T>(categories: &[FilterCategory<T>]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for category in categories {
        if !seen.insert(category.key.as_str()) {
            return Err(ConfigError::DuplicateFilterCategory(category.key.clone()));
        }
        if category.accessor.is_none() {
            return Err(ConfigError::MissingFilterAccessor(category.key.clone()));
        }
        if matches!(category.kind, FilterKind::SingleSelect | FilterKind::MultiSelect) {
            let mut options = HashSet::new();
            for option in &category.options {
                if !options.insert(option.key()) {
                    return Err(ConfigError::DuplicateOption {
                        category: category.key.clone(),
                        option: option.key().to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}
