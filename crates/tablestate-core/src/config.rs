//! Table configuration types.
//!
//! These are the serializable knobs of a table instance. Columns, filter
//! categories and the identity rule carry accessor functions and are
//! supplied separately through the engine's config builder.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::filter::OptionMatch;
use crate::selection::{ExpansionVariant, SelectionMode};

/// Default page size.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Visual density of the table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TableVariant {
    #[default]
    Default,
    Compact,
}

/// Options of one table instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TableOptions {
    #[serde(default)]
    pub variant: TableVariant,

    #[serde(default)]
    pub expansion: ExpansionVariant,

    #[serde(default)]
    pub selection: SelectionMode,

    /// Adds one structural column for row actions.
    #[serde(default)]
    pub has_actions_column: bool,

    /// When false, the current page is the whole sorted sequence.
    #[serde(default = "default_true")]
    pub has_pagination: bool,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_per_page_options")]
    pub per_page_options: Vec<usize>,

    /// Overrides the computed rendered column count.
    #[serde(default)]
    pub force_num_rendered_columns: Option<usize>,

    /// Prefix for flat key-value persistence, e.g. `"q"` gives `q:pageNumber`.
    #[serde(default)]
    pub persistence_key_prefix: Option<String>,

    #[serde(default)]
    pub option_match: OptionMatch,

    /// Log a warning when two items resolve to the same identity key.
    #[serde(default = "default_true")]
    pub warn_duplicate_keys: bool,
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_per_page_options() -> Vec<usize> {
    vec![10, 20, 50, 100]
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            variant: TableVariant::Default,
            expansion: ExpansionVariant::None,
            selection: SelectionMode::None,
            has_actions_column: false,
            has_pagination: true,
            page_size: DEFAULT_PAGE_SIZE,
            per_page_options: default_per_page_options(),
            force_num_rendered_columns: None,
            persistence_key_prefix: None,
            option_match: OptionMatch::ValueOnly,
            warn_duplicate_keys: true,
        }
    }
}

impl TableOptions {
    /// Check the options on their own, before columns are known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidPageSize(0));
        }
        if let Some(&size) = self.per_page_options.iter().find(|&&s| s == 0) {
            return Err(ConfigError::InvalidPageSize(size));
        }
        if self.force_num_rendered_columns == Some(0) {
            return Err(ConfigError::InvalidColumnCount(0));
        }
        Ok(())
    }
}
