//! Error types for tablestate.

use thiserror::Error;

/// Configuration errors.
///
/// These indicate a defect in how the caller set a table up and are raised
/// eagerly instead of degrading at render time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Two columns share a key.
    #[error("Duplicate column key: {0}")]
    DuplicateColumn(String),

    /// A column is marked sortable but has nothing to sort by.
    #[error("Column '{0}' is sortable but has no sort accessor")]
    MissingSortAccessor(String),

    /// Two filter categories share a key.
    #[error("Duplicate filter category key: {0}")]
    DuplicateFilterCategory(String),

    /// A filter category cannot evaluate its predicate.
    #[error("Filter category '{0}' has no accessor")]
    MissingFilterAccessor(String),

    /// Two options of one choice category share a key.
    #[error("Filter category '{category}' has duplicate option key '{option}'")]
    DuplicateOption { category: String, option: String },

    /// A page size of zero was configured.
    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    /// A forced rendered-column count of zero was configured.
    #[error("Invalid rendered column count: {0}")]
    InvalidColumnCount(usize),

    /// The identity rule names an empty property.
    #[error("Identity property name is empty")]
    EmptyIdentityProperty,

    /// The identity rule yielded no key for an item.
    #[error("Identity {rule} yielded no key for item at index {index}")]
    MissingIdentity { index: usize, rule: String },

    /// A column key that is not configured was referenced.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A filter category key that is not configured was referenced.
    #[error("Unknown filter category: {0}")]
    UnknownFilterCategory(String),
}
