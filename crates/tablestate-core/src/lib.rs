//! Core types for the tablestate table-control engine.
//!
//! This crate contains the data model shared by the engine crates:
//! - Identity keys and identity rules
//! - Field values and accessors
//! - Column descriptors
//! - Filter categories and filter values
//! - Sort, selection and expansion primitives
//! - Table options and error types

mod column;
mod config;
mod error;
mod filter;
mod identity;
mod key;
mod selection;
mod sort;
mod value;

pub use column::ColumnDescriptor;
pub use config::{TableOptions, TableVariant, DEFAULT_PAGE_SIZE};
pub use error::ConfigError;
pub use filter::{
    FilterCategory, FilterKind, FilterOption, FilterValue, MultiselectLogic, OptionMatch,
};
pub use identity::{IdentityRule, IdentitySource};
pub use key::Key;
pub use selection::{ExpansionVariant, SelectionMode, SelectionScope};
pub use sort::{next_sort, SortDirection, SortState};
pub use value::{accessor, field, Accessor, FieldValue};

pub use chrono::NaiveDate;
