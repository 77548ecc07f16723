//! Headless table-control engine.
//!
//! This crate derives the state behind a tabular view:
//! - Filtering by category, with chips and in-dropdown option search
//! - Single-column stable sorting
//! - Pagination with clamping
//! - Row and compound-cell expansion keyed by identity
//! - Selection with "all matching the filter" semantics
//! - The `TableControls` orchestrator and its prop bundles
//! - Flat key-value persistence of the state slices

pub mod controls;
pub mod expansion;
pub mod filter;
pub mod pagination;
pub mod persist;
pub mod selection;
pub mod sort;

// Re-export commonly used types
pub use controls::{
    BulkCheckState, BulkSelectProps, CompoundExpandProps, ExpandToggleProps, ExpandedContentProps,
    FilterControlProps, PaginationProps, Row, RowProps, SelectCheckboxProps, SelectVariant,
    TableControls, TableControlsConfig, TableProps, TdProps, ThProps, ThSortProps,
};
pub use expansion::{ExpandedEntries, ExpansionEngine};
pub use filter::{apply_filters, FilterEngine};
pub use pagination::{paginate, PaginationEngine};
pub use persist::PersistedState;
pub use selection::{Selection, SelectionEngine};
pub use sort::{apply_sort, SortEngine};

// Re-export tablestate_core for convenience
pub use tablestate_core;
