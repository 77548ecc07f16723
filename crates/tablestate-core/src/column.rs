//! Column descriptors.

use std::fmt;

use crate::value::Accessor;

/// A configured table column.
///
/// Order of the column list defines render order.
pub struct ColumnDescriptor<T> {
    /// Unique column key, referenced by sort state and prop builders.
    pub key: String,

    /// Display label.
    pub label: String,

    /// Width hint as a percentage of the table width.
    pub width: Option<u16>,

    /// Whether header clicks may sort by this column.
    pub sortable: bool,

    /// Whether cells of this column toggle compound (per-cell) expansion.
    pub compound_expandable: bool,

    /// Value used when sorting by this column.
    pub sort_accessor: Option<Accessor<T>>,
}

impl<T> ColumnDescriptor<T> {
    /// Create a plain, non-sortable column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width: None,
            sortable: false,
            compound_expandable: false,
            sort_accessor: None,
        }
    }

    /// Set the width hint.
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Make the column sortable by the given accessor.
    pub fn sort_by(mut self, accessor: Accessor<T>) -> Self {
        self.sortable = true;
        self.sort_accessor = Some(accessor);
        self
    }

    /// Mark the column sortable without supplying an accessor.
    ///
    /// Building a table with such a column fails; use [`sort_by`](Self::sort_by).
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Let cells of this column expand compound row content.
    pub fn compound_expandable(mut self) -> Self {
        self.compound_expandable = true;
        self
    }
}

impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            width: self.width,
            sortable: self.sortable,
            compound_expandable: self.compound_expandable,
            sort_accessor: self.sort_accessor.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("width", &self.width)
            .field("sortable", &self.sortable)
            .field("compound_expandable", &self.compound_expandable)
            .field("has_sort_accessor", &self.sort_accessor.is_some())
            .finish()
    }
}
