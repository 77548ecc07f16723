//! Prop bundles for rendering collaborators.
//!
//! Each bundle carries everything one rendered element needs, so rendering
//! code never derives state itself. Field names serialize in camelCase.

use serde::Serialize;

use tablestate_core::{
    next_sort, ConfigError, FilterKind, FilterOption, FilterValue, Key, SelectionMode,
    SortDirection, TableVariant,
};

use super::TableControls;
use crate::filter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableProps {
    pub variant: TableVariant,
    pub has_expand_column: bool,
    pub has_select_column: bool,
    pub has_actions_column: bool,
    pub num_rendered_columns: usize,
    pub is_no_data: bool,
    pub is_filtered_empty: bool,
}

/// Header cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThProps {
    pub column_key: String,
    pub label: String,
    pub width: Option<u16>,
    /// Absent for non-sortable columns.
    pub sort: Option<ThSortProps>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThSortProps {
    /// Position among the configured columns.
    pub column_index: usize,
    pub direction: Option<SortDirection>,
    pub is_active: bool,
    /// Direction a click would switch to; `None` clears the sort.
    pub next_direction: Option<SortDirection>,
}

/// Data cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TdProps {
    pub column_key: String,
    pub data_label: String,
    pub compound_expand: Option<CompoundExpandProps>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundExpandProps {
    pub is_expanded: bool,
    pub expand_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowProps {
    pub key: Key,
    pub is_expanded: bool,
    pub is_selected: bool,
    pub expand: Option<ExpandToggleProps>,
    pub select: Option<SelectCheckboxProps>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandToggleProps {
    pub row_index: usize,
    pub is_expanded: bool,
    pub expand_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectVariant {
    Checkbox,
    Radio,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectCheckboxProps {
    pub row_index: usize,
    pub is_selected: bool,
    pub variant: SelectVariant,
}

/// Full-width cell holding expanded row content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedContentProps {
    pub is_expanded: bool,
    pub col_span: usize,
    /// Label of the expanded compound column, if any.
    pub data_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationProps {
    pub page: usize,
    pub per_page: usize,
    pub item_count: usize,
    pub page_count: usize,
    pub is_first_page: bool,
    pub is_last_page: bool,
    pub per_page_options: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterControlProps {
    pub category_key: String,
    pub title: String,
    pub kind: FilterKind,
    pub placeholder: String,
    /// Selected option keys, in selection order.
    pub selections: Vec<String>,
    pub chips: Vec<String>,
    pub options: Vec<FilterOption>,
    pub is_disabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkCheckState {
    None,
    Partial,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSelectProps {
    pub selected_count: usize,
    /// Items on the current page.
    pub page_count: usize,
    pub filtered_count: usize,
    pub is_page_selected: bool,
    pub checked: BulkCheckState,
}

impl<T> TableControls<T> {
    /// Bundle for the table element.
    pub fn table_props(&self) -> TableProps {
        TableProps {
            variant: self.options.variant,
            has_expand_column: self.has_expand_column(),
            has_select_column: self.has_select_column(),
            has_actions_column: self.options.has_actions_column,
            num_rendered_columns: self.num_rendered_columns(),
            is_no_data: self.is_no_data(),
            is_filtered_empty: self.is_filtered_empty(),
        }
    }

    /// Header cell bundle for `column`.
    pub fn th_props(&self, column: &str) -> Result<ThProps, ConfigError> {
        let (column_index, col) = self
            .columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.key == column)
            .ok_or_else(|| ConfigError::UnknownColumn(column.to_string()))?;

        let sort = col.sortable.then(|| {
            let direction = self.sort.direction_of(column);
            ThSortProps {
                column_index,
                direction,
                is_active: direction.is_some(),
                next_direction: next_sort(self.sort.state(), column).map(|s| s.direction),
            }
        });

        Ok(ThProps {
            column_key: col.key.clone(),
            label: col.label.clone(),
            width: col.width,
            sort,
        })
    }

    /// Data cell bundle for `column` of the row with `key`.
    pub fn td_props(&self, key: &Key, column: &str) -> Result<TdProps, ConfigError> {
        let col = self.column(column)?;
        let compound_expand = col.compound_expandable.then(|| CompoundExpandProps {
            is_expanded: self.expansion.is_cell_expanded(key, column),
            expand_id: format!("compound-expand-{}-{}", key, column),
        });
        Ok(TdProps {
            column_key: col.key.clone(),
            data_label: col.label.clone(),
            compound_expand,
        })
    }

    /// Row bundle for `key`. `row_index` is the position on the page.
    pub fn row_props(&self, key: &Key, row_index: usize) -> RowProps {
        let is_expanded = self.is_expanded(key);
        let is_selected = self.is_selected(key);

        let expand = self.has_expand_column().then(|| ExpandToggleProps {
            row_index,
            is_expanded,
            expand_id: format!("expandable-row-{}", key),
        });
        let select = self.has_select_column().then(|| SelectCheckboxProps {
            row_index,
            is_selected,
            variant: match self.options.selection {
                SelectionMode::Single => SelectVariant::Radio,
                _ => SelectVariant::Checkbox,
            },
        });

        RowProps {
            key: key.clone(),
            is_expanded,
            is_selected,
            expand,
            select,
        }
    }

    /// Bundle for the expanded content row of `key`.
    pub fn expanded_content_props(&self, key: &Key) -> ExpandedContentProps {
        let data_label = self.expansion.expanded_column(key).and_then(|column| {
            self.columns
                .iter()
                .find(|c| c.key == column)
                .map(|c| c.label.clone())
        });
        ExpandedContentProps {
            is_expanded: self.is_expanded(key),
            col_span: self.num_rendered_columns(),
            data_label,
        }
    }

    /// `None` when pagination is disabled.
    pub fn pagination_props(&self) -> Option<PaginationProps> {
        if !self.options.has_pagination {
            return None;
        }
        let total = self.filtered_count();
        Some(PaginationProps {
            page: self.pagination.page(),
            per_page: self.pagination.page_size(),
            item_count: total,
            page_count: self.pagination.page_count(total),
            is_first_page: self.pagination.is_first_page(),
            is_last_page: self.pagination.is_last_page(total),
            per_page_options: self.options.per_page_options.clone(),
        })
    }

    /// Bundle for the filter control of `category`.
    pub fn filter_control_props(&self, category: &str) -> Result<FilterControlProps, ConfigError> {
        let cat = self.category(category)?;
        let value = self.filters.value(category);

        let selections = match value {
            Some(FilterValue::Selection(keys)) => keys.clone(),
            _ => Vec::new(),
        };
        let chips = value
            .map(|value| filter::chips(cat, value))
            .unwrap_or_default();
        let placeholder = cat
            .placeholder
            .clone()
            .unwrap_or_else(|| format!("Filter by {}...", cat.title));

        Ok(FilterControlProps {
            category_key: cat.key.clone(),
            title: cat.title.clone(),
            kind: cat.kind,
            placeholder,
            selections,
            chips,
            options: cat.options.clone(),
            is_disabled: cat.kind.is_choice() && cat.options.is_empty(),
        })
    }

    /// Bundle for the bulk selection control.
    pub fn bulk_select_props(&self) -> BulkSelectProps {
        let selected_count = self.selected_count();
        let filtered_count = self.filtered_count();
        let page_keys = self.current_page_keys();
        let is_page_selected =
            !page_keys.is_empty() && page_keys.iter().all(|key| self.is_selected(key));

        let selected_in_filter = self
            .derived
            .sorted_keys
            .iter()
            .filter(|key| self.is_selected(key))
            .count();
        let checked = if selected_count == 0 {
            BulkCheckState::None
        } else if filtered_count > 0 && selected_in_filter == filtered_count {
            BulkCheckState::All
        } else {
            BulkCheckState::Partial
        };

        BulkSelectProps {
            selected_count,
            page_count: page_keys.len(),
            filtered_count,
            is_page_selected,
            checked,
        }
    }
}
