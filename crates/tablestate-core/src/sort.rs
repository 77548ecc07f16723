//! Sort state types.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction '{}'", other)),
        }
    }
}

/// The active sort column and direction. At most one column sorts at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    pub fn ascending(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Ascending)
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self::new(column, SortDirection::Descending)
    }
}

/// Next sort state after the user selects `column`.
///
/// Repeated selection of the same column cycles none -> ascending ->
/// descending -> none. A different column always starts at ascending.
pub fn next_sort(current: Option<&SortState>, column: &str) -> Option<SortState> {
    match current {
        Some(state) if state.column == column => match state.direction {
            SortDirection::Ascending => Some(SortState::descending(column)),
            SortDirection::Descending => None,
        },
        _ => Some(SortState::ascending(column)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_same_column() {
        let first = next_sort(None, "name");
        assert_eq!(first, Some(SortState::ascending("name")));

        let second = next_sort(first.as_ref(), "name");
        assert_eq!(second, Some(SortState::descending("name")));

        let third = next_sort(second.as_ref(), "name");
        assert_eq!(third, None);
    }

    #[test]
    fn test_other_column_starts_ascending() {
        let current = SortState::descending("name");
        assert_eq!(
            next_sort(Some(&current), "size"),
            Some(SortState::ascending("size"))
        );
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("asc".parse(), Ok(SortDirection::Ascending));
        assert_eq!("desc".parse(), Ok(SortDirection::Descending));
        assert!("up".parse::<SortDirection>().is_err());
    }
}
