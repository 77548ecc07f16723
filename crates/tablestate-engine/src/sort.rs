//! Sort engine.

use std::cmp::Ordering;

use tablestate_core::{next_sort, ColumnDescriptor, FieldValue, SortDirection, SortState};

/// Sort state: at most one active column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortEngine {
    state: Option<SortState>,
}

impl SortEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active sort, if any.
    pub fn state(&self) -> Option<&SortState> {
        self.state.as_ref()
    }

    /// Direction of `column` if it is the active sort column.
    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.state
            .as_ref()
            .filter(|s| s.column == column)
            .map(|s| s.direction)
    }

    /// Replace the sort state. Returns true if it changed.
    pub fn set(&mut self, state: Option<SortState>) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        true
    }

    /// Advance the none -> asc -> desc -> none cycle for `column`.
    pub fn cycle(&mut self, column: &str) -> bool {
        let next = next_sort(self.state.as_ref(), column);
        self.set(next)
    }
}

/// Stable-sort `indices` (into `items`) by the active column.
///
/// Ties keep their incoming order in both directions. With no active sort, or
/// a sort column without accessor, the order is left untouched.
pub fn sort_indices<T>(
    items: &[T],
    indices: &mut [usize],
    sort: Option<&SortState>,
    columns: &[ColumnDescriptor<T>],
) {
    let Some(sort) = sort else {
        return;
    };
    let Some(accessor) = columns
        .iter()
        .find(|c| c.key == sort.column)
        .and_then(|c| c.sort_accessor.as_ref())
    else {
        return;
    };

    let mut keyed: Vec<(FieldValue, usize)> = indices
        .iter()
        .map(|&index| (accessor(&items[index]), index))
        .collect();

    match sort.direction {
        SortDirection::Ascending => keyed.sort_by(|a, b| compare_values(&a.0, &b.0)),
        SortDirection::Descending => keyed.sort_by(|a, b| compare_values(&b.0, &a.0)),
    }

    for (slot, (_, index)) in indices.iter_mut().zip(keyed) {
        *slot = index;
    }
}

/// Sorted view of `items`.
pub fn apply_sort<'a, T>(
    items: &'a [T],
    sort: &SortEngine,
    columns: &[ColumnDescriptor<T>],
) -> Vec<&'a T> {
    let mut indices: Vec<usize> = (0..items.len()).collect();
    sort_indices(items, &mut indices, sort.state(), columns);
    indices.into_iter().map(|index| &items[index]).collect()
}

/// Total order over field values.
///
/// Same-kind values compare naturally (text case-insensitively first). Mixed
/// kinds order number < bool < date < text < list < null, so absent values
/// sort last when ascending. NaN ranks with null.
pub fn compare_values(a: &FieldValue, b: &FieldValue) -> Ordering {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) if !x.is_nan() && !y.is_nan() => {
            x.total_cmp(y)
        }
        (FieldValue::Bool(x), FieldValue::Bool(y)) => x.cmp(y),
        (FieldValue::Date(x), FieldValue::Date(y)) => x.cmp(y),
        (FieldValue::Text(x), FieldValue::Text(y)) => x
            .to_lowercase()
            .cmp(&y.to_lowercase())
            .then_with(|| x.cmp(y)),
        (FieldValue::List(x), FieldValue::List(y)) => x
            .iter()
            .zip(y.iter())
            .map(|(a, b)| compare_values(a, b))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| x.len().cmp(&y.len())),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &FieldValue) -> u8 {
    match value {
        FieldValue::Number(n) if n.is_nan() => 5,
        FieldValue::Number(_) => 0,
        FieldValue::Bool(_) => 1,
        FieldValue::Date(_) => 2,
        FieldValue::Text(_) => 3,
        FieldValue::List(_) => 4,
        FieldValue::Null => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablestate_core::accessor;

    #[derive(Debug)]
    struct Row {
        id: u32,
        name: &'static str,
        score: Option<u32>,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: 1,
                name: "beta",
                score: Some(3),
            },
            Row {
                id: 2,
                name: "Alpha",
                score: None,
            },
            Row {
                id: 3,
                name: "alpha",
                score: Some(3),
            },
            Row {
                id: 4,
                name: "gamma",
                score: Some(1),
            },
        ]
    }

    fn columns() -> Vec<ColumnDescriptor<Row>> {
        vec![
            ColumnDescriptor::new("name", "Name").sort_by(accessor(|r: &Row| r.name)),
            ColumnDescriptor::new("score", "Score").sort_by(accessor(|r: &Row| r.score)),
            ColumnDescriptor::new("id", "ID"),
        ]
    }

    fn sorted_ids(sort: &SortEngine) -> Vec<u32> {
        let items = rows();
        apply_sort(&items, sort, &columns())
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn test_text_sort_is_case_insensitive() {
        let mut sort = SortEngine::new();
        sort.set(Some(SortState::ascending("name")));
        assert_eq!(sorted_ids(&sort), vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_ties_keep_input_order_both_directions() {
        let mut sort = SortEngine::new();
        sort.set(Some(SortState::ascending("score")));
        // Null sorts last ascending; ids 1 and 3 tie on 3.
        assert_eq!(sorted_ids(&sort), vec![4, 1, 3, 2]);

        sort.set(Some(SortState::descending("score")));
        assert_eq!(sorted_ids(&sort), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_full_cycle_restores_input_order() {
        let mut sort = SortEngine::new();
        let original = sorted_ids(&sort);

        assert!(sort.cycle("name"));
        assert_eq!(sort.direction_of("name"), Some(SortDirection::Ascending));
        assert!(sort.cycle("name"));
        assert_eq!(sort.direction_of("name"), Some(SortDirection::Descending));
        assert!(sort.cycle("name"));
        assert_eq!(sort.state(), None);

        assert_eq!(sorted_ids(&sort), original);
    }

    #[test]
    fn test_column_without_accessor_leaves_order() {
        let mut sort = SortEngine::new();
        sort.set(Some(SortState::descending("id")));
        assert_eq!(sorted_ids(&sort), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_mixed_kinds_order() {
        assert_eq!(
            compare_values(&FieldValue::Number(9.0), &FieldValue::Text("a".into())),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&FieldValue::Null, &FieldValue::Text("a".into())),
            Ordering::Greater
        );
    }

    #[test]
    fn test_nan_sorts_with_missing_values() {
        assert_eq!(
            compare_values(&FieldValue::Number(f64::NAN), &FieldValue::Number(1.0)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&FieldValue::Number(f64::NAN), &FieldValue::Null),
            Ordering::Equal
        );

        let values: Vec<f64> = (0..200u32)
            .map(|i| {
                if i % 7 == 0 {
                    f64::NAN
                } else {
                    f64::from((i * 7919) % 101)
                }
            })
            .collect();
        let columns = vec![ColumnDescriptor::new("v", "V").sort_by(accessor(|v: &f64| *v))];
        let mut sort = SortEngine::new();
        sort.set(Some(SortState::ascending("v")));

        let sorted: Vec<f64> = apply_sort(&values, &sort, &columns)
            .into_iter()
            .copied()
            .collect();
        let (numbers, missing) = sorted.split_at(sorted.len() - 29);
        assert!(missing.iter().all(|v| v.is_nan()));
        assert!(numbers.windows(2).all(|w| w[0] <= w[1]));
    }
}
