//! Filter engine.
//!
//! Holds the category-key -> value mapping and evaluates it against items.
//! Categories compose with AND; within a multi-select category the selected
//! options compose with the category's [`MultiselectLogic`].

use std::collections::BTreeMap;

use tablestate_core::{
    FieldValue, FilterCategory, FilterKind, FilterOption, FilterValue, MultiselectLogic,
    OptionMatch,
};

/// Filter state: category key -> value. Empty values are never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterEngine {
    values: BTreeMap<String, FilterValue>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// All active filter values.
    pub fn values(&self) -> &BTreeMap<String, FilterValue> {
        &self.values
    }

    /// The value of one category, if it constrains anything.
    pub fn value(&self, category: &str) -> Option<&FilterValue> {
        self.values.get(category)
    }

    /// Check if any category is constraining.
    pub fn has_active(&self) -> bool {
        !self.values.is_empty()
    }

    /// Replace the value of one category. Empty values clear the category.
    ///
    /// Returns true if the stored state changed.
    pub fn set(&mut self, category: &str, value: Option<FilterValue>) -> bool {
        match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                if self.values.get(category) == Some(&value) {
                    return false;
                }
                self.values.insert(category.to_string(), value);
                true
            }
            None => self.values.remove(category).is_some(),
        }
    }

    /// Toggle one option key of a choice category.
    ///
    /// Multi-select toggles membership, appending new keys at the end.
    /// Single-select replaces the selected key, or clears it when the same
    /// key is toggled again. Removing the last key clears the category.
    pub fn toggle_option(&mut self, category: &str, kind: FilterKind, option_key: &str) -> bool {
        let mut keys = match self.values.get(category) {
            Some(FilterValue::Selection(keys)) => keys.clone(),
            _ => Vec::new(),
        };

        if let Some(pos) = keys.iter().position(|k| k == option_key) {
            keys.remove(pos);
        } else if kind == FilterKind::SingleSelect {
            keys = vec![option_key.to_string()];
        } else {
            keys.push(option_key.to_string());
        }

        self.set(category, Some(FilterValue::Selection(keys)))
    }

    /// Remove one option key from a choice category, if present.
    pub fn remove_option(&mut self, category: &str, option_key: &str) -> bool {
        let keys: Vec<String> = match self.values.get(category) {
            Some(FilterValue::Selection(keys)) if keys.iter().any(|k| k == option_key) => keys
                .iter()
                .filter(|k| k.as_str() != option_key)
                .cloned()
                .collect(),
            _ => return false,
        };
        self.set(category, Some(FilterValue::Selection(keys)))
    }

    /// Clear one category.
    pub fn clear(&mut self, category: &str) -> bool {
        self.values.remove(category).is_some()
    }

    /// Clear every category.
    pub fn clear_all(&mut self) -> bool {
        let changed = !self.values.is_empty();
        self.values.clear();
        changed
    }
}

/// Indices of the items passing every active category, in input order.
pub fn filter_indices<T>(
    items: &[T],
    values: &BTreeMap<String, FilterValue>,
    categories: &[FilterCategory<T>],
) -> Vec<usize> {
    let active: Vec<(&FilterCategory<T>, &FilterValue)> = categories
        .iter()
        .filter_map(|category| values.get(&category.key).map(|value| (category, value)))
        .collect();

    items
        .iter()
        .enumerate()
        .filter(|(_, item)| {
            active
                .iter()
                .all(|(category, value)| category_matches(category, value, item))
        })
        .map(|(index, _)| index)
        .collect()
}

/// The items passing every active category, in input order.
pub fn apply_filters<'a, T>(
    items: &'a [T],
    filters: &FilterEngine,
    categories: &[FilterCategory<T>],
) -> Vec<&'a T> {
    filter_indices(items, filters.values(), categories)
        .into_iter()
        .map(|index| &items[index])
        .collect()
}

/// Evaluate one category's predicate against one item.
pub fn category_matches<T>(category: &FilterCategory<T>, value: &FilterValue, item: &T) -> bool {
    let Some(accessor) = category.accessor.as_ref() else {
        return true;
    };
    let field = accessor(item);

    match value {
        FilterValue::Selection(selected) => selection_matches(category.logic, selected, &field),
        FilterValue::Text(needle) => {
            let needle = needle.trim().to_lowercase();
            field
                .texts()
                .iter()
                .any(|text| text.to_lowercase().contains(&needle))
        }
        FilterValue::NumberRange { min, max } => field.numbers().into_iter().any(|n| {
            min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi)
        }),
        FilterValue::DateRange { from, to } => field.dates().into_iter().any(|d| {
            from.map_or(true, |lo| d >= lo) && to.map_or(true, |hi| d <= hi)
        }),
    }
}

fn selection_matches(logic: MultiselectLogic, selected: &[String], field: &FieldValue) -> bool {
    let candidates = field.texts();
    let has = |key: &String| candidates.iter().any(|c| c.as_ref() == key.as_str());
    match logic {
        MultiselectLogic::Or => selected.iter().any(has),
        MultiselectLogic::And => selected.iter().all(has),
    }
}

/// Chip labels for a category's value, in selection order.
///
/// Option keys are shown by their display value; keys without a matching
/// option are shown as-is.
pub fn chips<T>(category: &FilterCategory<T>, value: &FilterValue) -> Vec<String> {
    match value {
        FilterValue::Selection(keys) => keys
            .iter()
            .map(|key| {
                category
                    .option_by_key(key)
                    .map_or_else(|| key.clone(), |o| o.value().to_string())
            })
            .collect(),
        FilterValue::Text(text) => vec![text.clone()],
        FilterValue::NumberRange { min, max } => {
            range_chip(min.map(format_bound), max.map(format_bound))
        }
        FilterValue::DateRange { from, to } => range_chip(
            from.map(|d| d.format("%Y-%m-%d").to_string()),
            to.map(|d| d.format("%Y-%m-%d").to_string()),
        ),
    }
}

fn format_bound(n: f64) -> String {
    FieldValue::Number(n)
        .as_text()
        .map(|t| t.into_owned())
        .unwrap_or_default()
}

fn range_chip(lo: Option<String>, hi: Option<String>) -> Vec<String> {
    match (lo, hi) {
        (Some(lo), Some(hi)) => vec![format!("{} - {}", lo, hi)],
        (Some(lo), None) => vec![format!(">= {}", lo)],
        (None, Some(hi)) => vec![format!("<= {}", hi)],
        (None, None) => Vec::new(),
    }
}

/// Map a chip label back to the option key it represents.
pub fn option_key_for_chip<'a, T>(category: &'a FilterCategory<T>, chip: &'a str) -> &'a str {
    category.option_by_value(chip).map_or(chip, FilterOption::key)
}

/// Options whose display value (and key, if configured) contains `text`,
/// case-insensitively. Empty input matches nothing.
pub fn matching_options<'a, T>(
    category: &'a FilterCategory<T>,
    text: &str,
    mode: OptionMatch,
) -> Vec<&'a FilterOption> {
    let needle = text.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    category
        .options
        .iter()
        .filter(|option| {
            let value_hit = option.value().to_lowercase().contains(&needle);
            let key_hit =
                mode == OptionMatch::KeyAndValue && option.key().to_lowercase().contains(&needle);
            value_hit || key_hit
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablestate_core::{accessor, NaiveDate};

    #[derive(Debug, Clone, PartialEq)]
    struct App {
        id: u32,
        name: &'static str,
        tags: Vec<&'static str>,
        risk: f64,
        created: NaiveDate,
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn apps() -> Vec<App> {
        vec![
            App {
                id: 1,
                name: "Billing",
                tags: vec!["java", "legacy"],
                risk: 2.0,
                created: date(2023, 1, 10),
            },
            App {
                id: 2,
                name: "Catalog",
                tags: vec!["go"],
                risk: 5.0,
                created: date(2023, 6, 1),
            },
            App {
                id: 3,
                name: "billing-api",
                tags: vec!["java"],
                risk: 8.0,
                created: date(2024, 2, 29),
            },
        ]
    }

    fn tag_options() -> Vec<FilterOption> {
        vec![
            FilterOption::new("java", "Java"),
            FilterOption::new("go", "Go"),
            FilterOption::new("legacy", "Legacy"),
        ]
    }

    fn categories() -> Vec<FilterCategory<App>> {
        vec![
            FilterCategory::multiselect(
                "tags",
                "Tags",
                tag_options(),
                accessor(|a: &App| a.tags.clone()),
            ),
            FilterCategory::search("name", "Name", accessor(|a: &App| a.name)),
            FilterCategory::numeric_range("risk", "Risk", accessor(|a: &App| a.risk)),
            FilterCategory::date_range("created", "Created", accessor(|a: &App| a.created)),
        ]
    }

    fn ids(items: Vec<&App>) -> Vec<u32> {
        items.into_iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_no_filters_returns_everything() {
        let items = apps();
        let filters = FilterEngine::new();
        assert_eq!(ids(apply_filters(&items, &filters, &categories())), vec![1, 2, 3]);
    }

    #[test]
    fn test_multiselect_is_or_within_category() {
        let items = apps();
        let mut filters = FilterEngine::new();
        filters.set("tags", Some(FilterValue::selection(["go", "legacy"])));
        assert_eq!(ids(apply_filters(&items, &filters, &categories())), vec![1, 2]);
    }

    #[test]
    fn test_multiselect_and_logic() {
        let items = apps();
        let categories = vec![FilterCategory::multiselect(
            "tags",
            "Tags",
            tag_options(),
            accessor(|a: &App| a.tags.clone()),
        )
        .logic(MultiselectLogic::And)];
        let mut filters = FilterEngine::new();
        filters.set("tags", Some(FilterValue::selection(["java", "legacy"])));
        assert_eq!(ids(apply_filters(&items, &filters, &categories)), vec![1]);
    }

    #[test]
    fn test_categories_compose_with_and() {
        let items = apps();
        let mut filters = FilterEngine::new();
        filters.set("tags", Some(FilterValue::selection(["java"])));
        filters.set("name", Some(FilterValue::Text("BILL".into())));
        filters.set(
            "risk",
            Some(FilterValue::NumberRange {
                min: Some(3.0),
                max: None,
            }),
        );

        let result = apply_filters(&items, &filters, &categories());
        assert_eq!(ids(result.clone()), vec![3]);

        // Every returned item passes every active predicate on its own.
        let cats = categories();
        for item in result {
            for (key, value) in filters.values() {
                let category = cats.iter().find(|c| &c.key == key).unwrap();
                assert!(category_matches(category, value, item));
            }
        }
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let items = apps();
        let mut filters = FilterEngine::new();
        filters.set(
            "risk",
            Some(FilterValue::NumberRange {
                min: Some(2.0),
                max: Some(5.0),
            }),
        );
        assert_eq!(ids(apply_filters(&items, &filters, &categories())), vec![1, 2]);

        filters.clear("risk");
        filters.set(
            "created",
            Some(FilterValue::DateRange {
                from: None,
                to: Some(date(2023, 6, 1)),
            }),
        );
        assert_eq!(ids(apply_filters(&items, &filters, &categories())), vec![1, 2]);
    }

    #[test]
    fn test_toggle_twice_restores_value() {
        let mut filters = FilterEngine::new();
        filters.set("tags", Some(FilterValue::selection(["java"])));
        let before = filters.clone();

        assert!(filters.toggle_option("tags", FilterKind::MultiSelect, "go"));
        assert_eq!(
            filters.value("tags"),
            Some(&FilterValue::selection(["java", "go"]))
        );
        assert!(filters.toggle_option("tags", FilterKind::MultiSelect, "go"));
        assert_eq!(filters, before);
    }

    #[test]
    fn test_removing_last_option_clears_category() {
        let mut filters = FilterEngine::new();
        filters.toggle_option("tags", FilterKind::MultiSelect, "java");
        assert!(filters.has_active());

        assert!(filters.remove_option("tags", "java"));
        assert_eq!(filters.value("tags"), None);
        assert!(!filters.has_active());
    }

    #[test]
    fn test_single_select_toggle_replaces() {
        let mut filters = FilterEngine::new();
        filters.toggle_option("tier", FilterKind::SingleSelect, "gold");
        filters.toggle_option("tier", FilterKind::SingleSelect, "silver");
        assert_eq!(filters.value("tier"), Some(&FilterValue::selection(["silver"])));

        filters.toggle_option("tier", FilterKind::SingleSelect, "silver");
        assert_eq!(filters.value("tier"), None);
    }

    #[test]
    fn test_set_reports_changes() {
        let mut filters = FilterEngine::new();
        assert!(filters.set("name", Some(FilterValue::Text("a".into()))));
        assert!(!filters.set("name", Some(FilterValue::Text("a".into()))));
        assert!(filters.set("name", Some(FilterValue::Text(" ".into()))));
        assert!(!filters.set("name", None));
    }

    #[test]
    fn test_chips_follow_selection_order() {
        let cats = categories();
        let value = FilterValue::selection(["legacy", "java", "unknown"]);
        assert_eq!(chips(&cats[0], &value), vec!["Legacy", "Java", "unknown"]);
        assert_eq!(option_key_for_chip(&cats[0], "Legacy"), "legacy");
        assert_eq!(option_key_for_chip(&cats[0], "unknown"), "unknown");

        let range = FilterValue::NumberRange {
            min: Some(1.0),
            max: None,
        };
        assert_eq!(chips(&cats[2], &range), vec![">= 1"]);
    }

    #[test]
    fn test_matching_options_value_only_by_default() {
        let cats = categories();
        let hits: Vec<&str> = matching_options(&cats[0], "JA", OptionMatch::ValueOnly)
            .into_iter()
            .map(|o| o.key())
            .collect();
        assert_eq!(hits, vec!["java"]);

        let category = FilterCategory::<App>::new("s", "Status", FilterKind::MultiSelect)
            .options(vec![FilterOption::new("st-1", "Open")]);
        assert!(matching_options(&category, "st", OptionMatch::ValueOnly).is_empty());
        assert_eq!(
            matching_options(&category, "st", OptionMatch::KeyAndValue).len(),
            1
        );
        assert!(matching_options(&category, "", OptionMatch::KeyAndValue).is_empty());
    }
}
