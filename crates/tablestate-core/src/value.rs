//! Field values and accessors.
//!
//! The engine never inspects an item directly. Columns and filter categories
//! read items through an [`Accessor`], which yields a [`FieldValue`].

use chrono::NaiveDate;
use serde::Serialize;
use std::borrow::Cow;
use std::sync::Arc;

/// A value read from an item for sorting or filtering.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// No value.
    #[default]
    Null,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
    /// Several values; matches if any element matches.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Check if the value is absent.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Text form of a scalar value. `None` for nulls and lists.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            FieldValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            FieldValue::Number(n) => Some(Cow::Owned(format_number(*n))),
            FieldValue::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            FieldValue::Date(d) => Some(Cow::Owned(d.format("%Y-%m-%d").to_string())),
            FieldValue::Null | FieldValue::List(_) => None,
        }
    }

    /// All scalar text forms, flattening lists.
    pub fn texts(&self) -> Vec<Cow<'_, str>> {
        match self {
            FieldValue::List(values) => values.iter().flat_map(|v| v.texts()).collect(),
            other => other.as_text().into_iter().collect(),
        }
    }

    /// All numeric values, flattening lists.
    pub fn numbers(&self) -> Vec<f64> {
        match self {
            FieldValue::Number(n) => vec![*n],
            FieldValue::List(values) => values.iter().flat_map(|v| v.numbers()).collect(),
            _ => Vec::new(),
        }
    }

    /// All date values, flattening lists.
    pub fn dates(&self) -> Vec<NaiveDate> {
        match self {
            FieldValue::Date(d) => vec![*d],
            FieldValue::List(values) => values.iter().flat_map(|v| v.dates()).collect(),
            _ => Vec::new(),
        }
    }

    /// Convert a JSON value. Objects have no field form and become `Null`.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null | serde_json::Value::Object(_) => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(FieldValue::Null, FieldValue::Number),
            serde_json::Value::String(s) => FieldValue::Text(s.clone()),
            serde_json::Value::Array(values) => {
                FieldValue::List(values.iter().map(FieldValue::from_json).collect())
            }
        }
    }
}

/// Integral numbers print without a fractional part so that `3.0` matches
/// an option key of `"3"`.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::Text(s.clone())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        FieldValue::Date(d)
    }
}

macro_rules! field_value_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(n: $ty) -> Self {
                    FieldValue::Number(n as f64)
                }
            }
        )*
    };
}

field_value_from_number!(f32, f64, i32, i64, u32, u64, usize);

impl<V: Into<FieldValue>> From<Option<V>> for FieldValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl<V: Into<FieldValue>> From<Vec<V>> for FieldValue {
    fn from(values: Vec<V>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Reads a [`FieldValue`] from an item.
pub type Accessor<T> = Arc<dyn Fn(&T) -> FieldValue + Send + Sync>;

/// Wrap a closure as an [`Accessor`].
pub fn accessor<T, V, F>(f: F) -> Accessor<T>
where
    F: Fn(&T) -> V + Send + Sync + 'static,
    V: Into<FieldValue>,
{
    Arc::new(move |item: &T| f(item).into())
}

/// Accessor reading a field of the item's serde representation.
///
/// `path` may name a nested field with dots, e.g. `"owner.name"`. Items that
/// fail to serialize, or lack the field, read as `Null`.
pub fn field<T: Serialize>(path: impl Into<String>) -> Accessor<T> {
    let path: String = path.into();
    Arc::new(move |item: &T| {
        serde_json::to_value(item)
            .ok()
            .and_then(|root| lookup_path(&root, &path).map(FieldValue::from_json))
            .unwrap_or_default()
    })
}

/// Walk a dotted path through nested JSON objects.
pub(crate) fn lookup_path<'a>(
    root: &'a serde_json::Value,
    path: &str,
) -> Option<&'a serde_json::Value> {
    path.split('.')
        .try_fold(root, |value, segment| value.as_object()?.get(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Owner {
        name: String,
    }

    #[derive(Serialize)]
    struct Row {
        id: u32,
        tags: Vec<String>,
        owner: Owner,
    }

    fn row() -> Row {
        Row {
            id: 7,
            tags: vec!["a".into(), "b".into()],
            owner: Owner {
                name: "Ada".into(),
            },
        }
    }

    #[test]
    fn test_number_text_has_no_fraction() {
        assert_eq!(FieldValue::from(3u32).as_text().unwrap(), "3");
        assert_eq!(FieldValue::from(2.5).as_text().unwrap(), "2.5");
    }

    #[test]
    fn test_texts_flatten_lists() {
        let value = FieldValue::from(vec!["x", "y"]);
        let texts: Vec<String> = value.texts().into_iter().map(|t| t.into_owned()).collect();
        assert_eq!(texts, vec!["x", "y"]);
        assert!(FieldValue::Null.texts().is_empty());
    }

    #[test]
    fn test_field_accessor_reads_serialized_fields() {
        let id = field::<Row>("id");
        let tags = field::<Row>("tags");
        let owner = field::<Row>("owner.name");
        let missing = field::<Row>("owner.email");

        let item = row();
        assert_eq!(id(&item), FieldValue::Number(7.0));
        assert_eq!(tags(&item), FieldValue::from(vec!["a", "b"]));
        assert_eq!(owner(&item), FieldValue::Text("Ada".into()));
        assert!(missing(&item).is_null());
    }

    #[test]
    fn test_closure_accessor() {
        let len = accessor(|r: &Row| r.tags.len());
        assert_eq!(len(&row()), FieldValue::Number(2.0));
    }
}
