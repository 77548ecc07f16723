//! Identity resolution.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::key::Key;
use crate::value::lookup_path;

type KeyFn<T> = Arc<dyn Fn(&T) -> Option<Key> + Send + Sync>;

/// How an item's identity key is derived.
///
/// Either a property of the item's serde representation, or a custom
/// function. Resolution must be deterministic; two items resolving to the
/// same key share expansion and selection state.
pub struct IdentityRule<T> {
    source: IdentitySource,
    resolve: KeyFn<T>,
}

/// Where an [`IdentityRule`] reads from. Used in error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySource {
    Property(String),
    Accessor,
}

impl fmt::Display for IdentitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentitySource::Property(name) => write!(f, "property '{}'", name),
            IdentitySource::Accessor => f.write_str("custom accessor"),
        }
    }
}

impl<T> IdentityRule<T> {
    /// Use a custom function that always yields a key.
    pub fn accessor<K, F>(f: F) -> Self
    where
        K: Into<Key>,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self {
            source: IdentitySource::Accessor,
            resolve: Arc::new(move |item: &T| Some(f(item).into())),
        }
    }

    /// Use a custom function that may fail to yield a key.
    pub fn try_accessor<F>(f: F) -> Self
    where
        F: Fn(&T) -> Option<Key> + Send + Sync + 'static,
    {
        Self {
            source: IdentitySource::Accessor,
            resolve: Arc::new(f),
        }
    }

    /// Where this rule reads from.
    pub fn source(&self) -> &IdentitySource {
        &self.source
    }

    /// Resolve the key of one item, if the rule yields one.
    pub fn key_of(&self, item: &T) -> Option<Key> {
        (self.resolve)(item)
    }

    /// Resolve the key of the item at `index`, failing if the rule yields none.
    pub fn resolve(&self, item: &T, index: usize) -> Result<Key, ConfigError> {
        self.key_of(item).ok_or_else(|| ConfigError::MissingIdentity {
            index,
            rule: self.source.to_string(),
        })
    }

    /// Reject rules that can never resolve.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.source {
            IdentitySource::Property(name) if name.trim().is_empty() => {
                Err(ConfigError::EmptyIdentityProperty)
            }
            _ => Ok(()),
        }
    }
}

impl<T: Serialize> IdentityRule<T> {
    /// Read the key from a (possibly dotted) property of the item's serde
    /// representation. Strings, integers and booleans are accepted.
    pub fn property(name: impl Into<String>) -> Self {
        let name: String = name.into();
        let path = name.clone();
        Self {
            source: IdentitySource::Property(name),
            resolve: Arc::new(move |item: &T| {
                let root = serde_json::to_value(item).ok()?;
                match lookup_path(&root, &path)? {
                    serde_json::Value::String(s) => Some(Key::from(s.as_str())),
                    serde_json::Value::Number(n) => Some(Key(n.to_string())),
                    serde_json::Value::Bool(b) => Some(Key(b.to_string())),
                    _ => None,
                }
            }),
        }
    }
}

impl<T> Clone for IdentityRule<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            resolve: self.resolve.clone(),
        }
    }
}

impl<T> fmt::Debug for IdentityRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityRule")
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Question {
        text: String,
        id: Option<u32>,
    }

    fn question(text: &str, id: Option<u32>) -> Question {
        Question {
            text: text.to_string(),
            id,
        }
    }

    #[test]
    fn test_property_rule() {
        let by_text = IdentityRule::<Question>::property("text");
        let by_id = IdentityRule::<Question>::property("id");

        let q = question("Why?", Some(4));
        assert_eq!(by_text.key_of(&q), Some(Key::from("Why?")));
        assert_eq!(by_id.key_of(&q), Some(Key::from("4")));
    }

    #[test]
    fn test_missing_identity_is_config_error() {
        let by_id = IdentityRule::<Question>::property("id");
        let err = by_id.resolve(&question("x", None), 3).unwrap_err();
        assert!(matches!(err, ConfigError::MissingIdentity { index: 3, .. }));
        assert!(err.to_string().contains("property 'id'"));
    }

    #[test]
    fn test_accessor_rule() {
        let rule = IdentityRule::accessor(|q: &Question| q.text.to_lowercase());
        assert_eq!(rule.key_of(&question("ABC", None)), Some(Key::from("abc")));
        assert_eq!(rule.source(), &IdentitySource::Accessor);
    }

    #[test]
    fn test_empty_property_fails_validation() {
        let rule = IdentityRule::<Question>::property(" ");
        assert!(matches!(
            rule.validate(),
            Err(ConfigError::EmptyIdentityProperty)
        ));
    }
}
