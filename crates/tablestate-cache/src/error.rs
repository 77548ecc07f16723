//! Error types for cache-region invalidation.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidationError {
    #[error("Region name is empty")]
    EmptyRegion,

    /// Segments are `[A-Za-z0-9_-]+`, separated by dots.
    #[error("Invalid region name: {0}")]
    InvalidRegion(String),

    #[error("Region '{0}' cannot depend on itself")]
    SelfDependency(String),
}

/// Check a region name, e.g. `applications` or `reviews.by-application`.
pub fn validate_region(name: &str) -> Result<(), InvalidationError> {
    if name.is_empty() {
        return Err(InvalidationError::EmptyRegion);
    }
    let valid = name.split('.').all(|segment| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    });
    if valid {
        Ok(())
    } else {
        Err(InvalidationError::InvalidRegion(name.to_string()))
    }
}
