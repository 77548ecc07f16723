//! Cache-region invalidation for tablestate data layers.
//!
//! Data caches are named by region (e.g. `applications`, `reviews`). After a
//! successful write, the data layer invalidates the written region; regions
//! that declared a dependency on it are invalidated in turn. This crate is
//! independent of the table-control engine.

pub mod error;
pub mod events;
pub mod registry;

pub use error::{validate_region, InvalidationError};
pub use events::{InvalidationBus, InvalidationCause, InvalidationEvent};
pub use registry::{FnListener, InvalidationListener, InvalidationRegistry};
