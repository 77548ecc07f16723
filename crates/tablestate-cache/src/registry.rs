//! Invalidation registry.
//!
//! A publish/subscribe table keyed by region name. Listeners register for one
//! region; regions declare which other regions they depend on. Invalidating a
//! region notifies its listeners, then walks its dependents breadth-first.
//! Each region is notified at most once per `invalidate` call, so dependency
//! cycles terminate.
//!
//! Listeners run after all locks are released and may call back into the
//! registry.

use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{validate_region, InvalidationError};
use crate::events::{InvalidationBus, InvalidationCause, InvalidationEvent};

/// Global counter for listener ids.
static LISTENER_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn generate_listener_id() -> String {
    let id = LISTENER_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("listener:{}", id)
}

/// Receives invalidations of the region it was registered for.
#[cfg_attr(test, mockall::automock)]
pub trait InvalidationListener: Send + Sync {
    fn invalidated(&self, event: &InvalidationEvent);
}

/// Adapts a closure into a listener.
pub struct FnListener<F>(pub F);

impl<F> InvalidationListener for FnListener<F>
where
    F: Fn(&InvalidationEvent) + Send + Sync,
{
    fn invalidated(&self, event: &InvalidationEvent) {
        (self.0)(event)
    }
}

struct ListenerEntry {
    id: String,
    listener: Arc<dyn InvalidationListener>,
}

pub struct InvalidationRegistry {
    /// Region -> listeners, in registration order.
    listeners: RwLock<HashMap<String, Vec<ListenerEntry>>>,

    /// Source region -> regions that depend on it.
    dependents: RwLock<HashMap<String, BTreeSet<String>>>,

    bus: Option<InvalidationBus>,
}

impl InvalidationRegistry {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            dependents: RwLock::new(HashMap::new()),
            bus: None,
        }
    }

    /// Also publish every invalidation on `bus`.
    pub fn with_bus(bus: InvalidationBus) -> Self {
        Self {
            bus: Some(bus),
            ..Self::new()
        }
    }

    /// Register a listener for `region`.
    ///
    /// Returns the listener id for later removal.
    pub fn listen(
        &self,
        region: &str,
        listener: Arc<dyn InvalidationListener>,
    ) -> Result<String, InvalidationError> {
        validate_region(region)?;
        let id = generate_listener_id();
        self.listeners
            .write()
            .entry(region.to_string())
            .or_default()
            .push(ListenerEntry {
                id: id.clone(),
                listener,
            });
        tracing::debug!("Added listener for region '{}' (id: {})", region, id);
        Ok(id)
    }

    /// Register a closure for `region`.
    pub fn listen_fn<F>(&self, region: &str, f: F) -> Result<String, InvalidationError>
    where
        F: Fn(&InvalidationEvent) + Send + Sync + 'static,
    {
        self.listen(region, Arc::new(FnListener(f)))
    }

    /// Remove a listener by id.
    ///
    /// Returns true if the listener was found and removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut listeners = self.listeners.write();
        for entries in listeners.values_mut() {
            if let Some(pos) = entries.iter().position(|e| e.id == id) {
                entries.remove(pos);
                tracing::debug!("Removed listener (id: {})", id);
                return true;
            }
        }
        false
    }

    /// Number of listeners registered for `region`.
    pub fn listener_count(&self, region: &str) -> usize {
        self.listeners.read().get(region).map_or(0, Vec::len)
    }

    /// Declare that `dependent` must be invalidated whenever `source` is.
    pub fn declare_dependency(&self, dependent: &str, source: &str) -> Result<(), InvalidationError> {
        validate_region(dependent)?;
        validate_region(source)?;
        if dependent == source {
            return Err(InvalidationError::SelfDependency(dependent.to_string()));
        }
        let added = self
            .dependents
            .write()
            .entry(source.to_string())
            .or_default()
            .insert(dependent.to_string());
        if added {
            tracing::debug!("Region '{}' now depends on '{}'", dependent, source);
        }
        Ok(())
    }

    /// Regions that directly depend on `source`.
    pub fn dependents_of(&self, source: &str) -> Vec<String> {
        self.dependents
            .read()
            .get(source)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Invalidate `region` and, transitively, every region depending on it.
    ///
    /// Returns the invalidated regions in notification order, starting with
    /// `region` itself.
    pub fn invalidate(
        &self,
        region: &str,
        cause: InvalidationCause,
    ) -> Result<Vec<String>, InvalidationError> {
        validate_region(region)?;

        let events = self.collect_events(region, cause);
        let regions = events.iter().map(|e| e.region.clone()).collect();

        for event in events {
            let listeners: Vec<Arc<dyn InvalidationListener>> = self
                .listeners
                .read()
                .get(&event.region)
                .map(|entries| entries.iter().map(|e| e.listener.clone()).collect())
                .unwrap_or_default();

            tracing::debug!(
                "Invalidating region '{}' ({:?}), {} listeners",
                event.region,
                event.cause,
                listeners.len()
            );
            for listener in listeners {
                listener.invalidated(&event);
            }
            if let Some(bus) = &self.bus {
                bus.publish(event);
            }
        }

        Ok(regions)
    }

    /// Breadth-first walk over the dependents of `origin`.
    fn collect_events(&self, origin: &str, cause: InvalidationCause) -> Vec<InvalidationEvent> {
        let dependents = self.dependents.read();
        let mut seen: HashSet<&str> = HashSet::from([origin]);
        let mut queue: VecDeque<&str> = VecDeque::from([origin]);
        let mut events = vec![InvalidationEvent::new(origin, cause)];

        while let Some(source) = queue.pop_front() {
            let Some(next) = dependents.get(source) else {
                continue;
            };
            for dependent in next {
                if seen.insert(dependent.as_str()) {
                    queue.push_back(dependent.as_str());
                    events.push(InvalidationEvent::new(
                        dependent.as_str(),
                        InvalidationCause::Dependency {
                            source: source.to_string(),
                        },
                    ));
                }
            }
        }

        events
    }
}

impl Default for InvalidationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recorder(registry: &InvalidationRegistry, region: &str) -> Arc<Mutex<Vec<InvalidationEvent>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        registry
            .listen_fn(region, move |event| sink.lock().push(event.clone()))
            .unwrap();
        seen
    }

    #[test]
    fn test_listener_notified_once() {
        let registry = InvalidationRegistry::new();
        let mut listener = MockInvalidationListener::new();
        listener
            .expect_invalidated()
            .withf(|event| event.region == "applications" && event.cause == InvalidationCause::Write)
            .times(1)
            .return_const(());
        registry.listen("applications", Arc::new(listener)).unwrap();

        let regions = registry
            .invalidate("applications", InvalidationCause::Write)
            .unwrap();
        assert_eq!(regions, vec!["applications"]);
    }

    #[test]
    fn test_other_regions_untouched() {
        let registry = InvalidationRegistry::new();
        let mut listener = MockInvalidationListener::new();
        listener.expect_invalidated().times(0);
        registry.listen("reviews", Arc::new(listener)).unwrap();

        registry
            .invalidate("applications", InvalidationCause::Write)
            .unwrap();
    }

    #[test]
    fn test_dependencies_are_transitive() {
        let registry = InvalidationRegistry::new();
        registry.declare_dependency("reviews", "applications").unwrap();
        registry.declare_dependency("assessments", "applications").unwrap();
        registry.declare_dependency("reports", "reviews").unwrap();
        let reports = recorder(&registry, "reports");

        let regions = registry
            .invalidate("applications", InvalidationCause::Refetch)
            .unwrap();
        assert_eq!(regions, vec!["applications", "assessments", "reviews", "reports"]);

        let events = reports.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].cause,
            InvalidationCause::Dependency {
                source: "reviews".into()
            }
        );
    }

    #[test]
    fn test_cycles_notify_each_region_once() {
        let registry = InvalidationRegistry::new();
        registry.declare_dependency("a", "b").unwrap();
        registry.declare_dependency("b", "a").unwrap();
        let a = recorder(&registry, "a");
        let b = recorder(&registry, "b");

        let regions = registry.invalidate("a", InvalidationCause::Write).unwrap();
        assert_eq!(regions, vec!["a", "b"]);
        assert_eq!(a.lock().len(), 1);
        assert_eq!(b.lock().len(), 1);
    }

    #[test]
    fn test_remove_listener() {
        let registry = InvalidationRegistry::new();
        let seen = Arc::new(Mutex::new(0));
        let counter = seen.clone();
        let id = registry
            .listen_fn("reviews", move |_| *counter.lock() += 1)
            .unwrap();

        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert_eq!(registry.listener_count("reviews"), 0);

        registry.invalidate("reviews", InvalidationCause::Write).unwrap();
        assert_eq!(*seen.lock(), 0);
    }

    #[test]
    fn test_listener_may_reenter_registry() {
        let registry = Arc::new(InvalidationRegistry::new());
        let inner = registry.clone();
        registry
            .listen_fn("applications", move |_| {
                inner.listen_fn("late", |_| {}).unwrap();
            })
            .unwrap();

        registry
            .invalidate("applications", InvalidationCause::Write)
            .unwrap();
        assert_eq!(registry.listener_count("late"), 1);
    }

    #[test]
    fn test_rejects_bad_names() {
        let registry = InvalidationRegistry::new();
        assert_eq!(
            registry.declare_dependency("a", "a"),
            Err(InvalidationError::SelfDependency("a".into()))
        );
        assert!(registry.invalidate("bad name", InvalidationCause::Write).is_err());
        assert!(registry.listen_fn("", |_| {}).is_err());
    }

    #[tokio::test]
    async fn test_bus_receives_cascade() {
        let bus = InvalidationBus::new();
        let mut rx = bus.subscribe();
        let registry = InvalidationRegistry::with_bus(bus);
        registry.declare_dependency("reviews", "applications").unwrap();

        registry
            .invalidate("applications", InvalidationCause::Write)
            .unwrap();

        assert_eq!(rx.recv().await.unwrap().region, "applications");
        let event = rx.recv().await.unwrap();
        assert_eq!(event.region, "reviews");
        assert_eq!(
            event.cause,
            InvalidationCause::Dependency {
                source: "applications".into()
            }
        );
    }
}
