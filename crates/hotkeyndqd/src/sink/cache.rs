//! Shared cache of resolved event handlers.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::warn;

use super::SINK_TARGET;
use super::backend::EventHandler;

/// Event-name to handler map shared by every connection.
///
/// Entries are added on first successful resolution and never evicted. Two
/// connections resolving the same name concurrently may both hit the
/// registry; the first insert wins and both receive that handler.
#[derive(Default)]
pub(crate) struct HandlerCache {
    handlers: Mutex<HashMap<String, Arc<dyn EventHandler>>>,
}

impl HandlerCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the cached handler for `event`, resolving and caching it on a
    /// miss. Unknown events are not cached.
    pub(crate) fn get_or_resolve<F>(&self, event: &str, resolve: F) -> Option<Arc<dyn EventHandler>>
    where
        F: FnOnce(&str) -> Option<Arc<dyn EventHandler>>,
    {
        if let Some(handler) = self.lock().get(event) {
            return Some(Arc::clone(handler));
        }

        // The registry call runs without the lock held.
        let resolved = resolve(event)?;
        let mut handlers = self.lock();
        let handler = handlers.entry(event.to_owned()).or_insert(resolved);
        Some(Arc::clone(handler))
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<dyn EventHandler>>> {
        self.handlers.lock().unwrap_or_else(|poisoned| {
            warn!(
                target: SINK_TARGET,
                "handler cache lock poisoned; recovering cached handlers"
            );
            poisoned.into_inner()
        })
    }
}

impl fmt::Debug for HandlerCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerCache")
            .field("cached", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;
    use crate::sink::{EventValue, SinkError};

    struct Silent;

    impl EventHandler for Silent {
        fn invoke(&self, _value: Option<EventValue>) -> Result<(), SinkError> {
            Ok(())
        }
    }

    #[test]
    fn resolves_each_event_once() {
        let cache = HandlerCache::new();
        let lookups = AtomicUsize::new(0);
        let resolve = |_: &str| {
            lookups.fetch_add(1, Ordering::SeqCst);
            Some(Arc::new(Silent) as Arc<dyn EventHandler>)
        };

        let first = cache.get_or_resolve("GEAR_TOGGLE", resolve);
        let second = cache.get_or_resolve("GEAR_TOGGLE", resolve);

        assert!(first.is_some() && second.is_some());
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn unknown_events_are_not_cached() {
        let cache = HandlerCache::new();
        assert!(cache.get_or_resolve("NOT_AN_EVENT", |_| None).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn recovers_from_poisoned_lock() {
        let cache = Arc::new(HandlerCache::new());
        let poisoner = Arc::clone(&cache);
        let outcome = thread::spawn(move || {
            let _guard = poisoner.handlers.lock().expect("lock cache");
            panic!("poison the cache lock");
        })
        .join();
        assert!(outcome.is_err());

        let handler =
            cache.get_or_resolve("FLAPS_UP", |_| Some(Arc::new(Silent) as Arc<dyn EventHandler>));
        assert!(handler.is_some());
        assert_eq!(cache.len(), 1);
    }
}
