#![forbid(unsafe_code)]

//! Shared observable values.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Callback<T> = dyn Fn(&T) + Send + Sync;

struct Inner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<Callback<T>>>,
}

/// A shared value that notifies subscribers when it changes.
///
/// Cloning an `Observable` yields another handle to the same cell.
pub struct Observable<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .finish()
    }
}

impl<T: Default + Clone + PartialEq + Send + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Observable<T> {
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // A panicking subscriber never holds the lock, so a poisoned mutex
        // still guards a consistent value.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether two handles point at the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone + PartialEq + Send + 'static> Observable<T> {
    /// Create a new observable holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// `f` runs with the cell locked; it must not touch this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock().value)
    }

    /// Number of changes applied so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.lock().version
    }

    /// Replace the value, notifying subscribers if it changed.
    pub fn set(&self, value: T) {
        let mut inner = self.lock();
        if inner.value == value {
            return;
        }
        inner.value = value;
        self.publish(inner);
    }

    /// Mutate the value in place, notifying subscribers if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut inner = self.lock();
        let before = inner.value.clone();
        f(&mut inner.value);
        if inner.value == before {
            return;
        }
        self.publish(inner);
    }

    fn publish(&self, mut inner: MutexGuard<'_, Inner<T>>) {
        inner.version += 1;
        inner.subscribers.retain(|weak| weak.strong_count() > 0);
        let callbacks: Vec<Arc<Callback<T>>> =
            inner.subscribers.iter().filter_map(Weak::upgrade).collect();
        let snapshot = inner.value.clone();
        drop(inner);

        for callback in callbacks {
            callback(&snapshot);
        }
    }

    /// Register `callback` to run after every change.
    ///
    /// The callback stays registered for as long as the returned
    /// [`Subscription`] is alive.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let callback: Arc<Callback<T>> = Arc::new(callback);
        self.lock().subscribers.push(Arc::downgrade(&callback));
        Subscription {
            _callback: Box::new(callback),
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock()
            .subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

trait Keepalive: Send + Sync {}

impl<T: Send + Sync> Keepalive for T {}

/// RAII guard for an [`Observable::subscribe`] registration.
pub struct Subscription {
    _callback: Box<dyn Keepalive>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn get_and_set() {
        let obs = Observable::new(1);
        assert_eq!(obs.get(), 1);
        obs.set(2);
        assert_eq!(obs.get(), 2);
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn equal_set_is_noop() {
        let obs = Observable::new("a".to_string());
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let _sub = obs.subscribe(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        obs.set("a".to_string());
        assert_eq!(obs.version(), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn subscribers_notified_in_order() {
        let obs = Observable::new(0);
        let log = Arc::new(Mutex::new(Vec::new()));
        let l1 = Arc::clone(&log);
        let l2 = Arc::clone(&log);
        let _a = obs.subscribe(move |v| l1.lock().unwrap().push(("a", *v)));
        let _b = obs.subscribe(move |v| l2.lock().unwrap().push(("b", *v)));
        obs.set(7);
        assert_eq!(*log.lock().unwrap(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn dropped_subscription_stops_callbacks() {
        let obs = Observable::new(0);
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let sub = obs.subscribe(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        obs.set(1);
        drop(sub);
        obs.set(2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn callback_may_reenter() {
        let obs = Observable::new(0);
        let inner = obs.clone();
        let _sub = obs.subscribe(move |v| {
            if *v < 3 {
                inner.set(v + 1);
            }
        });
        obs.set(1);
        assert_eq!(obs.get(), 3);
    }

    #[test]
    fn update_in_place() {
        let obs = Observable::new(vec![1]);
        obs.update(|v| v.push(2));
        assert_eq!(obs.get(), vec![1, 2]);
        assert_eq!(obs.version(), 1);
        obs.update(|_| {});
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn clones_share_state() {
        let a = Observable::new(false);
        let b = a.clone();
        b.set(true);
        assert!(a.get());
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&Observable::new(true)));
    }

    #[test]
    fn set_from_other_thread() {
        let obs = Observable::new(0u32);
        let remote = obs.clone();
        std::thread::spawn(move || remote.set(42))
            .join()
            .expect("setter thread panicked");
        assert_eq!(obs.get(), 42);
    }
}
