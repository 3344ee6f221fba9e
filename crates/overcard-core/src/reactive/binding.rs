#![forbid(unsafe_code)]

//! Read-only bindings and subscription scopes.
//!
//! A [`Binding<T>`] derives a display value from an [`Observable`] on every
//! `get()`. A [`BindingScope`] collects the subscriptions that belong to one
//! logical owner (a rendered card) so they can be released together.
//!
//! # Invariants
//!
//! 1. `Binding::get()` always returns the current (not stale) value.
//! 2. After a scope is cleared or dropped, none of its callbacks fire again.

use std::fmt;
use std::sync::Arc;

use super::observable::{Observable, Subscription};

/// A read-only, lazily evaluated view of reactive state.
pub struct Binding<T> {
    eval: Arc<dyn Fn() -> T + Send + Sync>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Arc::clone(&self.eval),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("value", &self.get())
            .finish()
    }
}

impl<T: 'static> Binding<T> {
    /// Create a binding that evaluates `f` on each `get()` call.
    pub fn new(f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self { eval: Arc::new(f) }
    }

    #[must_use]
    pub fn get(&self) -> T {
        (self.eval)()
    }
}

/// Direct binding to an observable.
pub fn bind_observable<T: Clone + PartialEq + Send + 'static>(
    source: &Observable<T>,
) -> Binding<T> {
    let src = source.clone();
    Binding::new(move || src.get())
}

/// Binding to `source` transformed by `map`.
pub fn bind_mapped<S: Clone + PartialEq + Send + 'static, T: 'static>(
    source: &Observable<S>,
    map: impl Fn(&S) -> T + Send + Sync + 'static,
) -> Binding<T> {
    let src = source.clone();
    Binding::new(move || src.with(|v| map(v)))
}

/// Owns the subscriptions of one logical scope.
///
/// Subscriptions are released in registration order on `clear()` or drop.
#[derive(Default)]
pub struct BindingScope {
    subscriptions: Vec<Subscription>,
}

impl BindingScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `sub` alive until the scope is cleared or dropped.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Subscribe to `source` within this scope.
    pub fn subscribe<T: Clone + PartialEq + Send + 'static>(
        &mut self,
        source: &Observable<T>,
        callback: impl Fn(&T) + Send + Sync + 'static,
    ) -> &mut Self {
        let sub = source.subscribe(callback);
        self.subscriptions.push(sub);
        self
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release every subscription now. The scope stays usable.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

impl fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingScope")
            .field("binding_count", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn binding_tracks_source() {
        let obs = Observable::new(42);
        let b = bind_observable(&obs);
        assert_eq!(b.get(), 42);
        obs.set(100);
        assert_eq!(b.get(), 100);
    }

    #[test]
    fn mapped_binding() {
        let enabled = Observable::new(true);
        let opacity = bind_mapped(&enabled, |e| if *e { 1.0 } else { 0.5 });
        assert_eq!(opacity.get(), 1.0);
        enabled.set(false);
        assert_eq!(opacity.get(), 0.5);
    }

    #[test]
    fn scope_clear_disconnects() {
        let obs = Observable::new(0);
        let hits = Arc::new(AtomicUsize::new(0));
        let mut scope = BindingScope::new();
        let h = Arc::clone(&hits);
        scope.subscribe(&obs, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(scope.binding_count(), 1);

        obs.set(1);
        scope.clear();
        assert!(scope.is_empty());
        obs.set(2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn scope_drop_disconnects() {
        let obs = Observable::new(0);
        let hits = Arc::new(AtomicUsize::new(0));
        {
            let mut scope = BindingScope::new();
            let h = Arc::clone(&hits);
            scope.hold(obs.subscribe(move |_| {
                h.fetch_add(1, Ordering::SeqCst);
            }));
        }
        obs.set(5);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
