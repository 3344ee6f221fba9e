#![forbid(unsafe_code)]

//! Thread-safe reactive cells.
//!
//! - [`Observable`]: a shared, version-tracked value with change
//!   notification via subscriber callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`Binding`]: a read-only, lazily evaluated view of an observable.
//! - [`BindingScope`]: owns a group of subscriptions and releases them
//!   together.
//!
//! # Architecture
//!
//! Cards are built on arbitrary threads and presented on the UI thread, so
//! `Observable<T>` is `Arc<Mutex<..>>` based. Subscribers are stored as
//! `Weak` callbacks and cleaned up lazily during notification. Callbacks run
//! after the lock is released, so a callback may read or write the same
//! observable.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op (no version bump,
//!    no notifications).
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.

pub mod binding;
pub mod observable;

pub use binding::{Binding, BindingScope, bind_mapped, bind_observable};
pub use observable::{Observable, Subscription};
