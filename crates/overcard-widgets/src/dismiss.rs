#![forbid(unsafe_code)]

//! Dismiss requests and the per-card interaction gate.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Why a card left the screen (or never reached it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DismissReason {
    /// The explicit close control was tapped.
    Affordance,
    /// An action with `can_dismiss_card` was tapped. `index` counts actions
    /// only, in add order.
    Action { index: usize },
    /// The dimmed backdrop was tapped (when enabled on the card).
    Backdrop,
    /// The host asked for dismissal.
    Programmatic,
    /// Removed from the queue before it started presenting.
    Cancelled,
    /// The surface refused to attach the card.
    AttachFailed,
}

impl DismissReason {
    /// The card was on screen before it closed.
    #[must_use]
    pub const fn was_presented(self) -> bool {
        !matches!(self, Self::Cancelled | Self::AttachFailed)
    }
}

/// A callback a component invokes to ask for its card to close.
///
/// Each request carries the [`DismissReason`] it reports. The card hands every
/// component a request pre-bound with the right reason.
#[derive(Clone)]
pub struct DismissRequest {
    reason: DismissReason,
    sink: Arc<dyn Fn(DismissReason) + Send + Sync>,
}

impl fmt::Debug for DismissRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DismissRequest")
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

impl DismissRequest {
    /// Route requests into `sink`. The default reason is
    /// [`DismissReason::Programmatic`].
    pub fn new(sink: impl Fn(DismissReason) + Send + Sync + 'static) -> Self {
        Self {
            reason: DismissReason::Programmatic,
            sink: Arc::new(sink),
        }
    }

    /// A request that goes nowhere.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    /// Same sink, different reason.
    #[must_use]
    pub fn with_reason(&self, reason: DismissReason) -> Self {
        Self {
            reason,
            sink: Arc::clone(&self.sink),
        }
    }

    #[must_use]
    pub fn reason(&self) -> DismissReason {
        self.reason
    }

    pub fn request(&self) {
        (self.sink)(self.reason);
    }
}

/// Per-card switch guarding every tap and edit handler.
///
/// Open while the card is on screen; closed exactly once during teardown,
/// after which handlers are inert even if the host still holds the views.
#[derive(Debug, Clone)]
pub struct InteractionGate(Arc<AtomicBool>);

impl InteractionGate {
    #[must_use]
    pub fn open() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Close the gate. Returns `true` if this call closed it.
    pub fn close(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

impl Default for InteractionGate {
    fn default() -> Self {
        Self::open()
    }
}
