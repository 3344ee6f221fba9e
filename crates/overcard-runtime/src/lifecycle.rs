#![forbid(unsafe_code)]

//! Card identity and the forward-only lifecycle state machine.
//!
//! ```text
//! Built ──► Queued ──► Presenting ──► Dismissing ──► Done
//!             │                                       ▲
//!             └───────── cancelled / attach failed ───┘
//! ```
//!
//! # Invariants
//!
//! 1. Phases only move forward; no phase is entered twice.
//! 2. `Done` records exactly one [`DismissReason`].
//!
//! # Failure Modes
//!
//! Any other transition is rejected with
//! [`LifecycleError::InvalidTransition`] and leaves the phase unchanged.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use overcard_widgets::DismissReason;

static CARD_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a presented card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(u64);

impl CardId {
    pub(crate) fn next() -> Self {
        Self(CARD_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card#{}", self.0)
    }
}

/// Where a card is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardPhase {
    Built,
    Queued,
    Presenting,
    Dismissing,
    Done,
}

impl CardPhase {
    /// Whether `self -> next` is a legal step.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Built, Self::Queued)
                | (Self::Queued, Self::Presenting)
                | (Self::Queued, Self::Done)
                | (Self::Presenting, Self::Dismissing)
                | (Self::Dismissing, Self::Done)
        )
    }

    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Sub-phase of the on-screen animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    /// Entrance in flight.
    Entering,
    /// Fully shown.
    Settled,
    /// Exit in flight.
    Exiting,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("{id}: cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        id: CardId,
        from: CardPhase,
        to: CardPhase,
    },
}

/// The lifecycle of one card.
#[derive(Debug, Clone)]
pub struct CardLifecycle {
    id: CardId,
    phase: CardPhase,
    reason: Option<DismissReason>,
}

impl CardLifecycle {
    #[must_use]
    pub fn new(id: CardId) -> Self {
        Self {
            id,
            phase: CardPhase::Built,
            reason: None,
        }
    }

    /// A lifecycle that has already taken the `Built -> Queued` step.
    #[must_use]
    pub fn queued(id: CardId) -> Self {
        tracing::debug!(card_id = %id, from = ?CardPhase::Built, to = ?CardPhase::Queued, "card phase");
        Self {
            id,
            phase: CardPhase::Queued,
            reason: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn phase(&self) -> CardPhase {
        self.phase
    }

    /// Outcome, once `Done`.
    #[must_use]
    pub fn reason(&self) -> Option<DismissReason> {
        self.reason
    }

    /// Step to `next`. `Done` must be reached through [`finish`](Self::finish).
    pub fn advance(&mut self, next: CardPhase) -> Result<(), LifecycleError> {
        if next.is_done() || !self.phase.can_advance_to(next) {
            return Err(self.invalid(next));
        }
        tracing::debug!(card_id = %self.id, from = ?self.phase, to = ?next, "card phase");
        self.phase = next;
        Ok(())
    }

    /// Step to `Done`, recording why.
    pub fn finish(&mut self, reason: DismissReason) -> Result<(), LifecycleError> {
        if !self.phase.can_advance_to(CardPhase::Done) {
            return Err(self.invalid(CardPhase::Done));
        }
        tracing::debug!(card_id = %self.id, from = ?self.phase, ?reason, "card done");
        self.phase = CardPhase::Done;
        self.reason = Some(reason);
        Ok(())
    }

    fn invalid(&self, to: CardPhase) -> LifecycleError {
        LifecycleError::InvalidTransition {
            id: self.id,
            from: self.phase,
            to,
        }
    }
}
