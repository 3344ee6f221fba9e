#![forbid(unsafe_code)]

//! The presentation scheduler.
//!
//! A [`Presenter`] is a cheap, cloneable, thread-safe handle. Any thread may
//! queue cards with [`Presenter::present`]; the paired
//! [`PresentationLoop`](crate::PresentationLoop) pulls them off the queue on
//! the UI thread, one at a time.
//!
//! # Invariants
//!
//! 1. The queue is strict FIFO in append order.
//! 2. At most one card occupies the slot; only the loop fills or frees it.
//! 3. The queue lock is held only to touch queue data, never across visual
//!    work or user callbacks.
//!
//! # Failure Modes
//!
//! - `dismiss`/`cancel` with an unknown or finished id return `false`.
//! - If the loop has been dropped, wake-ups and dismiss requests are
//!   discarded with a `debug` log; queued cards are never presented.

use std::collections::VecDeque;
use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use overcard_widgets::{Card, CardControls, CardError, DismissReason};

use crate::lifecycle::{CardId, CardLifecycle};

/// Lock `mutex`, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A card waiting for the slot.
pub(crate) struct QueuedCard {
    pub(crate) id: CardId,
    pub(crate) card: Card,
    pub(crate) lifecycle: CardLifecycle,
}

/// Queue plus slot, shared by every handle and the loop.
#[derive(Default)]
pub(crate) struct Shared {
    pub(crate) queue: VecDeque<QueuedCard>,
    pub(crate) slot: Option<CardId>,
}

/// Posted to the loop.
pub(crate) enum Message {
    /// Something was queued.
    Wake,
    Dismiss { id: CardId, reason: DismissReason },
    /// Finish a card that never reached the screen.
    Retire { entry: QueuedCard, reason: DismissReason },
}

/// Thread-safe handle to the card queue.
#[derive(Clone)]
pub struct Presenter {
    state: Arc<Mutex<Shared>>,
    tx: Sender<Message>,
}

impl fmt::Debug for Presenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = lock(&self.state);
        f.debug_struct("Presenter")
            .field("pending", &shared.queue.len())
            .field("current", &shared.slot)
            .finish()
    }
}

impl Presenter {
    pub(crate) fn from_parts(state: Arc<Mutex<Shared>>, tx: Sender<Message>) -> Self {
        Self { state, tx }
    }

    /// Queue `card` behind every card already queued. Never blocks on
    /// visual work.
    ///
    /// The returned ticket's [`controls`](PresentedCard::controls) cover
    /// every component of the card, since it can no longer be changed.
    pub fn present(&self, card: Card) -> PresentedCard {
        let id = CardId::next();
        let controls = card.controls();
        let label = card.debug_label().map(str::to_owned);
        let lifecycle = CardLifecycle::queued(id);

        let pending = {
            let mut shared = lock(&self.state);
            shared.queue.push_back(QueuedCard {
                id,
                card,
                lifecycle,
            });
            shared.queue.len()
        };
        tracing::debug!(card_id = %id, ?label, pending, "card queued");
        self.post(Message::Wake);

        PresentedCard {
            id,
            controls,
            presenter: self.clone(),
        }
    }

    /// Cards waiting behind the slot.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        lock(&self.state).queue.len()
    }

    /// Whether a card holds the slot.
    #[must_use]
    pub fn is_presenting(&self) -> bool {
        lock(&self.state).slot.is_some()
    }

    /// The card holding the slot.
    #[must_use]
    pub fn current(&self) -> Option<CardId> {
        lock(&self.state).slot
    }

    /// Whether `id` is still waiting in the queue.
    #[must_use]
    pub fn is_queued(&self, id: CardId) -> bool {
        lock(&self.state).queue.iter().any(|entry| entry.id == id)
    }

    /// Ask card `id` to leave. A presenting card runs its exit; a queued card
    /// is cancelled. Returns `false` if the card is unknown or finished.
    pub fn dismiss(&self, id: CardId) -> bool {
        // One lock for both checks: the loop may move the card from the
        // queue into the slot at any time.
        let outcome = {
            let mut shared = lock(&self.state);
            if shared.slot == Some(id) {
                Some(Message::Dismiss {
                    id,
                    reason: DismissReason::Programmatic,
                })
            } else {
                take_queued(&mut shared, id).map(|entry| Message::Retire {
                    entry,
                    reason: DismissReason::Cancelled,
                })
            }
        };
        match outcome {
            Some(message) => {
                if matches!(message, Message::Retire { .. }) {
                    tracing::debug!(card_id = %id, "card cancelled");
                }
                self.post(message);
                true
            }
            None => false,
        }
    }

    /// Dismiss whatever is on screen.
    pub fn dismiss_current(&self) -> bool {
        self.current().is_some_and(|id| self.dismiss(id))
    }

    /// Remove queued card `id` before it starts. Its completion callbacks
    /// run on the loop with [`DismissReason::Cancelled`]. Presenting cards
    /// cannot be cancelled.
    pub fn cancel(&self, id: CardId) -> bool {
        let Some(entry) = take_queued(&mut lock(&self.state), id) else {
            return false;
        };
        tracing::debug!(card_id = %id, "card cancelled");
        self.post(Message::Retire {
            entry,
            reason: DismissReason::Cancelled,
        });
        true
    }

    /// Cancel every queued card. Returns how many were removed.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<QueuedCard> = lock(&self.state).queue.drain(..).collect();
        let count = drained.len();
        for entry in drained {
            self.post(Message::Retire {
                entry,
                reason: DismissReason::Cancelled,
            });
        }
        if count > 0 {
            tracing::debug!(count, "queue cancelled");
        }
        count
    }

    fn post(&self, message: Message) {
        if self.tx.send(message).is_err() {
            tracing::debug!("presentation loop is gone; message dropped");
        }
    }
}

fn take_queued(shared: &mut Shared, id: CardId) -> Option<QueuedCard> {
    let position = shared.queue.iter().position(|entry| entry.id == id)?;
    shared.queue.remove(position)
}

/// Ticket returned by [`Presenter::present`].
#[derive(Debug, Clone)]
pub struct PresentedCard {
    id: CardId,
    controls: CardControls,
    presenter: Presenter,
}

impl PresentedCard {
    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    /// Live handle to the card's inputs and actions.
    ///
    /// Taken when the card was presented, so it covers every component.
    /// A handle from [`Card::controls`] taken earlier in the build only
    /// covers the components added before it; prefer this one.
    #[must_use]
    pub fn controls(&self) -> &CardControls {
        &self.controls
    }

    #[must_use]
    pub fn value_of(&self, input_index: usize) -> Option<String> {
        self.controls.value_of(input_index)
    }

    pub fn set_enabled(&self, action_index: usize, enabled: bool) {
        self.controls.set_enabled(action_index, enabled);
    }

    pub fn try_set_enabled(&self, action_index: usize, enabled: bool) -> Result<(), CardError> {
        self.controls.try_set_enabled(action_index, enabled)
    }

    #[must_use]
    pub fn is_queued(&self) -> bool {
        self.presenter.is_queued(self.id)
    }

    #[must_use]
    pub fn is_presenting(&self) -> bool {
        self.presenter.current() == Some(self.id)
    }

    /// See [`Presenter::dismiss`].
    pub fn dismiss(&self) -> bool {
        self.presenter.dismiss(self.id)
    }

    /// See [`Presenter::cancel`].
    pub fn cancel(&self) -> bool {
        self.presenter.cancel(self.id)
    }
}

/// `card.present(&presenter)`.
pub trait PresentExt {
    fn present(self, presenter: &Presenter) -> PresentedCard;
}

impl PresentExt for Card {
    fn present(self, presenter: &Presenter) -> PresentedCard {
        presenter.present(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::{self, Receiver};

    fn presenter() -> (Presenter, Receiver<Message>) {
        let (tx, rx) = mpsc::channel();
        (Presenter::from_parts(Arc::default(), tx), rx)
    }

    fn labelled(label: &str) -> Card {
        let mut card = Card::new();
        card.label(label);
        card
    }

    #[test]
    fn present_queues_and_wakes() {
        let (presenter, rx) = presenter();
        let ticket = labelled("a").present(&presenter);
        assert_eq!(presenter.pending_len(), 1);
        assert!(ticket.is_queued());
        assert!(!presenter.is_presenting());
        assert!(matches!(rx.try_recv(), Ok(Message::Wake)));
    }

    #[test]
    fn queue_is_fifo() {
        let (presenter, _rx) = presenter();
        let ids: Vec<CardId> = ["a", "b", "c"]
            .into_iter()
            .map(|l| presenter.present(labelled(l)).id())
            .collect();
        let queued: Vec<CardId> = lock(&presenter.state).queue.iter().map(|e| e.id).collect();
        assert_eq!(queued, ids);
    }

    #[test]
    fn cancel_removes_and_retires() {
        let (presenter, rx) = presenter();
        let a = presenter.present(labelled("a"));
        let b = presenter.present(labelled("b"));
        assert!(a.cancel());
        assert!(!a.cancel());
        assert_eq!(presenter.pending_len(), 1);
        assert!(b.is_queued());

        let retired: Vec<CardId> = rx
            .try_iter()
            .filter_map(|m| match m {
                Message::Retire { entry, reason } => {
                    assert_eq!(reason, DismissReason::Cancelled);
                    Some(entry.id)
                }
                _ => None,
            })
            .collect();
        assert_eq!(retired, vec![a.id()]);
    }

    #[test]
    fn dismiss_of_queued_card_cancels_it() {
        let (presenter, _rx) = presenter();
        let a = presenter.present(Card::new());
        assert!(a.dismiss());
        assert_eq!(presenter.pending_len(), 0);
        assert!(!presenter.dismiss_current());
    }

    #[test]
    fn dismiss_of_slot_card_posts_request() {
        let (presenter, rx) = presenter();
        let a = presenter.present(Card::new());
        {
            let mut shared = lock(&presenter.state);
            shared.queue.clear();
            shared.slot = Some(a.id());
        }
        assert!(a.is_presenting());
        assert!(!a.cancel());
        assert!(presenter.dismiss_current());
        let dismissed = rx.try_iter().any(|m| {
            matches!(m, Message::Dismiss { id, reason: DismissReason::Programmatic } if id == a.id())
        });
        assert!(dismissed);
    }

    #[test]
    fn cancel_all_counts() {
        let (presenter, _rx) = presenter();
        for _ in 0..4 {
            presenter.present(Card::new());
        }
        assert_eq!(presenter.cancel_all(), 4);
        assert_eq!(presenter.cancel_all(), 0);
    }

    #[test]
    fn present_after_loop_dropped_does_not_panic() {
        let (presenter, rx) = presenter();
        drop(rx);
        let ticket = presenter.present(Card::new());
        assert!(ticket.is_queued());
    }

    #[test]
    fn controls_survive_the_move() {
        let (presenter, _rx) = presenter();
        let mut card = Card::new();
        card.add_action(overcard_widgets::ActionConfig::new("OK"));
        let ticket = presenter.present(card);
        ticket.set_enabled(0, false);
        assert_eq!(ticket.controls().is_enabled(0), Some(false));
        assert!(ticket.try_set_enabled(1, true).is_err());
    }

    #[test]
    fn ticket_controls_cover_components_added_after_an_early_handle() {
        let (presenter, _rx) = presenter();
        let mut card = Card::new();
        card.add_action(overcard_widgets::ActionConfig::new("Back"));
        let early = card.controls();
        card.add_action(overcard_widgets::ActionConfig::new("Next"));
        let ticket = presenter.present(card);

        assert_eq!(early.action_count(), 1);
        assert_eq!(ticket.controls().action_count(), 2);
        ticket.controls().set_enabled(0, false);
        assert_eq!(early.is_enabled(0), Some(false));
    }
}
