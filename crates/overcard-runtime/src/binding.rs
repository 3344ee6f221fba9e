#![forbid(unsafe_code)]

//! Declarative presentation driven by an `Observable<bool>`.
//!
//! The flag and the card stay in sync in both directions:
//!
//! - `false -> true`: a card is built with the factory and presented.
//! - the bound card reaches `Done`: the flag is set back to `false`. A card
//!   that was already replaced by a newer one leaves the flag alone.
//! - `true -> false` set by the host: the presented card is dismissed (or
//!   cancelled, if it is still queued).
//!
//! A flag that is already `true` when the binding is created presents
//! immediately. Dropping the binding stops watching the flag; a card already
//! presented runs to completion.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use overcard_core::{Observable, Subscription};
use overcard_widgets::Card;

use crate::lifecycle::CardId;
use crate::scheduler::{Presenter, lock};

/// Keeps a flag and a presented card in sync.
pub struct PresentationBinding {
    flag: Observable<bool>,
    current: Arc<Mutex<Option<CardId>>>,
    presented: Arc<AtomicUsize>,
    _subscription: Subscription,
}

impl fmt::Debug for PresentationBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationBinding")
            .field("flag", &self.flag.get())
            .field("current", &self.current())
            .field("presented", &self.presented_count())
            .finish()
    }
}

impl PresentationBinding {
    pub fn new(
        flag: &Observable<bool>,
        presenter: &Presenter,
        factory: impl Fn() -> Card + Send + Sync + 'static,
    ) -> Self {
        let current: Arc<Mutex<Option<CardId>>> = Arc::default();
        let presented = Arc::new(AtomicUsize::new(0));

        let show = {
            let flag = flag.clone();
            let presenter = presenter.clone();
            let current = Arc::clone(&current);
            let presented = Arc::clone(&presented);
            Arc::new(move || {
                let mut card = factory();
                let own: Arc<OnceLock<CardId>> = Arc::default();
                let reset = flag.clone();
                let slot = Arc::clone(&current);
                let mine = Arc::clone(&own);
                card.on_done(move |_| {
                    let mut bound = lock(&slot);
                    if mine.get().is_none_or(|id| *bound != Some(*id)) {
                        tracing::trace!(card_id = ?mine.get(), "superseded bound card finished");
                        return;
                    }
                    *bound = None;
                    drop(bound);
                    reset.set(false);
                });
                // Held across `present` so the hook, which takes the same
                // lock, cannot run before the id is recorded.
                let mut bound = lock(&current);
                let ticket = presenter.present(card);
                let _ = own.set(ticket.id());
                *bound = Some(ticket.id());
                drop(bound);
                presented.fetch_add(1, Ordering::Relaxed);
            })
        };

        let subscription = {
            let show = Arc::clone(&show);
            let presenter = presenter.clone();
            let current = Arc::clone(&current);
            flag.subscribe(move |&visible| {
                if visible {
                    show();
                    return;
                }
                let presented = lock(&current).take();
                if let Some(id) = presented {
                    tracing::debug!(card_id = %id, "binding flag cleared; dismissing");
                    presenter.dismiss(id);
                }
            })
        };

        if flag.get() {
            show();
        }

        Self {
            flag: flag.clone(),
            current,
            presented,
            _subscription: subscription,
        }
    }

    #[must_use]
    pub fn flag(&self) -> &Observable<bool> {
        &self.flag
    }

    /// The card this binding presented and that has not finished yet.
    #[must_use]
    pub fn current(&self) -> Option<CardId> {
        *lock(&self.current)
    }

    /// Cards presented over the binding's life.
    #[must_use]
    pub fn presented_count(&self) -> usize {
        self.presented.load(Ordering::Relaxed)
    }
}
