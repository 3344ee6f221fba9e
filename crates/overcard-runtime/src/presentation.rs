#![forbid(unsafe_code)]

//! The UI-thread side of presentation.
//!
//! A [`PresentationLoop`] owns the [`Surface`] and the card on screen. The
//! host pumps it once per frame with [`run_pending`](PresentationLoop::run_pending)
//! (or [`run_pending_at`](PresentationLoop::run_pending_at) with an explicit
//! clock). Each pump:
//!
//! 1. handles every posted message (wake-ups, dismiss requests, cancelled
//!    cards);
//! 2. advances the on-screen animation and pushes one [`CardFrame`];
//! 3. if the slot is free, pulls queued cards until one attaches.
//!
//! # Invariants
//!
//! 1. Only this loop fills and frees the slot.
//! 2. Draining is a loop, not recursion: a backlog of failing attaches
//!    cannot grow the stack.
//! 3. Teardown order at `Done`: detach, close the interaction gate and drop
//!    views and subscriptions, run card callbacks, free the slot.
//!
//! # Failure Modes
//!
//! - Attach failure: logged at `warn`; the card finishes with
//!   [`DismissReason::AttachFailed`] and the next card is tried.
//! - Dismiss requests for a card that is already leaving, or no longer on
//!   screen, are ignored.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use overcard_core::animation::progress;
use overcard_widgets::{
    Card, DismissReason, DismissRequest, IconResolver, InteractionGate, RenderContext,
    RenderedCard,
};
use web_time::Instant;

use crate::config::PresenterConfig;
use crate::lifecycle::{AnimationPhase, CardId, CardLifecycle, CardPhase};
use crate::scheduler::{Message, Presenter, QueuedCard, Shared, lock};
use crate::surface::{Attachment, CardFrame, Surface};

/// The card holding the slot.
struct ActiveCard {
    id: CardId,
    label: Option<String>,
    card: Card,
    lifecycle: CardLifecycle,
    rendered: RenderedCard,
    animation: AnimationPhase,
    phase_started: Instant,
    frame: CardFrame,
    exit_from: CardFrame,
    reason: Option<DismissReason>,
}

/// Drives presentation on the UI thread.
pub struct PresentationLoop<S> {
    surface: S,
    config: PresenterConfig,
    icons: Arc<IconResolver>,
    state: Arc<Mutex<Shared>>,
    tx: Sender<Message>,
    rx: Receiver<Message>,
    active: Option<ActiveCard>,
}

impl<S> fmt::Debug for PresentationLoop<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationLoop")
            .field("config", &self.config)
            .field("active", &self.active.as_ref().map(|a| (a.id, a.lifecycle.phase())))
            .finish_non_exhaustive()
    }
}

impl<S: Surface> PresentationLoop<S> {
    pub fn new(surface: S, config: PresenterConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            surface,
            config,
            icons: Arc::new(IconResolver::default()),
            state: Arc::default(),
            tx,
            rx,
            active: None,
        }
    }

    /// Resolve image and icon names with `icons`.
    #[must_use]
    pub fn with_icons(mut self, icons: IconResolver) -> Self {
        self.icons = Arc::new(icons);
        self
    }

    /// A new handle to this loop's queue.
    #[must_use]
    pub fn presenter(&self) -> Presenter {
        Presenter::from_parts(Arc::clone(&self.state), self.tx.clone())
    }

    #[must_use]
    pub fn config(&self) -> &PresenterConfig {
        &self.config
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The card on screen.
    #[must_use]
    pub fn active_card(&self) -> Option<CardId> {
        self.active.as_ref().map(|active| active.id)
    }

    #[must_use]
    pub fn active_phase(&self) -> Option<CardPhase> {
        self.active.as_ref().map(|active| active.lifecycle.phase())
    }

    #[must_use]
    pub fn animation_phase(&self) -> Option<AnimationPhase> {
        self.active.as_ref().map(|active| active.animation)
    }

    /// Last frame pushed to the surface.
    #[must_use]
    pub fn current_frame(&self) -> Option<CardFrame> {
        self.active.as_ref().map(|active| active.frame)
    }

    /// Whether an entrance or exit is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation_phase()
            .is_some_and(|phase| phase != AnimationPhase::Settled)
    }

    /// Pump once using the current time. Returns [`is_animating`](Self::is_animating).
    pub fn run_pending(&mut self) -> bool {
        self.run_pending_at(Instant::now())
    }

    /// Pump once as of `now`. Returns [`is_animating`](Self::is_animating).
    pub fn run_pending_at(&mut self, now: Instant) -> bool {
        while let Ok(message) = self.rx.try_recv() {
            self.handle(message, now);
        }
        self.tick(now);
        self.drain(now);
        self.is_animating()
    }

    /// Finish everything immediately: the active card without an exit
    /// animation, queued cards as cancelled.
    pub fn shutdown(&mut self) {
        let drained: Vec<QueuedCard> = lock(&self.state).queue.drain(..).collect();
        if let Some(active) = self.active.as_mut()
            && active.lifecycle.phase() == CardPhase::Presenting
        {
            if let Err(err) = active.lifecycle.advance(CardPhase::Dismissing) {
                tracing::warn!(%err, "shutdown could not dismiss active card");
            }
            active.reason = Some(DismissReason::Programmatic);
        }
        if self.active.is_some() {
            self.finish_active();
        }
        while let Ok(message) = self.rx.try_recv() {
            if let Message::Retire { entry, reason } = message {
                self.retire(entry, reason);
            }
        }
        for entry in drained {
            self.retire(entry, DismissReason::Cancelled);
        }
        tracing::debug!("presentation loop shut down");
    }

    fn handle(&mut self, message: Message, now: Instant) {
        match message {
            Message::Wake => {}
            Message::Dismiss { id, reason } => self.begin_dismiss(id, reason, now),
            Message::Retire { entry, reason } => self.retire(entry, reason),
        }
    }

    fn begin_dismiss(&mut self, id: CardId, reason: DismissReason, now: Instant) {
        let Some(active) = self.active.as_mut().filter(|active| active.id == id) else {
            tracing::debug!(card_id = %id, ?reason, "dismiss for card not on screen ignored");
            return;
        };
        if active.lifecycle.phase() != CardPhase::Presenting {
            tracing::trace!(card_id = %id, ?reason, "already dismissing");
            return;
        }
        if let Err(err) = active.lifecycle.advance(CardPhase::Dismissing) {
            tracing::warn!(%err, "dismiss rejected");
            return;
        }
        tracing::debug!(card_id = %id, label = ?active.label, ?reason, "card dismissing");
        active.reason = Some(reason);
        active.animation = AnimationPhase::Exiting;
        active.phase_started = now;
        active.exit_from = active.frame;
    }

    fn tick(&mut self, now: Instant) {
        let animation = self.config.animation;
        let backdrop = self.config.backdrop.opacity;
        let Some(active) = self.active.as_mut() else {
            return;
        };

        let finished = match active.animation {
            AnimationPhase::Settled => return,
            AnimationPhase::Entering => {
                let t = progress(active.phase_started, now, animation.effective_entrance());
                if t >= 1.0 {
                    active.frame = CardFrame::settled(backdrop);
                    active.animation = AnimationPhase::Settled;
                } else {
                    let eased = animation.entrance_easing.apply(t) as f32;
                    let from = animation.entrance_scale_from;
                    active.frame = CardFrame {
                        backdrop_opacity: backdrop * t as f32,
                        scale: from + (1.0 - from) * eased,
                        opacity: eased.clamp(0.0, 1.0),
                    };
                }
                false
            }
            AnimationPhase::Exiting => {
                let t = progress(active.phase_started, now, animation.effective_exit());
                let keep = 1.0 - animation.exit_easing.apply(t) as f32;
                let from = active.exit_from;
                active.frame = CardFrame {
                    backdrop_opacity: from.backdrop_opacity * keep,
                    scale: from.scale,
                    opacity: from.opacity * keep,
                };
                t >= 1.0
            }
        };

        tracing::trace!(card_id = %active.id, frame = ?active.frame, "frame");
        self.surface.update(active.id, active.frame);
        if finished {
            self.finish_active();
        }
    }

    fn drain(&mut self, now: Instant) {
        loop {
            let entry = {
                let mut shared = lock(&self.state);
                if shared.slot.is_some() {
                    return;
                }
                let Some(entry) = shared.queue.pop_front() else {
                    return;
                };
                shared.slot = Some(entry.id);
                entry
            };
            if self.begin(entry, now) {
                return;
            }
        }
    }

    /// Attach and start the entrance. Returns `false` if the surface refused
    /// the card, in which case it is already finished and the slot freed.
    fn begin(&mut self, entry: QueuedCard, now: Instant) -> bool {
        let QueuedCard {
            id,
            card,
            mut lifecycle,
        } = entry;
        let label = card.debug_label().map(str::to_owned);

        let ctx = RenderContext::new(Arc::clone(&self.icons), InteractionGate::open());
        let tx = self.tx.clone();
        let request = DismissRequest::new(move |reason| {
            if tx.send(Message::Dismiss { id, reason }).is_err() {
                tracing::debug!(card_id = %id, "presentation loop is gone; dismiss dropped");
            }
        });
        let mut rendered = card.render(&ctx, request);

        let attached = self.surface.attach(Attachment {
            id,
            label: label.as_deref(),
            card: &mut rendered,
            backdrop: &self.config.backdrop,
        });
        if let Err(err) = attached {
            tracing::warn!(card_id = %id, ?label, %err, "attach failed; skipping card");
            rendered.release();
            drop(rendered);
            if let Err(err) = lifecycle.finish(DismissReason::AttachFailed) {
                tracing::warn!(%err, "lifecycle out of step");
            }
            card.complete(DismissReason::AttachFailed);
            self.free_slot(id);
            return false;
        }

        if let Err(err) = lifecycle.advance(CardPhase::Presenting) {
            tracing::warn!(%err, "lifecycle out of step");
        }
        tracing::debug!(card_id = %id, ?label, "card presenting");
        let hidden = CardFrame::hidden(self.config.animation.entrance_scale_from);
        self.active = Some(ActiveCard {
            id,
            label,
            card,
            lifecycle,
            rendered,
            animation: AnimationPhase::Entering,
            phase_started: now,
            frame: hidden,
            exit_from: hidden,
            reason: None,
        });
        self.tick(now);
        true
    }

    fn finish_active(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        let ActiveCard {
            id,
            label,
            card,
            mut lifecycle,
            mut rendered,
            reason,
            ..
        } = active;
        let reason = reason.unwrap_or(DismissReason::Programmatic);
        if let Err(err) = lifecycle.finish(reason) {
            tracing::warn!(%err, "lifecycle out of step");
        }

        self.surface.detach(id);
        rendered.release();
        drop(rendered);
        card.complete(reason);
        self.free_slot(id);
        tracing::debug!(card_id = %id, ?label, ?reason, "card finished");
    }

    /// Finish a card that never reached the screen.
    fn retire(&mut self, entry: QueuedCard, reason: DismissReason) {
        let QueuedCard {
            id,
            card,
            mut lifecycle,
        } = entry;
        if let Err(err) = lifecycle.finish(reason) {
            tracing::warn!(%err, "lifecycle out of step");
        }
        tracing::debug!(card_id = %id, label = ?card.debug_label(), ?reason, "card retired");
        card.complete(reason);
    }

    fn free_slot(&self, id: CardId) {
        let mut shared = lock(&self.state);
        if shared.slot == Some(id) {
            shared.slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceError;
    use overcard_core::AnimationConfig;
    use overcard_widgets::ActionConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use web_time::Duration;

    /// Counts calls; refuses the first `refuse` attaches.
    #[derive(Default)]
    struct CountingSurface {
        refuse: usize,
        attached: Vec<CardId>,
        frames: Vec<CardFrame>,
        detached: Vec<CardId>,
    }

    impl Surface for CountingSurface {
        fn attach(&mut self, attachment: Attachment<'_>) -> Result<(), SurfaceError> {
            if self.refuse > 0 {
                self.refuse -= 1;
                return Err(SurfaceError::Unavailable);
            }
            self.attached.push(attachment.id);
            Ok(())
        }

        fn update(&mut self, _id: CardId, frame: CardFrame) {
            self.frames.push(frame);
        }

        fn detach(&mut self, id: CardId) {
            self.detached.push(id);
        }
    }

    fn instant_loop() -> PresentationLoop<CountingSurface> {
        PresentationLoop::new(
            CountingSurface::default(),
            PresenterConfig::default().animation(AnimationConfig::none()),
        )
    }

    fn counted(hits: &Arc<AtomicUsize>) -> Card {
        let hits = Arc::clone(hits);
        let mut card = Card::new();
        card.on_complete(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        card
    }

    #[test]
    fn single_pump_presents_and_settles() {
        let mut ui = instant_loop();
        let presenter = ui.presenter();
        let ticket = presenter.present(Card::new());
        assert!(!ui.run_pending());
        assert_eq!(ui.active_card(), Some(ticket.id()));
        assert_eq!(ui.animation_phase(), Some(AnimationPhase::Settled));
        assert_eq!(ui.current_frame(), Some(CardFrame::settled(0.4)));
        assert_eq!(presenter.current(), Some(ticket.id()));
    }

    #[test]
    fn dismiss_finishes_and_advances() {
        let mut ui = instant_loop();
        let presenter = ui.presenter();
        let hits = Arc::new(AtomicUsize::new(0));
        let a = presenter.present(counted(&hits));
        let b = presenter.present(Card::new());
        ui.run_pending();

        assert!(a.dismiss());
        assert!(a.dismiss());
        ui.run_pending();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(ui.surface().detached, vec![a.id()]);
        assert_eq!(ui.active_card(), Some(b.id()));
    }

    #[test]
    fn attach_failures_are_skipped_iteratively() {
        let mut ui = instant_loop();
        ui.surface_mut().refuse = 500;
        let presenter = ui.presenter();
        let hits = Arc::new(AtomicUsize::new(0));
        for _ in 0..500 {
            presenter.present(counted(&hits));
        }
        let last = presenter.present(Card::new());
        ui.run_pending();
        assert_eq!(hits.load(Ordering::SeqCst), 500);
        assert_eq!(ui.active_card(), Some(last.id()));
        assert_eq!(presenter.pending_len(), 0);
    }

    #[test]
    fn entrance_interpolates_then_settles() {
        let config = PresenterConfig::default().animation(
            AnimationConfig::default()
                .entrance_duration(Duration::from_millis(100))
                .exit_duration(Duration::from_millis(100)),
        );
        let mut ui = PresentationLoop::new(CountingSurface::default(), config);
        let presenter = ui.presenter();
        let ticket = presenter.present(Card::new());

        let start = Instant::now();
        assert!(ui.run_pending_at(start));
        let first = ui.current_frame().unwrap();
        assert_eq!(first.opacity, 0.0);
        assert!((first.scale - config.animation.entrance_scale_from).abs() < 1e-6);

        assert!(ui.run_pending_at(start + Duration::from_millis(50)));
        let mid = ui.current_frame().unwrap();
        assert!(mid.opacity > 0.0);
        assert!(mid.backdrop_opacity > 0.0 && mid.backdrop_opacity < 0.4);

        assert!(!ui.run_pending_at(start + Duration::from_millis(100)));
        assert_eq!(ui.current_frame(), Some(CardFrame::settled(0.4)));

        ticket.dismiss();
        let exit_start = start + Duration::from_millis(200);
        ui.run_pending_at(exit_start);
        assert_eq!(ui.active_phase(), Some(CardPhase::Dismissing));
        ui.run_pending_at(exit_start + Duration::from_millis(100));
        assert_eq!(ui.active_card(), None);
    }

    #[test]
    fn dismiss_during_entrance_exits_from_current_frame() {
        let config = PresenterConfig::default().animation(
            AnimationConfig::default()
                .entrance_duration(Duration::from_millis(100))
                .exit_duration(Duration::from_millis(100)),
        );
        let mut ui = PresentationLoop::new(CountingSurface::default(), config);
        let presenter = ui.presenter();
        presenter.present(Card::new());

        let start = Instant::now();
        ui.run_pending_at(start);
        ui.run_pending_at(start + Duration::from_millis(40));
        let reached = ui.current_frame().unwrap();

        presenter.dismiss_current();
        ui.run_pending_at(start + Duration::from_millis(40));
        let exit_first = ui.current_frame().unwrap();
        assert_eq!(exit_first.scale, reached.scale);
        assert!(exit_first.opacity <= reached.opacity);
        assert_eq!(ui.animation_phase(), Some(AnimationPhase::Exiting));
    }

    #[test]
    fn action_tap_routes_through_loop() {
        let mut ui = instant_loop();
        let presenter = ui.presenter();
        let mut card = Card::new();
        card.add_action(ActionConfig::new("OK"));
        let ticket = presenter.present(card);
        ui.run_pending();

        let active = ui.active.as_ref().unwrap();
        assert!(active.rendered.action(0).unwrap().tap());
        ui.run_pending();
        assert_eq!(ui.active_card(), None);
        assert!(!ticket.is_presenting());
    }

    #[test]
    fn shutdown_finishes_everything() {
        let mut ui = PresentationLoop::new(CountingSurface::default(), PresenterConfig::default());
        let presenter = ui.presenter();
        let hits = Arc::new(AtomicUsize::new(0));
        presenter.present(counted(&hits));
        presenter.present(counted(&hits));
        presenter.present(counted(&hits));
        ui.run_pending();
        assert!(ui.is_animating());

        ui.shutdown();
        assert_eq!(hits.load(Ordering::SeqCst), 3);
        assert!(!presenter.is_presenting());
        assert_eq!(presenter.pending_len(), 0);
    }
}
