#![forbid(unsafe_code)]

//! A [`Surface`] that records what the presentation loop asks of it.
//!
//! The surface is a cheap clone over shared state: hand one clone to the
//! loop and keep another in the test to inspect events and poke the mounted
//! card's views.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use overcard_runtime::{Attachment, CardFrame, CardId, Surface, SurfaceError};
use overcard_widgets::{DismissControl, DisplayUnit};

/// One call into the surface, or one enabled-flag change it observed.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Attached {
        id: CardId,
        label: Option<String>,
        units: usize,
    },
    AttachRefused {
        id: CardId,
        label: Option<String>,
    },
    Frame {
        id: CardId,
        frame: CardFrame,
    },
    Detached {
        id: CardId,
    },
    EnabledChanged {
        id: CardId,
        action: usize,
        enabled: bool,
    },
}

/// Views of the card currently mounted.
#[derive(Debug, Clone)]
pub struct MountedCard {
    pub id: CardId,
    pub label: Option<String>,
    pub units: Vec<DisplayUnit>,
    pub affordance: Option<DismissControl>,
    pub backdrop: Option<DismissControl>,
}

#[derive(Debug, Default)]
struct State {
    events: Vec<SurfaceEvent>,
    mounted: Option<MountedCard>,
    refuse_next: usize,
    refuse_labels: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    state: Arc<Mutex<State>>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Refuse the next `count` attaches with [`SurfaceError::Unavailable`].
    pub fn refuse_next(&self, count: usize) {
        self.state().refuse_next = count;
    }

    /// Refuse every card carrying `label` with [`SurfaceError::Rejected`].
    pub fn refuse_label(&self, label: impl Into<String>) {
        self.state().refuse_labels.push(label.into());
    }

    #[must_use]
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.state().events.clone()
    }

    pub fn clear_events(&self) {
        self.state().events.clear();
    }

    /// Ids in attach order.
    #[must_use]
    pub fn attached(&self) -> Vec<CardId> {
        self.state()
            .events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Attached { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Labels in attach order; unlabelled cards show as `""`.
    #[must_use]
    pub fn attached_labels(&self) -> Vec<String> {
        self.state()
            .events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Attached { label, .. } => Some(label.clone().unwrap_or_default()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn detached(&self) -> Vec<CardId> {
        self.state()
            .events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Detached { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn frames_for(&self, card: CardId) -> Vec<CardFrame> {
        self.state()
            .events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Frame { id, frame } if *id == card => Some(*frame),
                _ => None,
            })
            .collect()
    }

    /// Largest number of cards mounted at the same time so far.
    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        let mut mounted = 0usize;
        let mut peak = 0usize;
        for event in &self.state().events {
            match event {
                SurfaceEvent::Attached { .. } => {
                    mounted += 1;
                    peak = peak.max(mounted);
                }
                SurfaceEvent::Detached { .. } => mounted = mounted.saturating_sub(1),
                _ => {}
            }
        }
        peak
    }

    #[must_use]
    pub fn mounted(&self) -> Option<MountedCard> {
        self.state().mounted.clone()
    }

    /// Tap action `index` of the mounted card.
    pub fn tap_action(&self, index: usize) -> bool {
        let view = self.mounted().and_then(|card| {
            card.units
                .iter()
                .filter_map(DisplayUnit::as_action)
                .nth(index)
                .cloned()
        });
        // Lock released before the tap so the handler may call back in.
        view.is_some_and(|view| view.tap())
    }

    /// Edit text input `index` of the mounted card.
    pub fn edit_input(&self, index: usize, text: &str) -> bool {
        let view = self.mounted().and_then(|card| {
            card.units
                .iter()
                .filter_map(DisplayUnit::as_text_input)
                .nth(index)
                .cloned()
        });
        view.is_some_and(|view| view.edit(text))
    }

    pub fn tap_affordance(&self) -> bool {
        self.mounted()
            .and_then(|card| card.affordance)
            .is_some_and(|control| control.tap())
    }

    pub fn tap_backdrop(&self) -> bool {
        self.mounted()
            .and_then(|card| card.backdrop)
            .is_some_and(|control| control.tap())
    }
}

impl Surface for RecordingSurface {
    fn attach(&mut self, attachment: Attachment<'_>) -> Result<(), SurfaceError> {
        let Attachment {
            id, label, card, ..
        } = attachment;
        let label = label.map(str::to_owned);

        {
            let mut state = self.state();
            let refused = if state.refuse_next > 0 {
                state.refuse_next -= 1;
                Some(SurfaceError::Unavailable)
            } else if label
                .as_ref()
                .is_some_and(|l| state.refuse_labels.contains(l))
            {
                Some(SurfaceError::Rejected(format!("label {label:?} refused")))
            } else {
                None
            };
            if let Some(err) = refused {
                state.events.push(SurfaceEvent::AttachRefused { id, label });
                return Err(err);
            }
        }

        let actions = card.units().iter().filter_map(DisplayUnit::as_action).count();
        for action in 0..actions {
            let state = Arc::clone(&self.state);
            let watched = card.watch_action_enabled(action, move |enabled| {
                state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .events
                    .push(SurfaceEvent::EnabledChanged { id, action, enabled });
            });
            if let Err(err) = watched {
                tracing::warn!(%err, "could not watch action");
            }
        }

        let mut state = self.state();
        state.events.push(SurfaceEvent::Attached {
            id,
            label: label.clone(),
            units: card.units().len(),
        });
        state.mounted = Some(MountedCard {
            id,
            label,
            units: card.units().to_vec(),
            affordance: card.affordance().cloned(),
            backdrop: card.backdrop().cloned(),
        });
        Ok(())
    }

    fn update(&mut self, id: CardId, frame: CardFrame) {
        self.state().events.push(SurfaceEvent::Frame { id, frame });
    }

    fn detach(&mut self, id: CardId) {
        let mut state = self.state();
        state.events.push(SurfaceEvent::Detached { id });
        if state.mounted.as_ref().is_some_and(|card| card.id == id) {
            state.mounted = None;
        }
    }
}
