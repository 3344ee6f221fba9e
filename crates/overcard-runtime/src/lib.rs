#![forbid(unsafe_code)]

//! Presentation runtime for Overcard.
//!
//! # Role in Overcard
//! `overcard-runtime` serializes card presentation. A [`Presenter`] handle
//! may be cloned into any thread; the [`PresentationLoop`] it came from runs
//! on the UI thread and is the only place that touches the [`Surface`].
//!
//! # How it fits in the system
//! Cards are built with `overcard-widgets`, queued through a [`Presenter`],
//! and walked through [`CardPhase`]s by the loop. Hosts implement
//! [`Surface`] to draw; tests use `overcard-harness`.
//!
//! ```ignore
//! let mut ui = PresentationLoop::new(my_surface, PresenterConfig::from_env());
//! let presenter = ui.presenter();
//!
//! let mut card = Card::new();
//! card.add_text("Saved").add_action(ActionConfig::new("OK"));
//! card.present(&presenter);
//!
//! // once per frame, on the UI thread
//! ui.run_pending();
//! ```

pub mod binding;
pub mod config;
pub mod lifecycle;
pub mod presentation;
pub mod scheduler;
pub mod surface;

pub use binding::PresentationBinding;
pub use config::{BackdropConfig, PresenterConfig};
pub use lifecycle::{AnimationPhase, CardId, CardLifecycle, CardPhase, LifecycleError};
pub use presentation::PresentationLoop;
pub use scheduler::{PresentExt, PresentedCard, Presenter};
pub use surface::{Attachment, CardFrame, Surface, SurfaceError};
pub use web_time::Instant;
