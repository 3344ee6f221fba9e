#![forbid(unsafe_code)]

//! Overcard public facade crate.
//!
//! Re-exports the types most hosts need from the member crates and offers a
//! prelude for building and presenting cards.
//!
//! ```ignore
//! use overcard::prelude::*;
//!
//! let mut ui = PresentationLoop::new(my_surface, PresenterConfig::from_env());
//! let presenter = ui.presenter();
//!
//! let mut card = Card::new();
//! card.add_text("Delete 3 photos?")
//!     .add_action(ActionConfig::new("Delete").style(ActionStyle::Filled(Rgba::DESTRUCTIVE)))
//!     .add_action(ActionConfig::new("Keep").style(ActionStyle::Clear(Rgba::ACCENT)))
//!     .on_complete(|reason| tracing::info!(?reason, "confirm closed"));
//! card.present(&presenter);
//!
//! ui.run_pending();
//! ```

// --- Core re-exports -------------------------------------------------------

pub use overcard_core::{
    AnimationConfig, Easing, FontSpec, FontTraits, FontWeight, Insets, Observable, Rgba, Size,
    Subscription, TextAlignment,
};

// --- Widget re-exports -----------------------------------------------------

pub use overcard_widgets::{
    ActionConfig, ActionStyle, Card, CardControls, CardError, CardStyle, ContentMode,
    DismissReason, DisplayUnit, IconResolver, ImageConfig, NamedAssets, RenderedCard,
    RenderingMode, Text, TextInputConfig, TextLine, WidthPolicy,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use overcard_runtime::{
    Attachment, BackdropConfig, CardFrame, CardId, CardPhase, LifecycleError, PresentExt,
    PresentationBinding, PresentationLoop, PresentedCard, Presenter, PresenterConfig, Surface,
    SurfaceError,
};

// --- Errors ---------------------------------------------------------------

/// Any error an Overcard API can return.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Card(#[from] CardError),
    #[cfg(feature = "runtime")]
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[cfg(feature = "runtime")]
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Standard result type for Overcard APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActionConfig, ActionStyle, Card, CardStyle, ContentMode, DismissReason, Error,
        ImageConfig, Observable, Result, Rgba, Text, TextInputConfig, TextLine, WidthPolicy,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{
        PresentExt, PresentationBinding, PresentationLoop, PresentedCard, Presenter,
        PresenterConfig, Surface,
    };

    pub use crate::{core, widgets};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use overcard_core as core;
#[cfg(feature = "runtime")]
pub use overcard_runtime as runtime;
pub use overcard_widgets as widgets;

#[cfg(all(test, feature = "runtime"))]
mod tests {
    use super::prelude::*;
    use overcard_harness::instant_loop;
    use std::sync::{Arc, Mutex};

    #[test]
    fn prelude_builds_and_presents_a_card() {
        let (mut ui, presenter, surface) = instant_loop();
        let reasons = Arc::new(Mutex::new(Vec::new()));
        let r = Arc::clone(&reasons);

        let mut card = Card::new();
        card.add_text("Saved")
            .add_action(ActionConfig::new("OK"))
            .on_complete(move |reason| r.lock().unwrap().push(reason));
        card.present(&presenter);
        ui.run_pending();

        assert!(surface.tap_action(0));
        ui.run_pending();
        assert_eq!(*reasons.lock().unwrap(), [DismissReason::Action { index: 0 }]);
    }

    #[test]
    fn member_errors_convert() {
        let err: Error = crate::CardError::ActionOutOfRange { index: 2, count: 1 }.into();
        assert!(err.to_string().contains("action index 2"));
        let err: Error = crate::SurfaceError::Unavailable.into();
        assert!(matches!(err, Error::Surface(_)));
    }
}
