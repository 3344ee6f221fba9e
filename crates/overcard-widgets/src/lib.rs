#![forbid(unsafe_code)]

//! Components and the card builder for Overcard.
//!
//! A [`Card`] is an ordered list of [`Component`]s. Each component implements
//! [`Render`]: given a [`RenderContext`] and a [`DismissRequest`], it produces
//! a [`DisplayUnit`] the host surface can show. Components never dismiss a
//! card themselves; they only invoke the request they were handed, which
//! keeps the presenter the sole owner of lifecycle transitions.

pub mod action;
pub mod card;
pub mod component;
pub mod dismiss;
pub mod error;
pub mod icons;
pub mod image;
pub mod input;
pub mod text;
pub mod view;

pub use action::{Action, ActionConfig, ActionStyle, WidthPolicy};
pub use card::{Card, CardControls, CardStyle, RenderedCard};
pub use component::{Component, ComponentKind};
pub use dismiss::{DismissReason, DismissRequest, InteractionGate};
pub use error::CardError;
pub use icons::{AssetCatalog, IconResolver, ImageOrigin, NamedAssets, NoAssets, ResolvedImage};
pub use image::{ContentMode, Image, ImageConfig, RenderingMode};
pub use input::{TextInput, TextInputConfig};
pub use text::{Text, TextLine};
pub use view::{ActionView, DismissControl, DisplayUnit, ImageView, TextInputView, TextView};

use std::sync::Arc;

/// The capability every component implements.
pub trait Render {
    /// Produce a display unit. `request_dismiss` is the only way a component
    /// may ask for the card to close.
    fn render(&self, ctx: &RenderContext, request_dismiss: DismissRequest) -> DisplayUnit;
}

/// Shared inputs for rendering one card.
#[derive(Debug, Clone)]
pub struct RenderContext {
    icons: Arc<IconResolver>,
    gate: InteractionGate,
}

impl RenderContext {
    #[must_use]
    pub fn new(icons: Arc<IconResolver>, gate: InteractionGate) -> Self {
        Self { icons, gate }
    }

    #[must_use]
    pub fn icons(&self) -> &IconResolver {
        &self.icons
    }

    /// Gate every interaction handler must check before running.
    #[must_use]
    pub fn gate(&self) -> &InteractionGate {
        &self.gate
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new(Arc::new(IconResolver::default()), InteractionGate::open())
    }
}
