#![forbid(unsafe_code)]

//! The host display attachment.

use overcard_widgets::RenderedCard;

use crate::config::BackdropConfig;
use crate::lifecycle::CardId;

/// Why a surface refused a card.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// No window or screen to attach to.
    #[error("no surface available")]
    Unavailable,
    #[error("surface rejected card: {0}")]
    Rejected(String),
}

/// Everything a surface needs to mount a card.
#[derive(Debug)]
pub struct Attachment<'a> {
    pub id: CardId,
    pub label: Option<&'a str>,
    /// Mutable so the surface can register watches that live until detach.
    pub card: &'a mut RenderedCard,
    pub backdrop: &'a BackdropConfig,
}

/// One animation frame for the mounted card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardFrame {
    /// Backdrop opacity, `0.0..=backdrop.opacity`.
    pub backdrop_opacity: f32,
    pub scale: f32,
    pub opacity: f32,
}

impl CardFrame {
    /// Fully shown.
    #[must_use]
    pub const fn settled(backdrop_opacity: f32) -> Self {
        Self {
            backdrop_opacity,
            scale: 1.0,
            opacity: 1.0,
        }
    }

    /// Fully hidden at `scale`.
    #[must_use]
    pub const fn hidden(scale: f32) -> Self {
        Self {
            backdrop_opacity: 0.0,
            scale,
            opacity: 0.0,
        }
    }
}

/// Where cards are shown. Driven only from the presentation loop.
pub trait Surface {
    /// Mount the card above all other content and show the backdrop.
    fn attach(&mut self, attachment: Attachment<'_>) -> Result<(), SurfaceError>;

    /// Apply one animation frame.
    fn update(&mut self, id: CardId, frame: CardFrame);

    /// Remove the card and its backdrop.
    fn detach(&mut self, id: CardId);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn attach(&mut self, attachment: Attachment<'_>) -> Result<(), SurfaceError> {
        (**self).attach(attachment)
    }

    fn update(&mut self, id: CardId, frame: CardFrame) {
        (**self).update(id, frame);
    }

    fn detach(&mut self, id: CardId) {
        (**self).detach(id);
    }
}
