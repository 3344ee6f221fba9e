#![forbid(unsafe_code)]

//! Display units: what a rendered component hands to the host surface.
//!
//! Views are plain data plus interaction handlers. Every handler passes
//! through the card's [`InteractionGate`], so a view the host keeps around
//! after the card is done does nothing when poked.
//!
//! # Invariants
//!
//! 1. [`ActionView::opacity`] always reflects the action's current enabled
//!    flag; no re-render is needed.
//! 2. Handlers return `false` when they did nothing (gate closed, action
//!    disabled).

use std::fmt;
use std::sync::Arc;

use overcard_core::reactive::{Binding, bind_mapped};
use overcard_core::{FontSpec, Observable, Rgba, Size, Subscription};

use crate::action::{ActionStyle, DISABLED_OPACITY, WidthPolicy};
use crate::icons::ResolvedImage;
use crate::image::{ContentMode, RenderingMode};
use crate::text::TextLine;
use crate::{DismissReason, DismissRequest, InteractionGate};

/// Runs a tap. Returns whether anything happened.
pub type TapHandler = Arc<dyn Fn() -> bool + Send + Sync>;
/// Runs an edit with the new text. Returns whether it was accepted.
pub type EditHandler = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// One rendered component.
#[derive(Debug, Clone)]
pub enum DisplayUnit {
    Text(TextView),
    Image(ImageView),
    Action(ActionView),
    TextInput(TextInputView),
}

impl DisplayUnit {
    #[must_use]
    pub fn as_action(&self) -> Option<&ActionView> {
        match self {
            Self::Action(view) => Some(view),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text_input(&self) -> Option<&TextInputView> {
        match self {
            Self::TextInput(view) => Some(view),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextView {
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageView {
    pub image: ResolvedImage,
    pub size: Size,
    pub content_mode: ContentMode,
    pub rendering_mode: RenderingMode,
    pub tint: Option<Rgba>,
}

/// A rendered button.
#[derive(Clone)]
pub struct ActionView {
    pub title: String,
    pub style: ActionStyle,
    pub width_policy: WidthPolicy,
    /// Resolved width in points.
    pub width: f32,
    pub height: f32,
    pub font: FontSpec,
    pub icon: Option<ResolvedImage>,
    enabled: Observable<bool>,
    opacity: Binding<f32>,
    gate: InteractionGate,
    on_tap: TapHandler,
}

impl fmt::Debug for ActionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionView")
            .field("title", &self.title)
            .field("style", &self.style)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("icon", &self.icon)
            .field("enabled", &self.enabled.get())
            .finish_non_exhaustive()
    }
}

impl ActionView {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        title: String,
        style: ActionStyle,
        width_policy: WidthPolicy,
        width: f32,
        height: f32,
        font: FontSpec,
        icon: Option<ResolvedImage>,
        enabled: Observable<bool>,
        gate: InteractionGate,
        on_tap: TapHandler,
    ) -> Self {
        let opacity = bind_mapped(&enabled, |&on| if on { 1.0 } else { DISABLED_OPACITY });
        Self {
            title,
            style,
            width_policy,
            width,
            height,
            font,
            icon,
            enabled,
            opacity,
            gate,
            on_tap,
        }
    }

    /// Current enabled flag.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// `1.0` when enabled, [`DISABLED_OPACITY`] otherwise.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity.get()
    }

    /// Tap the button.
    pub fn tap(&self) -> bool {
        (self.on_tap)()
    }

    /// Call `callback` whenever the enabled flag changes, while the card is
    /// live.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_enabled_change(
        &self,
        callback: impl Fn(bool) + Send + Sync + 'static,
    ) -> Subscription {
        let gate = self.gate.clone();
        self.enabled.subscribe(move |&enabled| {
            if gate.is_open() {
                callback(enabled);
            }
        })
    }
}

/// A rendered text field.
#[derive(Clone)]
pub struct TextInputView {
    pub placeholder: String,
    pub subtitle: Option<String>,
    pub font: FontSpec,
    pub text_color: Rgba,
    pub placeholder_color: Rgba,
    pub border_color: Rgba,
    value: Observable<Option<String>>,
    on_edit: EditHandler,
}

impl fmt::Debug for TextInputView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInputView")
            .field("placeholder", &self.placeholder)
            .field("subtitle", &self.subtitle)
            .field("value", &self.value.get())
            .finish_non_exhaustive()
    }
}

impl TextInputView {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        placeholder: String,
        subtitle: Option<String>,
        font: FontSpec,
        text_color: Rgba,
        placeholder_color: Rgba,
        border_color: Rgba,
        value: Observable<Option<String>>,
        on_edit: EditHandler,
    ) -> Self {
        Self {
            placeholder,
            subtitle,
            font,
            text_color,
            placeholder_color,
            border_color,
            value,
            on_edit,
        }
    }

    /// Replace the field's text, as the user typing would.
    pub fn edit(&self, text: &str) -> bool {
        (self.on_edit)(text)
    }

    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.value.get()
    }

    /// `true` until the first edit.
    #[must_use]
    pub fn is_showing_placeholder(&self) -> bool {
        self.value.with(Option::is_none)
    }

    /// Text to draw: the value, or the placeholder before any edit.
    #[must_use]
    pub fn display_text(&self) -> String {
        self.value
            .get()
            .unwrap_or_else(|| self.placeholder.clone())
    }
}

/// A card-level control that only dismisses: the close affordance or the
/// backdrop.
#[derive(Debug, Clone)]
pub struct DismissControl {
    gate: InteractionGate,
    request: DismissRequest,
}

impl DismissControl {
    pub(crate) fn new(gate: InteractionGate, request: DismissRequest) -> Self {
        Self { gate, request }
    }

    /// Reason reported when tapped.
    #[must_use]
    pub fn reason(&self) -> DismissReason {
        self.request.reason()
    }

    pub fn tap(&self) -> bool {
        if !self.gate.is_open() {
            return false;
        }
        self.request.request();
        true
    }
}
