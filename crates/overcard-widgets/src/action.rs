#![forbid(unsafe_code)]

//! Action component: a tappable button.
//!
//! # Tap semantics
//!
//! A tap on an enabled action runs the user callback first, then asks for
//! the card to close if `can_dismiss_card` is set. Taps on a disabled action,
//! or after the card's interaction gate has closed, do nothing.
//!
//! The enabled flag is an [`Observable`] so the rendered view can follow it
//! live (and a linked text input can drive it) without re-rendering the card.

use std::fmt;
use std::sync::Arc;

use overcard_core::{FontSpec, Observable, Rgba};
use unicode_width::UnicodeWidthStr;

use crate::view::{ActionView, DisplayUnit, TapHandler};
use crate::{DismissRequest, Render, RenderContext};

/// Default button height in points.
pub const DEFAULT_ACTION_HEIGHT: f32 = 44.0;
/// Opacity of a disabled action.
pub const DISABLED_OPACITY: f32 = 0.5;
/// Horizontal padding on each side of a content-sized button.
pub const ACTION_HORIZONTAL_PADDING: f32 = 16.0;
/// Icon edge length inside a button.
pub const ACTION_ICON_SIZE: f32 = 20.0;
/// Gap between icon and title.
pub const ACTION_ICON_SPACING: f32 = 8.0;
/// Average glyph advance as a fraction of the font size, used to estimate
/// content width before the host measures.
const AVERAGE_ADVANCE: f32 = 0.6;

/// Callback invoked on tap.
pub type TapCallback = Arc<dyn Fn() + Send + Sync>;

/// Visual treatment of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionStyle {
    /// Solid background in the color, white title.
    Filled(Rgba),
    /// Border and title in the color.
    Outlined(Rgba),
    /// Title only, in the color.
    Clear(Rgba),
}

impl ActionStyle {
    #[must_use]
    pub const fn color(self) -> Rgba {
        match self {
            Self::Filled(c) | Self::Outlined(c) | Self::Clear(c) => c,
        }
    }
}

impl Default for ActionStyle {
    fn default() -> Self {
        Self::Filled(Rgba::ACCENT)
    }
}

/// How wide the button is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WidthPolicy {
    /// Exactly this many points.
    Fixed(f32),
    /// Sized to the title and icon.
    #[default]
    Dynamic,
}

/// Action configuration.
#[derive(Clone)]
pub struct ActionConfig {
    pub title: String,
    pub style: ActionStyle,
    pub width: WidthPolicy,
    pub height: f32,
    pub font: FontSpec,
    /// Logical icon name, resolved like an image.
    pub icon: Option<String>,
    /// Tapping closes the card. Default `true`.
    pub can_dismiss_card: bool,
    /// Initial enabled state. Default `true`.
    pub enabled: bool,
    pub on_tap: Option<TapCallback>,
}

impl fmt::Debug for ActionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionConfig")
            .field("title", &self.title)
            .field("style", &self.style)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("icon", &self.icon)
            .field("can_dismiss_card", &self.can_dismiss_card)
            .field("enabled", &self.enabled)
            .field("on_tap", &self.on_tap.is_some())
            .finish()
    }
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            style: ActionStyle::default(),
            width: WidthPolicy::default(),
            height: DEFAULT_ACTION_HEIGHT,
            font: FontSpec::headline(),
            icon: None,
            can_dismiss_card: true,
            enabled: true,
            on_tap: None,
        }
    }
}

impl ActionConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn style(mut self, style: ActionStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn width(mut self, width: WidthPolicy) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub fn font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn icon(mut self, name: impl Into<String>) -> Self {
        self.icon = Some(name.into());
        self
    }

    #[must_use]
    pub fn can_dismiss_card(mut self, dismiss: bool) -> Self {
        self.can_dismiss_card = dismiss;
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn on_tap(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_tap = Some(Arc::new(callback));
        self
    }

    /// Estimated content width: title, optional icon, and padding.
    #[must_use]
    pub fn content_width(&self) -> f32 {
        let title = self.title.width() as f32 * self.font.size * AVERAGE_ADVANCE;
        let icon = if self.icon.is_some() {
            ACTION_ICON_SIZE + ACTION_ICON_SPACING
        } else {
            0.0
        };
        title + icon + 2.0 * ACTION_HORIZONTAL_PADDING
    }
}

/// A tappable button.
#[derive(Debug, Clone)]
pub struct Action {
    config: ActionConfig,
    enabled: Observable<bool>,
}

impl Action {
    #[must_use]
    pub fn new(config: ActionConfig) -> Self {
        let enabled = Observable::new(config.enabled);
        Self { config, enabled }
    }

    #[must_use]
    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    /// Shared enabled cell.
    #[must_use]
    pub fn enabled_cell(&self) -> &Observable<bool> {
        &self.enabled
    }

    #[must_use]
    pub fn can_dismiss_card(&self) -> bool {
        self.config.can_dismiss_card
    }
}

impl Render for Action {
    fn render(&self, ctx: &RenderContext, request_dismiss: DismissRequest) -> DisplayUnit {
        let gate = ctx.gate().clone();
        let enabled = self.enabled.clone();
        let callback = self.config.on_tap.clone();
        let dismisses = self.config.can_dismiss_card;

        let on_tap: TapHandler = Arc::new(move || {
            if !gate.is_open() || !enabled.get() {
                return false;
            }
            if let Some(callback) = &callback {
                callback();
            }
            if dismisses {
                request_dismiss.request();
            }
            true
        });

        let width = match self.config.width {
            WidthPolicy::Fixed(points) => points,
            WidthPolicy::Dynamic => self.config.content_width(),
        };

        DisplayUnit::Action(ActionView::new(
            self.config.title.clone(),
            self.config.style,
            self.config.width,
            width,
            self.config.height,
            self.config.font,
            self.config.icon.as_deref().map(|name| ctx.icons().resolve(name)),
            self.enabled.clone(),
            ctx.gate().clone(),
            on_tap,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DismissReason;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        (hits, move || {
            h.fetch_add(1, Ordering::SeqCst);
        })
    }

    fn recording_request() -> (Arc<Mutex<Vec<DismissReason>>>, DismissRequest) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let request = DismissRequest::new(move |r| s.lock().unwrap().push(r))
            .with_reason(DismissReason::Action { index: 0 });
        (seen, request)
    }

    fn render_view(action: &Action, ctx: &RenderContext, request: DismissRequest) -> ActionView {
        match action.render(ctx, request) {
            DisplayUnit::Action(view) => view,
            other => panic!("expected action view, got {other:?}"),
        }
    }

    #[test]
    fn defaults() {
        let config = ActionConfig::new("OK");
        assert_eq!(config.height, DEFAULT_ACTION_HEIGHT);
        assert!(config.can_dismiss_card);
        assert!(config.enabled);
        assert_eq!(config.width, WidthPolicy::Dynamic);
    }

    #[test]
    fn tap_runs_callback_then_dismisses() {
        let (hits, cb) = counting();
        let (seen, request) = recording_request();
        let action = Action::new(ActionConfig::new("OK").on_tap(cb));
        let view = render_view(&action, &RenderContext::default(), request);

        assert!(view.tap());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock().unwrap(), vec![DismissReason::Action { index: 0 }]);
    }

    #[test]
    fn non_dismissing_tap_keeps_card() {
        let (hits, cb) = counting();
        let (seen, request) = recording_request();
        let action = Action::new(ActionConfig::new("Retry").can_dismiss_card(false).on_tap(cb));
        let view = render_view(&action, &RenderContext::default(), request);

        assert!(view.tap());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn disabled_tap_is_ignored() {
        let (hits, cb) = counting();
        let (seen, request) = recording_request();
        let action = Action::new(ActionConfig::new("Send").enabled(false).on_tap(cb));
        let view = render_view(&action, &RenderContext::default(), request);

        assert!(!view.tap());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(seen.lock().unwrap().is_empty());

        action.set_enabled(true);
        assert!(view.is_enabled());
        assert!(view.tap());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn closed_gate_blocks_tap() {
        let (hits, cb) = counting();
        let ctx = RenderContext::default();
        let action = Action::new(ActionConfig::new("OK").on_tap(cb));
        let view = render_view(&action, &ctx, DismissRequest::noop());

        ctx.gate().close();
        assert!(!view.tap());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn width_policies() {
        let fixed = Action::new(ActionConfig::new("OK").width(WidthPolicy::Fixed(120.0)));
        let view = render_view(&fixed, &RenderContext::default(), DismissRequest::noop());
        assert_eq!(view.width, 120.0);

        let short = ActionConfig::new("OK");
        let long = ActionConfig::new("Continue to checkout");
        assert!(long.content_width() > short.content_width());
        assert!(short.clone().icon("cart").content_width() > short.content_width());
    }

    #[test]
    fn icon_is_resolved() {
        let action = Action::new(ActionConfig::new("Buy").icon("cart"));
        let view = render_view(&action, &RenderContext::default(), DismissRequest::noop());
        assert!(view.icon.as_ref().is_some_and(|icon| icon.is_fallback()));
    }
}
