#![forbid(unsafe_code)]

//! The card builder and linker.
//!
//! A [`Card`] collects components in add order, wires text inputs to
//! actions, and records what should happen when the card is finished. It is
//! rendered once, by the presentation loop, into a [`RenderedCard`].
//!
//! # Invariants
//!
//! 1. Components render in insertion order and are never reordered.
//! 2. Action and text input indices count only their own variant, in add
//!    order.
//! 3. [`Card::complete`] consumes the card, so the affordance callback,
//!    completion callbacks, and done hooks fire at most once.
//!
//! # Failure Modes
//!
//! Out-of-range indices and invalid image sizes are logged at `warn` and
//! ignored by the chainable methods. Each has a `try_` variant returning
//! [`CardError`].

use std::fmt;

use overcard_core::{BindingScope, Insets, Observable, Rgba, Subscription};

use crate::action::{Action, ActionConfig};
use crate::component::Component;
use crate::dismiss::{DismissReason, DismissRequest};
use crate::error::CardError;
use crate::image::{Image, ImageConfig};
use crate::input::{TextInput, TextInputConfig};
use crate::text::Text;
use crate::view::{ActionView, DismissControl, DisplayUnit, TextInputView};
use crate::{Render, RenderContext};

type Completion = Box<dyn FnOnce(DismissReason) + Send>;
type AffordanceCallback = Box<dyn FnOnce() + Send>;

/// Visual container settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardStyle {
    pub background: Rgba,
    pub corner_radius: f32,
    /// Vertical gap between components.
    pub spacing: f32,
    pub padding: Insets,
    pub max_width: f32,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            corner_radius: 16.0,
            spacing: 12.0,
            padding: Insets::all(20.0),
            max_width: 320.0,
        }
    }
}

impl CardStyle {
    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }

    #[must_use]
    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    #[must_use]
    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    #[must_use]
    pub fn padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn max_width(mut self, width: f32) -> Self {
        self.max_width = width;
        self
    }
}

/// A modal card under construction.
#[derive(Default)]
pub struct Card {
    components: Vec<Component>,
    show_dismiss_affordance: bool,
    affordance_callback: Option<AffordanceCallback>,
    completions: Vec<Completion>,
    done_hooks: Vec<Completion>,
    dismiss_on_backdrop_tap: bool,
    style: CardStyle,
    label: Option<String>,
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("label", &self.label)
            .field("components", &self.components)
            .field("show_dismiss_affordance", &self.show_dismiss_affordance)
            .field("dismiss_on_backdrop_tap", &self.dismiss_on_backdrop_tap)
            .field("completions", &self.completions.len())
            .field("done_hooks", &self.done_hooks.len())
            .finish_non_exhaustive()
    }
}

impl Card {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- building ---

    pub fn add_text(&mut self, text: impl Into<Text>) -> &mut Self {
        self.components.push(Component::Text(text.into()));
        self
    }

    /// Append an image. A non-positive size is logged and the image skipped.
    pub fn add_image(&mut self, config: ImageConfig) -> &mut Self {
        if let Err(err) = self.try_add_image(config).map(|_| ()) {
            tracing::warn!(label = ?self.label, %err, "image not added");
        }
        self
    }

    pub fn try_add_image(&mut self, config: ImageConfig) -> Result<&mut Self, CardError> {
        if !config.size.is_positive() {
            return Err(CardError::InvalidImageSize {
                name: config.name,
                width: config.size.width,
                height: config.size.height,
            });
        }
        self.components.push(Component::Image(Image::new(config)));
        Ok(self)
    }

    pub fn add_action(&mut self, config: ActionConfig) -> &mut Self {
        self.components.push(Component::Action(Action::new(config)));
        self
    }

    pub fn add_text_input(&mut self, config: TextInputConfig) -> &mut Self {
        self.components
            .push(Component::TextInput(TextInput::new(config)));
        self
    }

    /// Show or hide the close control and set what runs when it is used.
    pub fn set_dismiss_affordance(
        &mut self,
        visible: bool,
        callback: impl FnOnce() + Send + 'static,
    ) -> &mut Self {
        self.show_dismiss_affordance = visible;
        self.affordance_callback = Some(Box::new(callback));
        self
    }

    /// Show or hide the close control without a callback.
    pub fn show_dismiss_affordance(&mut self, visible: bool) -> &mut Self {
        self.show_dismiss_affordance = visible;
        self
    }

    /// Run `callback` once when the card is finished, for any reason.
    pub fn on_complete(
        &mut self,
        callback: impl FnOnce(DismissReason) + Send + 'static,
    ) -> &mut Self {
        self.completions.push(Box::new(callback));
        self
    }

    /// Like [`on_complete`](Self::on_complete), but runs after every
    /// completion callback. Used by declarative presentation bindings.
    pub fn on_done(&mut self, hook: impl FnOnce(DismissReason) + Send + 'static) -> &mut Self {
        self.done_hooks.push(Box::new(hook));
        self
    }

    pub fn dismiss_on_backdrop_tap(&mut self, enabled: bool) -> &mut Self {
        self.dismiss_on_backdrop_tap = enabled;
        self
    }

    pub fn style(&mut self, style: CardStyle) -> &mut Self {
        self.style = style;
        self
    }

    /// Name used in log output.
    pub fn label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = Some(label.into());
        self
    }

    // --- linking and queries ---

    /// Enable action `action_index` iff text input `input_index` holds a
    /// non-empty value. Bad indices are logged and ignored.
    pub fn link_input(&mut self, input_index: usize, action_index: usize) -> &mut Self {
        if let Err(err) = self.try_link_input(input_index, action_index).map(|_| ()) {
            tracing::warn!(label = ?self.label, %err, "link_input ignored");
        }
        self
    }

    pub fn try_link_input(
        &mut self,
        input_index: usize,
        action_index: usize,
    ) -> Result<&mut Self, CardError> {
        let enabled = self.action(action_index)?.enabled_cell().clone();
        let count = self.text_input_count();
        let input = self
            .components
            .iter_mut()
            .filter_map(Component::as_text_input_mut)
            .nth(input_index)
            .ok_or(CardError::InputOutOfRange {
                index: input_index,
                count,
            })?;
        input.link_to(&enabled);
        tracing::debug!(label = ?self.label, input_index, action_index, "linked input to action");
        Ok(self)
    }

    /// Current value of text input `input_index`. `None` before any edit or
    /// for an out-of-range index.
    #[must_use]
    pub fn value_of(&self, input_index: usize) -> Option<String> {
        self.text_inputs().nth(input_index).and_then(TextInput::value)
    }

    /// Set the enabled flag of action `action_index` directly. Bad indices
    /// are logged and ignored.
    pub fn set_enabled(&mut self, action_index: usize, enabled: bool) -> &mut Self {
        if let Err(err) = self.try_set_enabled(action_index, enabled).map(|_| ()) {
            tracing::warn!(label = ?self.label, %err, "set_enabled ignored");
        }
        self
    }

    pub fn try_set_enabled(
        &mut self,
        action_index: usize,
        enabled: bool,
    ) -> Result<&mut Self, CardError> {
        self.action(action_index)?.set_enabled(enabled);
        Ok(self)
    }

    /// A handle to this card's component state that outlives the move into
    /// the presenter. Covers the components added so far.
    #[must_use]
    pub fn controls(&self) -> CardControls {
        CardControls {
            label: self.label.clone(),
            inputs: self.text_inputs().map(|i| i.value_cell().clone()).collect(),
            actions: self.actions().map(|a| a.enabled_cell().clone()).collect(),
        }
    }

    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    #[must_use]
    pub fn action_count(&self) -> usize {
        self.actions().count()
    }

    #[must_use]
    pub fn text_input_count(&self) -> usize {
        self.text_inputs().count()
    }

    #[must_use]
    pub fn debug_label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    #[must_use]
    pub fn card_style(&self) -> &CardStyle {
        &self.style
    }

    #[must_use]
    pub fn shows_dismiss_affordance(&self) -> bool {
        self.show_dismiss_affordance
    }

    #[must_use]
    pub fn dismisses_on_backdrop_tap(&self) -> bool {
        self.dismiss_on_backdrop_tap
    }

    fn actions(&self) -> impl Iterator<Item = &Action> {
        self.components.iter().filter_map(Component::as_action)
    }

    fn text_inputs(&self) -> impl Iterator<Item = &TextInput> {
        self.components.iter().filter_map(Component::as_text_input)
    }

    fn action(&self, index: usize) -> Result<&Action, CardError> {
        self.actions()
            .nth(index)
            .ok_or_else(|| CardError::ActionOutOfRange {
                index,
                count: self.action_count(),
            })
    }

    // --- lifecycle hooks ---

    /// Render every component in order. Each action's dismiss request is
    /// bound to [`DismissReason::Action`] with its action index.
    #[must_use]
    pub fn render(&self, ctx: &RenderContext, request_dismiss: DismissRequest) -> RenderedCard {
        let mut action_index = 0;
        let units = self
            .components
            .iter()
            .map(|component| {
                let request = match component {
                    Component::Action(_) => {
                        let reason = DismissReason::Action {
                            index: action_index,
                        };
                        action_index += 1;
                        request_dismiss.with_reason(reason)
                    }
                    _ => request_dismiss.clone(),
                };
                component.render(ctx, request)
            })
            .collect();

        let affordance = self.show_dismiss_affordance.then(|| {
            DismissControl::new(
                ctx.gate().clone(),
                request_dismiss.with_reason(DismissReason::Affordance),
            )
        });
        let backdrop = self.dismiss_on_backdrop_tap.then(|| {
            DismissControl::new(
                ctx.gate().clone(),
                request_dismiss.with_reason(DismissReason::Backdrop),
            )
        });

        RenderedCard {
            units,
            affordance,
            backdrop,
            style: self.style,
            ctx: ctx.clone(),
            scope: BindingScope::new(),
        }
    }

    /// Finish the card: drop input links, then run the affordance callback
    /// (only when `reason` is [`DismissReason::Affordance`]), completion
    /// callbacks, and done hooks.
    pub fn complete(mut self, reason: DismissReason) {
        for component in &mut self.components {
            if let Some(input) = component.as_text_input_mut() {
                input.unlink();
            }
        }
        if reason == DismissReason::Affordance
            && let Some(callback) = self.affordance_callback.take()
        {
            callback();
        }
        for completion in self.completions.drain(..) {
            completion(reason);
        }
        for hook in self.done_hooks.drain(..) {
            hook(reason);
        }
    }
}

/// Shared handle to a card's inputs and actions.
#[derive(Debug, Clone, Default)]
pub struct CardControls {
    label: Option<String>,
    inputs: Vec<Observable<Option<String>>>,
    actions: Vec<Observable<bool>>,
}

impl CardControls {
    #[must_use]
    pub fn value_of(&self, input_index: usize) -> Option<String> {
        self.inputs.get(input_index).and_then(Observable::get)
    }

    #[must_use]
    pub fn is_enabled(&self, action_index: usize) -> Option<bool> {
        self.actions.get(action_index).map(Observable::get)
    }

    pub fn set_enabled(&self, action_index: usize, enabled: bool) {
        if let Err(err) = self.try_set_enabled(action_index, enabled) {
            tracing::warn!(label = ?self.label, %err, "set_enabled ignored");
        }
    }

    pub fn try_set_enabled(&self, action_index: usize, enabled: bool) -> Result<(), CardError> {
        let cell = self
            .actions
            .get(action_index)
            .ok_or(CardError::ActionOutOfRange {
                index: action_index,
                count: self.actions.len(),
            })?;
        cell.set(enabled);
        Ok(())
    }

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    #[must_use]
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}

/// A card after rendering: display units plus card-level handlers.
pub struct RenderedCard {
    units: Vec<DisplayUnit>,
    affordance: Option<DismissControl>,
    backdrop: Option<DismissControl>,
    style: CardStyle,
    ctx: RenderContext,
    scope: BindingScope,
}

impl fmt::Debug for RenderedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedCard")
            .field("units", &self.units)
            .field("affordance", &self.affordance.is_some())
            .field("backdrop_dismisses", &self.backdrop.is_some())
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl RenderedCard {
    #[must_use]
    pub fn units(&self) -> &[DisplayUnit] {
        &self.units
    }

    #[must_use]
    pub fn style(&self) -> &CardStyle {
        &self.style
    }

    #[must_use]
    pub fn affordance(&self) -> Option<&DismissControl> {
        self.affordance.as_ref()
    }

    /// Present when the card was built with `dismiss_on_backdrop_tap`.
    #[must_use]
    pub fn backdrop(&self) -> Option<&DismissControl> {
        self.backdrop.as_ref()
    }

    #[must_use]
    pub fn action(&self, index: usize) -> Option<&ActionView> {
        self.units.iter().filter_map(DisplayUnit::as_action).nth(index)
    }

    #[must_use]
    pub fn text_input(&self, index: usize) -> Option<&TextInputView> {
        self.units
            .iter()
            .filter_map(DisplayUnit::as_text_input)
            .nth(index)
    }

    /// Tap the dimmed area behind the card. Dismisses only when the card was
    /// built with `dismiss_on_backdrop_tap`.
    pub fn tap_backdrop(&self) -> bool {
        self.backdrop.as_ref().is_some_and(DismissControl::tap)
    }

    /// Keep `callback` subscribed to action `index`'s enabled flag until the
    /// card is released.
    pub fn watch_action_enabled(
        &mut self,
        index: usize,
        callback: impl Fn(bool) + Send + Sync + 'static,
    ) -> Result<(), CardError> {
        let count = self.units.iter().filter_map(DisplayUnit::as_action).count();
        let sub: Subscription = self
            .action(index)
            .ok_or(CardError::ActionOutOfRange { index, count })?
            .on_enabled_change(callback);
        self.scope.hold(sub);
        Ok(())
    }

    /// Subscriptions held for the host.
    #[must_use]
    pub fn watch_count(&self) -> usize {
        self.scope.binding_count()
    }

    /// Close the interaction gate and drop every view and subscription.
    pub fn release(&mut self) {
        self.ctx.gate().close();
        self.scope.clear();
        self.units.clear();
        self.affordance = None;
        self.backdrop = None;
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        !self.ctx.gate().is_open()
    }
}
