#![forbid(unsafe_code)]

//! Text input component.
//!
//! The value cell is `None` while the placeholder shows and `Some(text)` once
//! the user has edited the field (even back to the empty string).
//!
//! An input may be linked to one action. While linked, the action is enabled
//! exactly when the value is present and non-empty. Linking again replaces
//! the previous link.

use std::fmt;
use std::sync::Arc;

use overcard_core::{FontSpec, Observable, Rgba, Subscription};

use crate::view::{DisplayUnit, EditHandler, TextInputView};
use crate::{DismissRequest, Render, RenderContext};

/// Callback invoked with the new text on every edit.
pub type ChangeCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// The link rule: a value enables its action iff present and non-empty.
#[must_use]
pub fn enables_action(value: Option<&str>) -> bool {
    value.is_some_and(|text| !text.is_empty())
}

/// Text input configuration.
#[derive(Clone)]
pub struct TextInputConfig {
    pub placeholder: String,
    /// Help text shown below the field.
    pub subtitle: Option<String>,
    pub font: FontSpec,
    pub text_color: Rgba,
    pub placeholder_color: Rgba,
    pub border_color: Rgba,
    pub on_change: Option<ChangeCallback>,
}

impl fmt::Debug for TextInputConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInputConfig")
            .field("placeholder", &self.placeholder)
            .field("subtitle", &self.subtitle)
            .field("font", &self.font)
            .field("on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for TextInputConfig {
    fn default() -> Self {
        Self {
            placeholder: String::new(),
            subtitle: None,
            font: FontSpec::default(),
            text_color: Rgba::LABEL,
            placeholder_color: Rgba::SECONDARY_LABEL,
            border_color: Rgba::SEPARATOR,
            on_change: None,
        }
    }
}

impl TextInputConfig {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    #[must_use]
    pub fn font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn text_color(mut self, color: Rgba) -> Self {
        self.text_color = color;
        self
    }

    #[must_use]
    pub fn placeholder_color(mut self, color: Rgba) -> Self {
        self.placeholder_color = color;
        self
    }

    #[must_use]
    pub fn border_color(mut self, color: Rgba) -> Self {
        self.border_color = color;
        self
    }

    #[must_use]
    pub fn on_change(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(callback));
        self
    }
}

/// An editable text field.
pub struct TextInput {
    config: TextInputConfig,
    value: Observable<Option<String>>,
    link: Option<Subscription>,
}

impl fmt::Debug for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInput")
            .field("config", &self.config)
            .field("value", &self.value.get())
            .field("linked", &self.link.is_some())
            .finish()
    }
}

impl TextInput {
    #[must_use]
    pub fn new(config: TextInputConfig) -> Self {
        Self {
            config,
            value: Observable::new(None),
            link: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TextInputConfig {
        &self.config
    }

    /// Last edited value; `None` before any edit.
    #[must_use]
    pub fn value(&self) -> Option<String> {
        self.value.get()
    }

    /// Shared value cell.
    #[must_use]
    pub fn value_cell(&self) -> &Observable<Option<String>> {
        &self.value
    }

    /// Drive `enabled` from this input's value, replacing any earlier link.
    ///
    /// The rule is applied immediately, so a fresh input disables its action.
    pub fn link_to(&mut self, enabled: &Observable<bool>) {
        enabled.set(self.value.with(|v| enables_action(v.as_deref())));
        let target = enabled.clone();
        self.link = Some(
            self.value
                .subscribe(move |value| target.set(enables_action(value.as_deref()))),
        );
    }

    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }

    /// Drop the link. The action keeps its current enabled flag.
    pub fn unlink(&mut self) {
        self.link = None;
    }
}

impl Render for TextInput {
    fn render(&self, ctx: &RenderContext, _request_dismiss: DismissRequest) -> DisplayUnit {
        let gate = ctx.gate().clone();
        let value = self.value.clone();
        let on_change = self.config.on_change.clone();

        let on_edit: EditHandler = Arc::new(move |text: &str| {
            if !gate.is_open() {
                return false;
            }
            value.set(Some(text.to_owned()));
            if let Some(callback) = &on_change {
                callback(text);
            }
            true
        });

        DisplayUnit::TextInput(TextInputView::new(
            self.config.placeholder.clone(),
            self.config.subtitle.clone(),
            self.config.font,
            self.config.text_color,
            self.config.placeholder_color,
            self.config.border_color,
            self.value.clone(),
            on_edit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn render_view(input: &TextInput, ctx: &RenderContext) -> TextInputView {
        match input.render(ctx, DismissRequest::noop()) {
            DisplayUnit::TextInput(view) => view,
            other => panic!("expected text input view, got {other:?}"),
        }
    }

    #[test]
    fn rule() {
        assert!(!enables_action(None));
        assert!(!enables_action(Some("")));
        assert!(enables_action(Some("x")));
        assert!(enables_action(Some(" ")));
    }

    #[test]
    fn edits_store_value_and_notify() {
        let edits = Arc::new(Mutex::new(Vec::new()));
        let e = Arc::clone(&edits);
        let input = TextInput::new(
            TextInputConfig::new("Name").on_change(move |t| e.lock().unwrap().push(t.to_owned())),
        );
        let view = render_view(&input, &RenderContext::default());

        assert!(view.is_showing_placeholder());
        assert_eq!(view.display_text(), "Name");
        assert!(view.edit("ab"));
        assert!(view.edit("abc"));
        assert_eq!(input.value().as_deref(), Some("abc"));
        assert_eq!(*edits.lock().unwrap(), ["ab", "abc"]);
    }

    #[test]
    fn clearing_keeps_some_empty() {
        let input = TextInput::new(TextInputConfig::new("Name"));
        let view = render_view(&input, &RenderContext::default());
        view.edit("x");
        view.edit("");
        assert_eq!(input.value().as_deref(), Some(""));
        assert!(!view.is_showing_placeholder());
    }

    #[test]
    fn link_applies_immediately_and_follows() {
        let enabled = Observable::new(true);
        let mut input = TextInput::new(TextInputConfig::new("Code"));
        input.link_to(&enabled);
        assert!(!enabled.get());

        let view = render_view(&input, &RenderContext::default());
        view.edit("x");
        assert!(enabled.get());
        view.edit("");
        assert!(!enabled.get());
    }

    #[test]
    fn relink_replaces_previous_target() {
        let first = Observable::new(false);
        let second = Observable::new(false);
        let mut input = TextInput::new(TextInputConfig::default());
        input.link_to(&first);
        input.link_to(&second);

        input.value_cell().set(Some("x".into()));
        assert!(!first.get());
        assert!(second.get());
        assert_eq!(input.value_cell().subscriber_count(), 1);
    }

    #[test]
    fn unlink_stops_driving() {
        let enabled = Observable::new(false);
        let mut input = TextInput::new(TextInputConfig::default());
        input.link_to(&enabled);
        input.unlink();
        input.value_cell().set(Some("x".into()));
        assert!(!enabled.get());
    }

    #[test]
    fn closed_gate_rejects_edit() {
        let ctx = RenderContext::default();
        let input = TextInput::new(TextInputConfig::default());
        let view = render_view(&input, &ctx);
        ctx.gate().close();
        assert!(!view.edit("late"));
        assert_eq!(input.value(), None);
    }
}
