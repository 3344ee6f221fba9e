#![forbid(unsafe_code)]

//! Warn-and-continue logging for the chainable card builder.
//!
//! Every chainable method that ignores a bad argument logs one `warn` event
//! carrying the card label and the error text, and leaves the card as it was.

use std::sync::{Arc, Mutex};

use overcard_core::Size;
use overcard_widgets::{ActionConfig, Card, ImageConfig, TextInputConfig};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct Warning {
    message: String,
    label: Option<String>,
    err: Option<String>,
}

#[derive(Default)]
struct WarningVisitor {
    message: String,
    label: Option<String>,
    err: Option<String>,
}

impl Visit for WarningVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let rendered = format!("{value:?}");
        match field.name() {
            "message" => self.message = rendered,
            "label" => self.label = Some(rendered),
            "err" => self.err = Some(rendered),
            _ => {}
        }
    }
}

/// Keeps every `warn` event.
#[derive(Clone, Default)]
struct WarnCapture {
    warnings: Arc<Mutex<Vec<Warning>>>,
}

impl<S: Subscriber> Layer<S> for WarnCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != Level::WARN {
            return;
        }
        let mut visitor = WarningVisitor::default();
        event.record(&mut visitor);
        self.warnings.lock().unwrap().push(Warning {
            message: visitor.message,
            label: visitor.label,
            err: visitor.err,
        });
    }
}

fn capture_warnings(f: impl FnOnce()) -> Vec<Warning> {
    let capture = WarnCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    let warnings = capture.warnings.lock().unwrap().clone();
    warnings
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn bad_link_warns_with_label() {
    let mut card = Card::new();
    let warnings = capture_warnings(|| {
        card.label("login")
            .add_text_input(TextInputConfig::new("User"))
            .add_action(ActionConfig::new("Go"))
            .link_input(0, 3);
    });
    assert_eq!(warnings.len(), 1);
    let warning = &warnings[0];
    assert_eq!(warning.message, "link_input ignored");
    assert_eq!(warning.label.as_deref(), Some("Some(\"login\")"));
    assert!(warning.err.as_deref().is_some_and(|e| e.contains("action index 3")));
    assert_eq!(card.controls().is_enabled(0), Some(true));
}

#[test]
fn invalid_image_warns_and_is_skipped() {
    let mut card = Card::new();
    let warnings = capture_warnings(|| {
        card.add_image(ImageConfig::new("hero", Size::new(0.0, 0.0)))
            .add_image(ImageConfig::new("hero", Size::square(24.0)));
    });
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, "image not added");
    assert_eq!(card.len(), 1);
}

#[test]
fn controls_warn_on_bad_index() {
    let mut card = Card::new();
    card.add_action(ActionConfig::new("OK"));
    let controls = card.controls();
    let warnings = capture_warnings(|| {
        controls.set_enabled(1, false);
        controls.set_enabled(0, false);
    });
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, "set_enabled ignored");
    assert_eq!(controls.is_enabled(0), Some(false));
}

#[test]
fn valid_calls_are_silent() {
    let mut card = Card::new();
    let warnings = capture_warnings(|| {
        card.add_text_input(TextInputConfig::new("Code"))
            .add_action(ActionConfig::new("Verify"))
            .link_input(0, 0)
            .set_enabled(0, true);
    });
    assert!(warnings.is_empty());
}
