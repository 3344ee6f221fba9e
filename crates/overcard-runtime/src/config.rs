#![forbid(unsafe_code)]

//! Presenter configuration.
//!
//! Defaults suit most hosts. [`PresenterConfig::from_env`] layers two
//! environment overrides on top:
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `OVERCARD_REDUCED_MOTION` | `1`/`true`/`yes`/`on` disables motion |
//! | `OVERCARD_BACKDROP_OPACITY` | backdrop opacity, a float in `[0, 1]` |
//!
//! Unparseable values are logged at `warn` and ignored.

use std::env;

use overcard_core::{AnimationConfig, Rgba};

pub const REDUCED_MOTION_ENV: &str = "OVERCARD_REDUCED_MOTION";
pub const BACKDROP_OPACITY_ENV: &str = "OVERCARD_BACKDROP_OPACITY";

/// Dimmed layer behind the card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackdropConfig {
    pub color: Rgba,
    /// Opacity in `[0.0, 1.0]` once fully faded in.
    pub opacity: f32,
}

impl BackdropConfig {
    #[must_use]
    pub fn new(color: Rgba, opacity: f32) -> Self {
        Self {
            color,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            opacity: 0.4,
        }
    }
}

/// Settings for one presenter and its loop.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PresenterConfig {
    pub animation: AnimationConfig,
    pub backdrop: BackdropConfig,
}

impl PresenterConfig {
    #[must_use]
    pub fn animation(mut self, animation: AnimationConfig) -> Self {
        self.animation = animation;
        self
    }

    #[must_use]
    pub fn backdrop(mut self, backdrop: BackdropConfig) -> Self {
        self.backdrop = backdrop;
        self
    }

    /// Defaults plus environment overrides.
    #[must_use]
    pub fn from_env() -> Self {
        let reduced = env::var(REDUCED_MOTION_ENV).ok();
        let opacity = env::var(BACKDROP_OPACITY_ENV).ok();
        Self::default().with_overrides(reduced.as_deref(), opacity.as_deref())
    }

    fn with_overrides(mut self, reduced_motion: Option<&str>, backdrop_opacity: Option<&str>) -> Self {
        if let Some(raw) = reduced_motion {
            match parse_flag(raw) {
                Some(flag) => self.animation.reduced_motion = flag,
                None => tracing::warn!(var = REDUCED_MOTION_ENV, value = raw, "ignoring unrecognized value"),
            }
        }
        if let Some(raw) = backdrop_opacity {
            match raw.trim().parse::<f32>() {
                Ok(value) if (0.0..=1.0).contains(&value) => self.backdrop.opacity = value,
                _ => tracing::warn!(var = BACKDROP_OPACITY_ENV, value = raw, "ignoring invalid opacity"),
            }
        }
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
