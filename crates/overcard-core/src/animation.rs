#![forbid(unsafe_code)]

//! Entrance and exit timing for cards.
//!
//! A card scales from [`ENTRANCE_SCALE_FROM`] to `1.0` while fading in, and
//! fades out on exit. The curves themselves are rendered by the host; this
//! module only answers "how far along is the animation at instant `now`".
//!
//! Reduced motion collapses both durations to zero so every transition
//! settles on the first frame.

use web_time::{Duration, Instant};

/// Starting scale of the entrance animation.
pub const ENTRANCE_SCALE_FROM: f32 = 0.9;

/// Easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
    /// Damped spring with a small overshoot.
    Spring,
}

impl Easing {
    /// Map linear progress `t` in `[0.0, 1.0]` onto the curve.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
            Self::Spring => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - (-8.0 * t).exp() * (10.0 * t).cos()
                }
            }
        }
    }
}

/// Animation timing for a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    pub entrance_duration: Duration,
    pub exit_duration: Duration,
    pub entrance_easing: Easing,
    pub exit_easing: Easing,
    /// Initial scale of the card body during entrance.
    pub entrance_scale_from: f32,
    pub reduced_motion: bool,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            entrance_duration: Duration::from_millis(300),
            exit_duration: Duration::from_millis(200),
            entrance_easing: Easing::Spring,
            exit_easing: Easing::EaseIn,
            entrance_scale_from: ENTRANCE_SCALE_FROM,
            reduced_motion: false,
        }
    }
}

impl AnimationConfig {
    /// No motion: every phase settles immediately.
    #[must_use]
    pub fn none() -> Self {
        Self {
            entrance_duration: Duration::ZERO,
            exit_duration: Duration::ZERO,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn entrance_duration(mut self, duration: Duration) -> Self {
        self.entrance_duration = duration;
        self
    }

    #[must_use]
    pub fn exit_duration(mut self, duration: Duration) -> Self {
        self.exit_duration = duration;
        self
    }

    #[must_use]
    pub fn entrance_easing(mut self, easing: Easing) -> Self {
        self.entrance_easing = easing;
        self
    }

    #[must_use]
    pub fn exit_easing(mut self, easing: Easing) -> Self {
        self.exit_easing = easing;
        self
    }

    #[must_use]
    pub fn reduced_motion(mut self, enabled: bool) -> Self {
        self.reduced_motion = enabled;
        self
    }

    /// Entrance duration after applying reduced motion.
    #[must_use]
    pub fn effective_entrance(&self) -> Duration {
        if self.reduced_motion {
            Duration::ZERO
        } else {
            self.entrance_duration
        }
    }

    /// Exit duration after applying reduced motion.
    #[must_use]
    pub fn effective_exit(&self) -> Duration {
        if self.reduced_motion {
            Duration::ZERO
        } else {
            self.exit_duration
        }
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.effective_entrance().is_zero() && self.effective_exit().is_zero()
    }
}

/// Linear progress of a phase that began at `started` and lasts `duration`.
///
/// Zero-length phases are always complete.
#[must_use]
pub fn progress(started: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(started);
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0)
}
