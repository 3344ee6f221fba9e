#![forbid(unsafe_code)]

//! Test harness for Overcard.
//!
//! - [`RecordingSurface`]: a [`Surface`](overcard_runtime::Surface) that logs
//!   attach, frame, and detach calls and lets tests tap the mounted card.
//! - [`LogCapture`]: a `tracing` layer that keeps events for assertions.
//! - [`FrameClock`]: a hand-advanced clock for
//!   [`run_pending_at`](overcard_runtime::PresentationLoop::run_pending_at).
//! - [`instant_loop`]: a loop with every animation collapsed, so each pump
//!   completes every pending transition.

pub mod capture;
pub mod recording;

pub use capture::{CapturedEvent, LogCapture};
pub use recording::{MountedCard, RecordingSurface, SurfaceEvent};

use overcard_core::AnimationConfig;
use overcard_runtime::{PresentationLoop, Presenter, PresenterConfig};
use web_time::{Duration, Instant};

/// Loop over a fresh [`RecordingSurface`] with motion disabled.
///
/// Returns the loop, a presenter for it, and a handle to the surface.
#[must_use]
pub fn instant_loop() -> (PresentationLoop<RecordingSurface>, Presenter, RecordingSurface) {
    looped(PresenterConfig::default().animation(AnimationConfig::none()))
}

/// Like [`instant_loop`] with an explicit config.
#[must_use]
pub fn looped(
    config: PresenterConfig,
) -> (PresentationLoop<RecordingSurface>, Presenter, RecordingSurface) {
    let surface = RecordingSurface::new();
    let ui = PresentationLoop::new(surface.clone(), config);
    let presenter = ui.presenter();
    (ui, presenter, surface)
}

/// A clock that only moves when told to.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    now: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
        }
    }

    #[must_use]
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Move forward and return the new time.
    pub fn advance(&mut self, by: Duration) -> Instant {
        self.now += by;
        self.now
    }

    /// Move forward by `ms` milliseconds.
    pub fn advance_ms(&mut self, ms: u64) -> Instant {
        self.advance(Duration::from_millis(ms))
    }
}
