//! Twirl animation for the number image
//!
//! A twirl is a full turn played together with a scale pulse to 120% that
//! bounces back. It is pure timing math: the window samples it whenever it
//! paints and nothing reports back when it ends.

use std::time::{Duration, Instant};

/// Length of the rotation and of each scale leg
pub const TWIRL_LEG: Duration = Duration::from_millis(1000);
/// Degrees turned over one rotation leg
pub const TWIRL_ROTATION_DEGREES: f32 = 360.0;
/// Scale reached at the top of the pulse
pub const TWIRL_PEAK_SCALE: f32 = 1.2;

/// Transform values for one painted frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwirlFrame {
    pub rotation_degrees: f32,
    pub scale: f32,
}

impl TwirlFrame {
    /// Frame used when nothing is animating
    pub const REST: TwirlFrame = TwirlFrame {
        rotation_degrees: 0.0,
        scale: 1.0,
    };
}

/// An animation started at a fixed instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Twirl {
    started: Instant,
}

impl Twirl {
    pub fn start(now: Instant) -> Self {
        Self { started: now }
    }

    /// Total running time: one rotation alongside a scale up and back down
    pub fn total_duration() -> Duration {
        TWIRL_LEG * 2
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= Self::total_duration()
    }

    /// Samples the animation at `now`
    pub fn sample(&self, now: Instant) -> TwirlFrame {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        let leg = TWIRL_LEG.as_secs_f32();

        let rotation_progress = (elapsed / leg).min(1.0);
        let rotation_degrees = TWIRL_ROTATION_DEGREES * rotation_progress;

        // Up over the first leg, back down over the second
        let pulse = if elapsed <= leg {
            elapsed / leg
        } else {
            (2.0 - elapsed / leg).max(0.0)
        };
        let scale = 1.0 + (TWIRL_PEAK_SCALE - 1.0) * pulse;

        // A completed turn is visually identical to no turn
        let rotation_degrees = if rotation_progress >= 1.0 {
            0.0
        } else {
            rotation_degrees
        };

        TwirlFrame {
            rotation_degrees,
            scale,
        }
    }
}
