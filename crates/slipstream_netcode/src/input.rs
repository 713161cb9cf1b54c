//! # Input Capture
//!
//! Turns live control state into one timestamped [`InputCommand`] per fixed
//! tick.
//!
//! The four planar controls cancel pairwise; the summed direction is
//! normalized unless it is zero (normalizing zero is a no-op, so holding
//! nothing produces the zero direction rather than NaN). The timestamp is
//! free-running elapsed time from a clock started when the entity became
//! locally controlled, and is never reset during the session.

use std::time::Instant;

use slipstream_core::Vec2;

use crate::protocol::InputCommand;

/// Live state of the movement controls for one tick.
///
/// The caller maps its real input device onto this; the sampler does not
/// read hardware.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlState {
    /// Move forward.
    pub forward: bool,
    /// Move backward.
    pub backward: bool,
    /// Strafe left.
    pub left: bool,
    /// Strafe right.
    pub right: bool,
    /// Jump.
    pub jump: bool,
}

/// Monotonic session clock.
///
/// Started explicitly at role assignment; threaded into the sampler rather
/// than hidden behind a global stopwatch.
#[derive(Clone, Copy, Debug)]
pub struct SessionClock {
    origin: Instant,
}

impl SessionClock {
    /// Starts the clock now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Seconds elapsed since the clock was started.
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Per-tick input sampler for the locally controlled entity.
#[derive(Clone, Copy, Debug)]
pub struct InputSampler {
    clock: SessionClock,
}

impl InputSampler {
    /// Creates a sampler driven by the given session clock.
    #[must_use]
    pub const fn new(clock: SessionClock) -> Self {
        Self { clock }
    }

    /// Samples one command, stamped with the current session time.
    ///
    /// Side-effect free beyond value construction; forwarding the command to
    /// the server is the caller's responsibility.
    #[must_use]
    pub fn sample(&self, controls: ControlState) -> InputCommand {
        Self::sample_at(controls, self.clock.elapsed_seconds())
    }

    /// Samples one command with an explicit timestamp.
    ///
    /// The deterministic half of [`sample`](Self::sample); tests and replay
    /// tools drive this directly.
    #[must_use]
    pub fn sample_at(controls: ControlState, time: f64) -> InputCommand {
        let mut direction = Vec2::ZERO;
        if controls.forward {
            direction.y -= 1.0;
        }
        if controls.backward {
            direction.y += 1.0;
        }
        if controls.left {
            direction.x -= 1.0;
        }
        if controls.right {
            direction.x += 1.0;
        }

        InputCommand {
            time,
            direction: direction.normalize_or_zero(),
            jump: controls.jump,
        }
    }
}
