//! # Protocol Types
//!
//! The three value records exchanged by the movement core, plus their
//! fixed-size wire forms.
//!
//! ```text
//! owning client ── InputCommand ──────────▶ server   (reliable, ordered)
//! server ── PredictedState (ack) ─────────▶ owner    (unreliable, latest wins)
//! server ── InterpolatedState (snapshot) ─▶ observers (unreliable)
//! ```
//!
//! All three records are immutable after creation and compare structurally.
//! The wire forms live in [`wire`] and are Pod structs in the same spirit as
//! the model types, with a flag byte and explicit padding.

mod wire;

pub use wire::{AckWire, InputWire, SnapshotWire, WireError};

use slipstream_core::{Quat, Vec2, Vec3};

/// One tick of captured player intent.
///
/// Produced once per fixed tick by the input sampler, consumed by the local
/// predictor and then again, identically, by the server's resolver. `time`
/// is free-running elapsed seconds since the entity became locally
/// controlled; it orders commands and keys the prediction history.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCommand {
    /// Monotonic capture time in seconds.
    pub time: f64,
    /// Planar movement direction, unit length or zero.
    pub direction: Vec2,
    /// Jump control state at capture time.
    pub jump: bool,
}

impl InputCommand {
    /// The identity command: time zero, no direction, no jump.
    pub const IDENTITY: Self = Self {
        time: 0.0,
        direction: Vec2::ZERO,
        jump: false,
    };
}

/// The result of resolving one input through the movement function.
///
/// Owned exclusively by the history buffer that appended it. Two predicted
/// states are ordered by `input.time`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PredictedState {
    /// The input that produced this state.
    pub input: InputCommand,
    /// Resulting world position.
    pub position: Vec3,
    /// Resulting orientation, unit length.
    pub orientation: Quat,
    /// Velocity left over after collision response, carried into the next
    /// tick. Never reset except on reconciliation rewind.
    pub velocity_remainder: Vec3,
}

impl PredictedState {
    /// The identity state: identity input, origin, identity orientation.
    pub const IDENTITY: Self = Self {
        input: InputCommand::IDENTITY,
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
        velocity_remainder: Vec3::ZERO,
    };

    /// Capture time of the input that produced this state.
    #[inline]
    #[must_use]
    pub fn time(&self) -> f64 {
        self.input.time
    }
}

/// Transform-only snapshot broadcast for remote rendering.
///
/// No input attached; consumed by the interpolation buffer and discarded
/// after blending.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InterpolatedState {
    /// World position.
    pub position: Vec3,
    /// Orientation, unit length.
    pub orientation: Quat,
}

impl InterpolatedState {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    /// Blends two snapshots at fraction `t`: linear for position, spherical
    /// for orientation.
    #[must_use]
    pub fn interpolate(from: Self, to: Self, t: f32) -> Self {
        Self {
            position: from.position.lerp(to.position, t),
            orientation: from.orientation.slerp(to.orientation, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_values() {
        assert_eq!(InputCommand::IDENTITY.time, 0.0);
        assert_eq!(InputCommand::IDENTITY.direction, Vec2::ZERO);
        assert!(!InputCommand::IDENTITY.jump);
        assert_eq!(PredictedState::IDENTITY.orientation, Quat::IDENTITY);
        assert_eq!(InterpolatedState::IDENTITY.position, Vec3::ZERO);
    }

    #[test]
    fn test_structural_equality() {
        let a = InputCommand {
            time: 1.5,
            direction: Vec2::new(0.0, -1.0),
            jump: true,
        };
        let b = a;
        assert_eq!(a, b);
        assert_ne!(a, InputCommand::IDENTITY);
    }

    #[test]
    fn test_snapshot_interpolation_midpoint() {
        let from = InterpolatedState {
            position: Vec3::new(0.0, 0.0, 0.0),
            orientation: Quat::from_yaw(0.0),
        };
        let to = InterpolatedState {
            position: Vec3::new(2.0, 0.0, -4.0),
            orientation: Quat::from_yaw(1.0),
        };

        let mid = InterpolatedState::interpolate(from, to, 0.5);
        assert!((mid.position.x - 1.0).abs() < 1e-6);
        assert!((mid.position.z + 2.0).abs() < 1e-6);
        assert!(mid.orientation.angle_to(Quat::from_yaw(0.5)) < 1e-5);
    }
}
