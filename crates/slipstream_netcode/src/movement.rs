//! # Motion Resolution
//!
//! The single movement function shared by client prediction and the
//! authoritative server.
//!
//! This sharing is the correctness anchor of the whole system: prediction,
//! replay, and authority all call [`resolve_motion`] with the same inputs
//! and must get bit-identical results. The function is pure over its
//! arguments; the only collaborator is the [`PhysicsResolver`], which is
//! required to be deterministic as well.
//!
//! ## Movement model
//!
//! Direct control, not acceleration: planar velocity is set from the input
//! direction each tick, vertical velocity integrates gravity, and a non-zero
//! direction snaps yaw to face it. The corrected velocity returned by the
//! physics resolver is the residual carried into the next tick.

use slipstream_core::{Quat, Vec2, Vec3};

use crate::protocol::{InputCommand, PredictedState};

/// Movement constants shared by every simulation role.
///
/// Both peers must agree on these; they are part of the constants contract,
/// not negotiated at runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
    /// Planar movement speed in units per second.
    pub speed: f32,
    /// Downward acceleration in units per second squared.
    pub gravity: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed: 7.0,
            gravity: 21.0,
        }
    }
}

/// Position and orientation of a character.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    /// World position.
    pub position: Vec3,
    /// Orientation, unit length.
    pub orientation: Quat,
}

impl Pose {
    /// The identity pose at the origin.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };
}

/// Result of sliding a body through the world for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slide {
    /// Position after collision response.
    pub position: Vec3,
    /// Velocity after collision response, e.g. zeroed along a contact
    /// normal. Becomes the residual for the next tick.
    pub velocity: Vec3,
}

/// External body-vs-world collision resolver.
///
/// Implementations MUST be deterministic for identical arguments; replay
/// correctness depends on it.
pub trait PhysicsResolver {
    /// Moves a body by `velocity * delta` with collision and slide response.
    fn move_and_slide(&self, position: Vec3, velocity: Vec3, up: Vec3, delta: f32) -> Slide;
}

/// Collision-free world: pure integration, velocity untouched.
///
/// Used by tests and as a stand-in where the host has no world geometry.
#[derive(Clone, Copy, Debug, Default)]
pub struct Unobstructed;

impl PhysicsResolver for Unobstructed {
    fn move_and_slide(&self, position: Vec3, velocity: Vec3, _up: Vec3, delta: f32) -> Slide {
        Slide {
            position: position + velocity * delta,
            velocity,
        }
    }
}

/// Infinite ground plane at y = 0.
///
/// Integrates, then clamps the body to the plane and zeroes the vertical
/// velocity on contact, the way a slide response cancels velocity along the
/// contact normal.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatGround;

impl PhysicsResolver for FlatGround {
    fn move_and_slide(&self, position: Vec3, velocity: Vec3, _up: Vec3, delta: f32) -> Slide {
        let mut position = position + velocity * delta;
        let mut velocity = velocity;
        if position.y < 0.0 {
            position.y = 0.0;
            velocity.y = 0.0;
        }
        Slide { position, velocity }
    }
}

/// Everything one resolution step produces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionOutcome {
    /// Residual velocity for the next tick.
    pub velocity: Vec3,
    /// New pose.
    pub pose: Pose,
    /// The captured state, ready for the history buffer or the ack channel.
    pub state: PredictedState,
}

/// Resolves one input against the world.
///
/// Deterministic given identical arguments and a deterministic resolver:
/// two independent invocations produce bit-identical outcomes.
#[must_use]
pub fn resolve_motion(
    pose: Pose,
    velocity: Vec3,
    input: &InputCommand,
    delta: f32,
    config: &MotionConfig,
    world: &dyn PhysicsResolver,
) -> MotionOutcome {
    // Direct-control planar velocity; gravity integrates on the residual.
    let proposed = Vec3::new(
        input.direction.x * config.speed,
        velocity.y - config.gravity * delta,
        input.direction.y * config.speed,
    );

    // Instantaneous facing snap, only while there is a direction to face.
    let orientation = if input.direction == Vec2::ZERO {
        pose.orientation
    } else {
        Quat::from_yaw(-input.direction.x.atan2(-input.direction.y))
    };

    let slide = world.move_and_slide(pose.position, proposed, Vec3::UP, delta);

    let pose = Pose {
        position: slide.position,
        orientation: orientation.normalize(),
    };

    MotionOutcome {
        velocity: slide.velocity,
        pose,
        state: PredictedState {
            input: *input,
            position: pose.position,
            orientation: pose.orientation,
            velocity_remainder: slide.velocity,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELTA: f32 = 1.0 / 60.0;

    fn forward_input(time: f64) -> InputCommand {
        InputCommand {
            time,
            direction: Vec2::new(0.0, -1.0),
            jump: false,
        }
    }

    #[test]
    fn test_direct_control_velocity() {
        // Speed 7, gravity 21, dt 1/60 from rest: planar (0, -7), vertical -0.35.
        let outcome = resolve_motion(
            Pose::IDENTITY,
            Vec3::ZERO,
            &forward_input(1.0),
            DELTA,
            &MotionConfig::default(),
            &Unobstructed,
        );

        assert!((outcome.velocity.z + 7.0).abs() < 1e-6);
        assert!((outcome.velocity.x).abs() < 1e-6);
        assert!((outcome.velocity.y + 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_planar_velocity_is_set_not_accumulated() {
        let config = MotionConfig::default();
        let first = resolve_motion(
            Pose::IDENTITY,
            Vec3::ZERO,
            &forward_input(1.0),
            DELTA,
            &config,
            &Unobstructed,
        );
        let second = resolve_motion(
            first.pose,
            first.velocity,
            &forward_input(2.0),
            DELTA,
            &config,
            &Unobstructed,
        );

        // Same planar speed on consecutive ticks, not doubled.
        assert!((second.velocity.z + 7.0).abs() < 1e-6);
        // Gravity keeps integrating on the residual.
        assert!((second.velocity.y + 0.70).abs() < 1e-6);
    }

    #[test]
    fn test_yaw_snaps_to_direction() {
        let input = InputCommand {
            time: 1.0,
            direction: Vec2::new(1.0, 0.0),
            jump: false,
        };
        let outcome = resolve_motion(
            Pose::IDENTITY,
            Vec3::ZERO,
            &input,
            DELTA,
            &MotionConfig::default(),
            &Unobstructed,
        );

        let expected = Quat::from_yaw(-(1.0_f32).atan2(0.0));
        assert!(outcome.pose.orientation.angle_to(expected) < 1e-6);
    }

    #[test]
    fn test_zero_direction_keeps_orientation() {
        let pose = Pose {
            position: Vec3::ZERO,
            orientation: Quat::from_yaw(1.2),
        };
        let outcome = resolve_motion(
            pose,
            Vec3::ZERO,
            &InputCommand {
                time: 1.0,
                direction: Vec2::ZERO,
                jump: false,
            },
            DELTA,
            &MotionConfig::default(),
            &Unobstructed,
        );
        assert!(outcome.pose.orientation.angle_to(pose.orientation) < 1e-6);
    }

    #[test]
    fn test_determinism() {
        let pose = Pose {
            position: Vec3::new(3.0, 1.5, -2.0),
            orientation: Quat::from_yaw(0.4),
        };
        let velocity = Vec3::new(0.3, -4.2, 1.1);
        let input = InputCommand {
            time: 12.5,
            direction: Vec2::new(1.0, -1.0).normalize_or_zero(),
            jump: true,
        };
        let config = MotionConfig::default();

        let a = resolve_motion(pose, velocity, &input, DELTA, &config, &FlatGround);
        let b = resolve_motion(pose, velocity, &input, DELTA, &config, &FlatGround);

        // Bit-identical, not merely close.
        assert_eq!(a, b);
    }

    #[test]
    fn test_flat_ground_cancels_vertical_velocity() {
        let pose = Pose {
            position: Vec3::new(0.0, 0.001, 0.0),
            orientation: Quat::IDENTITY,
        };
        let outcome = resolve_motion(
            pose,
            Vec3::new(0.0, -5.0, 0.0),
            &InputCommand::IDENTITY,
            DELTA,
            &MotionConfig::default(),
            &FlatGround,
        );
        assert_eq!(outcome.pose.position.y, 0.0);
        assert_eq!(outcome.velocity.y, 0.0);
    }

    #[test]
    fn test_state_captures_residual_velocity() {
        let outcome = resolve_motion(
            Pose::IDENTITY,
            Vec3::ZERO,
            &forward_input(1.0),
            DELTA,
            &MotionConfig::default(),
            &FlatGround,
        );
        assert_eq!(outcome.state.velocity_remainder, outcome.velocity);
        assert_eq!(outcome.state.position, outcome.pose.position);
        assert_eq!(outcome.state.input.time, 1.0);
    }
}
