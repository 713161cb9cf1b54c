//! # Wire Forms
//!
//! Fixed-size Pod layouts for the three payloads.
//!
//! ## Zero-Allocation Design
//!
//! Every wire struct is `Copy`, `#[repr(C)]`, and explicitly padded so it can
//! be copied byte-for-byte into a transport buffer. Decoding is checked: a
//! payload of the wrong length or with non-finite fields is rejected here,
//! before anything reaches the simulation core.

use bytemuck::{Pod, Zeroable};
use slipstream_core::{Quat, Vec2, Vec3};
use thiserror::Error;

use super::{InputCommand, InterpolatedState, PredictedState};

/// Errors produced while decoding a wire payload.
///
/// These are the only failures the protocol layer can surface; once a
/// payload decodes cleanly the core treats it as trusted input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    /// Payload length did not match the expected wire size.
    #[error("payload is {got} bytes, expected {want}")]
    Length {
        /// Expected size in bytes.
        want: usize,
        /// Received size in bytes.
        got: usize,
    },
    /// A float field was NaN or infinite.
    #[error("payload contains a non-finite field")]
    NonFinite,
    /// The capture time was negative.
    #[error("payload capture time is negative")]
    NegativeTime,
    /// The movement direction was neither unit length nor zero.
    #[error("payload direction is not unit length or zero")]
    NonUnitDirection,
}

/// Wire form of [`InputCommand`]. 24 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct InputWire {
    /// Capture time in seconds.
    pub time: f64,
    /// Direction X.
    pub dir_x: f32,
    /// Direction Y.
    pub dir_y: f32,
    /// Control flags.
    pub flags: u8,
    /// Explicit padding to 24 bytes.
    pub _padding: [u8; 7],
}

impl InputWire {
    /// Size in bytes.
    pub const SIZE: usize = 24;

    /// Control flag: jump held.
    pub const FLAG_JUMP: u8 = 1 << 0;

    /// Packs a command into its wire form.
    #[must_use]
    pub fn pack(command: &InputCommand) -> Self {
        Self {
            time: command.time,
            dir_x: command.direction.x,
            dir_y: command.direction.y,
            flags: if command.jump { Self::FLAG_JUMP } else { 0 },
            _padding: [0; 7],
        }
    }

    /// Unpacks the wire form into a command.
    #[must_use]
    pub fn unpack(&self) -> InputCommand {
        InputCommand {
            time: self.time,
            direction: Vec2::new(self.dir_x, self.dir_y),
            jump: self.flags & Self::FLAG_JUMP != 0,
        }
    }

    /// Returns the raw bytes of this payload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Decodes and validates a payload.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if the length is wrong, a field is non-finite,
    /// the capture time is negative, or the direction is neither unit
    /// length nor zero.
    pub fn read(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() != Self::SIZE {
            return Err(WireError::Length {
                want: Self::SIZE,
                got: bytes.len(),
            });
        }
        let wire: Self = bytemuck::pod_read_unaligned(bytes);
        let direction = Vec2::new(wire.dir_x, wire.dir_y);
        if !wire.time.is_finite() || !direction.is_finite() {
            return Err(WireError::NonFinite);
        }
        if wire.time < 0.0 {
            return Err(WireError::NegativeTime);
        }
        // A scaled direction would multiply straight into planar speed;
        // only unit directions and the idle zero direction are legal.
        let length = direction.length();
        if length > 0.0 && (length - 1.0).abs() > 1e-3 {
            return Err(WireError::NonUnitDirection);
        }
        Ok(wire)
    }
}

/// Wire form of [`InterpolatedState`]. 28 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SnapshotWire {
    /// Position (x, y, z).
    pub position: [f32; 3],
    /// Orientation (x, y, z, w).
    pub orientation: [f32; 4],
}

impl SnapshotWire {
    /// Size in bytes.
    pub const SIZE: usize = 28;

    /// Packs a snapshot into its wire form.
    #[must_use]
    pub fn pack(snapshot: &InterpolatedState) -> Self {
        Self {
            position: [
                snapshot.position.x,
                snapshot.position.y,
                snapshot.position.z,
            ],
            orientation: [
                snapshot.orientation.x,
                snapshot.orientation.y,
                snapshot.orientation.z,
                snapshot.orientation.w,
            ],
        }
    }

    /// Unpacks the wire form into a snapshot.
    ///
    /// The orientation is re-normalized: quantization on the wire must not
    /// leak a non-unit quaternion into the blend.
    #[must_use]
    pub fn unpack(&self) -> InterpolatedState {
        InterpolatedState {
            position: Vec3::new(self.position[0], self.position[1], self.position[2]),
            orientation: Quat::new(
                self.orientation[0],
                self.orientation[1],
                self.orientation[2],
                self.orientation[3],
            )
            .normalize(),
        }
    }

    /// Returns the raw bytes of this payload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Decodes and validates a payload.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if the length is wrong or a field is non-finite.
    pub fn read(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() != Self::SIZE {
            return Err(WireError::Length {
                want: Self::SIZE,
                got: bytes.len(),
            });
        }
        let wire: Self = bytemuck::pod_read_unaligned(bytes);
        let finite = wire.position.iter().all(|c| c.is_finite())
            && wire.orientation.iter().all(|c| c.is_finite());
        if !finite {
            return Err(WireError::NonFinite);
        }
        Ok(wire)
    }
}

/// Wire form of the acknowledgment: a full [`PredictedState`]. 64 bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct AckWire {
    /// The input that produced the acknowledged state.
    pub input: InputWire,
    /// Position (x, y, z).
    pub position: [f32; 3],
    /// Orientation (x, y, z, w).
    pub orientation: [f32; 4],
    /// Residual velocity (x, y, z).
    pub velocity: [f32; 3],
}

impl AckWire {
    /// Size in bytes.
    pub const SIZE: usize = 64;

    /// Packs an acknowledgment into its wire form.
    #[must_use]
    pub fn pack(state: &PredictedState) -> Self {
        Self {
            input: InputWire::pack(&state.input),
            position: [state.position.x, state.position.y, state.position.z],
            orientation: [
                state.orientation.x,
                state.orientation.y,
                state.orientation.z,
                state.orientation.w,
            ],
            velocity: [
                state.velocity_remainder.x,
                state.velocity_remainder.y,
                state.velocity_remainder.z,
            ],
        }
    }

    /// Unpacks the wire form into a predicted state.
    #[must_use]
    pub fn unpack(&self) -> PredictedState {
        PredictedState {
            input: self.input.unpack(),
            position: Vec3::new(self.position[0], self.position[1], self.position[2]),
            orientation: Quat::new(
                self.orientation[0],
                self.orientation[1],
                self.orientation[2],
                self.orientation[3],
            )
            .normalize(),
            velocity_remainder: Vec3::new(self.velocity[0], self.velocity[1], self.velocity[2]),
        }
    }

    /// Returns the raw bytes of this payload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Decodes and validates a payload.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if the length is wrong, a field is non-finite,
    /// or the embedded input fails its own validation.
    pub fn read(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() != Self::SIZE {
            return Err(WireError::Length {
                want: Self::SIZE,
                got: bytes.len(),
            });
        }
        let wire: Self = bytemuck::pod_read_unaligned(bytes);
        let _ = InputWire::read(wire.input.as_bytes())?;
        let finite = wire.position.iter().all(|c| c.is_finite())
            && wire.orientation.iter().all(|c| c.is_finite())
            && wire.velocity.iter().all(|c| c.is_finite());
        if !finite {
            return Err(WireError::NonFinite);
        }
        Ok(wire)
    }
}
