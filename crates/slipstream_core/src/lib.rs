//! # Slipstream Core
//!
//! Shared plain-data math types for the Slipstream netcode.
//!
//! Everything in this crate is `Copy + Pod + Zeroable`: fixed size, no heap,
//! safe to copy byte-for-byte into network payloads. The same types are used
//! by the predicting client, the authoritative server, and the interpolating
//! observer, so any numerical behavior defined here is defined once.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod math;

pub use math::{Quat, Vec2, Vec3};
