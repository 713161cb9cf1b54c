//! # Math Types
//!
//! Vectors and quaternions as plain data.
//!
//! These deliberately avoid a general-purpose math crate: the netcode needs a
//! handful of operations (normalize, lerp, slerp, yaw rotation) and every one
//! of them must behave identically wherever it runs. Keeping the definitions
//! here makes that surface auditable.

mod quat;
mod vec;

pub use quat::Quat;
pub use vec::{Vec2, Vec3};
