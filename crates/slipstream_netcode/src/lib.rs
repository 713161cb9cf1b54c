//! # Slipstream Netcode
//!
//! Client-side prediction, server reconciliation, and snapshot interpolation
//! for real-time multiplayer character movement.
//!
//! ```text
//!   owning client                      server                 other clients
//! ┌────────────────┐   input    ┌───────────────┐  snapshot ┌─────────────┐
//! │ sample input   │──────────▶ │ queue (FIFO)  │─────────▶ │ interpolate │
//! │ predict motion │  reliable  │ drain + solve │unreliable │ between two │
//! │ append history │            │ append tail   │           │ snapshots   │
//! │                │    ack     │               │           └─────────────┘
//! │ reconcile:     │◀────────── │ newest state  │
//! │ rewind, replay │ unreliable └───────────────┘
//! └────────────────┘
//! ```
//!
//! Three properties hold the system together:
//!
//! - one shared movement function ([`resolve_motion`]) used by prediction,
//!   replay, and authority, deterministic to the bit;
//! - a time-ordered prediction history truncated by authoritative
//!   acknowledgments, never by guesswork;
//! - remote entities rendered a fixed delay in the past, strictly between
//!   two received snapshots, with no extrapolation.
//!
//! The crate simulates characters; it does not own a socket, a renderer, or
//! an input device. Hosts map their input onto [`ControlState`], implement
//! [`PhysicsResolver`] over their world geometry, and move the protocol
//! types through whatever transport they have. [`transport`] provides typed
//! loopback channels with the delivery disciplines the protocol assumes.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod character;
pub mod config;
pub mod history;
pub mod input;
pub mod interpolate;
pub mod movement;
pub mod protocol;
pub mod reconcile;
pub mod server;
pub mod transport;

pub use character::{Character, OwnerToken};
pub use config::{ConfigError, NetConfig};
pub use history::HistoryBuffer;
pub use input::{ControlState, InputSampler, SessionClock};
pub use interpolate::InterpolationBuffer;
pub use movement::{
    resolve_motion, FlatGround, MotionConfig, MotionOutcome, PhysicsResolver, Pose, Slide,
    Unobstructed,
};
pub use protocol::{InputCommand, InterpolatedState, PredictedState};
pub use reconcile::{ReconcilePhase, ReconciliationEngine, ReplayOutcome};
pub use server::{AuthoritativeEngine, AuthoritativeUpdate, ServerInputQueue};

/// Default fixed simulation rate, ticks per second.
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Default snapshot broadcast rate, snapshots per second.
pub const DEFAULT_SNAPSHOT_RATE: u32 = 60;

/// Default capacity of the server's recent-history tail.
pub const SERVER_HISTORY_CAPACITY: usize = 20;
