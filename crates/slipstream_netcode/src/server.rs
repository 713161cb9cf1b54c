//! # Authoritative Server Side
//!
//! Per-entity input queue and the authoritative fixed tick that drains it.
//!
//! Inputs are applied in ARRIVAL order, not input-time order: a late,
//! earlier-stamped command must not block commands that are already here.
//! Every drained input is resolved with the same fixed delta regardless of
//! wall-clock spacing, so bursty arrival makes the authoritative simulation
//! run ahead of or behind real time. That drift is an accepted
//! characteristic the client's interpolation layer absorbs; it is not
//! corrected here.

use std::collections::VecDeque;

use slipstream_core::Vec3;

use crate::history::HistoryBuffer;
use crate::movement::{resolve_motion, MotionConfig, PhysicsResolver, Pose};
use crate::protocol::{InputCommand, InterpolatedState, PredictedState};

/// Arrival-order FIFO of commands awaiting authoritative processing.
#[derive(Clone, Debug, Default)]
pub struct ServerInputQueue {
    commands: VecDeque<InputCommand>,
}

impl ServerInputQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues a command in arrival order.
    pub fn push(&mut self, command: InputCommand) {
        self.commands.push_back(command);
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Removes and returns the oldest command.
    pub fn pop(&mut self) -> Option<InputCommand> {
        self.commands.pop_front()
    }
}

/// What one authoritative tick produced.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AuthoritativeUpdate {
    /// The newest resolved state, sent to the owning client as the
    /// acknowledgment.
    pub ack: PredictedState,
    /// Transform-only snapshot of the same state, broadcast to observers.
    pub snapshot: InterpolatedState,
    /// How many inputs were drained this tick.
    pub processed: usize,
}

/// Authoritative simulation for one server-owned entity.
///
/// The single source of truth for that entity's motion. Holds the input
/// queue and a bounded history tail; the tail answers recent-history
/// queries and is never replayed.
#[derive(Clone, Debug)]
pub struct AuthoritativeEngine {
    queue: ServerInputQueue,
    history: HistoryBuffer,
}

impl AuthoritativeEngine {
    /// Creates an engine with a bounded history of `history_capacity`
    /// states.
    #[must_use]
    pub fn new(history_capacity: usize) -> Self {
        Self {
            queue: ServerInputQueue::new(),
            history: HistoryBuffer::bounded(history_capacity),
        }
    }

    /// Accepts a command from the owning client, in arrival order.
    pub fn enqueue(&mut self, command: InputCommand) {
        self.queue.push(command);
    }

    /// Number of commands waiting for the next tick.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The bounded recent-history tail.
    #[must_use]
    pub const fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Drains the queue through the shared resolver, one fixed `delta` per
    /// input.
    ///
    /// Returns the ack/broadcast pair for the newest resolved state, or
    /// `None` if no input arrived since the last tick.
    pub fn fixed_tick(
        &mut self,
        pose: &mut Pose,
        velocity: &mut Vec3,
        delta: f32,
        config: &MotionConfig,
        world: &dyn PhysicsResolver,
    ) -> Option<AuthoritativeUpdate> {
        let mut newest: Option<PredictedState> = None;
        let mut processed = 0;

        while let Some(command) = self.queue.pop() {
            let outcome = resolve_motion(*pose, *velocity, &command, delta, config, world);
            *pose = outcome.pose;
            *velocity = outcome.velocity;

            // The tail stays strictly time-ordered; an out-of-order arrival
            // is simulated but not recorded.
            let _ = self.history.push(outcome.state);
            newest = Some(outcome.state);
            processed += 1;
        }

        let ack = newest?;
        tracing::debug!(processed, ack_time = ack.time(), "authoritative drain");

        Some(AuthoritativeUpdate {
            ack,
            snapshot: InterpolatedState {
                position: ack.position,
                orientation: ack.orientation,
            },
            processed,
        })
    }
}
