//! # Reconciliation
//!
//! Rewinds the predicted client to a server-confirmed state and replays the
//! still-unacknowledged inputs through the shared movement function.
//!
//! ```text
//! Predicted:  [1] [2] [3] [4] [5]
//!                      │
//! Server ack ──────────┘ (time 3)
//!
//! Rewind to ack, discard 1..=3, replay [4] [5] in place.
//! ```
//!
//! The engine is a two-state machine: `Idle` until an acknowledgment
//! arrives, `PendingReplay` until that acknowledgment has been applied. A
//! pending acknowledgment is never silently dropped: if the history is
//! empty when the tick comes around, the replay is deferred until history
//! exists again.

use slipstream_core::Vec3;

use crate::history::HistoryBuffer;
use crate::movement::{resolve_motion, MotionConfig, PhysicsResolver, Pose};
use crate::protocol::PredictedState;

/// Where the engine is in its acknowledge/replay cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReconcilePhase {
    /// No unreplayed divergence.
    #[default]
    Idle,
    /// An authoritative acknowledgment is waiting to be applied.
    PendingReplay,
}

/// What one reconciliation tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayOutcome {
    /// Nothing pending.
    Idle,
    /// Pending acknowledgment, but no history to rewind yet; retried next
    /// tick.
    Deferred,
    /// Rewind and replay completed.
    Replayed {
        /// History entries discarded at or before the ack time.
        discarded: usize,
        /// History entries re-resolved after the rewind.
        replayed: usize,
    },
}

/// Client-side reconciliation engine for the locally controlled entity.
#[derive(Clone, Debug, Default)]
pub struct ReconciliationEngine {
    phase: ReconcilePhase,
    pending: PredictedState,
    last_applied_time: f64,
}

impl ReconciliationEngine {
    /// Creates an idle engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ReconcilePhase {
        self.phase
    }

    /// Accepts an authoritative acknowledgment.
    ///
    /// Stale or duplicate acknowledgments (time at or before the last one
    /// applied, or before a newer one already pending) are a no-op; returns
    /// whether the ack was accepted.
    pub fn acknowledge(&mut self, ack: PredictedState) -> bool {
        if ack.time() <= self.last_applied_time {
            return false;
        }
        if self.phase == ReconcilePhase::PendingReplay && ack.time() <= self.pending.time() {
            return false;
        }
        self.pending = ack;
        self.phase = ReconcilePhase::PendingReplay;
        true
    }

    /// Runs the pending rewind/replay against the local simulation state.
    ///
    /// Call once per local fixed tick, before sampling new input. On replay,
    /// `pose` and `velocity` are reset to the acknowledged values and every
    /// remaining history entry is re-resolved in ascending time order, its
    /// cached result overwritten in place.
    pub fn apply(
        &mut self,
        history: &mut HistoryBuffer,
        pose: &mut Pose,
        velocity: &mut Vec3,
        delta: f32,
        config: &MotionConfig,
        world: &dyn PhysicsResolver,
    ) -> ReplayOutcome {
        if self.phase != ReconcilePhase::PendingReplay {
            return ReplayOutcome::Idle;
        }
        if history.is_empty() {
            // Nothing to rewind against; the ack stays pending.
            return ReplayOutcome::Deferred;
        }

        let ack = self.pending;
        let discarded = history.discard_through(ack.time());

        // The rewind: authoritative pose and residual velocity.
        *pose = Pose {
            position: ack.position,
            orientation: ack.orientation,
        };
        *velocity = ack.velocity_remainder;

        // The replay: unacknowledged inputs through the shared resolver.
        let mut replayed = 0;
        for entry in history.iter_mut() {
            let outcome = resolve_motion(*pose, *velocity, &entry.input, delta, config, world);
            *entry = outcome.state;
            *pose = outcome.pose;
            *velocity = outcome.velocity;
            replayed += 1;
        }

        self.last_applied_time = ack.time();
        self.phase = ReconcilePhase::Idle;
        tracing::debug!(
            ack_time = ack.time(),
            discarded,
            replayed,
            "reconciled against authoritative state"
        );

        ReplayOutcome::Replayed {
            discarded,
            replayed,
        }
    }
}
