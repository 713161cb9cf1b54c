//! # Role-Tagged Characters
//!
//! One character type, three mutually exclusive simulation roles:
//!
//! ```text
//! LocallyControlled     sample ▶ predict ▶ history ▶ reconcile on ack
//! ServerAuthoritative   drain queue ▶ resolve ▶ ack + broadcast
//! RemoteInterpolated    buffer snapshots ▶ blend between the two newest
//! ```
//!
//! The role is part of the type, not a runtime branch over a shared bag of
//! optional state: a locally controlled character physically has no
//! interpolation buffer to misuse, and a remote one has no input sampler.
//! Messages addressed to the wrong role are ignored and ticks for the wrong
//! role return nothing.

use slipstream_core::Vec3;

use crate::history::HistoryBuffer;
use crate::input::{ControlState, InputSampler, SessionClock};
use crate::interpolate::InterpolationBuffer;
use crate::movement::{resolve_motion, MotionConfig, PhysicsResolver, Pose};
use crate::protocol::{InputCommand, InterpolatedState, PredictedState};
use crate::reconcile::ReconciliationEngine;
use crate::server::{AuthoritativeEngine, AuthoritativeUpdate};

/// Opaque identity of the peer that owns a character's input.
///
/// Compared for ownership checks only; the value carries no meaning beyond
/// equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OwnerToken(pub u64);

/// State private to the locally controlled role.
#[derive(Clone, Debug)]
struct LocalRole {
    sampler: InputSampler,
    history: HistoryBuffer,
    reconciler: ReconciliationEngine,
}

/// State private to the server-authoritative role.
#[derive(Clone, Debug)]
struct AuthorityRole {
    engine: AuthoritativeEngine,
}

/// State private to the remote-interpolated role.
#[derive(Clone, Debug)]
struct RemoteRole {
    buffer: InterpolationBuffer,
}

#[derive(Clone, Debug)]
enum Role {
    LocallyControlled(LocalRole),
    ServerAuthoritative(AuthorityRole),
    RemoteInterpolated(RemoteRole),
}

/// A networked character in exactly one simulation role.
#[derive(Clone, Debug)]
pub struct Character {
    owner: OwnerToken,
    pose: Pose,
    velocity: Vec3,
    role: Role,
}

impl Character {
    /// Creates the locally controlled character for `owner`.
    ///
    /// The session clock starts here; every sampled input is stamped with
    /// elapsed time from this moment.
    #[must_use]
    pub fn local(owner: OwnerToken) -> Self {
        tracing::info!(owner = owner.0, "character created: locally controlled");
        Self {
            owner,
            pose: Pose::IDENTITY,
            velocity: Vec3::ZERO,
            role: Role::LocallyControlled(LocalRole {
                sampler: InputSampler::new(SessionClock::start()),
                history: HistoryBuffer::unbounded(),
                reconciler: ReconciliationEngine::new(),
            }),
        }
    }

    /// Creates the server-side authoritative character for `owner`, with a
    /// bounded recent-history tail of `history_capacity` states.
    #[must_use]
    pub fn authoritative(owner: OwnerToken, history_capacity: usize) -> Self {
        tracing::info!(owner = owner.0, "character created: server authoritative");
        Self {
            owner,
            pose: Pose::IDENTITY,
            velocity: Vec3::ZERO,
            role: Role::ServerAuthoritative(AuthorityRole {
                engine: AuthoritativeEngine::new(history_capacity),
            }),
        }
    }

    /// Creates a remote observer's view of `owner`'s character, rendered
    /// `target_delay` seconds behind the snapshot stream.
    #[must_use]
    pub fn remote(owner: OwnerToken, snapshot_interval: f32, target_delay: f32) -> Self {
        tracing::info!(owner = owner.0, "character created: remote interpolated");
        Self {
            owner,
            pose: Pose::IDENTITY,
            velocity: Vec3::ZERO,
            role: Role::RemoteInterpolated(RemoteRole {
                buffer: InterpolationBuffer::new(snapshot_interval, target_delay),
            }),
        }
    }

    /// The peer that owns this character's input.
    #[must_use]
    pub const fn owner(&self) -> OwnerToken {
        self.owner
    }

    /// Current pose under this role's rules.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.pose
    }

    /// Current residual velocity. Always zero for the remote role.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// One fixed tick of the locally controlled role.
    ///
    /// Applies any pending reconciliation first, then samples, predicts, and
    /// records the new state. Returns the sampled command for the caller to
    /// forward to the server; `None` on any other role.
    pub fn local_tick(
        &mut self,
        controls: ControlState,
        delta: f32,
        config: &MotionConfig,
        world: &dyn PhysicsResolver,
    ) -> Option<InputCommand> {
        let Role::LocallyControlled(local) = &mut self.role else {
            return None;
        };

        local.reconciler.apply(
            &mut local.history,
            &mut self.pose,
            &mut self.velocity,
            delta,
            config,
            world,
        );

        let command = local.sampler.sample(controls);
        let outcome = resolve_motion(self.pose, self.velocity, &command, delta, config, world);
        self.pose = outcome.pose;
        self.velocity = outcome.velocity;
        // Refused only if the clock failed to advance within one tick.
        let _ = local.history.push(outcome.state);

        Some(command)
    }

    /// Delivers a server acknowledgment to the locally controlled role.
    ///
    /// The rewind/replay runs at the start of the next
    /// [`local_tick`](Self::local_tick), not here. Ignored on any other role.
    pub fn receive_ack(&mut self, ack: PredictedState) {
        if let Role::LocallyControlled(local) = &mut self.role {
            local.reconciler.acknowledge(ack);
        }
    }

    /// One fixed tick of the server-authoritative role.
    ///
    /// Drains every queued input through the shared resolver and returns the
    /// ack/broadcast pair, `None` when no input arrived or on any other role.
    pub fn authoritative_tick(
        &mut self,
        delta: f32,
        config: &MotionConfig,
        world: &dyn PhysicsResolver,
    ) -> Option<AuthoritativeUpdate> {
        let Role::ServerAuthoritative(authority) = &mut self.role else {
            return None;
        };
        authority
            .engine
            .fixed_tick(&mut self.pose, &mut self.velocity, delta, config, world)
    }

    /// Queues a client command on the server-authoritative role.
    ///
    /// Ignored on any other role.
    pub fn receive_input(&mut self, command: InputCommand) {
        if let Role::ServerAuthoritative(authority) = &mut self.role {
            authority.engine.enqueue(command);
        }
    }

    /// Delivers a broadcast snapshot to the remote-interpolated role.
    ///
    /// Ignored on any other role.
    pub fn receive_snapshot(&mut self, snapshot: InterpolatedState) {
        if let Role::RemoteInterpolated(remote) = &mut self.role {
            remote.buffer.push(snapshot);
        }
    }

    /// One frame of the remote-interpolated role.
    ///
    /// Advances the interpolation window and updates the pose to the blended
    /// transform. Returns the rendered transform; the current pose unchanged
    /// on any other role.
    pub fn remote_tick(&mut self, delta: f32) -> InterpolatedState {
        if let Role::RemoteInterpolated(remote) = &mut self.role {
            let rendered = remote.buffer.advance(delta);
            self.pose = Pose {
                position: rendered.position,
                orientation: rendered.orientation,
            };
        }
        InterpolatedState {
            position: self.pose.position,
            orientation: self.pose.orientation,
        }
    }

    /// Snapshots waiting in the remote role's interpolation queue; zero for
    /// the other roles.
    #[must_use]
    pub fn queued_snapshots(&self) -> usize {
        match &self.role {
            Role::RemoteInterpolated(remote) => remote.buffer.queued(),
            _ => 0,
        }
    }
}
