//! # Snapshot Interpolation
//!
//! Renders a remote entity strictly between two received server snapshots.
//!
//! ```text
//! received:   [A]──[B]──[C]──[D]      (queued in arrival order)
//!                   │
//! window:     from=A  to=B   t = elapsed / send interval
//!                   │
//! rendered:   blend(A, B, t)          advance window when t reaches 1
//! ```
//!
//! The window trades a fixed visual lag (nominally three server intervals
//! plus two client ticks) for smoothness that survives jitter and
//! out-of-order arrival inside that lag. There is no extrapolation: an
//! empty queue freezes the pose exactly where it last rendered, even with a
//! window mid-blend, and widens the target delay a little so the window
//! refills deeper next time.

use std::collections::VecDeque;

use crate::protocol::InterpolatedState;

/// Per-remote-entity interpolation window over broadcast snapshots.
#[derive(Clone, Debug)]
pub struct InterpolationBuffer {
    queue: VecDeque<InterpolatedState>,
    from: InterpolatedState,
    to: InterpolatedState,
    elapsed: f32,
    snapshot_interval: f32,
    base_delay: f32,
    target_delay: f32,
    under_runs: u64,
    rendered: InterpolatedState,
}

impl InterpolationBuffer {
    /// Creates a buffer for a stream of snapshots sent every
    /// `snapshot_interval` seconds, with an initial buffering delay of
    /// `target_delay` seconds.
    ///
    /// Both endpoints start at the identity transform.
    #[must_use]
    pub fn new(snapshot_interval: f32, target_delay: f32) -> Self {
        Self {
            queue: VecDeque::new(),
            from: InterpolatedState::IDENTITY,
            to: InterpolatedState::IDENTITY,
            elapsed: 0.0,
            snapshot_interval,
            base_delay: target_delay,
            target_delay,
            under_runs: 0,
            rendered: InterpolatedState::IDENTITY,
        }
    }

    /// Enqueues a received snapshot.
    ///
    /// Snapshots are consumed in the order they arrive; an out-of-order
    /// arrival degrades smoothness for one window but cannot corrupt state,
    /// since the window only ever advances one retained state at a time.
    pub fn push(&mut self, snapshot: InterpolatedState) {
        self.queue.push_back(snapshot);
    }

    /// Advances the window by `delta` seconds and returns the pose to
    /// render.
    ///
    /// With an empty queue the pose holds exactly where it last rendered,
    /// even with a window mid-blend: no extrapolation, no error. Every
    /// starved tick is recorded and widens the target delay by one snapshot
    /// interval, capped at twice the initial delay. Time does not accumulate
    /// while starved; blending resumes from the held point once snapshots
    /// arrive again.
    pub fn advance(&mut self, delta: f32) -> InterpolatedState {
        if self.queue.is_empty() {
            self.under_runs += 1;
            self.target_delay =
                (self.target_delay + self.snapshot_interval).min(self.base_delay * 2.0);
            tracing::trace!(
                under_runs = self.under_runs,
                target_delay = self.target_delay,
                "interpolation queue empty, holding pose"
            );
            return self.rendered;
        }

        self.elapsed += delta;
        let t = (self.elapsed / self.snapshot_interval).clamp(0.0, 1.0);
        self.rendered = InterpolatedState::interpolate(self.from, self.to, t);

        if t >= 1.0 {
            self.from = self.to;
            // Non-empty; checked on entry.
            if let Some(next) = self.queue.pop_front() {
                self.to = next;
            }
            self.elapsed = 0.0;
        }

        self.rendered
    }

    /// The pose most recently returned by [`advance`](Self::advance).
    #[must_use]
    pub const fn rendered(&self) -> InterpolatedState {
        self.rendered
    }

    /// Current buffering delay target, including any under-run widening.
    #[must_use]
    pub const fn target_delay(&self) -> f32 {
        self.target_delay
    }

    /// Number of ticks the buffer has spent starved.
    #[must_use]
    pub const fn under_runs(&self) -> u64 {
        self.under_runs
    }

    /// Snapshots waiting behind the current window.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}
