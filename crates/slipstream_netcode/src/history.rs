//! # Prediction History
//!
//! Ordered record of predicted states, keyed by input capture time.
//!
//! The owning client keeps an unbounded history of unacknowledged
//! predictions and truncates it on reconciliation. The server keeps a
//! bounded tail (oldest evicted first) purely as a recent-history audit
//! trail; it is never replayed there.
//!
//! ```text
//! append ──▶ [t=1] [t=2] [t=3] [t=4] [t=5]
//!                        ▲
//! discard_through(3) ────┘  leaves [t=4] [t=5]
//! ```

use std::collections::VecDeque;

use crate::protocol::PredictedState;

/// Bounded or unbounded ordered sequence of [`PredictedState`].
///
/// Invariant: `input.time` is strictly increasing across entries; appending
/// a state at or before the newest entry's time is refused.
#[derive(Clone, Debug, Default)]
pub struct HistoryBuffer {
    states: VecDeque<PredictedState>,
    capacity: Option<usize>,
}

impl HistoryBuffer {
    /// Creates an unbounded buffer (client prediction side).
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            states: VecDeque::new(),
            capacity: None,
        }
    }

    /// Creates a bounded buffer that evicts its oldest entry when full
    /// (server audit tail).
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            states: VecDeque::with_capacity(capacity),
            capacity: Some(capacity.max(1)),
        }
    }

    /// Appends a state.
    ///
    /// Returns false, without modifying the buffer, if the state's input
    /// time is not strictly after the newest entry. Duplicate and
    /// out-of-order times never enter the buffer.
    pub fn push(&mut self, state: PredictedState) -> bool {
        if let Some(last) = self.states.back() {
            if state.time() <= last.time() {
                return false;
            }
        }
        if let Some(capacity) = self.capacity {
            while self.states.len() >= capacity {
                self.states.pop_front();
            }
        }
        self.states.push_back(state);
        true
    }

    /// Discards every entry whose input time is at or before `time`.
    ///
    /// The acknowledgment time is a threshold, not a lookup: it need not
    /// match any buffered entry exactly. Returns the number discarded.
    pub fn discard_through(&mut self, time: f64) -> usize {
        let before = self.states.len();
        while let Some(front) = self.states.front() {
            if front.time() <= time {
                self.states.pop_front();
            } else {
                break;
            }
        }
        before - self.states.len()
    }

    /// The newest entry, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&PredictedState> {
        self.states.back()
    }

    /// The oldest entry, if any.
    #[must_use]
    pub fn oldest(&self) -> Option<&PredictedState> {
        self.states.front()
    }

    /// Number of buffered states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True if the buffer holds no states.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterates entries in ascending time order.
    pub fn iter(&self) -> impl Iterator<Item = &PredictedState> {
        self.states.iter()
    }

    /// Mutable iteration in ascending time order, for in-place replay.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut PredictedState> {
        self.states.iter_mut()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::InputCommand;

    fn state_at(time: f64) -> PredictedState {
        PredictedState {
            input: InputCommand {
                time,
                ..InputCommand::IDENTITY
            },
            ..PredictedState::IDENTITY
        }
    }

    #[test]
    fn test_push_keeps_times_strictly_increasing() {
        let mut history = HistoryBuffer::unbounded();
        assert!(history.push(state_at(1.0)));
        assert!(history.push(state_at(2.0)));

        // Duplicate and out-of-order times are refused.
        assert!(!history.push(state_at(2.0)));
        assert!(!history.push(state_at(1.5)));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_bounded_evicts_oldest() {
        let mut history = HistoryBuffer::bounded(3);
        for t in 1..=5 {
            assert!(history.push(state_at(f64::from(t))));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.oldest().unwrap().time(), 3.0);
        assert_eq!(history.latest().unwrap().time(), 5.0);
    }

    #[test]
    fn test_discard_through_exact_time() {
        let mut history = HistoryBuffer::unbounded();
        for t in 1..=5 {
            history.push(state_at(f64::from(t)));
        }
        assert_eq!(history.discard_through(3.0), 3);
        assert_eq!(history.oldest().unwrap().time(), 4.0);
    }

    #[test]
    fn test_discard_through_threshold_time() {
        let mut history = HistoryBuffer::unbounded();
        for t in 1..=5 {
            history.push(state_at(f64::from(t)));
        }
        // 3.5 matches no entry; everything at or before it still goes.
        assert_eq!(history.discard_through(3.5), 3);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_discard_through_everything() {
        let mut history = HistoryBuffer::unbounded();
        history.push(state_at(1.0));
        history.push(state_at(2.0));
        assert_eq!(history.discard_through(10.0), 2);
        assert!(history.is_empty());
    }

    #[test]
    fn test_iter_ascending() {
        let mut history = HistoryBuffer::unbounded();
        for t in [0.5, 1.0, 2.5] {
            history.push(state_at(t));
        }
        let times: Vec<f64> = history.iter().map(PredictedState::time).collect();
        assert_eq!(times, vec![0.5, 1.0, 2.5]);
    }
}
