//! # Transport Channels
//!
//! Typed in-process channels with the two delivery disciplines the protocol
//! assumes.
//!
//! ```text
//! reliable:    every message, in send order        (input commands)
//! unreliable:  latest wins, stale messages skipped (acks)
//!              or drained in order                 (snapshots)
//! ```
//!
//! These are loopback endpoints for tests, tools, and listen servers; a real
//! network transport replaces them behind the same receive patterns. Sends
//! never block and a hung-up peer is not an error: messages to a dropped
//! receiver are discarded, matching how a real socket behaves once the far
//! side is gone.

use crossbeam_channel::{unbounded, Receiver, Sender};

/// Sending half of a reliable ordered channel.
#[derive(Clone, Debug)]
pub struct ReliableSender<T> {
    inner: Sender<T>,
}

impl<T> ReliableSender<T> {
    /// Sends a message. Discarded silently if the receiver is gone.
    pub fn send(&self, message: T) {
        let _ = self.inner.send(message);
    }
}

/// Receiving half of a reliable ordered channel.
#[derive(Clone, Debug)]
pub struct ReliableReceiver<T> {
    inner: Receiver<T>,
}

impl<T> ReliableReceiver<T> {
    /// Takes every message received so far, in send order, without blocking.
    pub fn drain(&self) -> impl Iterator<Item = T> + '_ {
        self.inner.try_iter()
    }
}

/// Creates a reliable ordered channel pair.
#[must_use]
pub fn reliable<T>() -> (ReliableSender<T>, ReliableReceiver<T>) {
    let (tx, rx) = unbounded();
    (ReliableSender { inner: tx }, ReliableReceiver { inner: rx })
}

/// Sending half of an unreliable channel.
#[derive(Clone, Debug)]
pub struct UnreliableSender<T> {
    inner: Sender<T>,
}

impl<T> UnreliableSender<T> {
    /// Sends a message. Discarded silently if the receiver is gone.
    pub fn send(&self, message: T) {
        let _ = self.inner.send(message);
    }
}

/// Receiving half of an unreliable channel.
#[derive(Clone, Debug)]
pub struct UnreliableReceiver<T> {
    inner: Receiver<T>,
}

impl<T> UnreliableReceiver<T> {
    /// Takes only the newest message, dropping anything older.
    ///
    /// The receive pattern for acknowledgments: a newer authoritative state
    /// supersedes every stale one behind it.
    pub fn latest(&self) -> Option<T> {
        self.inner.try_iter().last()
    }

    /// Takes every message received so far, in arrival order.
    ///
    /// The receive pattern for snapshots: each one feeds the interpolation
    /// queue, so skipping would shorten the window.
    pub fn drain(&self) -> impl Iterator<Item = T> + '_ {
        self.inner.try_iter()
    }
}

/// Creates an unreliable channel pair.
#[must_use]
pub fn unreliable<T>() -> (UnreliableSender<T>, UnreliableReceiver<T>) {
    let (tx, rx) = unbounded();
    (
        UnreliableSender { inner: tx },
        UnreliableReceiver { inner: rx },
    )
}
