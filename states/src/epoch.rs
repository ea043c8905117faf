//! Epoch tagging for queued events.
//!
//! Every event pushed through an [`EventSender`](crate::EventSender) is wrapped in an
//! [`Envelope`] stamped with the [`Epoch`] that was current when the work producing it
//! started. An epoch-starting event (for example a reset) advances the shared counter,
//! so terminal events of work that began before it carry an older epoch.
//!
//! # Example
//!
//! ```ignore
//! let counter = EpochCounter::default();
//! let started = counter.current();
//!
//! // A reset happens while the request is in flight.
//! counter.advance();
//!
//! assert!(started < counter.current());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generation number of a session's visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    /// The epoch every store starts in.
    pub const INITIAL: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw generation counter.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Epoch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "epoch#{}", self.0)
    }
}

/// Shared, monotonically increasing epoch counter.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct EpochCounter {
    inner: Arc<AtomicU64>,
}

impl EpochCounter {
    pub fn current(&self) -> Epoch {
        Epoch(self.inner.load(Ordering::Acquire))
    }

    /// Moves to the next epoch and returns it.
    pub fn advance(&self) -> Epoch {
        Epoch(self.inner.fetch_add(1, Ordering::AcqRel) + 1)
    }
}

/// An event together with the epoch it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope<E> {
    epoch: Epoch,
    event: E,
}

impl<E> Envelope<E> {
    pub fn new(epoch: Epoch, event: E) -> Self {
        Self { epoch, event }
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn into_event(self) -> E {
        self.event
    }
}
