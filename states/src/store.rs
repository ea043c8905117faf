//! The state container.
//!
//! A [`Store`] exclusively owns one reducer's state. Producers never touch the state;
//! they push events through an [`EventSender`] and the store applies them, in the
//! order they were queued, whenever [`Store::sync`] runs.

use flume::{Receiver, Sender};
use log::{debug, trace};

use crate::epoch::{Envelope, Epoch, EpochCounter};
use crate::{Error, Reducer, StalePolicy};

/// Cloneable producer side of a store's event queue.
pub struct EventSender<E> {
    send: Sender<Envelope<E>>,
    epoch: EpochCounter,
    starts_epoch: fn(&E) -> bool,
}

impl<E> Clone for EventSender<E> {
    fn clone(&self) -> Self {
        Self {
            send: self.send.clone(),
            epoch: self.epoch.clone(),
            starts_epoch: self.starts_epoch,
        }
    }
}

impl<E> std::fmt::Debug for EventSender<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSender")
            .field("epoch", &self.epoch.current())
            .field("queued", &self.send.len())
            .finish()
    }
}

impl<E> EventSender<E> {
    /// The epoch new work should be stamped with.
    pub fn current_epoch(&self) -> Epoch {
        self.epoch.current()
    }

    /// Queue an event in the current epoch.
    ///
    /// Epoch-starting events advance the shared counter first and are stamped with the
    /// new epoch.
    pub fn emit(&self, event: E) -> Result<Epoch, Error> {
        let epoch = if (self.starts_epoch)(&event) {
            self.epoch.advance()
        } else {
            self.epoch.current()
        };
        self.emit_in(epoch, event)?;
        Ok(epoch)
    }

    /// Queue an event that belongs to work started in `epoch`.
    pub fn emit_in(&self, epoch: Epoch, event: E) -> Result<(), Error> {
        self.send
            .send(Envelope::new(epoch, event))
            .map_err(|_| Error::channel_closed(format!("emit in {epoch}")))
    }
}

/// Owns a reducer's state and the receiving end of its event queue.
pub struct Store<R: Reducer> {
    state: R::State,
    send: Sender<Envelope<R::Event>>,
    recv: Receiver<Envelope<R::Event>>,
    epoch: EpochCounter,
    policy: StalePolicy,
    applied_epoch: Epoch,
    applied: u64,
    discarded: u64,
}

impl<R: Reducer> std::fmt::Debug for Store<R>
where
    R::State: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("applied_epoch", &self.applied_epoch)
            .field("queued", &self.recv.len())
            .field("applied", &self.applied)
            .field("discarded", &self.discarded)
            .finish()
    }
}

impl<R: Reducer> Default for Store<R> {
    fn default() -> Self {
        Self::new(StalePolicy::default())
    }
}

impl<R: Reducer> Store<R> {
    /// Create a store holding `R::State::default()`.
    pub fn new(policy: StalePolicy) -> Self {
        Self::with_state(R::State::default(), policy)
    }

    pub fn with_state(state: R::State, policy: StalePolicy) -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            state,
            send,
            recv,
            epoch: EpochCounter::default(),
            policy,
            applied_epoch: Epoch::INITIAL,
            applied: 0,
            discarded: 0,
        }
    }

    pub fn sender(&self) -> EventSender<R::Event> {
        EventSender {
            send: self.send.clone(),
            epoch: self.epoch.clone(),
            starts_epoch: R::starts_epoch,
        }
    }

    pub fn state(&self) -> &R::State {
        &self.state
    }

    pub fn policy(&self) -> StalePolicy {
        self.policy
    }

    /// Number of events waiting to be applied.
    pub fn queued(&self) -> usize {
        self.recv.len()
    }

    pub fn applied_count(&self) -> u64 {
        self.applied
    }

    pub fn discarded_count(&self) -> u64 {
        self.discarded
    }

    /// Apply one event right away, bypassing the queue.
    ///
    /// Anything already queued is applied first so ordering is preserved.
    pub fn apply(&mut self, event: R::Event) {
        self.sync();
        let epoch = if R::starts_epoch(&event) {
            self.epoch.advance()
        } else {
            self.epoch.current()
        };
        self.apply_envelope(Envelope::new(epoch, event));
    }

    /// Drain the queue, applying events in FIFO order. Returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(envelope) = self.recv.try_recv() {
            if self.apply_envelope(envelope) {
                applied += 1;
            }
        }
        if applied > 0 {
            trace!("Store::sync applied {applied} event(s)");
        }
        applied
    }

    /// Tear the store down and hand back the final state.
    ///
    /// Events still queued are dropped.
    pub fn into_state(self) -> R::State {
        self.state
    }

    fn apply_envelope(&mut self, envelope: Envelope<R::Event>) -> bool {
        let epoch = envelope.epoch();
        if self.policy == StalePolicy::DiscardStale && epoch < self.applied_epoch {
            self.discarded += 1;
            debug!(
                "Store: discarding event from {epoch}, current is {}",
                self.applied_epoch
            );
            return false;
        }

        let event = envelope.into_event();
        let boundary = R::starts_epoch(&event);
        let state = std::mem::take(&mut self.state);
        self.state = R::reduce(state, event);
        self.applied += 1;

        if boundary && epoch > self.applied_epoch {
            self.applied_epoch = epoch;
        }
        true
    }
}
