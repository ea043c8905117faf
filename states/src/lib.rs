//! Reducer-driven state container.
//!
//! - [`Reducer`]: a pure `(state, event) -> state` fold.
//! - [`Store`]: exclusively owns the state and applies queued events.
//! - [`EventSender`]: the only way producers talk to a store.
//! - [`Epoch`]: generation stamp used to recognise events from work that began
//!   before the last reset (see [`StalePolicy`]).

mod epoch;
mod error;
mod reducer;
mod store;

pub use epoch::{Envelope, Epoch, EpochCounter};
pub use error::Error;
pub use reducer::{Reducer, StalePolicy};
pub use store::{EventSender, Store};
