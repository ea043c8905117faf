/// A pure fold from `(state, event)` to the next state.
///
/// Implementations must not perform IO. The [`Store`](crate::Store) is the only caller.
pub trait Reducer {
    type State: Default;
    type Event;

    fn reduce(state: Self::State, event: Self::Event) -> Self::State;

    /// Whether applying `event` begins a new epoch (e.g. a full reset).
    fn starts_epoch(_event: &Self::Event) -> bool {
        false
    }
}

/// What the store does with an event stamped with an epoch older than the
/// last applied epoch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Apply it anyway. A late result may repopulate state after a reset.
    #[default]
    Apply,
    /// Drop it.
    DiscardStale,
}
