//=========================================================================
// State Machine
//=========================================================================
//
// Tracks a single current state and announces transitions.
//
// Flow:
//   transition_to(next) ──> StateChanged { previous, next, timestamp }
//                                 ↓
//                           Dispatcher::publish
//
// Transitions to the current state are ignored and publish nothing.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;
use std::time::{Duration, Instant};

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::dispatch::Dispatcher;

//=== State Key Trait =====================================================

/// Marker trait for state identifiers.
///
/// Typically implemented by game-specific enums.
pub trait StateKey: Clone + Copy + Eq + Hash + Debug + Send + 'static {}

//=== StateChanged ========================================================

/// Message published after every real state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChanged<S: StateKey> {
    pub previous: S,
    pub next: S,

    /// When the transition happened.
    pub timestamp: Instant,
}

//=== StateMachine ========================================================

/// Current-state holder that publishes [`StateChanged`] messages.
///
/// # Example
///
/// ```
/// use aetheric_dispatch::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum GameState { Menu, Playing }
/// impl StateKey for GameState {}
///
/// let dispatcher = Dispatcher::new();
/// dispatcher.subscribe_fn(|change: &StateChanged<GameState>| {
///     println!("{:?} -> {:?}", change.previous, change.next);
/// });
///
/// let mut machine = StateMachine::new(GameState::Menu);
/// assert!(machine.transition_to(GameState::Playing, &dispatcher));
/// assert_eq!(machine.current(), GameState::Playing);
/// ```
#[derive(Debug)]
pub struct StateMachine<S: StateKey> {
    current: S,
    entered_at: Instant,
}

impl<S: StateKey> StateMachine<S> {
    /// Starts in `initial` without publishing anything.
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            entered_at: Instant::now(),
        }
    }

    pub fn current(&self) -> S {
        self.current
    }

    /// Time elapsed since the current state was entered.
    pub fn time_in_state(&self) -> Duration {
        self.entered_at.elapsed()
    }

    /// Moves to `next` and publishes a [`StateChanged`].
    ///
    /// Returns false, publishing nothing, if `next` is already current.
    pub fn transition_to(&mut self, next: S, dispatcher: &Dispatcher) -> bool {
        if next == self.current {
            return false;
        }

        let previous = self.current;
        let timestamp = Instant::now();
        self.current = next;
        self.entered_at = timestamp;

        debug!("State {:?} -> {:?}", previous, next);
        dispatcher.publish(StateChanged { previous, next, timestamp });
        true
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Phase {
        Boot,
        Menu,
        Playing,
    }

    impl StateKey for Phase {}

    fn observe(dispatcher: &Dispatcher) -> Arc<Mutex<Vec<StateChanged<Phase>>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        dispatcher.subscribe_fn(move |change: &StateChanged<Phase>| sink.lock().unwrap().push(*change));
        seen
    }

    #[test]
    fn transition_publishes_previous_and_next() {
        let dispatcher = Dispatcher::new();
        let seen = observe(&dispatcher);
        let mut machine = StateMachine::new(Phase::Boot);
        let before = Instant::now();

        assert!(machine.transition_to(Phase::Menu, &dispatcher));
        assert!(machine.transition_to(Phase::Playing, &dispatcher));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!((seen[0].previous, seen[0].next), (Phase::Boot, Phase::Menu));
        assert_eq!((seen[1].previous, seen[1].next), (Phase::Menu, Phase::Playing));
        assert!(seen[0].timestamp >= before);
        assert!(seen[1].timestamp >= seen[0].timestamp);
    }

    #[test]
    fn same_state_is_ignored() {
        let dispatcher = Dispatcher::new();
        let seen = observe(&dispatcher);
        let mut machine = StateMachine::new(Phase::Menu);

        assert!(!machine.transition_to(Phase::Menu, &dispatcher));
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(machine.current(), Phase::Menu);
    }

    #[test]
    fn transition_resets_time_in_state() {
        let dispatcher = Dispatcher::new();
        let mut machine = StateMachine::new(Phase::Boot);
        std::thread::sleep(Duration::from_millis(20));
        let before = machine.time_in_state();

        machine.transition_to(Phase::Menu, &dispatcher);
        assert!(machine.time_in_state() < before);
    }
}
