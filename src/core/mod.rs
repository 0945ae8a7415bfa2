//=========================================================================
// Core
//
// Engine-independent systems built around the typed dispatcher.
//
// Responsibilities:
// - `dispatch`: typed publish/subscribe registry (the backbone)
// - `singleton` / `global`: opt-in process-wide instances
// - `input`: raw input → action messages
// - `state`: state transitions → state messages
//
// Every collaborator talks to the others only through `Dispatcher`
// messages; none holds a reference to another.
//
//=========================================================================

pub mod dispatch;
pub mod global;
pub mod input;
pub mod singleton;
pub mod state;

//=== Re-exports ==========================================================

pub use dispatch::{Callback, DispatchError, Dispatcher, DispatcherBuilder, Handler, Message};
pub use input::{Action, InputManager};
pub use state::{StateKey, StateMachine};
