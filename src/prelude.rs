//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_dispatch::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Dispatcher
pub use crate::core::dispatch::{
    Callback, DispatchError, Dispatcher, DispatcherBuilder, Handler, Message, PublishReport,
    RemotePublisher,
};

// Input system
pub use crate::core::input::{
    Action, ActionEvent, ActionPhase, Binding, InputManager, KeyCode, MouseButton, RawInput,
};

// State system
pub use crate::core::state::{StateChanged, StateKey, StateMachine};

// Platform mapping
pub use crate::platform::map_window_event;
