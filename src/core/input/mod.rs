//=========================================================================
// Input
//
// Bridges platform input into the dispatcher as typed action messages.
//
// Architecture:
//   RawInput ──> InputManager<A> ──bindings──> ActionEvent<A> ──> Dispatcher
//                     │
//                     └─ queries: held keys/buttons, cursor, active actions
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Module Declarations =================================================

pub mod event;
mod input_manager;

//=== Public API ==========================================================

pub use event::{ActionEvent, ActionPhase, Binding, KeyCode, MouseButton, RawInput};
pub use input_manager::InputManager;

//=== Action Trait ========================================================

/// Marker trait for game-defined action enums.
///
/// Actions represent high-level gameplay commands (Jump, Shoot, OpenMenu)
/// resolved from raw inputs. The input manager publishes them without
/// interpreting them.
///
/// # Requirements
///
/// - `Copy + Eq + Hash`: Efficient passing and use as map keys
/// - `Debug`: Logging support
/// - `Send + 'static`: Required to travel as a dispatcher message
///
/// # Example
///
/// ```
/// use aetheric_dispatch::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum GameAction { Jump, Shoot, Reload }
///
/// impl Action for GameAction {}
/// ```
pub trait Action: 'static + Send + Copy + Eq + Hash + Debug {}
