//=========================================================================
// Input Event Types
//
// Normalised input flowing into the `InputManager` and the action
// messages it publishes.
//
// Event Flow:
// ```text
// Platform Layer (Winit WindowEvent)
//         ↓  platform::map_window_event
//    RawInput (this module)
//         ↓  InputManager::process
//    ActionEvent<A> (published through the Dispatcher)
// ```
//
// Key and button identifiers are winit's own types; the crate never polls
// devices, it only receives what the platform layer produced.
//
//=========================================================================

//=== External Dependencies ===============================================

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

//=== RawInput ============================================================

/// One normalised platform input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    /// A physical key went down (repeats arrive as further `KeyDown`s).
    KeyDown(KeyCode),

    /// A physical key was released.
    KeyUp(KeyCode),

    /// A mouse button went down.
    MouseButtonDown(MouseButton),

    /// A mouse button was released.
    MouseButtonUp(MouseButton),

    /// Cursor moved to an absolute window position, in pixels.
    MouseMoved { x: f32, y: f32 },
}

//=== Binding =============================================================

/// Input source that can drive an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    /// A keyboard key, treated as a button.
    Key(KeyCode),

    /// A mouse button.
    Button(MouseButton),

    /// The cursor position, treated as a 2D value.
    Pointer,
}

//=== ActionPhase =========================================================

/// Lifecycle phase of an action notification.
///
/// Buttons go `Started` → `Performed` on press and `Canceled` on release.
/// Value actions (the pointer) report every change as `Performed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionPhase {
    Started,
    Performed,
    Canceled,
}

//=== ActionEvent =========================================================

/// Message published for each phase change of a bound action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionEvent<A> {
    /// The game-defined action.
    pub action: A,

    /// Which phase the action just entered.
    pub phase: ActionPhase,

    /// 2D value for value actions, `None` for buttons.
    pub value: Option<(f32, f32)>,
}

impl<A> ActionEvent<A> {
    pub fn new(action: A, phase: ActionPhase, value: Option<(f32, f32)>) -> Self {
        Self { action, phase, value }
    }

    /// Shorthand for a button phase without a value.
    pub fn button(action: A, phase: ActionPhase) -> Self {
        Self::new(action, phase, None)
    }
}
