//=========================================================================
// Platform Event Mapper
//
// Converts Winit window events into `RawInput` for the input manager.
// Keeps OS-specific event shapes out of the dispatch and input layers.
//
// Responsibilities:
// - Translate keyboard, mouse-button and cursor events
// - Drop everything else (resize, focus, IME, ...) as `None`
//
//=========================================================================

use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::PhysicalKey;

use crate::core::input::RawInput;

//=== map_window_event() ==================================================
//
// Notes:
// - `KeyboardInput` becomes `KeyDown`/`KeyUp`; keys without a physical
//   code (`PhysicalKey::Unidentified`) are dropped.
// - OS key repeats still map to `KeyDown`; the input manager ignores
//   them while the key is held.
// - `CursorMoved` positions are narrowed from f64 to f32.
//

/// Translates one window event into a [`RawInput`], if it carries input.
pub fn map_window_event(event: &WindowEvent) -> Option<RawInput> {
    match event {
        //--- Keyboard Input ----------------------------------------------
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state,
                    ..
                },
            ..
        } => Some(match state {
            ElementState::Pressed => RawInput::KeyDown(*code),
            ElementState::Released => RawInput::KeyUp(*code),
        }),

        //--- Mouse Button Input ------------------------------------------
        WindowEvent::MouseInput { state, button, .. } => Some(match state {
            ElementState::Pressed => RawInput::MouseButtonDown(*button),
            ElementState::Released => RawInput::MouseButtonUp(*button),
        }),

        //--- Mouse Movement ----------------------------------------------
        WindowEvent::CursorMoved { position, .. } => Some(RawInput::MouseMoved {
            x: position.x as f32,
            y: position.y as f32,
        }),

        _ => None,
    }
}

/// Maps a batch of window events, keeping only input-bearing ones.
pub fn map_window_events<'a>(events: impl IntoIterator<Item = &'a WindowEvent>) -> Vec<RawInput> {
    events.into_iter().filter_map(map_window_event).collect()
}

//=========================================================================
// Unit Tests
//=========================================================================
