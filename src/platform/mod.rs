//=========================================================================
// Platform
//
// Thin boundary between the windowing backend (Winit) and the engine-level
// input types. The crate never owns an event loop: the application feeds
// the events it already receives through these mappers.
//
// Typical flow (application side):
// ```text
//   ApplicationHandler::window_event(event)
//         ↓ map_window_event
//   Vec<RawInput> (one frame)
//         ↓ InputManager::process
//   ActionEvent<A> on the Dispatcher
// ```
//
//=========================================================================

//=== Submodules ==========================================================

mod event_mapper;

//=== Public API ==========================================================

pub use event_mapper::{map_window_event, map_window_events};
