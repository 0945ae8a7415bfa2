//=========================================================================
// Aetheric Dispatch — Library Root
//
// Typed publish/subscribe for game code, plus the small collaborators
// that feed it.
//
// Responsibilities:
// - Expose the `Dispatcher` and its subscriber kinds
// - Provide input and state collaborators that publish typed messages
// - Map windowing-backend events into engine-level input
//
// Typical usage:
// ```
// use aetheric_dispatch::prelude::*;
//
// struct Ping;
//
// let dispatcher = Dispatcher::new();
// dispatcher.subscribe_fn(|_: &Ping| println!("pong"));
// dispatcher.publish(Ping);
// dispatcher.clear();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the dispatcher and the systems that publish through it.
//
pub mod core;

// `platform` translates Winit window events into `RawInput`.
//
pub mod platform;

pub mod prelude;

//--- Public Exports ------------------------------------------------------

pub use crate::core::dispatch::{Dispatcher, DispatcherBuilder};
