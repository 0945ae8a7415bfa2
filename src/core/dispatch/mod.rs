//=========================================================================
// Dispatch
//=========================================================================
//
// Typed publish/subscribe for decoupled communication between systems.
//
// Architecture:
//   Publishers ── publish<M>() ──> Dispatcher ──> Callback<M> (in order)
//                                      │      └─> Handler<M>  (in order)
//   Other threads ── RemotePublisher ──┘ (queued until pump())
//
// Pattern: subscribe → publish (synchronous fan-out) → clear at teardown
//
//=========================================================================

//=== Module Declarations =================================================

mod builder;
mod dispatcher;
mod error;
mod remote;
mod subscriber;

//=== Public API ==========================================================

pub use builder::{DispatcherBuilder, DEFAULT_CHANNEL_CAPACITY, DEFAULT_LABEL};
pub use dispatcher::{Dispatcher, PublishReport};
pub use error::DispatchError;
pub use remote::RemotePublisher;
pub use subscriber::{Callback, Handler};

//=== Message Trait =======================================================

/// Marker trait for types that can be published through a [`Dispatcher`].
///
/// Automatically implemented for all types that are Send + 'static.
pub trait Message: Send + 'static {}

// Blanket implementation
impl<T: Send + 'static> Message for T {}
