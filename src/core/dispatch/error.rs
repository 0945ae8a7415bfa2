//=========================================================================
// Dispatch Errors
//=========================================================================
//
// Failures surfaced to callers of the dispatch layer.
//
// Subscriber failures are deliberately absent: they are contained and
// logged by the dispatcher and never reach the publisher.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== DispatchError =======================================================

/// Errors returned by fallible dispatcher, singleton and remote APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A process-wide instance was accessed before it was installed.
    #[error("{0} accessed before it was installed")]
    NotInstalled(&'static str),

    /// A process-wide instance was installed twice.
    #[error("{0} is already installed")]
    AlreadyInstalled(&'static str),

    /// The remote publication queue is at capacity.
    #[error("remote publish queue is full")]
    QueueFull,

    /// The owning dispatcher has been dropped.
    #[error("dispatcher is no longer alive")]
    Disconnected,
}
