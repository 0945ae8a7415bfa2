//=========================================================================
// Remote Publisher
//=========================================================================
//
// Lets threads other than the dispatcher's owner hand messages over.
//
// Architecture:
//   any thread → RemotePublisher::publish<M>() → bounded channel
//                                                     ↓
//   owner thread ─────────────────────────→ Dispatcher::pump()
//
// Messages are boxed into jobs so one channel can carry every type.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Sender, TrySendError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::{DispatchError, Dispatcher, Message, PublishReport};

//=== RemoteJob ===========================================================

/// A queued publication, run by the owner thread on `pump()`.
pub(super) type RemoteJob = Box<dyn FnOnce(&Dispatcher) -> PublishReport + Send>;

//=== RemotePublisher =====================================================

/// Cloneable, `Send` handle that queues messages for a [`Dispatcher`].
///
/// Nothing is delivered until the owner thread calls
/// [`Dispatcher::pump`]. Obtain one with [`Dispatcher::remote`].
#[derive(Clone)]
pub struct RemotePublisher {
    label: &'static str,
    sender: Sender<RemoteJob>,
}

impl RemotePublisher {
    pub(super) fn new(label: &'static str, sender: Sender<RemoteJob>) -> Self {
        Self { label, sender }
    }

    /// Queues a message for delivery on the next `pump()`.
    ///
    /// Never blocks. Fails with [`DispatchError::QueueFull`] when the queue
    /// is at capacity and [`DispatchError::Disconnected`] once the
    /// dispatcher has been dropped.
    pub fn publish<M: Message>(&self, message: M) -> Result<(), DispatchError> {
        let job: RemoteJob = Box::new(move |dispatcher: &Dispatcher| dispatcher.publish(message));

        match self.sender.try_send(job) {
            Ok(()) => {
                trace!("[{}] queued remote {}", self.label, std::any::type_name::<M>());
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                warn!(
                    "[{}] remote queue full, dropping {}",
                    self.label,
                    std::any::type_name::<M>()
                );
                Err(DispatchError::QueueFull)
            }
            Err(TrySendError::Disconnected(_)) => Err(DispatchError::Disconnected),
        }
    }
}

impl std::fmt::Debug for RemotePublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemotePublisher")
            .field("label", &self.label)
            .field("queued", &self.sender.len())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
