//=========================================================================
// Subscriber Storage
//=========================================================================
//
// Subscriber kinds and the type-erased list that stores them.
//
// The registry keys lists by `TypeId`, so each list is boxed behind
// `SubscriberList` and recovered with a downcast once the concrete
// message type is known again at the call site.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::sync::Arc;

//=== Internal Dependencies ===============================================

use super::Message;

//=== Subscriber Kinds ====================================================

/// Callback-style subscriber.
///
/// Identity is the `Arc` allocation: keep a clone of the value passed to
/// [`Dispatcher::subscribe`](super::Dispatcher::subscribe) to unsubscribe it
/// later.
pub type Callback<M> = Arc<dyn Fn(&M) + Send + Sync>;

/// Handler-object subscriber for messages of type `M`.
///
/// A single type may implement `Handler` for several message types and be
/// registered once per type.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use aetheric_dispatch::prelude::*;
///
/// struct Ping;
/// struct Counter;
///
/// impl Handler<Ping> for Counter {
///     fn handle(&self, _message: &Ping) {}
/// }
///
/// let dispatcher = Dispatcher::new();
/// let counter = Arc::new(Counter);
/// dispatcher.subscribe_handler::<Ping, _>(Arc::clone(&counter));
/// dispatcher.publish(Ping);
/// dispatcher.unsubscribe_handler::<Ping, _>(&counter);
/// ```
pub trait Handler<M: Message>: Send + Sync {
    /// Receives one published message.
    fn handle(&self, message: &M);
}

/// Returns true if both `Arc`s point at the same allocation.
///
/// Compares addresses only, so a concrete `Arc<H>` matches the
/// `Arc<dyn Handler<M>>` it was coerced into.
pub(super) fn same_subscriber<T: ?Sized, U: ?Sized>(a: &Arc<T>, b: &Arc<U>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

//=== SubscriberList ======================================================

/// Type-erased ordered subscriber sequence.
pub(super) trait SubscriberList: Send {
    /// Number of registered entries.
    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Send + 'static> SubscriberList for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;

    struct Sink;

    impl Handler<Ping> for Sink {
        fn handle(&self, _message: &Ping) {}
    }

    #[test]
    fn coerced_handler_keeps_identity() {
        let sink = Arc::new(Sink);
        let erased: Arc<dyn Handler<Ping>> = sink.clone();

        assert!(same_subscriber(&erased, &sink));
        assert!(!same_subscriber(&erased, &Arc::new(Sink)));
    }

    #[test]
    fn cloned_callback_is_same_subscriber() {
        let callback: Callback<Ping> = Arc::new(|_: &Ping| {});
        let other: Callback<Ping> = Arc::new(|_: &Ping| {});

        assert!(same_subscriber(&callback, &callback.clone()));
        assert!(!same_subscriber(&callback, &other));
    }

    #[test]
    fn erased_list_downcasts_to_its_element_type() {
        let mut list: Box<dyn SubscriberList> = Box::new(Vec::<Callback<Ping>>::new());
        assert_eq!(list.len(), 0);

        list.as_any_mut()
            .downcast_mut::<Vec<Callback<Ping>>>()
            .unwrap()
            .push(Arc::new(|_: &Ping| {}));

        assert_eq!(list.len(), 1);
        assert!(list.as_any().downcast_ref::<Vec<Arc<dyn Handler<Ping>>>>().is_none());
    }
}
