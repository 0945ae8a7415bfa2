//=========================================================================
// Dispatcher
//=========================================================================
//
// Typed publish/subscribe registry with synchronous delivery.
//
// Architecture:
//   subscribe<M>()   ──┐
//   unsubscribe<M>() ──┼──> Mutex<Registry>
//   clear()          ──┘      ├─ callbacks: TypeId → Vec<Callback<M>>
//                             └─ handlers:  TypeId → Vec<Arc<dyn Handler<M>>>
//
//   publish<M>() ──> snapshot both lists (locked)
//                         ↓ (unlocked)
//                    callbacks in order → handlers in order
//
// Subscribers run outside the lock and may re-enter the dispatcher.
// A panicking subscriber is contained and logged.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, error, trace};

//=== Internal Dependencies ===============================================

use super::builder::DispatcherBuilder;
use super::remote::{RemoteJob, RemotePublisher};
use super::subscriber::{same_subscriber, Callback, Handler, SubscriberList};
use super::Message;

//=== PublishReport =======================================================

/// Outcome of a single [`Dispatcher::publish`] call.
///
/// Purely informational: subscriber failures are already logged and never
/// propagate to the publisher.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    /// Subscribers that handled the message without failing.
    pub delivered: usize,

    /// Subscribers that panicked while handling the message.
    pub failed: usize,
}

impl PublishReport {
    /// Total number of subscribers invoked.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }

    /// Returns true if no subscriber failed.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, succeeded: bool) {
        if succeeded {
            self.delivered += 1;
        } else {
            self.failed += 1;
        }
    }
}

//=== Registry ============================================================

type SubscriberMap = HashMap<TypeId, Box<dyn SubscriberList>>;

/// Subscriber lists keyed by message type. A key exists only while its
/// list is non-empty.
#[derive(Default)]
struct Registry {
    callbacks: SubscriberMap,
    handlers: SubscriberMap,
}

fn append<T: Send + 'static>(map: &mut SubscriberMap, key: TypeId, entry: T) -> usize {
    let list = map
        .entry(key)
        .or_insert_with(|| Box::new(Vec::<T>::new()));

    match list.as_any_mut().downcast_mut::<Vec<T>>() {
        Some(entries) => {
            entries.push(entry);
            entries.len()
        }
        None => {
            error!("Subscriber list for {} has a mismatched element type", type_name::<T>());
            0
        }
    }
}

fn remove_first<T: Send + 'static>(
    map: &mut SubscriberMap,
    key: TypeId,
    matches: impl Fn(&T) -> bool,
) -> bool {
    let Some(entries) = map
        .get_mut(&key)
        .and_then(|list| list.as_any_mut().downcast_mut::<Vec<T>>())
    else {
        return false;
    };

    let Some(index) = entries.iter().position(matches) else {
        return false;
    };

    entries.remove(index);
    let now_empty = entries.is_empty();
    if now_empty {
        map.remove(&key);
    }
    true
}

fn snapshot<T: Clone + Send + 'static>(map: &SubscriberMap, key: TypeId) -> Vec<T> {
    map.get(&key)
        .and_then(|list| list.as_any().downcast_ref::<Vec<T>>())
        .cloned()
        .unwrap_or_default()
}

fn list_len(map: &SubscriberMap, key: TypeId) -> usize {
    map.get(&key).map(|list| list.len()).unwrap_or(0)
}

/// Extracts a readable message from a caught panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

//=== Dispatcher ==========================================================

/// Typed publish/subscribe registry.
///
/// Owned by the application's composition root and shared by reference.
/// All operations take `&self`; the registry is guarded by a single lock
/// that is never held while a subscriber runs.
///
/// # Delivery order
///
/// For each `publish`, callback subscribers run first in subscription
/// order, then handler objects in subscription order.
///
/// # Example
///
/// ```
/// use aetheric_dispatch::prelude::*;
///
/// #[derive(Debug)]
/// struct Ping;
///
/// let dispatcher = Dispatcher::new();
/// let callback = dispatcher.subscribe_fn(|_: &Ping| println!("pong"));
///
/// assert_eq!(dispatcher.publish(Ping).delivered, 1);
///
/// dispatcher.unsubscribe::<Ping>(&callback);
/// assert!(!dispatcher.is_registered::<Ping>());
/// ```
pub struct Dispatcher {
    label: &'static str,
    registry: Mutex<Registry>,
    remote_tx: Sender<RemoteJob>,
    remote_rx: Receiver<RemoteJob>,
}

impl Dispatcher {
    //--- Construction -----------------------------------------------------

    /// Creates a dispatcher with default settings.
    ///
    /// See [`DispatcherBuilder`] for configuration.
    pub fn new() -> Self {
        DispatcherBuilder::new().build()
    }

    /// Returns a builder for a configured dispatcher.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    pub(super) fn from_builder(label: &'static str, channel_capacity: usize) -> Self {
        let (remote_tx, remote_rx) = bounded(channel_capacity);
        debug!("[{}] dispatcher created (remote capacity {})", label, channel_capacity);

        Self {
            label,
            registry: Mutex::new(Registry::default()),
            remote_tx,
            remote_rx,
        }
    }

    /// Label used in this dispatcher's log lines.
    pub fn label(&self) -> &'static str {
        self.label
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        // Every mutation completes before the guard drops, so a poisoned
        // registry is still consistent.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    //--- Registration -----------------------------------------------------

    /// Registers a callback for messages of type `M`.
    ///
    /// Registering the same `Arc` twice yields two entries and two
    /// deliveries per publish.
    pub fn subscribe<M: Message>(&self, callback: Callback<M>) {
        let count = append(&mut self.registry().callbacks, TypeId::of::<M>(), callback);
        debug!("[{}] +callback for {} ({} total)", self.label, type_name::<M>(), count);
    }

    /// Wraps `f` in a [`Callback`], registers it and returns the handle
    /// needed to unsubscribe it.
    pub fn subscribe_fn<M, F>(&self, f: F) -> Callback<M>
    where
        M: Message,
        F: Fn(&M) + Send + Sync + 'static,
    {
        let callback: Callback<M> = Arc::new(f);
        self.subscribe(Arc::clone(&callback));
        callback
    }

    /// Registers a handler object for messages of type `M`.
    pub fn subscribe_handler<M, H>(&self, handler: Arc<H>)
    where
        M: Message,
        H: Handler<M> + 'static,
    {
        let handler: Arc<dyn Handler<M>> = handler;
        let count = append(&mut self.registry().handlers, TypeId::of::<M>(), handler);
        debug!("[{}] +handler for {} ({} total)", self.label, type_name::<M>(), count);
    }

    /// Removes the first registration of `callback` for `M`.
    ///
    /// Returns false, without error, if it was not registered.
    pub fn unsubscribe<M: Message>(&self, callback: &Callback<M>) -> bool {
        let removed = remove_first(
            &mut self.registry().callbacks,
            TypeId::of::<M>(),
            |entry: &Callback<M>| same_subscriber(entry, callback),
        );
        if removed {
            debug!("[{}] -callback for {}", self.label, type_name::<M>());
        }
        removed
    }

    /// Removes the first registration of `handler` for `M`.
    ///
    /// Returns false, without error, if it was not registered.
    pub fn unsubscribe_handler<M, H>(&self, handler: &Arc<H>) -> bool
    where
        M: Message,
        H: Handler<M> + 'static,
    {
        let removed = remove_first(
            &mut self.registry().handlers,
            TypeId::of::<M>(),
            |entry: &Arc<dyn Handler<M>>| same_subscriber(entry, handler),
        );
        if removed {
            debug!("[{}] -handler for {}", self.label, type_name::<M>());
        }
        removed
    }

    /// Removes every subscriber for every message type and discards queued
    /// remote messages.
    ///
    /// Intended for the owning scope's teardown.
    pub fn clear(&self) {
        {
            let mut registry = self.registry();
            registry.callbacks.clear();
            registry.handlers.clear();
        }

        let discarded = self.remote_rx.try_iter().count();
        debug!("[{}] cleared (discarded {} queued messages)", self.label, discarded);
    }

    //--- Publication ------------------------------------------------------

    /// Delivers `message` to every subscriber registered for `M`.
    ///
    /// Subscriptions added or removed while this call is in progress only
    /// take effect for later publishes. Never fails: a panicking subscriber
    /// is logged and counted in the returned report.
    pub fn publish<M: Message>(&self, message: M) -> PublishReport {
        let key = TypeId::of::<M>();
        let (callbacks, handlers) = {
            let registry = self.registry();
            (
                snapshot::<Callback<M>>(&registry.callbacks, key),
                snapshot::<Arc<dyn Handler<M>>>(&registry.handlers, key),
            )
        };

        let mut report = PublishReport::default();
        if callbacks.is_empty() && handlers.is_empty() {
            return report;
        }

        trace!(
            "[{}] publishing {} to {} subscribers",
            self.label,
            type_name::<M>(),
            callbacks.len() + handlers.len()
        );

        for callback in &callbacks {
            report.record(self.deliver::<M>(|| callback(&message)));
        }
        for handler in &handlers {
            report.record(self.deliver::<M>(|| handler.handle(&message)));
        }

        report
    }

    fn deliver<M: Message>(&self, notify: impl FnOnce()) -> bool {
        match panic::catch_unwind(AssertUnwindSafe(notify)) {
            Ok(()) => true,
            Err(payload) => {
                error!(
                    "[{}] subscriber failed handling {}: {}",
                    self.label,
                    type_name::<M>(),
                    panic_message(payload.as_ref())
                );
                false
            }
        }
    }

    //--- Remote Publication -----------------------------------------------

    /// Returns a `Send` handle other threads can use to queue messages.
    pub fn remote(&self) -> RemotePublisher {
        RemotePublisher::new(self.label, self.remote_tx.clone())
    }

    /// Publishes the messages queued through [`RemotePublisher`]s, oldest
    /// first, and returns how many were published.
    ///
    /// Messages queued while pumping wait for the next call.
    pub fn pump(&self) -> usize {
        let queued = self.remote_rx.len();
        let mut pumped = 0;

        for job in self.remote_rx.try_iter().take(queued) {
            job(self);
            pumped += 1;
        }

        if pumped > 0 {
            trace!("[{}] pumped {} remote messages", self.label, pumped);
        }
        pumped
    }

    /// Number of remote messages waiting for `pump()`.
    pub fn pending(&self) -> usize {
        self.remote_rx.len()
    }

    //--- Query API --------------------------------------------------------

    /// Returns true if any subscriber is registered for `M`.
    pub fn is_registered<M: Message>(&self) -> bool {
        let key = TypeId::of::<M>();
        let registry = self.registry();
        registry.callbacks.contains_key(&key) || registry.handlers.contains_key(&key)
    }

    /// Number of subscriber entries (both kinds) registered for `M`.
    pub fn subscriber_count<M: Message>(&self) -> usize {
        let key = TypeId::of::<M>();
        let registry = self.registry();
        list_len(&registry.callbacks, key) + list_len(&registry.handlers, key)
    }

    /// Number of distinct message types with at least one subscriber.
    pub fn registered_types(&self) -> usize {
        let registry = self.registry();
        let mut keys: Vec<&TypeId> = registry.callbacks.keys().collect();
        keys.extend(registry.handlers.keys().filter(|key| !registry.callbacks.contains_key(*key)));
        keys.len()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("label", &self.label)
            .field("registered_types", &self.registered_types())
            .field("pending", &self.pending())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct Ping;

    #[derive(Debug, Clone, PartialEq)]
    struct Score(u32);

    //--- Test Helpers -----------------------------------------------------

    #[derive(Clone, Default)]
    struct Log(Arc<Mutex<Vec<&'static str>>>);

    impl Log {
        fn push(&self, entry: &'static str) {
            self.0.lock().unwrap().push(entry);
        }

        fn take(&self) -> Vec<&'static str> {
            std::mem::take(&mut *self.0.lock().unwrap())
        }
    }

    fn recorder(log: &Log, name: &'static str) -> Callback<Ping> {
        let log = log.clone();
        Arc::new(move |_: &Ping| log.push(name))
    }

    fn failing(log: &Log, name: &'static str) -> Callback<Ping> {
        let log = log.clone();
        Arc::new(move |_: &Ping| {
            log.push(name);
            panic!("{name} refused the ping");
        })
    }

    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl Handler<Ping> for Recorder {
        fn handle(&self, _message: &Ping) {
            self.log.push(self.name);
        }
    }

    //--- Delivery ---------------------------------------------------------

    #[test]
    fn delivers_to_every_subscriber_in_order() {
        let dispatcher = Dispatcher::new();
        let log = Log::default();

        dispatcher.subscribe(recorder(&log, "a"));
        dispatcher.subscribe(recorder(&log, "b"));
        dispatcher.subscribe(recorder(&log, "c"));

        let report = dispatcher.publish(Ping);
        assert_eq!(log.take(), ["a", "b", "c"]);
        assert_eq!(report, PublishReport { delivered: 3, failed: 0 });
    }

    #[test]
    fn callbacks_run_before_handlers() {
        let dispatcher = Dispatcher::new();
        let log = Log::default();

        dispatcher.subscribe_handler::<Ping, _>(Arc::new(Recorder { name: "handler", log: log.clone() }));
        dispatcher.subscribe(recorder(&log, "callback"));

        dispatcher.publish(Ping);
        assert_eq!(log.take(), ["callback", "handler"]);
    }

    #[test]
    fn message_value_reaches_subscriber() {
        let dispatcher = Dispatcher::new();
        let total = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&total);
        dispatcher.subscribe_fn(move |score: &Score| *sink.lock().unwrap() += score.0);

        dispatcher.publish(Score(7));
        dispatcher.publish(Score(5));
        assert_eq!(*total.lock().unwrap(), 12);
    }

    #[test]
    fn types_do_not_cross_deliver() {
        let dispatcher = Dispatcher::new();
        let log = Log::default();
        dispatcher.subscribe(recorder(&log, "ping"));

        let report = dispatcher.publish(Score(1));
        assert_eq!(report.attempted(), 0);
        assert!(log.take().is_empty());
    }

    #[test]
    fn duplicate_subscription_delivers_twice() {
        let dispatcher = Dispatcher::new();
        let log = Log::default();
        let callback = recorder(&log, "dup");

        dispatcher.subscribe(Arc::clone(&callback));
        dispatcher.subscribe(Arc::clone(&callback));
        dispatcher.publish(Ping);
        assert_eq!(log.take(), ["dup", "dup"]);

        assert!(dispatcher.unsubscribe(&callback));
        dispatcher.publish(Ping);
        assert_eq!(log.take(), ["dup"]);
    }

    //--- Failure Isolation ------------------------------------------------

    #[test]
    fn failing_subscriber_does_not_stop_the_rest() {
        let dispatcher = Dispatcher::new();
        let log = Log::default();

        dispatcher.subscribe(recorder(&log, "first"));
        dispatcher.subscribe(failing(&log, "broken"));
        dispatcher.subscribe(recorder(&log, "third"));
        dispatcher.subscribe_handler::<Ping, _>(Arc::new(Recorder { name: "handler", log: log.clone() }));

        let report = dispatcher.publish(Ping);
        assert_eq!(log.take(), ["first", "broken", "third", "handler"]);
        assert_eq!(report, PublishReport { delivered: 3, failed: 1 });
        assert!(!report.is_clean());
    }

    #[test]
    fn failing_subscriber_stays_registered() {
        let dispatcher = Dispatcher::new();
        let log = Log::default();
        dispatcher.subscribe(failing(&log, "broken"));

        dispatcher.publish(Ping);
        dispatcher.publish(Ping);
        assert_eq!(log.take(), ["broken", "broken"]);
        assert_eq!(dispatcher.subscriber_count::<Ping>(), 1);
    }

    //--- Unregistered Types -----------------------------------------------

    #[test]
    fn publish_without_subscribers_is_silent() {
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.publish(Ping), PublishReport::default());
    }

    #[test]
    fn unsubscribe_twice_is_noop() {
        let dispatcher = Dispatcher::new();
        let log = Log::default();
        let callback = recorder(&log, "once");
        let handler = Arc::new(Recorder { name: "h", log: log.clone() });

        dispatcher.subscribe(Arc::clone(&callback));
        dispatcher.subscribe_handler::<Ping, _>(Arc::clone(&handler));

        assert!(dispatcher.unsubscribe(&callback));
        assert!(!dispatcher.unsubscribe(&callback));
        assert!(dispatcher.unsubscribe_handler::<Ping, _>(&handler));
        assert!(!dispatcher.unsubscribe_handler::<Ping, _>(&handler));
    }

    #[test]
    fn unsubscribe_unknown_type_is_noop() {
        let dispatcher = Dispatcher::new();
        let callback: Callback<Score> = Arc::new(|_: &Score| {});
        assert!(!dispatcher.unsubscribe(&callback));
    }

    //--- Re-entrancy ------------------------------------------------------

    #[test]
    fn mutation_during_publish_applies_to_next_publish() {
        let dispatcher = Arc::new(Dispatcher::new());
        let log = Log::default();
        let late = recorder(&log, "late");
        let tail = recorder(&log, "tail");
        let armed = Arc::new(AtomicBool::new(true));

        let reentrant: Callback<Ping> = {
            let dispatcher = Arc::clone(&dispatcher);
            let log = log.clone();
            let late = Arc::clone(&late);
            let tail = Arc::clone(&tail);
            Arc::new(move |_: &Ping| {
                log.push("reentrant");
                if armed.swap(false, Ordering::SeqCst) {
                    dispatcher.subscribe(Arc::clone(&late));
                    dispatcher.unsubscribe(&tail);
                }
            })
        };

        dispatcher.subscribe(reentrant);
        dispatcher.subscribe(Arc::clone(&tail));

        dispatcher.publish(Ping);
        assert_eq!(log.take(), ["reentrant", "tail"]);

        dispatcher.publish(Ping);
        assert_eq!(log.take(), ["reentrant", "late"]);

        // breaks the dispatcher <-> callback cycle
        dispatcher.clear();
    }

    #[test]
    fn subscriber_can_publish_another_type() {
        let dispatcher = Arc::new(Dispatcher::new());
        let log = Log::default();
        let relay = Arc::clone(&dispatcher);
        dispatcher.subscribe_fn(move |score: &Score| {
            if score.0 > 10 {
                relay.publish(Ping);
            }
        });
        dispatcher.subscribe(recorder(&log, "ping"));

        dispatcher.publish(Score(3));
        dispatcher.publish(Score(30));
        assert_eq!(log.take(), ["ping"]);

        dispatcher.clear();
    }

    //--- Registry Compaction ----------------------------------------------

    #[test]
    fn removing_last_subscriber_drops_type_key() {
        let dispatcher = Dispatcher::new();
        let log = Log::default();
        let a = recorder(&log, "a");
        let b = recorder(&log, "b");

        dispatcher.subscribe(Arc::clone(&a));
        dispatcher.subscribe(Arc::clone(&b));
        assert!(dispatcher.is_registered::<Ping>());
        assert_eq!(dispatcher.registered_types(), 1);

        dispatcher.unsubscribe(&a);
        assert!(dispatcher.is_registered::<Ping>());

        dispatcher.unsubscribe(&b);
        assert!(!dispatcher.is_registered::<Ping>());
        assert_eq!(dispatcher.registered_types(), 0);
    }

    #[test]
    fn registered_types_counts_each_type_once() {
        let dispatcher = Dispatcher::new();
        let log = Log::default();
        dispatcher.subscribe(recorder(&log, "cb"));
        dispatcher.subscribe_handler::<Ping, _>(Arc::new(Recorder { name: "h", log: log.clone() }));
        dispatcher.subscribe_fn(|_: &Score| {});

        assert_eq!(dispatcher.registered_types(), 2);
        assert_eq!(dispatcher.subscriber_count::<Ping>(), 2);
    }

    //--- Lifecycle --------------------------------------------------------

    #[test]
    fn ping_scenario() {
        let dispatcher = Dispatcher::new();
        let log = Log::default();
        let a = recorder(&log, "A");
        let b = Arc::new(Recorder { name: "B", log: log.clone() });

        dispatcher.subscribe(Arc::clone(&a));
        dispatcher.subscribe_handler::<Ping, _>(Arc::clone(&b));
        dispatcher.publish(Ping);
        assert_eq!(log.take(), ["A", "B"]);

        dispatcher.unsubscribe(&a);
        dispatcher.publish(Ping);
        assert_eq!(log.take(), ["B"]);

        dispatcher.clear();
        assert_eq!(dispatcher.publish(Ping), PublishReport::default());
        assert!(log.take().is_empty());
    }

    #[test]
    fn clear_discards_queued_remote_messages() {
        let dispatcher = Dispatcher::new();
        let log = Log::default();
        dispatcher.subscribe(recorder(&log, "late"));
        dispatcher.remote().publish(Ping).unwrap();

        dispatcher.clear();
        assert_eq!(dispatcher.pending(), 0);
        assert_eq!(dispatcher.pump(), 0);
        assert!(log.take().is_empty());
    }

    #[test]
    fn panic_payloads_are_readable() {
        let from_str = panic::catch_unwind(|| panic!("static")).unwrap_err();
        let from_string = panic::catch_unwind(|| panic!("{}", String::from("owned"))).unwrap_err();

        assert_eq!(panic_message(from_str.as_ref()), "static");
        assert_eq!(panic_message(from_string.as_ref()), "owned");
    }
}
