//=========================================================================
// Dispatcher Builder
//=========================================================================
//
// Fluent configuration for a `Dispatcher`.
//
// ```text
//     DispatcherBuilder ──build()──> Dispatcher
//         ├─ with_channel_capacity()
//         └─ with_label()
// ```
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::Dispatcher;

//=== Defaults ============================================================

/// Default capacity of the remote publication queue.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 128;

/// Default label used in log lines.
pub const DEFAULT_LABEL: &str = "dispatcher";

//=== DispatcherBuilder ===================================================

/// Builder for configuring and constructing a [`Dispatcher`].
///
/// # Default Values
///
/// - **Channel capacity**: 128 queued remote messages
/// - **Label**: `"dispatcher"`
///
/// # Examples
///
/// ```
/// use aetheric_dispatch::prelude::*;
///
/// let dispatcher = DispatcherBuilder::new()
///     .with_channel_capacity(256)
///     .with_label("gameplay")
///     .build();
/// assert_eq!(dispatcher.label(), "gameplay");
/// ```
#[derive(Debug, Clone)]
pub struct DispatcherBuilder {
    channel_capacity: usize,
    label: &'static str,
}

impl DispatcherBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            label: DEFAULT_LABEL,
        }
    }

    /// Sets how many remote messages may wait for `pump()`.
    ///
    /// Clamped to at least 1.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Sets the label prefixed to this dispatcher's log lines.
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Builds the dispatcher with an empty registry.
    pub fn build(self) -> Dispatcher {
        Dispatcher::from_builder(self.label, self.channel_capacity)
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
