//=========================================================================
// Global Dispatcher
//=========================================================================
//
// Opt-in process-wide dispatcher for code that cannot be handed a
// reference by the composition root.
//
// The application installs one `Dispatcher` at startup and calls
// `clear()` on it at shutdown. Reaching for it before installation is a
// lifecycle bug and fails loudly.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::dispatch::{DispatchError, Dispatcher};
use crate::core::singleton::Singleton;

//=== Global Slot =========================================================

static DISPATCHER: Singleton<Dispatcher> = Singleton::new("global dispatcher");

/// Installs the process-wide dispatcher.
///
/// Fails with [`DispatchError::AlreadyInstalled`] on a second call.
pub fn install(dispatcher: Dispatcher) -> Result<&'static Dispatcher, DispatchError> {
    DISPATCHER.install(dispatcher)
}

/// Returns the process-wide dispatcher.
///
/// # Panics
///
/// Panics if [`install`] has not been called.
pub fn dispatcher() -> &'static Dispatcher {
    DISPATCHER.get()
}

/// Returns the process-wide dispatcher or [`DispatchError::NotInstalled`].
pub fn try_dispatcher() -> Result<&'static Dispatcher, DispatchError> {
    DISPATCHER.try_get()
}

/// Returns true once a process-wide dispatcher exists.
pub fn is_installed() -> bool {
    DISPATCHER.is_installed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::DispatcherBuilder;

    // The slot is process-wide, so the whole lifecycle lives in one test.
    #[test]
    fn install_then_access() {
        let installed = install(DispatcherBuilder::new().with_label("global").build()).unwrap();
        assert!(is_installed());
        assert_eq!(installed.label(), "global");
        assert_eq!(dispatcher().label(), "global");
        assert!(try_dispatcher().is_ok());

        assert_eq!(
            install(Dispatcher::new()).unwrap_err(),
            DispatchError::AlreadyInstalled("global dispatcher")
        );

        dispatcher().subscribe_fn(|_: &u8| {});
        assert!(dispatcher().is_registered::<u8>());
        dispatcher().clear();
        assert!(!dispatcher().is_registered::<u8>());
    }
}
