//=========================================================================
// Singleton
//=========================================================================
//
// Lock-guarded, lazily initialised process-wide instance.
//
// A `Singleton<T>` is declared as a `static` and filled either lazily on
// first access (`get_or_init`) or explicitly by the composition root
// (`install`). Reading an empty singleton through `get()` is a lifecycle
// bug and panics.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::sync::OnceLock;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::dispatch::DispatchError;

//=== Singleton ===========================================================

/// Named, write-once, process-wide slot.
///
/// # Example
///
/// ```
/// use aetheric_dispatch::core::singleton::Singleton;
///
/// struct Settings { volume: f32 }
///
/// static SETTINGS: Singleton<Settings> = Singleton::new("settings");
///
/// let settings = SETTINGS.get_or_init(|| Settings { volume: 0.8 });
/// assert_eq!(settings.volume, 0.8);
/// assert!(SETTINGS.is_installed());
/// ```
pub struct Singleton<T> {
    name: &'static str,
    cell: OnceLock<T>,
}

impl<T> Singleton<T> {
    /// Creates an empty singleton; usable in `static` position.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceLock::new(),
        }
    }

    /// Diagnostic name used in errors and log lines.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the instance, constructing it with `init` on first access.
    ///
    /// Concurrent first accesses run `init` at most once.
    pub fn get_or_init(&self, init: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(|| {
            debug!("Singleton {} lazily initialised", self.name);
            init()
        })
    }

    /// Installs `value` as the instance.
    ///
    /// Fails with [`DispatchError::AlreadyInstalled`] if an instance exists;
    /// `value` is dropped in that case.
    pub fn install(&self, value: T) -> Result<&T, DispatchError> {
        self.cell
            .set(value)
            .map_err(|_| DispatchError::AlreadyInstalled(self.name))?;
        debug!("Singleton {} installed", self.name);
        self.try_get()
    }

    /// Returns the instance or [`DispatchError::NotInstalled`].
    pub fn try_get(&self) -> Result<&T, DispatchError> {
        self.cell.get().ok_or(DispatchError::NotInstalled(self.name))
    }

    /// Returns the instance.
    ///
    /// # Panics
    ///
    /// Panics if nothing was installed yet.
    pub fn get(&self) -> &T {
        match self.try_get() {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Returns true once an instance exists.
    pub fn is_installed(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> fmt::Debug for Singleton<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Singleton")
            .field("name", &self.name)
            .field("installed", &self.is_installed())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
