extern crate alloc;

use alloc::sync::Arc;

/// Poison-tolerant mutex used for live games and manager bookkeeping.
#[cfg(feature = "std")]
#[derive(Debug, Default)]
pub struct Mutex<T>(std::sync::Mutex<T>);

#[cfg(feature = "std")]
impl<T> Mutex<T> {
    pub const fn new(value: T) -> Self {
        Self(std::sync::Mutex::new(value))
    }

    /// A panic while holding the lock never left a game half-written (actions
    /// run on a working copy), so poisoning is ignored.
    pub fn lock(&self) -> std::sync::MutexGuard<'_, T> {
        self.0
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(all(not(feature = "std"), feature = "alloc"))]
pub use spin::Mutex;

/// A value shared between the session cache and in-flight actions.
pub type Shared<T> = Arc<Mutex<T>>;

#[must_use]
pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}
