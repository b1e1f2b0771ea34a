//! # Synchronization Utilities
//!
//! The measurement and color caches live behind `Mutex`es. Their contents
//! can always be recomputed, so a poisoned lock is recovered rather than
//! propagated.
//!
//! | Scenario | Function |
//! |----------|----------|
//! | Production code | [`lock_recover`] |
//! | Need context in debug builds | [`lock_recover_debug`] |
//! | Test code | `.lock().unwrap()` |

use std::sync::{Mutex, MutexGuard};

/// Lock a mutex, recovering from poison if necessary.
///
/// # Example
///
/// ```rust
/// use std::sync::Mutex;
/// use folio_table::sync::lock_recover;
///
/// let mutex = Mutex::new(42);
/// let guard = lock_recover(&mutex);
/// assert_eq!(*guard, 42);
/// ```
#[inline]
pub fn lock_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Lock a mutex, logging the call site when poison is recovered.
///
/// Identical to [`lock_recover`] apart from the `log::warn!` emitted in
/// debug builds.
#[inline]
pub fn lock_recover_debug<'a, T>(mutex: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|e| {
        #[cfg(debug_assertions)]
        log::warn!("mutex poison recovered at: {context}");
        #[cfg(not(debug_assertions))]
        let _ = context;
        e.into_inner()
    })
}
