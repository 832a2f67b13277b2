//! Sticky invalid-operation status.
//!
//! Stands in for the IEEE invalid-operation flag, which stable Rust cannot
//! raise or observe through the hardware environment. The flag is sticky:
//! operations only ever set it, and it stays set until explicitly cleared.
//! With `std` it is per thread, matching the C floating-point environment;
//! without `std` it falls back to a single process-wide atomic.

#[cfg(feature = "std")]
use crate::lib::cell::Cell;

#[cfg(feature = "std")]
std::thread_local! {
    static INVALID: Cell<bool> = const { Cell::new(false) };
}

#[cfg(feature = "std")]
#[inline]
pub(crate) fn raise_invalid() {
    INVALID.with(|flag| flag.set(true));
}

/// Returns true if an invalid operation has been signaled since the flag
/// was last cleared.
#[cfg(feature = "std")]
#[inline]
pub fn invalid_operation() -> bool {
    INVALID.with(|flag| flag.get())
}

/// Clear the sticky invalid-operation flag.
#[cfg(feature = "std")]
#[inline]
pub fn clear_invalid_operation() {
    INVALID.with(|flag| flag.set(false));
}

#[cfg(not(feature = "std"))]
use crate::lib::sync::atomic::{AtomicBool, Ordering};

#[cfg(not(feature = "std"))]
static INVALID: AtomicBool = AtomicBool::new(false);

#[cfg(not(feature = "std"))]
#[inline]
pub(crate) fn raise_invalid() {
    INVALID.store(true, Ordering::Relaxed);
}

/// Returns true if an invalid operation has been signaled since the flag
/// was last cleared.
#[cfg(not(feature = "std"))]
#[inline]
pub fn invalid_operation() -> bool {
    INVALID.load(Ordering::Relaxed)
}

/// Clear the sticky invalid-operation flag.
#[cfg(not(feature = "std"))]
#[inline]
pub fn clear_invalid_operation() {
    INVALID.store(false, Ordering::Relaxed)
}

// TESTS
// -----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sticky_test() {
        clear_invalid_operation();
        assert!(!invalid_operation());
        raise_invalid();
        assert!(invalid_operation());
        // stays set until cleared
        assert!(invalid_operation());
        clear_invalid_operation();
        assert!(!invalid_operation());
    }
}
