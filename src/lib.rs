//! Extended-precision floating-point expansion arithmetic.
//!
//! A value is represented as a short, caller-owned sequence of native
//! floating-point "words" whose exact sum carries more significand bits than
//! any single native float can hold. The operations here load a native value
//! or integer into such an expansion, add or multiply it by scalars and other
//! expansions while re-establishing a strict non-overlap invariant, and
//! collapse it back to one correctly rounded native value. This is the
//! arithmetic that backs correctly rounded binary/decimal conversion, where
//! every intermediate step must be bit-exact while using only ordinary native
//! operations.
//!
//! Expansions are plain `&mut [F]` slices. The first word holds the most
//! significant bits; each following word is smaller by at least half the
//! native significand width; the first zero word terminates the significant
//! part. Operations mutate in place, never allocate, and silently drop only
//! least-significant bits when a buffer is too short.
//!
//! ```
//! let mut buf = [0.0f64; 4];
//! xprec::load_value(&mut buf, 1.5);
//! xprec::scale_by_power_of_two(&mut buf, 4);
//! assert_eq!(xprec::collapse(&buf), 24.0);
//! ```

// FEATURES

// Everything except the thread-local status flag works from core alone.
#![cfg_attr(not(feature = "std"), no_std)]
// Exact float comparison is the point of this crate, not an accident.
#![allow(clippy::comparison_chain, clippy::excessive_precision, clippy::float_cmp)]

/// Facade around the core features for name mangling.
pub(crate) mod lib {
    #[cfg(feature = "std")]
    pub(crate) use std::*;

    #[cfg(not(feature = "std"))]
    pub(crate) use core::*;
}

// MODULES
mod add;
mod expansion;
mod mul;
mod num;
mod primitive;
mod status;

// API
pub use self::add::{add_expansion, add_scalar};
pub use self::expansion::{collapse, copy, load_integer, load_value, scale_by_power_of_two};
pub use self::mul::{multiply_expansion, multiply_scalar};
pub use self::num::{Float, WidthClass};
pub use self::status::{clear_invalid_operation, invalid_operation};
