//! Native floating-point abstraction the expansion algorithms are generic over.

use crate::lib::ops;

/// Type that can be converted to primitive with `as`.
pub trait AsPrimitive: Sized + Copy + PartialEq + PartialOrd + Send + Sync {
    fn as_u32(self) -> u32;
    fn as_u64(self) -> u64;
    fn as_i32(self) -> i32;
    fn as_i64(self) -> i64;
    fn as_f32(self) -> f32;
    fn as_f64(self) -> f64;
}

macro_rules! as_primitive_impl {
    ($($t:tt)*) => ($(
        impl AsPrimitive for $t {
            #[inline]
            fn as_u32(self) -> u32 {
                self as u32
            }

            #[inline]
            fn as_u64(self) -> u64 {
                self as u64
            }

            #[inline]
            fn as_i32(self) -> i32 {
                self as i32
            }

            #[inline]
            fn as_i64(self) -> i64 {
                self as i64
            }

            #[inline]
            fn as_f32(self) -> f32 {
                self as f32
            }

            #[inline]
            fn as_f64(self) -> f64 {
                self as f64
            }
        }
    )*)
}

as_primitive_impl! { u32 u64 i32 i64 f32 f64 }

/// An interface for casting between machine scalars.
pub trait AsCast: AsPrimitive {
    /// Creates a number from another value that can be converted into
    /// a primitive via the `AsPrimitive` trait.
    fn as_cast<N: AsPrimitive>(n: N) -> Self;
}

macro_rules! as_cast_impl {
    ($t:ty, $meth:ident) => {
        impl AsCast for $t {
            #[inline]
            fn as_cast<N: AsPrimitive>(n: N) -> $t {
                n.$meth()
            }
        }
    };
}

as_cast_impl!(u32, as_u32);
as_cast_impl!(u64, as_u64);
as_cast_impl!(i32, as_i32);
as_cast_impl!(i64, as_i64);
as_cast_impl!(f32, as_f32);
as_cast_impl!(f64, as_f64);

/// Numerical type trait.
pub trait Number:
    AsCast
    + ops::Add<Output = Self>
    + ops::AddAssign
    + ops::Div<Output = Self>
    + ops::DivAssign
    + ops::Mul<Output = Self>
    + ops::MulAssign
    + ops::Sub<Output = Self>
    + ops::SubAssign
{
}

macro_rules! number_impl {
    ($($t:tt)*) => ($(
        impl Number for $t {
        }
    )*)
}

number_impl! { u32 u64 i32 i64 f32 f64 }

/// Defines a trait that supports integral bit operations.
pub trait Integer:
    Number
    + ops::BitAnd<Output = Self>
    + ops::BitOr<Output = Self>
    + ops::Shl<i32, Output = Self>
    + ops::Shr<i32, Output = Self>
{
    const ZERO: Self;
    const ONE: Self;
}

macro_rules! integer_impl {
    ($($t:tt)*) => ($(
        impl Integer for $t {
            const ZERO: $t = 0;
            const ONE: $t = 1;
        }
    )*)
}

integer_impl! { u32 u64 i32 i64 }

// WIDTH CLASS

/// How wide the native significand is relative to the integers the
/// conversion layer loads with [`load_integer`](crate::load_integer).
///
/// Selects between the two loading strategies: a wide significand takes any
/// supported integer exactly in one word, a narrow one must stage the value
/// in two pieces to avoid losing low-order bits in the initial cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WidthClass {
    /// Significand holds every supported integer exactly (`f64`).
    Wide,
    /// Significand is too narrow for a direct cast (`f32`).
    Narrow,
}

// FLOAT

/// Native floating-point word type of an expansion.
///
/// The expansion algorithms only ever touch a value through this trait, so
/// they work identically for any IEEE-style binary width; the few derived
/// constants (`WORD_SIZE` in particular) are all that change.
pub trait Float: Number + ops::Neg<Output = Self> {
    /// Unsigned type of the same size.
    type Unsigned: Integer;

    /// Literal zero.
    const ZERO: Self;
    /// Quiet NaN.
    const NAN: Self;

    // MASKS

    /// Bitmask for the sign bit.
    const SIGN_MASK: Self::Unsigned;
    /// Bitmask for the exponent, excluding the hidden bit.
    const EXPONENT_MASK: Self::Unsigned;
    /// Bitmask for the hidden bit in exponent, which is an implicit 1 in the fraction.
    const HIDDEN_BIT_MASK: Self::Unsigned;
    /// Bitmask for the mantissa (fraction), excluding the hidden bit.
    const MANTISSA_MASK: Self::Unsigned;

    // PROPERTIES

    /// Size of the stored significand, without hidden bit.
    const MANTISSA_SIZE: i32;
    /// Size of the full significand, hidden bit included. This is the
    /// "native width" an expansion instantiation is parameterized by.
    const SIGNIFICAND_SIZE: i32 = Self::MANTISSA_SIZE + 1;
    /// Significand bits one expansion word is normalized to carry:
    /// half the native width, so two words can be multiplied exactly.
    const WORD_SIZE: i32 = Self::SIGNIFICAND_SIZE / 2;
    /// IEEE exponent bias.
    const EXPONENT_BIAS: i32;
    /// Smallest normal binary exponent.
    const MIN_EXPONENT: i32;
    /// Largest finite binary exponent.
    const MAX_EXPONENT: i32;
    /// Integer-loading strategy for this width.
    const WIDTH_CLASS: WidthClass;

    // Re-exported methods from std.
    fn from_bits(u: Self::Unsigned) -> Self;
    fn to_bits(self) -> Self::Unsigned;
    fn is_sign_negative(self) -> bool;

    /// Returns true if the float is a denormal.
    #[inline]
    fn is_denormal(self) -> bool {
        self.to_bits() & Self::EXPONENT_MASK == Self::Unsigned::ZERO
    }

    /// Returns true if the float is a NaN or Infinite.
    #[inline]
    fn is_special(self) -> bool {
        self.to_bits() & Self::EXPONENT_MASK == Self::EXPONENT_MASK
    }

    /// Returns true if the float is NaN.
    #[inline]
    fn is_nan(self) -> bool {
        self.is_special() && (self.to_bits() & Self::MANTISSA_MASK) != Self::Unsigned::ZERO
    }

    /// Returns true if the float is infinite.
    #[inline]
    fn is_inf(self) -> bool {
        self.is_special() && (self.to_bits() & Self::MANTISSA_MASK) == Self::Unsigned::ZERO
    }

    /// Get the biased exponent bits from the float.
    #[inline]
    fn biased_exponent(self) -> i32 {
        ((self.to_bits() & Self::EXPONENT_MASK) >> Self::MANTISSA_SIZE).as_i32()
    }

    /// Get the integer significand from the float, hidden bit restored.
    #[inline]
    fn significand(self) -> Self::Unsigned {
        let s = self.to_bits() & Self::MANTISSA_MASK;
        if !self.is_denormal() {
            s + Self::HIDDEN_BIT_MASK
        } else {
            s
        }
    }

    /// Construct the exact power of two `2^n` for a normal exponent `n`.
    #[inline]
    fn pow2(n: i32) -> Self {
        debug_assert!(
            n >= Self::MIN_EXPONENT && n <= Self::MAX_EXPONENT,
            "pow2() exponent outside the normal range"
        );
        Self::from_bits(Self::Unsigned::as_cast(n + Self::EXPONENT_BIAS) << Self::MANTISSA_SIZE)
    }
}

impl Float for f32 {
    type Unsigned = u32;

    const ZERO: f32 = 0.0;
    const NAN: f32 = f32::NAN;
    const SIGN_MASK: u32 = 0x80000000;
    const EXPONENT_MASK: u32 = 0x7F800000;
    const HIDDEN_BIT_MASK: u32 = 0x00800000;
    const MANTISSA_MASK: u32 = 0x007FFFFF;
    const MANTISSA_SIZE: i32 = 23;
    const EXPONENT_BIAS: i32 = 127;
    const MIN_EXPONENT: i32 = -126;
    const MAX_EXPONENT: i32 = 127;
    const WIDTH_CLASS: WidthClass = WidthClass::Narrow;

    #[inline]
    fn from_bits(u: u32) -> f32 {
        f32::from_bits(u)
    }

    #[inline]
    fn to_bits(self) -> u32 {
        f32::to_bits(self)
    }

    #[inline]
    fn is_sign_negative(self) -> bool {
        f32::is_sign_negative(self)
    }
}

impl Float for f64 {
    type Unsigned = u64;

    const ZERO: f64 = 0.0;
    const NAN: f64 = f64::NAN;
    const SIGN_MASK: u64 = 0x8000000000000000;
    const EXPONENT_MASK: u64 = 0x7FF0000000000000;
    const HIDDEN_BIT_MASK: u64 = 0x0010000000000000;
    const MANTISSA_MASK: u64 = 0x000FFFFFFFFFFFFF;
    const MANTISSA_SIZE: i32 = 52;
    const EXPONENT_BIAS: i32 = 1023;
    const MIN_EXPONENT: i32 = -1022;
    const MAX_EXPONENT: i32 = 1023;
    const WIDTH_CLASS: WidthClass = WidthClass::Wide;

    #[inline]
    fn from_bits(u: u64) -> f64 {
        f64::from_bits(u)
    }

    #[inline]
    fn to_bits(self) -> u64 {
        f64::to_bits(self)
    }

    #[inline]
    fn is_sign_negative(self) -> bool {
        f64::is_sign_negative(self)
    }
}

// TESTS
// -----

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_size_test() {
        // Half the native width; f64's odd significand rounds down.
        assert_eq!(f32::WORD_SIZE, 12);
        assert_eq!(f64::WORD_SIZE, 26);
        assert_eq!(f32::SIGNIFICAND_SIZE, 24);
        assert_eq!(f64::SIGNIFICAND_SIZE, 53);
    }

    #[test]
    fn pow2_test() {
        assert_eq!(f64::pow2(0), 1.0);
        assert_eq!(f64::pow2(4), 16.0);
        assert_eq!(f64::pow2(-1), 0.5);
        assert_eq!(f64::pow2(f64::MIN_EXPONENT), f64::MIN_POSITIVE);
        assert_eq!(f32::pow2(10), 1024.0);
        assert_eq!(f32::pow2(f32::MIN_EXPONENT), f32::MIN_POSITIVE);
    }

    #[test]
    fn classification_test() {
        assert!(Float::is_special(f64::INFINITY));
        assert!(Float::is_inf(f64::NEG_INFINITY));
        assert!(Float::is_nan(f64::NAN));
        assert!(!Float::is_special(0.0f64));
        assert!(!Float::is_special(1.5f64));
        assert!(Float::is_denormal(5e-324f64));
        assert!(!Float::is_denormal(1.0f64));
        assert!(Float::is_special(f32::INFINITY));
        assert!(Float::is_nan(f32::NAN));
    }

    #[test]
    fn significand_test() {
        assert_eq!(Float::significand(1.0f64), 1u64 << 52);
        assert_eq!(Float::biased_exponent(1.0f64), 1023);
        assert_eq!(Float::significand(5e-324f64), 1);
        assert_eq!(Float::significand(1.0f32), 1u32 << 23);
        assert_eq!(Float::biased_exponent(1.0f32), 127);
    }

    #[test]
    fn width_class_test() {
        assert_eq!(f64::WIDTH_CLASS, WidthClass::Wide);
        assert_eq!(f32::WIDTH_CLASS, WidthClass::Narrow);
    }
}
