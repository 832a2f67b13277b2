//! Bit-exact native-float primitives the expansion algorithms build on.
//!
//! These realize the decompose/truncate/rescale/classify contract the engine
//! assumes of the native runtime. All of them are single-rounding (exact
//! wherever the result is representable); the correctness of the collapse
//! tie-break and the renormalization scans depends on that.

use crate::num::{AsCast, AsPrimitive, Float, Integer};

// CLASSIFY

/// Value class of a native float.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Class {
    Zero,
    Finite,
    Infinite,
    Nan,
}

impl Class {
    /// Returns true for Infinite or NaN.
    #[inline]
    pub(crate) fn is_special(self) -> bool {
        matches!(self, Class::Infinite | Class::Nan)
    }
}

/// Classify a native value as zero, finite nonzero, infinite, or NaN.
#[inline]
pub(crate) fn classify<F: Float>(x: F) -> Class {
    if x.is_special() {
        if x.is_nan() {
            Class::Nan
        } else {
            Class::Infinite
        }
    } else if x == F::ZERO {
        Class::Zero
    } else {
        Class::Finite
    }
}

// UNSCALE

/// Decompose `*x` into a fraction and a binary exponent.
///
/// For a finite nonzero value, `*x` is replaced by a fraction `f` with
/// `0.5 <= |f| < 1.0` and the returned exponent `e` satisfies the exact
/// identity `x == f * 2^e`. Denormals are normalized first, so the fraction
/// is always a normal value. Zero, infinities, and NaN are left untouched
/// and reported through the class.
pub(crate) fn unscale<F: Float>(x: &mut F) -> (Class, i32) {
    let class = classify(*x);
    if class != Class::Finite {
        return (class, 0);
    }

    // x == m * 2^e with m the integer significand.
    let m = x.significand();
    let e = if x.is_denormal() {
        F::MIN_EXPONENT - F::MANTISSA_SIZE
    } else {
        x.biased_exponent() - F::EXPONENT_BIAS - F::MANTISSA_SIZE
    };

    // Normalize: m has nb significant bits, so m * 2^-nb is in [0.5, 1).
    // Both steps are exact: m fits the significand, and the scale is a
    // normal power of two.
    let nb = 64 - m.as_u64().leading_zeros() as i32;
    let mut f = F::as_cast(m.as_u64());
    f *= F::pow2(-nb);
    if x.is_sign_negative() {
        f = -f;
    }

    *x = f;
    (Class::Finite, e + nb)
}

// TRUNCATE

/// Clear every significand bit of `*x` with magnitude below `2^-bits`,
/// truncating toward zero.
///
/// Callers pass fractions produced by [`unscale`], so `|x| < 1` and `bits`
/// counts how many leading fraction bits survive. Zero, infinities, and NaN
/// are left untouched.
pub(crate) fn truncate<F: Float>(x: &mut F, bits: i32) {
    debug_assert!(bits >= 0, "truncate() bit count is negative");
    if classify(*x) != Class::Finite {
        return;
    }
    if x.is_denormal() {
        // Far below 2^-bits for any word-sized count.
        *x = F::from_bits(x.to_bits() & F::SIGN_MASK);
        return;
    }

    // Leading bit sits at 2^e; stored mantissa bits run down to
    // 2^(e - MANTISSA_SIZE). Drop the ones below 2^-bits.
    let e = x.biased_exponent() - F::EXPONENT_BIAS;
    let drop = F::MANTISSA_SIZE - e - bits;
    if drop <= 0 {
        return;
    }
    if drop > F::MANTISSA_SIZE {
        *x = F::from_bits(x.to_bits() & F::SIGN_MASK);
        return;
    }
    *x = F::from_bits((x.to_bits() >> drop) << drop);
}

// SCALE

/// Multiply `*x` by `2^n` with at most a single rounding, saturating to
/// zero or infinity past the ends of the representable range.
///
/// Works on the bit representation: the significand is realigned to the
/// target exponent, which is exact for a normal result and rounds once, to
/// nearest with ties to even, when the result lands in the denormal range.
/// Zero, infinities, and NaN are left untouched.
pub(crate) fn scale_pow2<F: Float>(x: &mut F, n: i32) {
    if classify(*x) != Class::Finite {
        return;
    }

    // Saturation is settled well before these bounds, so clamping keeps
    // the exponent sums in `i32` range.
    let lim = 2 * (F::MAX_EXPONENT + F::SIGNIFICAND_SIZE);
    let n = n.clamp(-lim, lim);

    let sign = x.to_bits() & F::SIGN_MASK;
    let m = x.significand();
    let e = n + if x.is_denormal() {
        F::MIN_EXPONENT - F::MANTISSA_SIZE
    } else {
        x.biased_exponent() - F::EXPONENT_BIAS - F::MANTISSA_SIZE
    };

    // x * 2^n == m * 2^e, with m carrying nb significant bits.
    let nb = 64 - m.as_u64().leading_zeros() as i32;
    let top = e + nb - 1;

    *x = if top > F::MAX_EXPONENT {
        F::from_bits(sign | F::EXPONENT_MASK) // overflow
    } else if top >= F::MIN_EXPONENT {
        // normal result: realigning the significand is exact
        let mantissa = (m << (F::SIGNIFICAND_SIZE - nb)) & F::MANTISSA_MASK;
        let exponent = F::Unsigned::as_cast(top + F::EXPONENT_BIAS) << F::MANTISSA_SIZE;
        F::from_bits(sign | exponent | mantissa)
    } else {
        // denormal result: the least bit position is fixed, so realigning
        // can push significant bits out and must round
        let s = e - (F::MIN_EXPONENT - F::MANTISSA_SIZE);
        if s >= 0 {
            F::from_bits(sign | (m << s)) // still exact
        } else if -s > nb {
            F::from_bits(sign) // below half the least bit
        } else {
            // a carry out of the shift lands on the smallest normal
            // bit pattern, which is the correct rounding
            F::from_bits(sign | shift_right_round(m, -s))
        }
    };
}

/// Shift `m` right by `r` bits, rounding to nearest, ties to even.
/// `r` must be in `1..=63`.
fn shift_right_round<U: Integer>(m: U, r: i32) -> U {
    let keep = m >> r;
    let rem = m & ((U::ONE << r) - U::ONE);
    let half = U::ONE << (r - 1);
    if rem > half || (rem == half && keep & U::ONE == U::ONE) {
        keep + U::ONE
    } else {
        keep
    }
}

// TESTS
// -----
