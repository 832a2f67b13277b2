//! Loading, collapsing, and whole-expansion bookkeeping.
//!
//! An expansion is a caller-owned slice of words in decreasing magnitude:
//! word `i` is larger than word `i + 1` by at least `WORD_SIZE` binary
//! orders, the first zero word terminates the significant part, and the
//! words sum exactly to the represented value. Everything here either
//! establishes that shape from a native value or tears it back down to one.

use crate::add::add_scalar;
use crate::mul::multiply_scalar;
use crate::num::{Float, WidthClass};
use crate::primitive::{scale_pow2, truncate, unscale, Class};

// SHIFT

/// Close the gap at word `k`: move every lower-order word up one slot,
/// stopping past the first zero word, and zero the freed last slot.
pub(crate) fn close_gap<F: Float>(p: &mut [F], k: usize) {
    let n = p.len();
    let mut m = k + 1;
    while m < n {
        p[m - 1] = p[m];
        if p[m - 1] == F::ZERO {
            break;
        }
        m += 1;
    }
    p[n - 1] = F::ZERO;
}

// LOAD

/// Decompose one native value into an expansion.
///
/// The words sum to `x` exactly. A finite value splits into an upper word
/// of `WORD_SIZE` significand bits and a residual; for an odd native width
/// the residual can itself carry one bit too many and is split again when
/// there is room. Infinities and NaN occupy word 0 with word 1 zeroed as a
/// backstop.
pub fn load_value<F: Float>(p: &mut [F], x: F) -> &mut [F] {
    let n = p.len();
    if n == 0 {
        return p;
    }

    let mut x0 = x;
    if n == 1 {
        p[0] = x0;
        return p;
    }

    let (class, xexp) = unscale(&mut x0);
    if class == Class::Zero {
        p[0] = x;
        return p;
    }
    if class.is_special() {
        p[0] = x;
        p[1] = F::ZERO;
        return p;
    }

    // finite, unpack it
    truncate(&mut x0, F::WORD_SIZE);
    scale_pow2(&mut x0, xexp);

    p[0] = x0; // ms bits
    p[1] = x - x0; // ls bits

    if n > 2 {
        if F::SIGNIFICAND_SIZE % 2 != 0 && p[1] != F::ZERO {
            // odd width: the residual holds one bit more than a word,
            // so a third word may be needed
            let r = p[1];
            let (_, rexp) = unscale(&mut p[1]);
            truncate(&mut p[1], F::WORD_SIZE);
            scale_pow2(&mut p[1], rexp);
            p[2] = r - p[1];
            if n > 3 && p[2] != F::ZERO {
                p[3] = F::ZERO;
            }
            return p;
        }

        p[2] = F::ZERO;
    }

    p
}

// COLLAPSE

/// Fold an expansion to one correctly rounded native value.
///
/// Up to two significant words fold with a single native add. With more,
/// the low words past position 1 are gathered as sticky bits and the fold
/// order depends on whether `p[0] + p[1]` was exact: if it was, the sticky
/// bits land past the sum without disturbing it; if a carry was absorbed,
/// folding the sticky bits into `p[1]` first reproduces the single correct
/// rounding.
pub fn collapse<F: Float>(p: &[F]) -> F {
    let n = p.len();
    if n == 0 {
        F::ZERO
    } else if n == 1 || p[0] == F::ZERO || p[1] == F::ZERO {
        p[0]
    } else if n == 2 || p[2] == F::ZERO {
        p[0] + p[1]
    } else {
        // extra bits, ensure proper rounding
        let p01 = p[0] + p[1];
        let mut p2 = p[2];

        if n >= 4 {
            p2 += p[3]; // pick up sticky bits
        }

        if p01 - p[0] == p[1] {
            p01 + p2 // carry is within p[2], add it in
        } else {
            p[0] + (p[1] + p2) // fold in p[2] then add it in
        }
    }
}

// INTEGER LOAD

/// Load a native integer into an expansion.
///
/// A wide significand takes the whole value exactly in one cast. A narrow
/// one stages it: the high part is loaded and scaled back up by 10000, then
/// the remainder is added, so no low-order bits are lost to the cast.
pub fn load_integer<F: Float>(p: &mut [F], x: i32) -> &mut [F] {
    match F::WIDTH_CLASS {
        WidthClass::Wide => {
            load_value(p, F::as_cast(x));
        }
        WidthClass::Narrow => {
            load_value(p, F::as_cast(x / 10000));
            multiply_scalar(p, F::as_cast(10000));
            add_scalar(p, F::as_cast(x % 10000));
        }
    }

    p
}

// COPY

/// Word-for-word copy of `dst.len()` words from `src` into `dst`.
pub fn copy<'a, F: Float>(dst: &'a mut [F], src: &[F]) -> &'a mut [F] {
    let n = dst.len();
    dst.copy_from_slice(&src[..n]);
    dst
}

// SCALE

/// Scale an expansion by the binary exponent `m`.
///
/// Each word scales independently and exactly, so the magnitude gaps are
/// preserved as-is; nothing significant lies past the first zero word.
pub fn scale_by_power_of_two<F: Float>(p: &mut [F], m: i32) -> &mut [F] {
    for k in 0..p.len() {
        scale_pow2(&mut p[k], m);
        if p[k] == F::ZERO {
            break;
        }
    }

    p
}

// TESTS
// -----

#[cfg(test)]
mod tests {
    use super::*;
    use crate::num::Float;

    fn check_roundtrip(x: f64) {
        let mut buf = [0.0f64; 4];
        load_value(&mut buf, x);
        assert_eq!(collapse(&buf).to_bits(), x.to_bits(), "round trip of {:?}", x);
    }

    #[test]
    fn load_collapse_roundtrip_test() {
        check_roundtrip(0.0);
        check_roundtrip(-0.0);
        check_roundtrip(1.0);
        check_roundtrip(-1.0);
        check_roundtrip(1.5);
        check_roundtrip(0.1);
        check_roundtrip(1.0e300);
        check_roundtrip(1.0e-300);
        check_roundtrip(5e-324);
        check_roundtrip(f64::MAX);
        check_roundtrip(f64::MIN_POSITIVE);
        check_roundtrip(3.141592653589793);
    }

    #[test]
    fn load_splits_exactly_test() {
        // All 53 bits set: the split must lose nothing.
        let x = f64::from_bits(0x433FFFFFFFFFFFFF); // 2^53 - 1 scaled
        let mut buf = [0.0f64; 4];
        load_value(&mut buf, x);
        assert_eq!(buf[0] + buf[1] + buf[2], x);
        // Upper word carries at most WORD_SIZE significand bits.
        let mut w = buf[0];
        let (_, e0) = crate::primitive::unscale(&mut w);
        let mut w = buf[1];
        let (_, e1) = crate::primitive::unscale(&mut w);
        assert!(e0 - e1 >= f64::WORD_SIZE);
    }

    #[test]
    fn load_odd_width_third_word_test() {
        // 53 significand bits split 26/27; a low residual bit forces the
        // tertiary split for f64.
        let x = 1.0 + f64::pow2(-26) + f64::pow2(-52);
        let mut buf = [0.0f64; 4];
        load_value(&mut buf, x);
        assert_eq!(buf[0], 1.0);
        assert_eq!(buf[1], f64::pow2(-26));
        assert_eq!(buf[2], f64::pow2(-52));
        assert_eq!(buf[0] + buf[1] + buf[2], x);
        assert_eq!(collapse(&buf), x);
    }

    #[test]
    fn load_specials_test() {
        let mut buf = [1.0f64; 4];
        load_value(&mut buf, f64::INFINITY);
        assert_eq!(buf[0], f64::INFINITY);
        assert_eq!(buf[1], 0.0);

        let mut buf = [1.0f64; 4];
        load_value(&mut buf, f64::NAN);
        assert!(buf[0].is_nan());
        assert_eq!(buf[1], 0.0);
    }

    #[test]
    fn load_single_word_test() {
        let mut buf = [0.0f64; 1];
        load_value(&mut buf, 0.1);
        assert_eq!(buf[0], 0.1);
        assert_eq!(collapse(&buf), 0.1);
    }

    #[test]
    fn collapse_empty_test() {
        let buf: [f64; 0] = [];
        assert_eq!(collapse(&buf), 0.0);
    }

    #[test]
    fn collapse_two_words_test() {
        let buf = [1.0f64, f64::pow2(-30), 0.0, 0.0];
        assert_eq!(collapse(&buf), 1.0 + f64::pow2(-30));
    }

    #[test]
    fn collapse_tie_break_test() {
        // p[0] + p[1] lands exactly on a tie; the sticky word below must
        // push the rounding up, which the naive fold would miss.
        let buf = [1.0f64, f64::pow2(-53), f64::pow2(-105), 0.0];
        assert_eq!(collapse(&buf), 1.0 + f64::pow2(-52));

        // With nothing below the tie, round-to-even keeps 1.0.
        let buf = [1.0f64, f64::pow2(-53), 0.0, 0.0];
        assert_eq!(collapse(&buf), 1.0);

        // Exact leading add: sticky bits are simply too small to matter.
        let buf = [1.0f64, f64::pow2(-30), f64::pow2(-80), 0.0];
        assert_eq!(collapse(&buf), 1.0 + f64::pow2(-30));
    }

    #[test]
    fn collapse_sticky_word_test() {
        // Word 3 is gathered into the sticky accumulation below word 2.
        let buf = [1.0f64, f64::pow2(-53), f64::pow2(-105), f64::pow2(-157)];
        assert_eq!(collapse(&buf), 1.0 + f64::pow2(-52));
    }

    #[test]
    fn close_gap_test() {
        let mut buf = [1.0f64, 0.5, 0.25, 0.125];
        close_gap(&mut buf, 1);
        assert_eq!(buf, [1.0, 0.25, 0.125, 0.0]);

        // stops past the first zero word
        let mut buf = [1.0f64, 0.5, 0.0, 0.125];
        close_gap(&mut buf, 0);
        assert_eq!(buf, [0.5, 0.0, 0.125, 0.0]);

        let mut buf = [1.0f64, 0.5];
        close_gap(&mut buf, 1);
        assert_eq!(buf, [1.0, 0.0]);
    }

    #[test]
    fn load_integer_test() {
        let mut buf = [0.0f64; 4];
        load_integer(&mut buf, 123456789);
        assert_eq!(collapse(&buf), 123456789.0);

        let mut buf = [0.0f64; 4];
        load_integer(&mut buf, -123456789);
        assert_eq!(collapse(&buf), -123456789.0);

        let mut buf = [0.0f64; 4];
        load_integer(&mut buf, 0);
        assert_eq!(collapse(&buf), 0.0);
    }

    #[test]
    fn load_integer_narrow_test() {
        // f32 words cannot take 27 significant bits in one cast; the staged
        // load keeps the exact value spread across words.
        let mut buf = [0.0f32; 4];
        load_integer(&mut buf, 123456789);
        let exact: f64 = buf.iter().map(|&w| w as f64).sum();
        assert_eq!(exact, 123456789.0);
        // Collapse still rounds to the nearest f32 once.
        assert_eq!(collapse(&buf), 123456789.0f32);

        let mut buf = [0.0f32; 4];
        load_integer(&mut buf, 9999);
        assert_eq!(collapse(&buf), 9999.0);
    }

    #[test]
    fn copy_test() {
        let src = [1.0f64, 0.5, 0.0, 0.0];
        let mut dst = [0.0f64; 4];
        copy(&mut dst, &src);
        assert_eq!(dst, src);
    }

    #[test]
    fn scale_test() {
        let mut buf = [0.0f64; 4];
        load_value(&mut buf, 1.5);
        scale_by_power_of_two(&mut buf, 4);
        assert_eq!(collapse(&buf), 24.0);

        scale_by_power_of_two(&mut buf, -4);
        assert_eq!(collapse(&buf), 1.5);

        // multi-word scaling keeps the gap structure
        let mut buf = [0.0f64; 4];
        load_value(&mut buf, 1.0 + f64::pow2(-40));
        scale_by_power_of_two(&mut buf, 10);
        assert_eq!(collapse(&buf), (1.0 + f64::pow2(-40)) * 1024.0);
    }

    #[test]
    fn scale_into_denormals_test() {
        // Scaling down into the denormal range rounds each word once.
        let mut buf = [0.0f64; 4];
        load_value(&mut buf, 21.0 * f64::pow2(-54));
        scale_by_power_of_two(&mut buf, -1023);
        assert_eq!(buf[0].to_bits(), 3); // 2.625 least bits, up

        // and back out again is exact while bits survive
        let mut buf = [0.0f64; 4];
        load_value(&mut buf, 1.5);
        scale_by_power_of_two(&mut buf, -1073);
        assert_eq!(collapse(&buf), f64::pow2(-1022) * f64::pow2(-51) * 1.5);
        scale_by_power_of_two(&mut buf, 1073);
        assert_eq!(collapse(&buf), 1.5);
    }
}
