//! Multiplication by scalars and expansions.

use crate::add::{add_expansion, add_scalar};
use crate::expansion::copy;
use crate::num::Float;
use crate::primitive::{classify, scale_pow2, truncate, unscale, Class};
use crate::status::raise_invalid;

/// Pending partial products held while the source words are consumed.
const DELAY_LINE: usize = 4;

// SCALAR MULTIPLY

/// Multiply an expansion by one native scalar.
///
/// The scalar is expected to carry at most a word's worth of significand
/// bits (expansion words and small staging constants qualify), so each
/// per-word partial product is exact. Long multiplication runs through a
/// fixed delay line: each source word is consumed into a partial product
/// and cleared, and the oldest partial product is folded into the result
/// in two exact halves so no rounding is lost to the fold. A zero,
/// infinite, or NaN product of the leading word settles the whole result
/// immediately, raising invalid-operation for NaN.
pub fn multiply_scalar<F: Float>(p: &mut [F], x0: F) -> &mut [F] {
    let n = p.len();
    if n == 0 {
        return p;
    }

    let mut buf = [F::ZERO; DELAY_LINE];

    // check for special values
    buf[0] = p[0] * x0;
    let class = classify(buf[0]);
    if class != Class::Finite {
        // quit early on 0, Inf, or NaN
        if class == Class::Nan {
            raise_invalid();
        }
        p[0] = buf[0];
        if class.is_special() && n > 1 {
            p[1] = F::ZERO;
        }
        return p;
    }

    p[0] = F::ZERO;

    // sum partial products
    let mut j = 1;
    let mut k = 0;
    while k < n {
        while j < DELAY_LINE {
            if k + j < n && p[k + j] != F::ZERO {
                // copy up a partial product
                buf[j] = p[k + j] * x0;
                p[k + j] = F::ZERO;
                j += 1;
            } else {
                // terminate sequence
                buf[j] = F::ZERO;
                j = 2 * DELAY_LINE;
                break;
            }
        }

        if buf[0] == F::ZERO {
            break; // input done
        }

        // add in partial product by halves
        let mut y0 = buf[0];
        let (_, e) = unscale(&mut y0);
        truncate(&mut y0, F::WORD_SIZE); // clear low half bits
        scale_pow2(&mut y0, e);
        add_scalar(p, y0); // add in ms part
        add_scalar(p, buf[0] - y0); // add in ls part

        // copy down delay line
        let lim = j.min(DELAY_LINE);
        let mut i = 1;
        while i < lim {
            buf[i - 1] = buf[i];
            if buf[i - 1] == F::ZERO {
                break;
            }
            i += 1;
        }

        k += 1;
        j -= 1;
    }

    p
}

// EXPANSION MULTIPLY

/// Multiply expansion `p` by expansion `q`, using caller-supplied scratch
/// of at least `2 * p.len()` words.
///
/// A single-word `q` delegates to [`multiply_scalar`]. Otherwise the
/// original `p` is saved in the scratch, each of `q`'s significant words
/// forms one partial product against it, and the partial products are
/// accumulated into `p`. The scratch must not alias either operand.
pub fn multiply_expansion<'a, F: Float>(
    p: &'a mut [F],
    q: &[F],
    scratch: &mut [F],
) -> &'a mut [F] {
    let n = p.len();
    let m = q.len();
    if n == 0 || m == 0 {
        return p;
    }

    if q[0] == F::ZERO || m == 1 || q[1] == F::ZERO {
        multiply_scalar(p, q[0]);
        return p;
    }

    // sum partial products
    debug_assert!(scratch.len() >= 2 * n, "multiply_expansion() scratch too small");
    let (saved, rest) = scratch.split_at_mut(n);
    let acc = &mut rest[..n];

    copy(saved, p);
    multiply_scalar(p, q[0]); // form first partial product in place
    for &w in &q[1..] {
        if w == F::ZERO {
            break;
        }
        // add in a partial product
        copy(acc, saved);
        multiply_scalar(acc, w);
        add_expansion(p, acc);
    }

    p
}

// TESTS
// -----
