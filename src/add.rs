//! Renormalizing addition into an expansion.

use crate::expansion::close_gap;
use crate::num::Float;
use crate::primitive::{classify, scale_pow2, truncate, unscale, Class};
use crate::status::raise_invalid;

// SCALAR ADD

/// Add one native scalar into an expansion, renormalizing.
///
/// Scans from the most significant word for the position where `x0`
/// belongs. At each word one of five things happens: a special word stops
/// the scan (a dominant NaN or infinity wins, and an infinity of opposite
/// sign raises invalid-operation and stores NaN); a zero slot simply takes
/// `x0`; a word far above lets the scan advance; a word far below makes
/// room by shifting the tail down one slot, dropping the least significant
/// word if the buffer is full; and a word of comparable magnitude absorbs
/// `x0`, after which excess high bits carry into the word above and excess
/// low bits continue down the scan as the new `x0`. The result sums to the
/// exact prior value plus `x0`, short only of bits that ran past the last
/// word.
pub fn add_scalar<F: Float>(p: &mut [F], x0: F) -> &mut [F] {
    let n = p.len();
    if n == 0 {
        return p;
    }

    let mut x0 = x0;
    let mut xscaled = x0;
    let (xclass, mut xexp) = unscale(&mut xscaled);

    if xclass.is_special() {
        let yclass = classify(p[0]);
        if xclass == Class::Nan || !yclass.is_special() {
            p[0] = x0; // x0 NaN, or x0 Inf and y finite, just store x0
        } else if yclass != Class::Nan && x0.is_sign_negative() != p[0].is_sign_negative() {
            // Inf - Inf is invalid
            raise_invalid();
            p[0] = F::NAN;
            if n > 1 {
                p[1] = F::ZERO;
            }
        }
        return p;
    }
    if xclass == Class::Zero {
        return p;
    }

    // x0 is finite nonzero, add it
    let big_exp = 2 * (F::MAX_EXPONENT + 1); // above any word's exponent
    let mybits = F::WORD_SIZE;
    let mut prevexp = big_exp;
    let mut k = 0;

    while k < n {
        // look for a term comparable to xexp to add x0
        let mut yscaled = p[k];
        let (yclass, yexp) = unscale(&mut yscaled);

        if yclass.is_special() {
            break; // y is Inf or NaN, just leave it alone
        }

        if yclass == Class::Zero {
            // 0 + x == x
            p[k] = x0;
            if k + 1 < n {
                p[k + 1] = F::ZERO; // add new trailing zero
            }
            break;
        }

        let diff = yexp - xexp;
        if diff <= -mybits && x0 != F::ZERO {
            // insert nonzero x0 here and loop to renormalize
            let mut j = k + 1;
            while j < n && p[j] != F::ZERO {
                j += 1;
            }
            if j < n - 1 {
                j += 1; // extra room, copy trailing zero down too
            } else if j == n {
                j -= 1; // no room, don't copy smallest word
            }
            while k < j {
                p[j] = p[j - 1]; // copy down words
                j -= 1;
            }
            p[k] = x0;
            x0 = F::ZERO;
        } else if mybits <= diff && x0 != F::ZERO {
            // loop to add finite x0 to smaller words
            prevexp = yexp;
            k += 1;
        } else {
            // partition sum and renormalize
            p[k] += x0;
            if p[k] == F::ZERO {
                // term sum is zero, copy up words
                close_gap(p, k);
                if p[k] == F::ZERO {
                    break;
                }
            }

            x0 = p[k];
            let (_, e) = unscale(&mut x0);
            xexp = e;
            if prevexp - mybits < xexp {
                // propagate bits up
                truncate(&mut x0, xexp - (prevexp - mybits));
                scale_pow2(&mut x0, xexp);
                p[k] -= x0;
                if p[k] == F::ZERO {
                    // all bits carry, copy up words
                    close_gap(p, k);
                }

                debug_assert!(k > 0, "carry out of the most significant word");
                k -= 1;
                if k == 0 {
                    prevexp = big_exp;
                } else {
                    // recompute prevexp
                    xscaled = p[k - 1];
                    let (_, e) = unscale(&mut xscaled);
                    prevexp = e;
                }
            } else if k + 1 == n {
                break; // don't truncate bits in last word
            } else {
                // propagate any excess bits down
                x0 = p[k];
                let (_, e) = unscale(&mut p[k]);
                truncate(&mut p[k], mybits);
                scale_pow2(&mut p[k], e);
                x0 -= p[k];
                prevexp = e;

                xscaled = if x0 != F::ZERO { x0 } else { p[k] };
                let (_, e) = unscale(&mut xscaled);
                xexp = e;
                k += 1;
            }
        }
    }

    p
}

// EXPANSION ADD

/// Add expansion `q` into `p`, one word at a time from the most
/// significant, stopping at `q`'s zero terminator.
pub fn add_expansion<'a, F: Float>(p: &'a mut [F], q: &[F]) -> &'a mut [F] {
    for &w in q {
        if w == F::ZERO {
            break;
        }
        add_scalar(p, w);
    }

    p
}

// TESTS
// -----
