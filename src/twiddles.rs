//! Rotation tables
//!
//! Every table is derived from the canonical roots `W_N^k = (cos(-2*pi*k/N), sin(-2*pi*k/N))`,
//! `k in [0, N)`, stored interleaved. Values are evaluated in `f64` and narrowed to the
//! working precision.
//!
//! By default the trigonometry is a pair of Taylor polynomials over a range-reduced
//! argument, good to about `1e-11`. The `precise-trig` feature switches to the
//! platform `sin_cos`.
use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::float::FftFloat;
use crate::kernels::butterfly::{pack_rotations, ComplexArith};

/// `(2k)(2k+1)` for `k = 1..=7`; sine through `x^15`
const SIN_DENOMINATORS: [f64; 7] = [6.0, 20.0, 42.0, 72.0, 110.0, 156.0, 210.0];

/// `(2k-1)(2k)` for `k = 1..=8`; cosine through `x^16`
const COS_DENOMINATORS: [f64; 8] = [2.0, 12.0, 30.0, 56.0, 90.0, 132.0, 182.0, 240.0];

/// Largest packed register width (in complex values) a stage table is laid out for.
const MAX_PACKED_WIDTH: usize = 4;

#[inline]
fn horner(x2: f64, denominators: &[f64]) -> f64 {
    denominators
        .iter()
        .rev()
        .fold(1.0, |acc, denominator| 1.0 - x2 / denominator * acc)
}

/// Polynomial `(sin, cos)` with reduction to `[-pi, pi]` and a quadrant fold to
/// `[-pi/2, pi/2]`.
pub fn polynomial_sin_cos(angle: f64) -> (f64, f64) {
    let mut x = angle % TAU;
    if x > PI {
        x -= TAU;
    } else if x < -PI {
        x += TAU;
    }

    let mut cos_sign = 1.0;
    if x > FRAC_PI_2 {
        x = PI - x;
        cos_sign = -1.0;
    } else if x < -FRAC_PI_2 {
        x = -PI - x;
        cos_sign = -1.0;
    }

    let x2 = x * x;
    (x * horner(x2, &SIN_DENOMINATORS), cos_sign * horner(x2, &COS_DENOMINATORS))
}

/// `(sin, cos)` of `angle` using the trigonometry selected at build time.
#[inline]
pub fn sin_cos(angle: f64) -> (f64, f64) {
    #[cfg(feature = "precise-trig")]
    {
        angle.sin_cos()
    }
    #[cfg(not(feature = "precise-trig"))]
    {
        polynomial_sin_cos(angle)
    }
}

/// Write `W_n^k` for `k in [0, n)` into `out` as `re, im` pairs.
///
/// # Panics
///
/// Panics if `out.len() < 2 * n`
pub fn fill_roots<T: FftFloat>(n: usize, out: &mut [T]) {
    let step = -TAU / n as f64;
    out[..2 * n]
        .chunks_exact_mut(2)
        .enumerate()
        .for_each(|(k, w)| {
            let (sin, cos) = sin_cos(step * k as f64);
            w[0] = T::from_f64(cos);
            w[1] = T::from_f64(sin);
        });
}

/// Write the real-adapter rotations `U_k = -i * W_n^k = (wi, -wr)` for `k in [0, n/2]`.
///
/// # Panics
///
/// Panics if `roots` holds fewer than `n/2 + 1` roots or `out.len() < 2 * (n/2 + 1)`
pub fn fill_unpack<T: FftFloat>(n: usize, roots: &[T], out: &mut [T]) {
    let count = n / 2 + 1;
    out[..2 * count]
        .chunks_exact_mut(2)
        .zip(roots.chunks_exact(2))
        .for_each(|(u, w)| {
            u[0] = w[1];
            u[1] = -w[0];
        });
}

/// Stage tables for the interleaved layout, pre-replicated for `T::Packed`.
///
/// The stage with half-width `r` holds `W_{2r}^k` for `k in [0, r)` starting at float
/// offset `4 * (n - 2r)`, one packed group of `4 * WIDTH` floats per `WIDTH` rotations.
/// Only stages with `r >= 2` are written; narrower stages always fall to a codelet.
pub fn fill_stage_interleaved<T: FftFloat>(n: usize, roots: &[T], out: &mut [T]) {
    let width = <T::Packed as ComplexArith<T>>::WIDTH;
    debug_assert!(width <= MAX_PACKED_WIDTH);

    let mut r = n / 2;
    while r >= 2 {
        let stride = n / (2 * r);
        let offset = 4 * (n - 2 * r);
        let mut group = [(T::zero(), T::zero()); MAX_PACKED_WIDTH];

        out[offset..offset + 4 * r]
            .chunks_exact_mut(4 * width)
            .enumerate()
            .for_each(|(g, packed)| {
                for (i, slot) in group[..width].iter_mut().enumerate() {
                    let root = 2 * (g * width + i) * stride;
                    *slot = (roots[root], roots[root + 1]);
                }
                pack_rotations(width, &group[..width], packed);
            });

        r /= 2;
    }
}

/// Stage tables for the split layout.
///
/// The stage with half-width `r` keeps `re(W_{2r}^k)` at `out[n - 2r + k]` and
/// `im(W_{2r}^k)` at `out[2n - 2r + k]`.
pub fn fill_stage_split<T: FftFloat>(n: usize, roots: &[T], out: &mut [T]) {
    let (out_re, out_im) = out[..2 * n].split_at_mut(n);

    let mut r = n / 2;
    while r >= 1 {
        let stride = n / (2 * r);
        let offset = n - 2 * r;
        for k in 0..r {
            out_re[offset + k] = roots[2 * k * stride];
            out_im[offset + k] = roots[2 * k * stride + 1];
        }
        r /= 2;
    }
}
