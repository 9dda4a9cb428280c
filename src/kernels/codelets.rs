//! Fused small-size kernels
//!
//! A codelet computes a complete `M`-point DFT of one block in registers. There is
//! one generic network, [`dif_network`], instantiated per `M` through a const
//! parameter. Every rotation it applies is a compile-time constant, and the trivial
//! ones are specialised away:
//!
//! - `W^0 = 1`: plain add/sub
//! - `W^{M/4} = -i`: lane swap and negate
//! - `W^{M/8}`, `W^{3M/8}`: add/sub scaled by `1/sqrt(2)`
//!
//! Everything else multiplies by a literal from [`ROOTS_64`].
//!
//! The Stockham engine hands the codelet pass `l` contiguous blocks of `M` values;
//! bin `q` of block `p` is written to `dst[q * l + p]`, completing the
//! natural-order output.
use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex;

use crate::float::FftFloat;
use crate::kernels::butterfly::{ComplexArith, ComplexVector, LaneVector, Scalar, SplitLanes};

/// Largest block a codelet handles.
pub const MAX_CODELET_SIZE: usize = 64;

/// `W_64^e = (cos(2*pi*e/64), -sin(2*pi*e/64))` for `e` in `0..32`
#[allow(clippy::excessive_precision)]
pub(crate) const ROOTS_64: [(f64, f64); 32] = [
    (1.0, 0.0),
    (0.9951847266721969, -0.0980171403295606),
    (0.9807852804032304, -0.19509032201612825),
    (0.9569403357322088, -0.29028467725446233),
    (0.9238795325112867, -0.3826834323650898),
    (0.881921264348355, -0.47139673682599764),
    (0.8314696123025452, -0.5555702330196022),
    (0.773010453362737, -0.6343932841636455),
    (0.7071067811865476, -0.7071067811865475),
    (0.6343932841636455, -0.773010453362737),
    (0.5555702330196023, -0.8314696123025452),
    (0.4713967368259978, -0.8819212643483549),
    (0.38268343236508984, -0.9238795325112867),
    (0.29028467725446233, -0.9569403357322089),
    (0.19509032201612833, -0.9807852804032304),
    (0.09801714032956077, -0.9951847266721968),
    (0.0, -1.0),
    (-0.09801714032956065, -0.9951847266721969),
    (-0.1950903220161282, -0.9807852804032304),
    (-0.29028467725446216, -0.9569403357322089),
    (-0.3826834323650897, -0.9238795325112867),
    (-0.4713967368259977, -0.881921264348355),
    (-0.555570233019602, -0.8314696123025455),
    (-0.6343932841636454, -0.7730104533627371),
    (-0.7071067811865475, -0.7071067811865476),
    (-0.773010453362737, -0.6343932841636455),
    (-0.8314696123025453, -0.5555702330196022),
    (-0.8819212643483549, -0.47139673682599786),
    (-0.9238795325112867, -0.3826834323650899),
    (-0.9569403357322088, -0.2902846772544624),
    (-0.9807852804032304, -0.1950903220161286),
    (-0.9951847266721968, -0.09801714032956083),
];

/// Multiply `t` by `W_M^e`, `e < M/2`.
#[inline(always)]
fn apply_root<T: FftFloat, V: ComplexArith<T>, const M: usize>(t: V, e: usize) -> V {
    if e == 0 {
        t
    } else if 4 * e == M {
        t.mul_neg_i()
    } else if 8 * e == M {
        // (1 - i) / sqrt(2)
        t.add(t.mul_neg_i()).scale(T::from_f64(FRAC_1_SQRT_2))
    } else if 8 * e == 3 * M {
        // (-1 - i) / sqrt(2)
        t.add(t.mul_neg_i())
            .scale(T::from_f64(FRAC_1_SQRT_2))
            .mul_neg_i()
    } else {
        let (w_re, w_im) = ROOTS_64[e * (MAX_CODELET_SIZE / M)];
        t.rotate(&V::rotation(T::from_f64(w_re), T::from_f64(w_im)))
    }
}

/// Reverse the low `log2(M)` bits of `q`.
#[inline(always)]
const fn reverse_index<const M: usize>(q: usize) -> usize {
    if M <= 1 {
        return 0;
    }
    q.reverse_bits() >> (usize::BITS - M.trailing_zeros())
}

/// In-register radix-2 DIF network. Leaves bin `q` at `x[reverse_index::<M>(q)]`.
#[inline(always)]
pub(crate) fn dif_network<T: FftFloat, V: ComplexArith<T>, const M: usize>(x: &mut [V; M]) {
    let mut half = M / 2;
    while half >= 1 {
        let exponent_step = M / (2 * half);
        let mut start = 0;
        while start < M {
            for k in 0..half {
                let a = x[start + k];
                let b = x[start + k + half];
                x[start + k] = a.add(b);
                x[start + k + half] = apply_root::<T, V, M>(a.sub(b), k * exponent_step);
            }
            start += 2 * half;
        }
        half /= 2;
    }
}

/// Codelet pass over interleaved buffers: `l` blocks of `M` values in `src`,
/// `V::WIDTH` blocks per register.
#[inline]
fn interleaved_pass<T: FftFloat, V: ComplexVector<T>, const M: usize>(
    src: &[T],
    dst: &mut [T],
    l: usize,
) {
    debug_assert!(l % V::WIDTH == 0);
    for p in (0..l).step_by(V::WIDTH) {
        let mut x: [V; M] = core::array::from_fn(|i| V::gather(src, p * M + i, M));
        dif_network::<T, V, M>(&mut x);
        for q in 0..M {
            let out = 2 * (q * l + p);
            x[reverse_index::<M>(q)].store(&mut dst[out..]);
        }
    }
}

/// Codelet pass over split buffers, `L::WIDTH` blocks per register.
#[inline]
fn split_pass<T: FftFloat, L: LaneVector<T>, const M: usize>(
    src_re: &[T],
    src_im: &[T],
    dst_re: &mut [T],
    dst_im: &mut [T],
    l: usize,
) {
    debug_assert!(l % L::WIDTH == 0);
    for p in (0..l).step_by(L::WIDTH) {
        let mut x: [SplitLanes<L>; M] =
            core::array::from_fn(|i| SplitLanes::gather(src_re, src_im, p * M + i, M));
        dif_network::<T, SplitLanes<L>, M>(&mut x);
        for q in 0..M {
            let out = q * l + p;
            x[reverse_index::<M>(q)].store(&mut dst_re[out..], &mut dst_im[out..]);
        }
    }
}

/// Codelet pass signature for interleaved buffers: `(src, dst, l)`.
pub type InterleavedCodelet<T> = fn(&[T], &mut [T], usize);

/// Codelet pass signature for split buffers: `(src_re, src_im, dst_re, dst_im, l)`.
pub type SplitCodelet<T> = fn(&[T], &[T], &mut [T], &mut [T], usize);

/// Select the interleaved codelet for blocks of `m` values, batched across `l` blocks.
///
/// The precision's packed register is used when `l` fills it, the scalar network
/// otherwise.
pub fn interleaved_codelet<T: FftFloat>(m: usize, l: usize) -> InterleavedCodelet<T> {
    debug_assert!(m.is_power_of_two() && (2..=MAX_CODELET_SIZE).contains(&m));
    let index = m.trailing_zeros() as usize - 1;
    if l % <T::Packed as ComplexArith<T>>::WIDTH == 0 {
        let table: [InterleavedCodelet<T>; 6] = [
            interleaved_pass::<T, T::Packed, 2>,
            interleaved_pass::<T, T::Packed, 4>,
            interleaved_pass::<T, T::Packed, 8>,
            interleaved_pass::<T, T::Packed, 16>,
            interleaved_pass::<T, T::Packed, 32>,
            interleaved_pass::<T, T::Packed, 64>,
        ];
        table[index]
    } else {
        let table: [InterleavedCodelet<T>; 6] = [
            interleaved_pass::<T, Complex<T>, 2>,
            interleaved_pass::<T, Complex<T>, 4>,
            interleaved_pass::<T, Complex<T>, 8>,
            interleaved_pass::<T, Complex<T>, 16>,
            interleaved_pass::<T, Complex<T>, 32>,
            interleaved_pass::<T, Complex<T>, 64>,
        ];
        table[index]
    }
}

/// Select the split codelet for blocks of `m` values, batched across `l` blocks.
pub fn split_codelet<T: FftFloat>(m: usize, l: usize) -> SplitCodelet<T> {
    debug_assert!(m.is_power_of_two() && (2..=MAX_CODELET_SIZE).contains(&m));
    let index = m.trailing_zeros() as usize - 1;
    if l % <T::Lanes as LaneVector<T>>::WIDTH == 0 {
        let table: [SplitCodelet<T>; 6] = [
            split_pass::<T, T::Lanes, 2>,
            split_pass::<T, T::Lanes, 4>,
            split_pass::<T, T::Lanes, 8>,
            split_pass::<T, T::Lanes, 16>,
            split_pass::<T, T::Lanes, 32>,
            split_pass::<T, T::Lanes, 64>,
        ];
        table[index]
    } else {
        let table: [SplitCodelet<T>; 6] = [
            split_pass::<T, Scalar<T>, 2>,
            split_pass::<T, Scalar<T>, 4>,
            split_pass::<T, Scalar<T>, 8>,
            split_pass::<T, Scalar<T>, 16>,
            split_pass::<T, Scalar<T>, 32>,
            split_pass::<T, Scalar<T>, 64>,
        ];
        table[index]
    }
}
