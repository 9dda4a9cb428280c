//! Stockham autosort FFT
//!
//! Decimation in frequency over two equally sized buffers that swap roles after every
//! stage. A stage of half-width `r` (with `l = n / 2r` blocks) reads
//!
//! ```text
//! a = src[j*2r + k],  b = src[j*2r + k + r]
//! ```
//!
//! and writes `dst[j*r + k] = a + b` and `dst[j*r + k + n/2] = (a - b) * W_{2r}^k`.
//! After the stage the `2l` contiguous blocks of `r` values hold independent
//! sub-transforms; block `p` carries the bins `≡ p (mod 2l)`. Once the blocks are
//! small enough a fused codelet finishes each one and scatters it into place, so the
//! output is in natural order without any bit reversal.
//!
//! Kernels here do not validate their input beyond debug assertions.
use std::mem;

use crate::float::FftFloat;
use crate::kernels::butterfly::{
    butterfly, ComplexArith, ComplexVector, LaneVector, Scalar, SplitLanes,
};
use crate::kernels::codelets::{interleaved_codelet, split_codelet};
use crate::planner::TwiddleView;

/// Buffer the transform result ended up in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputLocation {
    Data,
    Scratch,
}

impl OutputLocation {
    fn swapped(self) -> Self {
        match self {
            OutputLocation::Data => OutputLocation::Scratch,
            OutputLocation::Scratch => OutputLocation::Data,
        }
    }
}

/// One interleaved stage of half-width `r` over `n` complex values.
#[multiversion::multiversion(targets(
    "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
))]
#[inline]
pub fn stage_interleaved<T: FftFloat>(
    src: &[T],
    dst: &mut [T],
    n: usize,
    r: usize,
    twiddles: &[T],
) {
    let width = <T::Packed as ComplexArith<T>>::WIDTH;
    debug_assert!(r % width == 0 && twiddles.len() >= 4 * r);

    let (dst_lo, dst_hi) = dst[..2 * n].split_at_mut(n);

    src[..2 * n]
        .chunks_exact(4 * r)
        .zip(dst_lo.chunks_exact_mut(2 * r))
        .zip(dst_hi.chunks_exact_mut(2 * r))
        .for_each(|((block, sums), diffs)| {
            let (a_half, b_half) = block.split_at(2 * r);

            a_half
                .chunks_exact(2 * width)
                .zip(b_half.chunks_exact(2 * width))
                .zip(sums.chunks_exact_mut(2 * width))
                .zip(diffs.chunks_exact_mut(2 * width))
                .zip(twiddles.chunks_exact(4 * width))
                .for_each(|((((a, b), sum), diff), w)| {
                    let (s, d) = butterfly::<T, T::Packed>(
                        T::Packed::load(a),
                        T::Packed::load(b),
                        &T::Packed::load_rotation(w),
                    );
                    s.store(sum);
                    d.store(diff);
                });
        });
}

/// One split stage of half-width `r`, batched over `L::WIDTH` values of `k`.
#[inline]
fn stage_split_lanes<T: FftFloat, L: LaneVector<T>>(
    src: (&[T], &[T]),
    dst: (&mut [T], &mut [T]),
    r: usize,
    twiddles_re: &[T],
    twiddles_im: &[T],
) {
    let (src_re, src_im) = src;
    let (dst_re, dst_im) = dst;
    let half = dst_re.len() / 2;
    let (lo_re, hi_re) = dst_re.split_at_mut(half);
    let (lo_im, hi_im) = dst_im.split_at_mut(half);

    for j in 0..half / r {
        let (a_at, out_at) = (2 * j * r, j * r);
        for k in (0..r).step_by(L::WIDTH) {
            let a = SplitLanes::<L> {
                re: L::load(&src_re[a_at + k..]),
                im: L::load(&src_im[a_at + k..]),
            };
            let b = SplitLanes::<L> {
                re: L::load(&src_re[a_at + r + k..]),
                im: L::load(&src_im[a_at + r + k..]),
            };
            let w = (L::load(&twiddles_re[k..]), L::load(&twiddles_im[k..]));

            let (s, d) = butterfly::<T, SplitLanes<L>>(a, b, &w);
            s.store(&mut lo_re[out_at + k..], &mut lo_im[out_at + k..]);
            d.store(&mut hi_re[out_at + k..], &mut hi_im[out_at + k..]);
        }
    }
}

/// One split stage of half-width `r` over `reals.len()` complex values.
#[multiversion::multiversion(targets(
    "x86_64+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx512f+avx512bw+avx512cd+avx512dq+avx512vl",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
))]
#[inline]
pub fn stage_split<T: FftFloat>(
    src_re: &[T],
    src_im: &[T],
    dst_re: &mut [T],
    dst_im: &mut [T],
    r: usize,
    twiddles_re: &[T],
    twiddles_im: &[T],
) {
    debug_assert!(src_re.len() == dst_re.len() && src_im.len() == dst_im.len());
    if r % <T::Lanes as LaneVector<T>>::WIDTH == 0 {
        stage_split_lanes::<T, T::Lanes>(
            (src_re, src_im),
            (dst_re, dst_im),
            r,
            twiddles_re,
            twiddles_im,
        );
    } else {
        stage_split_lanes::<T, Scalar<T>>(
            (src_re, src_im),
            (dst_re, dst_im),
            r,
            twiddles_re,
            twiddles_im,
        );
    }
}

/// Complex FFT of `n` interleaved values in `data[..2n]`, using `scratch[..2n]` as the
/// second ping-pong buffer. Returns the buffer holding the result.
///
/// `view` may belong to any length `>= n`; stage tables are shared across lengths.
pub fn stockham_interleaved<T: FftFloat>(
    data: &mut [T],
    scratch: &mut [T],
    n: usize,
    view: &TwiddleView<'_, T>,
    codelet_size: usize,
) -> OutputLocation {
    debug_assert!(n.is_power_of_two() && n <= view.n);
    debug_assert!(data.len() >= 2 * n && scratch.len() >= 2 * n);
    if n == 1 {
        return OutputLocation::Data;
    }

    let mut src = &mut data[..2 * n];
    let mut dst = &mut scratch[..2 * n];
    let mut output = OutputLocation::Scratch;

    let (mut r, mut l) = (n / 2, 1);
    while 2 * r > codelet_size {
        let offset = 4 * (view.n - 2 * r);
        stage_interleaved(src, dst, n, r, &view.stages[offset..offset + 4 * r]);

        mem::swap(&mut src, &mut dst);
        output = output.swapped();
        r /= 2;
        l *= 2;
    }

    interleaved_codelet::<T>(2 * r, l)(src, dst, l);
    output
}

/// Complex FFT of `n` split values, ping-ponging between `data` and `scratch`.
pub fn stockham_split<T: FftFloat>(
    data: (&mut [T], &mut [T]),
    scratch: (&mut [T], &mut [T]),
    n: usize,
    view: &TwiddleView<'_, T>,
    codelet_size: usize,
) -> OutputLocation {
    debug_assert!(n.is_power_of_two() && n <= view.n);
    if n == 1 {
        return OutputLocation::Data;
    }

    let (twiddles_re, twiddles_im) = view.stages[..2 * view.n].split_at(view.n);
    let mut src = (&mut data.0[..n], &mut data.1[..n]);
    let mut dst = (&mut scratch.0[..n], &mut scratch.1[..n]);
    let mut output = OutputLocation::Scratch;

    let (mut r, mut l) = (n / 2, 1);
    while 2 * r > codelet_size {
        let offset = view.n - 2 * r;
        stage_split(
            src.0,
            src.1,
            dst.0,
            dst.1,
            r,
            &twiddles_re[offset..offset + r],
            &twiddles_im[offset..offset + r],
        );

        mem::swap(&mut src, &mut dst);
        output = output.swapped();
        r /= 2;
        l *= 2;
    }

    split_codelet::<T>(2 * r, l)(src.0, src.1, dst.0, dst.1, l);
    output
}

/// Interleaved FFT whose result is always left in `data`.
pub fn fft_interleaved<T: FftFloat>(
    data: &mut [T],
    scratch: &mut [T],
    n: usize,
    view: &TwiddleView<'_, T>,
    codelet_size: usize,
) {
    if stockham_interleaved(data, scratch, n, view, codelet_size) == OutputLocation::Scratch {
        data[..2 * n].copy_from_slice(&scratch[..2 * n]);
    }
}

/// Split FFT whose result is always left in `data`.
pub fn fft_split<T: FftFloat>(
    data: (&mut [T], &mut [T]),
    scratch: (&mut [T], &mut [T]),
    n: usize,
    view: &TwiddleView<'_, T>,
    codelet_size: usize,
) {
    let (data_re, data_im) = data;
    let (scratch_re, scratch_im) = scratch;
    let output = stockham_split(
        (&mut *data_re, &mut *data_im),
        (&mut *scratch_re, &mut *scratch_im),
        n,
        view,
        codelet_size,
    );
    if output == OutputLocation::Scratch {
        data_re[..n].copy_from_slice(&scratch_re[..n]);
        data_im[..n].copy_from_slice(&scratch_im[..n]);
    }
}
