//! Buffer layouts
//!
//! [`Interleaved`] keeps complex values as `re, im` pairs in one region. [`Split`] keeps
//! the real parts in the first half of a region and the imaginary parts in the second.
//! A layout decides how stage tables are packed and which engine runs on a region.
use std::fmt::Debug;

use crate::algorithms::inverse::{transform_interleaved, transform_split};
use crate::algorithms::real::{irfft_interleaved, irfft_split, rfft_interleaved, rfft_split};
use crate::float::FftFloat;
use crate::planner::{Direction, TwiddleView};
use crate::twiddles::{fill_stage_interleaved, fill_stage_split};

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Interleaved {}
    impl Sealed for super::Split {}
}

/// `re, im, re, im, ...`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Interleaved;

/// `re, re, ..., im, im, ...`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Split;

/// Memory layout of complex buffers, implemented by [`Interleaved`] and [`Split`].
///
/// Region-level operations take the whole data and scratch regions of a workspace,
/// each `2 * capacity` floats long.
pub trait Layout: sealed::Sealed + Copy + Default + Debug + Send + Sync + 'static {
    const NAME: &'static str;

    /// Fill the stage tables for length `n` from the canonical roots.
    fn fill_stage_twiddles<T: FftFloat>(n: usize, roots: &[T], out: &mut [T]);

    /// Complex FFT of `n` values held in `data`.
    fn fft<T: FftFloat>(
        data: &mut [T],
        scratch: &mut [T],
        n: usize,
        view: &TwiddleView<'_, T>,
        codelet_size: usize,
        direction: Direction,
    );

    /// Real FFT of `n` samples held in `data`.
    fn rfft<T: FftFloat>(
        data: &mut [T],
        scratch: &mut [T],
        n: usize,
        view: &TwiddleView<'_, T>,
        codelet_size: usize,
    );

    /// Real inverse FFT back to `n` samples held in `data`.
    fn irfft<T: FftFloat>(
        data: &mut [T],
        scratch: &mut [T],
        n: usize,
        view: &TwiddleView<'_, T>,
        codelet_size: usize,
    );
}

impl Layout for Interleaved {
    const NAME: &'static str = "interleaved";

    fn fill_stage_twiddles<T: FftFloat>(n: usize, roots: &[T], out: &mut [T]) {
        fill_stage_interleaved(n, roots, out);
    }

    fn fft<T: FftFloat>(
        data: &mut [T],
        scratch: &mut [T],
        n: usize,
        view: &TwiddleView<'_, T>,
        codelet_size: usize,
        direction: Direction,
    ) {
        transform_interleaved(data, scratch, n, view, codelet_size, direction);
    }

    fn rfft<T: FftFloat>(
        data: &mut [T],
        scratch: &mut [T],
        n: usize,
        view: &TwiddleView<'_, T>,
        codelet_size: usize,
    ) {
        rfft_interleaved(data, scratch, n, view, codelet_size);
    }

    fn irfft<T: FftFloat>(
        data: &mut [T],
        scratch: &mut [T],
        n: usize,
        view: &TwiddleView<'_, T>,
        codelet_size: usize,
    ) {
        irfft_interleaved(data, scratch, n, view, codelet_size);
    }
}

/// Cut a region into its real and imaginary halves.
fn halves<T>(region: &mut [T]) -> (&mut [T], &mut [T]) {
    let half = region.len() / 2;
    region.split_at_mut(half)
}

impl Layout for Split {
    const NAME: &'static str = "split";

    fn fill_stage_twiddles<T: FftFloat>(n: usize, roots: &[T], out: &mut [T]) {
        fill_stage_split(n, roots, out);
    }

    fn fft<T: FftFloat>(
        data: &mut [T],
        scratch: &mut [T],
        n: usize,
        view: &TwiddleView<'_, T>,
        codelet_size: usize,
        direction: Direction,
    ) {
        transform_split(halves(data), halves(scratch), n, view, codelet_size, direction);
    }

    fn rfft<T: FftFloat>(
        data: &mut [T],
        scratch: &mut [T],
        n: usize,
        view: &TwiddleView<'_, T>,
        codelet_size: usize,
    ) {
        rfft_split(halves(data), halves(scratch), n, view, codelet_size);
    }

    fn irfft<T: FftFloat>(
        data: &mut [T],
        scratch: &mut [T],
        n: usize,
        view: &TwiddleView<'_, T>,
        codelet_size: usize,
    ) {
        irfft_split(halves(data), halves(scratch), n, view, codelet_size);
    }
}
