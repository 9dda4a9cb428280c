//! Power-of-two FFT built on the Stockham autosort recurrence.
//!
//! Transforms run generic ping-pong stages until the remaining blocks are small, then
//! finish each block with a fully unrolled codelet. The output is in natural order, so
//! there is no bit-reversal pass.
//!
//! Three ways in:
//!
//! - [`Workspace`]: fixed memory regions sized once for a capacity;
//!   `precompute_twiddles(n)` followed by `fft(n)`, `ifft(n)`, `rfft(n)` or `irfft(n)`.
//! - [`Plan`] with the `*_with_plan` functions over caller-owned slices.
//! - One-shot helpers such as [`fft_64`] and [`r2c_fft_32`] that plan and allocate
//!   on every call.
//!
//! Both `f32` and `f64` are supported, with buffers either interleaved (`re, im` pairs)
//! or split into separate real and imaginary slices. `f32` interleaved transforms pack
//! two complex values per vector register.
#[cfg(feature = "complex-nums")]
use num_complex::Complex;

use crate::algorithms::inverse::{transform_interleaved, transform_split};
use crate::algorithms::real::{irfft_interleaved, irfft_split, rfft_interleaved, rfft_split};

pub mod algorithms;
pub mod error;
pub mod float;
pub mod kernels;
pub mod layout;
pub mod options;
pub mod planner;
pub mod twiddles;
pub mod utils;
pub mod workspace;

pub use crate::error::FftError;
pub use crate::float::FftFloat;
pub use crate::layout::{Interleaved, Layout, Split};
pub use crate::options::Options;
pub use crate::planner::{Direction, Path, Plan};
#[cfg(feature = "complex-nums")]
pub use crate::utils::combine_re_im;
pub use crate::utils::{deinterleave, interleave};
pub use crate::workspace::{RegionMap, Workspace};

fn check_len(expected: usize, actual: usize) -> Result<(), FftError> {
    if actual == expected {
        Ok(())
    } else {
        Err(FftError::BufferSize { expected, actual })
    }
}

fn check_scratch(required: usize, actual: usize) -> Result<(), FftError> {
    if actual >= required {
        Ok(())
    } else {
        Err(FftError::BufferSize {
            expected: required,
            actual,
        })
    }
}

fn check_real_len(n: usize) -> Result<(), FftError> {
    if n >= 2 {
        Ok(())
    } else {
        Err(FftError::RealTooShort(n))
    }
}

/// FFT of an interleaved signal (`re, im, re, im, ...`) in place.
///
/// `signal` holds `2 * plan.n()` floats, `scratch` at least as many.
pub fn fft_with_plan<T: FftFloat>(
    signal: &mut [T],
    scratch: &mut [T],
    plan: &Plan<T, Interleaved>,
    direction: Direction,
) -> Result<(), FftError> {
    let n = plan.n();
    check_len(2 * n, signal.len())?;
    check_scratch(2 * n, scratch.len())?;

    transform_interleaved(
        signal,
        scratch,
        n,
        &plan.view(),
        plan.options().codelet_size,
        direction,
    );
    Ok(())
}

/// FFT of a signal split into real and imaginary parts, in place.
///
/// `reals` and `imags` hold `plan.n()` values, each scratch slice at least as many.
pub fn fft_split_with_plan<T: FftFloat>(
    reals: &mut [T],
    imags: &mut [T],
    scratch_re: &mut [T],
    scratch_im: &mut [T],
    plan: &Plan<T, Split>,
    direction: Direction,
) -> Result<(), FftError> {
    let n = plan.n();
    check_len(n, reals.len())?;
    check_len(n, imags.len())?;
    check_scratch(n, scratch_re.len())?;
    check_scratch(n, scratch_im.len())?;

    transform_split(
        (reals, imags),
        (scratch_re, scratch_im),
        n,
        &plan.view(),
        plan.options().codelet_size,
        direction,
    );
    Ok(())
}

/// Real-input FFT in place.
///
/// `buffer` holds `plan.n() + 2` floats; the samples go in the first `plan.n()` and are
/// replaced by the `n/2 + 1` bins as `re, im` pairs. `scratch` needs `plan.n()` floats.
pub fn r2c_fft_with_plan<T: FftFloat>(
    buffer: &mut [T],
    scratch: &mut [T],
    plan: &Plan<T, Interleaved>,
) -> Result<(), FftError> {
    let n = plan.n();
    check_real_len(n)?;
    check_len(n + 2, buffer.len())?;
    check_scratch(n, scratch.len())?;

    rfft_interleaved(buffer, scratch, n, &plan.view(), plan.options().codelet_size);
    Ok(())
}

/// Inverse of [`r2c_fft_with_plan`]: `n/2 + 1` bins back to `n` samples at the start
/// of `buffer`.
pub fn c2r_fft_with_plan<T: FftFloat>(
    buffer: &mut [T],
    scratch: &mut [T],
    plan: &Plan<T, Interleaved>,
) -> Result<(), FftError> {
    let n = plan.n();
    check_real_len(n)?;
    check_len(n + 2, buffer.len())?;
    check_scratch(n, scratch.len())?;

    irfft_interleaved(buffer, scratch, n, &plan.view(), plan.options().codelet_size);
    Ok(())
}

/// Real-input FFT over split buffers.
///
/// The `plan.n()` samples in `reals` are replaced by bin `k` in `(reals[k], imags[k])`
/// for `k in 0..=n/2`. Both `reals` and `imags` hold `plan.n()` values, each scratch
/// slice at least `plan.n() / 2`.
pub fn r2c_fft_split_with_plan<T: FftFloat>(
    reals: &mut [T],
    imags: &mut [T],
    scratch_re: &mut [T],
    scratch_im: &mut [T],
    plan: &Plan<T, Split>,
) -> Result<(), FftError> {
    let n = plan.n();
    check_real_len(n)?;
    check_len(n, reals.len())?;
    check_len(n, imags.len())?;
    check_scratch(n / 2, scratch_re.len())?;
    check_scratch(n / 2, scratch_im.len())?;

    rfft_split(
        (reals, imags),
        (scratch_re, scratch_im),
        n,
        &plan.view(),
        plan.options().codelet_size,
    );
    Ok(())
}

/// Inverse of [`r2c_fft_split_with_plan`].
pub fn c2r_fft_split_with_plan<T: FftFloat>(
    reals: &mut [T],
    imags: &mut [T],
    scratch_re: &mut [T],
    scratch_im: &mut [T],
    plan: &Plan<T, Split>,
) -> Result<(), FftError> {
    let n = plan.n();
    check_real_len(n)?;
    check_len(n, reals.len())?;
    check_len(n, imags.len())?;
    check_scratch(n / 2, scratch_re.len())?;
    check_scratch(n / 2, scratch_im.len())?;

    irfft_split(
        (reals, imags),
        (scratch_re, scratch_im),
        n,
        &plan.view(),
        plan.options().codelet_size,
    );
    Ok(())
}

macro_rules! impl_fft_for {
    ($func_name:ident, $split_func_name:ident, $precision:ty) => {
        /// FFT of an interleaved signal of `signal.len() / 2` points, in place.
        ///
        /// # Panics
        ///
        /// Panics if `signal.len()` is not twice a power of two
        pub fn $func_name(signal: &mut [$precision], direction: Direction) {
            let plan = Plan::<$precision, Interleaved>::new(signal.len() / 2)
                .unwrap_or_else(|err| panic!("{err}"));
            let mut scratch = vec![0.0; signal.len()];
            fft_with_plan(signal, &mut scratch, &plan, direction)
                .unwrap_or_else(|err| panic!("{err}"));
        }

        /// FFT of a split signal, in place.
        ///
        /// # Panics
        ///
        /// Panics if `reals.len() != imags.len()` or the length is not a power of two
        pub fn $split_func_name(
            reals: &mut [$precision],
            imags: &mut [$precision],
            direction: Direction,
        ) {
            assert_eq!(reals.len(), imags.len());
            let n = reals.len();
            let plan =
                Plan::<$precision, Split>::new(n).unwrap_or_else(|err| panic!("{err}"));
            let (mut scratch_re, mut scratch_im) = (vec![0.0; n], vec![0.0; n]);
            fft_split_with_plan(reals, imags, &mut scratch_re, &mut scratch_im, &plan, direction)
                .unwrap_or_else(|err| panic!("{err}"));
        }
    };
}

impl_fft_for!(fft_64, fft_64_split, f64);
impl_fft_for!(fft_32, fft_32_split, f32);

macro_rules! impl_r2c_fft {
    ($r2c_name:ident, $c2r_name:ident, $precision:ty) => {
        /// Implementation of Real-Valued FFT
        ///
        /// Writes the `n/2 + 1` bins of the `n = input.len()` samples to `output` as
        /// `re, im` pairs.
        ///
        /// # Panics
        ///
        /// Panics if `input.len()` is not a power of two of at least 2, or if
        /// `output.len() != input.len() + 2`
        pub fn $r2c_name(input: &[$precision], output: &mut [$precision]) {
            let n = input.len();
            assert_eq!(output.len(), n + 2);
            let plan =
                Plan::<$precision, Interleaved>::new(n).unwrap_or_else(|err| panic!("{err}"));

            output[..n].copy_from_slice(input);
            let mut scratch = vec![0.0; n];
            r2c_fft_with_plan(output, &mut scratch, &plan)
                .unwrap_or_else(|err| panic!("{err}"));
        }

        /// Inverse of the Real-Valued FFT
        ///
        /// Reads `n/2 + 1` bins from `input` and writes the `n = output.len()` samples.
        ///
        /// # Panics
        ///
        /// Panics if `output.len()` is not a power of two of at least 2, or if
        /// `input.len() != output.len() + 2`
        pub fn $c2r_name(input: &[$precision], output: &mut [$precision]) {
            let n = output.len();
            assert_eq!(input.len(), n + 2);
            let plan =
                Plan::<$precision, Interleaved>::new(n).unwrap_or_else(|err| panic!("{err}"));

            let mut buffer = input.to_vec();
            let mut scratch = vec![0.0; n];
            c2r_fft_with_plan(&mut buffer, &mut scratch, &plan)
                .unwrap_or_else(|err| panic!("{err}"));
            output.copy_from_slice(&buffer[..n]);
        }
    };
}

impl_r2c_fft!(r2c_fft_64, c2r_fft_64, f64);
impl_r2c_fft!(r2c_fft_32, c2r_fft_32, f32);

macro_rules! impl_fft_complex_for {
    ($func_name:ident, $precision:ty, $fft_func:ident) => {
        /// FFT over a slice of [`Complex`] numbers, in place and without copying.
        ///
        /// # Panics
        ///
        /// Panics if `signal.len()` is not a power of two
        #[cfg(feature = "complex-nums")]
        pub fn $func_name(signal: &mut [Complex<$precision>], direction: Direction) {
            let interleaved: &mut [$precision] = bytemuck::cast_slice_mut(signal);
            $fft_func(interleaved, direction);
        }
    };
}

impl_fft_complex_for!(fft_complex_64, f64, fft_64);
impl_fft_complex_for!(fft_complex_32, f32, fft_32);
