//! Implementation of Real valued FFT
//!
//! `n` real samples are viewed as `M = n/2` complex samples `z[k] = x[2k] + i*x[2k+1]`,
//! transformed with the complex engine, and untangled into the `M + 1` unique bins of
//! the real spectrum:
//!
//! ```text
//! X[k] = 1/2 * (Z[k] + conj(Z[M-k])) + 1/2 * U_k * (Z[k] - conj(Z[M-k])),   U_k = -i * W_n^k
//! X[0] = Re Z[0] + Im Z[0]
//! X[M] = Re Z[0] - Im Z[0]
//! ```
//!
//! Bins `k` and `M - k` are computed from the same two inputs, so the untangling runs
//! in place over pairs. The inverse runs the same steps backwards.
use num_complex::Complex;

use crate::algorithms::inverse::{ifft_interleaved, ifft_split};
use crate::algorithms::stockham::{fft_interleaved, fft_split};
use crate::float::FftFloat;
use crate::planner::TwiddleView;
use crate::utils::{deinterleave_into, interleave_into};

/// Indexed complex storage the untangling step works over.
trait ComplexSlots<T> {
    fn get(&self, k: usize) -> Complex<T>;

    fn set(&mut self, k: usize, z: Complex<T>);
}

struct InterleavedSlots<'a, T>(&'a mut [T]);

impl<T: FftFloat> ComplexSlots<T> for InterleavedSlots<'_, T> {
    #[inline(always)]
    fn get(&self, k: usize) -> Complex<T> {
        Complex::new(self.0[2 * k], self.0[2 * k + 1])
    }

    #[inline(always)]
    fn set(&mut self, k: usize, z: Complex<T>) {
        self.0[2 * k] = z.re;
        self.0[2 * k + 1] = z.im;
    }
}

struct SplitSlots<'a, T> {
    reals: &'a mut [T],
    imags: &'a mut [T],
}

impl<T: FftFloat> ComplexSlots<T> for SplitSlots<'_, T> {
    #[inline(always)]
    fn get(&self, k: usize) -> Complex<T> {
        Complex::new(self.reals[k], self.imags[k])
    }

    #[inline(always)]
    fn set(&mut self, k: usize, z: Complex<T>) {
        self.reals[k] = z.re;
        self.imags[k] = z.im;
    }
}

#[inline(always)]
fn unpack_rotation<T: FftFloat>(unpack: &[T], k: usize) -> Complex<T> {
    Complex::new(unpack[2 * k], unpack[2 * k + 1])
}

/// Turn the `m`-point spectrum `Z` in slots `0..m` into bins `0..=m` of the real spectrum.
fn untangle<T: FftFloat, S: ComplexSlots<T>>(slots: &mut S, m: usize, unpack: &[T]) {
    let half = T::from_f64(0.5);

    let z0 = slots.get(0);
    slots.set(0, Complex::new(z0.re + z0.im, T::zero()));
    slots.set(m, Complex::new(z0.re - z0.im, T::zero()));

    for k in 1..=m / 2 {
        let j = m - k;
        let z_k = slots.get(k);
        let z_j = slots.get(j);

        let sum_k = z_k + z_j.conj();
        let diff_k = z_k - z_j.conj();
        let sum_j = z_j + z_k.conj();
        let diff_j = z_j - z_k.conj();

        let x_k = (sum_k + unpack_rotation(unpack, k) * diff_k).scale(half);
        let x_j = (sum_j + unpack_rotation(unpack, j) * diff_j).scale(half);

        slots.set(k, x_k);
        slots.set(j, x_j);
    }
}

/// Inverse of [`untangle`]: bins `0..=m` back into the `m`-point spectrum `Z` in slots `0..m`.
fn retangle<T: FftFloat, S: ComplexSlots<T>>(slots: &mut S, m: usize, unpack: &[T]) {
    let half = T::from_f64(0.5);

    let x_0 = slots.get(0).re;
    let x_m = slots.get(m).re;
    slots.set(0, Complex::new(half * (x_0 + x_m), half * (x_0 - x_m)));

    for k in 1..=m / 2 {
        let j = m - k;
        let x_k = slots.get(k);
        let x_j = slots.get(j);

        let sum_k = x_k + x_j.conj();
        let diff_k = x_k - x_j.conj();
        let sum_j = x_j + x_k.conj();
        let diff_j = x_j - x_k.conj();

        let z_k = (sum_k + diff_k * unpack_rotation(unpack, k).conj()).scale(half);
        let z_j = (sum_j + diff_j * unpack_rotation(unpack, j).conj()).scale(half);

        slots.set(k, z_k);
        slots.set(j, z_j);
    }
}

/// Forward real FFT of `n` samples in `data[..n]`, leaving `n/2 + 1` interleaved bins in
/// `data[..n + 2]`. `scratch` needs `n` floats.
pub fn rfft_interleaved<T: FftFloat>(
    data: &mut [T],
    scratch: &mut [T],
    n: usize,
    view: &TwiddleView<'_, T>,
    codelet_size: usize,
) {
    debug_assert!(n >= 2 && data.len() >= n + 2 && scratch.len() >= n);
    let m = n / 2;

    // the samples already are the interleaved `z`
    fft_interleaved(data, scratch, m, view, codelet_size);
    untangle(&mut InterleavedSlots(&mut data[..n + 2]), m, view.unpack);
}

/// Inverse of [`rfft_interleaved`]: `n/2 + 1` bins in `data[..n + 2]` to `n` samples in
/// `data[..n]`.
pub fn irfft_interleaved<T: FftFloat>(
    data: &mut [T],
    scratch: &mut [T],
    n: usize,
    view: &TwiddleView<'_, T>,
    codelet_size: usize,
) {
    debug_assert!(n >= 2 && data.len() >= n + 2 && scratch.len() >= n);
    let m = n / 2;

    retangle(&mut InterleavedSlots(&mut data[..n + 2]), m, view.unpack);
    ifft_interleaved(data, scratch, m, view, codelet_size);
}

/// Forward real FFT of the `n` samples in `reals[..n]`. Bin `k` lands in
/// `(reals[k], imags[k])` for `k in 0..=n/2`. Each scratch slice needs `n/2` floats.
pub fn rfft_split<T: FftFloat>(
    data: (&mut [T], &mut [T]),
    scratch: (&mut [T], &mut [T]),
    n: usize,
    view: &TwiddleView<'_, T>,
    codelet_size: usize,
) {
    let (reals, imags) = data;
    let (scratch_re, scratch_im) = scratch;
    let m = n / 2;
    debug_assert!(n >= 2 && reals.len() >= n && imags.len() > m);
    debug_assert!(scratch_re.len() >= m && scratch_im.len() >= m);

    deinterleave_into(&reals[..n], &mut scratch_re[..m], &mut scratch_im[..m]);
    reals[..m].copy_from_slice(&scratch_re[..m]);
    imags[..m].copy_from_slice(&scratch_im[..m]);

    fft_split(
        (&mut *reals, &mut *imags),
        (scratch_re, scratch_im),
        m,
        view,
        codelet_size,
    );
    untangle(
        &mut SplitSlots {
            reals: &mut reals[..=m],
            imags: &mut imags[..=m],
        },
        m,
        view.unpack,
    );
}

/// Inverse of [`rfft_split`]: bins `0..=n/2` to `n` samples in `reals[..n]`.
pub fn irfft_split<T: FftFloat>(
    data: (&mut [T], &mut [T]),
    scratch: (&mut [T], &mut [T]),
    n: usize,
    view: &TwiddleView<'_, T>,
    codelet_size: usize,
) {
    let (reals, imags) = data;
    let (scratch_re, scratch_im) = scratch;
    let m = n / 2;
    debug_assert!(n >= 2 && reals.len() >= n && imags.len() > m);
    debug_assert!(scratch_re.len() >= m && scratch_im.len() >= m);

    retangle(
        &mut SplitSlots {
            reals: &mut reals[..=m],
            imags: &mut imags[..=m],
        },
        m,
        view.unpack,
    );
    ifft_split(
        (&mut *reals, &mut *imags),
        (&mut *scratch_re, &mut *scratch_im),
        m,
        view,
        codelet_size,
    );

    scratch_re[..m].copy_from_slice(&reals[..m]);
    scratch_im[..m].copy_from_slice(&imags[..m]);
    interleave_into(&scratch_re[..m], &scratch_im[..m], &mut reals[..n]);
}

#[cfg(test)]
mod tests {
    use utilities::{assert_float_closeness, gen_random_real, reference_fft, size_scaled_epsilon};

    use super::*;
    use crate::layout::{Interleaved, Split};
    use crate::options::Options;
    use crate::planner::Plan;

    fn as_complex(reals: &[f64]) -> Vec<f64> {
        reals.iter().flat_map(|&x| [x, 0.0]).collect()
    }

    #[test]
    fn matches_complex_transform_of_real_input() {
        for log_n in 1..=12 {
            let n = 1 << log_n;
            let plan = Plan::<f64, Interleaved>::new(n).unwrap();
            let codelet_size = plan.options().codelet_size;
            let samples = gen_random_real::<f64>(n);
            let expected = reference_fft(&as_complex(&samples));

            let mut data = vec![0.0; n + 2];
            data[..n].copy_from_slice(&samples);
            let mut scratch = vec![0.0; n];
            rfft_interleaved(&mut data, &mut scratch, n, &plan.view(), codelet_size);

            let epsilon = size_scaled_epsilon(n, 1e-10);
            data.iter()
                .zip(expected[..n + 2].iter())
                .for_each(|(a, e)| assert_float_closeness(*a, *e, epsilon));
        }
    }

    #[test]
    fn split_matches_complex_transform_of_real_input() {
        for log_n in 1..=10 {
            let n = 1 << log_n;
            let options = Options::with_codelet_size(4).unwrap();
            let plan = Plan::<f64, Split>::with_options(n, options).unwrap();
            let samples = gen_random_real::<f64>(n);
            let expected = reference_fft(&as_complex(&samples));

            let mut reals = samples.clone();
            let mut imags = vec![0.0; n];
            let (mut scratch_re, mut scratch_im) = (vec![0.0; n / 2], vec![0.0; n / 2]);
            rfft_split(
                (&mut reals, &mut imags),
                (&mut scratch_re, &mut scratch_im),
                n,
                &plan.view(),
                4,
            );

            let epsilon = size_scaled_epsilon(n, 1e-10);
            for k in 0..=n / 2 {
                assert_float_closeness(reals[k], expected[2 * k], epsilon);
                assert_float_closeness(imags[k], expected[2 * k + 1], epsilon);
            }
        }
    }

    #[test]
    fn inverse_recovers_samples() {
        for log_n in 1..=11 {
            let n = 1 << log_n;
            let plan = Plan::<f64, Interleaved>::new(n).unwrap();
            let split_plan = Plan::<f64, Split>::new(n).unwrap();
            let codelet_size = plan.options().codelet_size;
            let samples = gen_random_real::<f64>(n);

            let mut data = vec![0.0; n + 2];
            data[..n].copy_from_slice(&samples);
            let mut scratch = vec![0.0; n];
            rfft_interleaved(&mut data, &mut scratch, n, &plan.view(), codelet_size);
            irfft_interleaved(&mut data, &mut scratch, n, &plan.view(), codelet_size);

            let mut reals = samples.clone();
            let mut imags = vec![0.0; n];
            let (mut scratch_re, mut scratch_im) = (vec![0.0; n / 2], vec![0.0; n / 2]);
            rfft_split(
                (&mut reals, &mut imags),
                (&mut scratch_re, &mut scratch_im),
                n,
                &split_plan.view(),
                codelet_size,
            );
            irfft_split(
                (&mut reals, &mut imags),
                (&mut scratch_re, &mut scratch_im),
                n,
                &split_plan.view(),
                codelet_size,
            );

            for i in 0..n {
                assert_float_closeness(data[i], samples[i], 1e-9);
                assert_float_closeness(reals[i], samples[i], 1e-9);
            }
        }
    }
}
